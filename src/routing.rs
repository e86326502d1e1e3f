//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    session::session_guard,
    summary::{get_current_month_summary_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::HEALTH, get(get_health));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::MONTH_SUMMARY,
            get(get_current_month_summary_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), session_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{endpoints, session::COOKIE_SESSION, test_utils::TestApp};

    #[tokio::test]
    async fn health_check_does_not_need_session() {
        let app = TestApp::new();

        let response = app.server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = TestApp::new();

        let response = app.server.get("/api/does_not_exist").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn session_cookie_is_refreshed_on_protected_routes() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get(endpoints::SUMMARY)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_SESSION).is_some());
    }
}
