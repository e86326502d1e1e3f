//! Defines the endpoints for reading a user's transactions.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use crate::{
    Error,
    app_state::DbState,
    database_id::TransactionId,
    transaction::{
        DateFilterQuery, Transaction,
        core::{get_transaction, get_transactions, get_transactions_in_date_range},
        filter::parse_date_filter,
        form::parse_transaction_id,
    },
    user::UserID,
};

/// A route handler for listing the transactions in the logged in user's
/// ledger, newest first.
///
/// The optional `start_date` and `end_date` query parameters limit the list
/// to transactions dated within those bounds, inclusive.
pub async fn get_transactions_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<DateFilterQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let date_range = parse_date_filter(query)?;
    let connection = state.db_config.open()?;
    let transactions = match date_range {
        Some(date_range) => get_transactions_in_date_range(user_id, date_range, &connection)?,
        None => get_transactions(user_id, &connection)?,
    };

    Ok(Json(transactions))
}

/// A route handler for getting a single transaction.
///
/// Responds with 404 Not Found if the transaction does not exist or belongs
/// to another user.
pub async fn get_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_transaction_id(transaction_id)?;
    let connection = state.db_config.open()?;
    let transaction = get_transaction(user_id, transaction_id, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::TestApp,
        transaction::{Transaction, TransactionType, core::create_transaction},
    };

    #[tokio::test]
    async fn lists_own_transactions_newest_first() {
        let app = TestApp::new();
        let alice = app.create_user("alice");
        let bob = app.create_user("bob");
        let connection = app.connection();
        let older = create_transaction(
            alice.id,
            Transaction::build(1000.0, "Salary", TransactionType::Income, date!(2025 - 08 - 01)),
            &connection,
        )
        .unwrap();
        let newer = create_transaction(
            alice.id,
            Transaction::build(300.0, "Food", TransactionType::Expense, date!(2025 - 08 - 02)),
            &connection,
        )
        .unwrap();
        create_transaction(
            bob.id,
            Transaction::build(50.0, "Fun", TransactionType::Expense, date!(2025 - 08 - 03)),
            &connection,
        )
        .unwrap();
        let cookie = app.log_in(&alice).await;

        let response = app
            .server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        let ids: Vec<i64> = body.iter().filter_map(|t| t["id"].as_i64()).collect();
        assert_eq!(ids, vec![newer, older]);
        assert_eq!(
            body[0],
            json!({
                "id": newer,
                "user_id": alice.id.as_i64(),
                "amount": 300.0,
                "category": "Food",
                "type": "expense",
                "date": "2025-08-02",
                "description": null,
            })
        );
    }

    #[tokio::test]
    async fn empty_ledger_is_empty_list() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn get_single_transaction() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let id = create_transaction(
            user.id,
            Transaction::build(12.5, "Coffee", TransactionType::Expense, date!(2025 - 08 - 04))
                .description(Some("Flat white".to_owned())),
            &app.connection(),
        )
        .unwrap();
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], id);
        assert_eq!(body["description"], "Flat white");
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let app = TestApp::new();
        let alice = app.create_user("alice");
        let bob = app.create_user("bob");
        let id = create_transaction(
            alice.id,
            Transaction::build(12.5, "Coffee", TransactionType::Expense, date!(2025 - 08 - 04)),
            &app.connection(),
        )
        .unwrap();
        let cookie = app.log_in(&bob).await;

        let response = app
            .server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(cookie)
            .await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn list_can_be_limited_to_dates() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let connection = app.connection();
        let mut ids = Vec::new();
        for date in [
            date!(2025 - 07 - 31),
            date!(2025 - 08 - 01),
            date!(2025 - 08 - 31),
            date!(2025 - 09 - 01),
        ] {
            let id = create_transaction(
                user.id,
                Transaction::build(10.0, "Misc", TransactionType::Expense, date),
                &connection,
            )
            .unwrap();
            ids.push(id);
        }
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("start_date", "2025-08-01")
            .add_query_param("end_date", "2025-08-31")
            .add_cookie(cookie.clone())
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        let listed: Vec<i64> = body.iter().filter_map(|t| t["id"].as_i64()).collect();
        assert_eq!(listed, vec![ids[2], ids[1]]);

        let response = app
            .server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("start_date", "2025-08-31")
            .add_cookie(cookie)
            .await;

        let body: Vec<Value> = response.json();
        let listed: Vec<i64> = body.iter().filter_map(|t| t["id"].as_i64()).collect();
        assert_eq!(listed, vec![ids[3], ids[2]]);
    }

    #[tokio::test]
    async fn list_with_invalid_date_is_bad_request() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("end_date", "31/08/2025")
            .add_cookie(cookie)
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let app = TestApp::new();
        let user = app.create_user("alice");
        let cookie = app.log_in(&user).await;

        let response = app
            .server
            .get("/api/transactions/abc")
            .add_cookie(cookie)
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("invalid request:"));
    }

    #[tokio::test]
    async fn list_requires_session() {
        let app = TestApp::new();

        app.server
            .get(endpoints::TRANSACTIONS)
            .await
            .assert_status_unauthorized();
    }
}
