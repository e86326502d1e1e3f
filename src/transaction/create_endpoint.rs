//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error,
    app_state::DbState,
    endpoints::{self, format_endpoint},
    transaction::{TransactionForm, core::create_transaction, form::parse_transaction_payload},
    user::UserID,
};

/// A route handler for adding a transaction to the logged in user's ledger.
///
/// Responds with 201 Created, the new transaction's ID and its location.
pub async fn create_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let builder = parse_transaction_payload(payload)?;
    let connection = state.db_config.open()?;

    let id = create_transaction(user_id, builder, &connection).inspect_err(|error| {
        tracing::error!("could not create transaction: {error}");
    })?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoints::TRANSACTION, id))],
        Json(json!({
            "id": id,
            "message": "Transaction added successfully",
        })),
    ))
}
