//! Defines the endpoint for overwriting an existing transaction.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error,
    app_state::DbState,
    database_id::TransactionId,
    transaction::{
        TransactionForm,
        core::update_transaction,
        form::{parse_transaction_id, parse_transaction_payload},
    },
    user::UserID,
};

/// A route handler for replacing every field of one of the logged in user's
/// transactions.
///
/// The body is validated before the database is touched, so an invalid body
/// responds with 400 Bad Request even if the transaction does not exist.
pub async fn update_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let transaction_id = parse_transaction_id(transaction_id)?;
    let builder = parse_transaction_payload(payload)?;
    let connection = state.db_config.open()?;

    if !update_transaction(user_id, transaction_id, builder, &connection)? {
        tracing::debug!("User {user_id} tried to update missing transaction {transaction_id}");
        return Err(Error::NotFound);
    }

    Ok(Json(json!({ "message": "Transaction updated successfully" })))
}
