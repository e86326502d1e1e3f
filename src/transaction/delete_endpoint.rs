//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error,
    app_state::DbState,
    database_id::TransactionId,
    transaction::{core::delete_transaction, form::parse_transaction_id},
    user::UserID,
};

/// A route handler for deleting one of the logged in user's transactions.
///
/// Responds with 404 Not Found if the transaction does not exist or belongs
/// to another user.
pub async fn delete_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let transaction_id = parse_transaction_id(transaction_id)?;
    let connection = state.db_config.open()?;

    let deleted = delete_transaction(user_id, transaction_id, &connection).inspect_err(|error| {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
    })?;

    if !deleted {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
