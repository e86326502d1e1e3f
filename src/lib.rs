//! A personal finance tracker.
//!
//! This library keeps a per-user ledger of income and expense transactions
//! in SQLite and derives summaries (totals, per-category breakdowns and
//! current-month rollups) from it. A thin JSON API built on axum exposes the
//! ledger and the summaries to logged in users.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod session;
mod summary;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;
mod user;

pub use app_state::{AppState, create_cookie_key};
pub use database_id::TransactionId;
pub use db::{DatabaseStatus, DbConfig, database_status, initialize as initialize_db, reset_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::{COOKIE_SESSION, DEFAULT_SESSION_DURATION, set_session_cookie};
pub use summary::{
    CategoryTotal, MonthSummary, Summary, current_month_window, get_current_month_summary,
    get_summary, get_summary_in_date_range, summarize,
};
pub use timezone::{get_local_offset, today_in_timezone};
pub use transaction::{
    DateFilterQuery, Transaction, TransactionBuilder, TransactionForm, TransactionType,
    count_transactions, create_transaction, delete_transaction, get_transaction,
    get_transactions, get_transactions_in_date_range, update_transaction,
};
pub use user::{NewUser, User, UserID, count_users, create_user, delete_user, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was zero, negative, or not a finite number.
    ///
    /// Amounts are magnitudes, whether the money came in or went out is
    /// decided by the transaction type.
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    /// A required field was not included in the request.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A transaction was given an empty (or all whitespace) category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A transaction type other than "income" or "expense" was given.
    #[error("type must be either income or expense, got \"{0}\"")]
    InvalidTransactionType(String),

    /// A date string could not be parsed as an ISO-8601 calendar date
    /// (`YYYY-MM-DD`).
    #[error("\"{0}\" is not a valid date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A date was outside the years 1 to 9998.
    ///
    /// Dates are stored as `YYYY-MM-DD` text and compared as strings, which
    /// only sorts correctly for unsigned four digit years.
    #[error("{0} is outside the supported range 0001-01-01 to 9998-12-31")]
    DateOutOfRange(Date),

    /// A date filter started after it ended.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// The first date to include.
        start: Date,
        /// The last date to include.
        end: Date,
    },

    /// The request body, query string or path could not be parsed, e.g. the
    /// body was not JSON or a field had the wrong type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A row referred to a user that does not exist.
    #[error("the user ID does not refer to a registered user")]
    InvalidForeignKey,

    /// The username or email of a new user is already taken.
    #[error("a user with that username or email already exists")]
    DuplicateUser,

    /// The server's timezone setting is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Whether the error was caused by bad input from the caller, as opposed
    /// to a missing record or a storage failure.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::MissingField(_)
                | Error::EmptyCategory
                | Error::InvalidTransactionType(_)
                | Error::InvalidDate(_)
                | Error::DateOutOfRange(_)
                | Error::InvalidDateRange { .. }
                | Error::InvalidRequest(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidForeignKey,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.starts_with("UNIQUE constraint failed: users.") => Error::DuplicateUser,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            error if error.is_validation_error() => StatusCode::BAD_REQUEST,
            Error::DuplicateUser => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            // The session outlived its user.
            Error::InvalidForeignKey => StatusCode::UNAUTHORIZED,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "An unexpected error occurred, check the server logs for more details."
                    })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
