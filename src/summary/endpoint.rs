//! Defines the endpoints that serve summaries of a user's ledger.

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};

use crate::{
    AppState, Error,
    app_state::DbState,
    db::DbConfig,
    summary::{
        MonthSummary, Summary, get_current_month_summary, get_summary, get_summary_in_date_range,
    },
    timezone::today_in_timezone,
    transaction::{DateFilterQuery, parse_date_filter},
    user::UserID,
};

/// The state needed to summarise the current month.
#[derive(Debug, Clone)]
pub struct MonthSummaryState {
    /// Where to find the application database.
    pub db_config: DbConfig,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for MonthSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_config: state.db_config.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for the totals and category breakdowns over the logged in
/// user's transactions.
///
/// The optional `start_date` and `end_date` query parameters limit the
/// summary to transactions dated within those bounds, inclusive.
pub async fn get_summary_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<DateFilterQuery>, QueryRejection>,
) -> Result<Json<Summary>, Error> {
    let date_range = parse_date_filter(query)?;
    let connection = state.db_config.open()?;
    let summary = match date_range {
        Some(date_range) => get_summary_in_date_range(user_id, date_range, &connection)?,
        None => get_summary(user_id, &connection)?,
    };

    Ok(Json(summary))
}

/// A route handler for the totals over the logged in user's transactions in
/// the current calendar month, where "current" is decided by the server's
/// local timezone.
pub async fn get_current_month_summary_endpoint(
    State(state): State<MonthSummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<MonthSummary>, Error> {
    let Some(today) = today_in_timezone(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let connection = state.db_config.open()?;
    let summary = get_current_month_summary(user_id, today, &connection)?;

    Ok(Json(summary))
}
