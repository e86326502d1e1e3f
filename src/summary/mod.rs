//! Read-only aggregate views over a user's ledger.
//!
//! This module contains:
//! - The summary models and the functions that compute them
//! - The JSON endpoints that serve them

mod core;
mod endpoint;

pub use core::{
    CategoryTotal, MonthSummary, Summary, current_month_window, get_current_month_summary,
    get_summary, get_summary_in_date_range, summarize,
};
pub use endpoint::{get_current_month_summary_endpoint, get_summary_endpoint};
