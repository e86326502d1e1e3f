//! The ledger of income and expense transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Parsing and validating request bodies and date filters
//! - JSON route handlers for a user's transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod form;
mod get_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transactions,
    get_transactions_in_date_range, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use filter::DateFilterQuery;
pub(crate) use filter::parse_date_filter;
pub use form::TransactionForm;
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
