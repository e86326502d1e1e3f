//! Aggregates a user's transactions into totals and per-category breakdowns.
//!
//! Nothing here is cached or stored. Every summary is computed from the
//! transactions in the database at the time of the call.

use std::{collections::HashMap, ops::Range};

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    transaction::{
        Transaction, TransactionType, get_transactions, get_transactions_in_date_range,
    },
    user::UserID,
};

/// The sum of the transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category label, e.g. "Groceries".
    pub category: String,
    /// The sum of the amounts in the category.
    pub total: f64,
}

/// Totals over all of a user's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub current_balance: f64,
    /// Expense totals per category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Income totals per category, largest first.
    pub income_by_category: Vec<CategoryTotal>,
}

/// Totals over the transactions in the current calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthSummary {
    /// The sum of income this month.
    pub total_income: f64,
    /// The sum of expenses this month.
    pub total_expenses: f64,
    /// Income minus expenses this month.
    pub current_balance: f64,
}

/// Compute the totals and category breakdowns for `transactions`.
///
/// Category breakdowns are sorted by total in descending order. Categories
/// with equal totals are sorted by name in ascending order so that the output
/// is deterministic.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut expenses_by_category: HashMap<&str, f64> = HashMap::new();
    let mut income_by_category: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        let totals = match transaction.kind {
            TransactionType::Income => &mut income_by_category,
            TransactionType::Expense => &mut expenses_by_category,
        };

        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
    }

    let MonthSummary {
        total_income,
        total_expenses,
        current_balance,
    } = sum_totals(transactions);

    Summary {
        total_income,
        total_expenses,
        current_balance,
        expenses_by_category: sort_category_totals(expenses_by_category),
        income_by_category: sort_category_totals(income_by_category),
    }
}

fn sum_totals(transactions: &[Transaction]) -> MonthSummary {
    let (total_income, total_expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                }
            });

    MonthSummary {
        total_income,
        total_expenses,
        current_balance: total_income - total_expenses,
    }
}

fn sort_category_totals(totals: HashMap<&str, f64>) -> Vec<CategoryTotal> {
    let mut sorted: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    sorted.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    sorted
}

/// The dates of the calendar month containing `today`, as the half-open range
/// [first day of the month, first day of the next month).
///
/// December rolls over into January of the following year. The end of the
/// window is clamped to [Date::MAX] in the last representable month.
pub fn current_month_window(today: Date) -> Range<Date> {
    let start = today.replace_day(1).expect("every month has a first day");
    let (next_year, next_month) = match today.month() {
        Month::December => (today.year() + 1, Month::January),
        month => (today.year(), month.next()),
    };
    let end = Date::from_calendar_date(next_year, next_month, 1).unwrap_or(Date::MAX);

    start..end
}

/// Get the totals and category breakdowns over all of a user's transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if the transactions cannot be read.
pub fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let transactions = get_transactions(user_id, connection)?;

    Ok(summarize(&transactions))
}

/// Get the totals and category breakdowns over a user's transactions with
/// dates in `date_range`.
///
/// # Errors
/// Returns an [Error::SqlError] if the transactions cannot be read.
pub fn get_summary_in_date_range(
    user_id: UserID,
    date_range: Range<Date>,
    connection: &Connection,
) -> Result<Summary, Error> {
    let transactions = get_transactions_in_date_range(user_id, date_range, connection)?;

    Ok(summarize(&transactions))
}

/// Get the totals over a user's transactions in the calendar month containing `today`.
///
/// # Errors
/// Returns an [Error::SqlError] if the transactions cannot be read.
pub fn get_current_month_summary(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<MonthSummary, Error> {
    let transactions =
        get_transactions_in_date_range(user_id, current_month_window(today), connection)?;

    Ok(sum_totals(&transactions))
}
