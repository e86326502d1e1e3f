//! Defines the core data models and database queries for transactions.
//!
//! Every query is scoped to a single user. A transaction that belongs to
//! another user is treated exactly like one that does not exist.

use std::{
    fmt::Display,
    ops::{Range, RangeInclusive},
    str::FromStr,
};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId, user::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The name used for the type in the database and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

pub(crate) mod date_format {
    //! Serializes a [time::Date] as an ISO-8601 calendar date, e.g. "2025-08-01".
    //!
    //! The default serializer for [time::Date] writes a (year, ordinal day)
    //! tuple, which is not what API clients expect.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    use crate::Error;

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    /// Parse an ISO-8601 calendar date such as "2025-08-01".
    ///
    /// # Errors
    /// Returns an [Error::InvalidDate] if `text` is not a valid date in the
    /// format `YYYY-MM-DD` with an unsigned four digit year, or an
    /// [Error::DateOutOfRange] for the year 9999.
    pub fn parse_date(text: &str) -> Result<Date, Error> {
        let trimmed = text.trim();

        if trimmed.starts_with(['-', '+']) {
            return Err(Error::InvalidDate(text.to_owned()));
        }

        let date =
            Date::parse(trimmed, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))?;

        super::check_date_range(date)
    }

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_date(&s).map_err(serde::de::Error::custom)
    }
}

/// The years a transaction date may fall in.
///
/// Dates are stored as `YYYY-MM-DD` text, so ordering and range queries rely
/// on every stored year being unsigned and four digits long. The year 9999 is
/// excluded so that every valid date has a following month.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9998;

/// Check that `date` is within [SUPPORTED_YEARS].
///
/// # Errors
/// Returns an [Error::DateOutOfRange] if it is not.
pub(crate) fn check_date_range(date: Date) -> Result<Date, Error> {
    if SUPPORTED_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::DateOutOfRange(date))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// How much money was spent or earned. Always positive.
    pub amount: f64,
    /// A free-text label such as "Salary" or "Groceries".
    pub category: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        category: &str,
        kind: TransactionType,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            category: category.to_owned(),
            kind,
            date,
            description: None,
        }
    }
}

/// The fields of a transaction that a user supplies when creating or
/// updating it.
///
/// The builder is checked with [TransactionBuilder::validate] before anything
/// is written to the database.
///
/// # Examples
///
/// ```
/// use time::macros::date;
///
/// use finance_tracker::{Transaction, TransactionType};
///
/// let builder = Transaction::build(45.99, "Groceries", TransactionType::Expense, date!(2025 - 01 - 15))
///     .description(Some("Weekly shop".to_owned()));
///
/// assert!(builder.validate().is_ok());
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The magnitude of the transaction, must be greater than zero.
    pub amount: f64,

    /// A free-text label for grouping transactions in summaries.
    ///
    /// # Examples
    /// - `"Salary"`
    /// - `"Groceries"`
    /// - `"Rent"`
    pub category: String,

    /// Whether the money was earned or spent.
    pub kind: TransactionType,

    /// The date when the transaction occurred.
    pub date: Date,

    /// Optional notes about the transaction.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Check the fields that the type system cannot.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
    /// - [Error::EmptyCategory] if the category is empty or only whitespace,
    /// - or [Error::DateOutOfRange] if the date is not within [SUPPORTED_YEARS].
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        check_date_range(self.date)?;

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, amount, category, type, date, description FROM transactions";

/// Create a new transaction for `user_id` in the database and return its ID.
///
/// # Errors
/// This function will return a:
/// - validation error if `builder` fails [TransactionBuilder::validate],
/// - [Error::InvalidForeignKey] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    builder.validate()?;

    let id = connection
        .prepare(
            "INSERT INTO transactions (user_id, amount, category, type, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.amount,
                &builder.category,
                builder.kind,
                builder.date,
                &builder.description,
            ),
            |row| row.get(0),
        )?;

    tracing::debug!("Created transaction {id} for user {user_id}");

    Ok(id)
}

/// Retrieve all of a user's transactions, newest first.
///
/// Transactions are sorted by date in descending order. Transactions on the
/// same date are sorted by ID in descending order, so the most recently
/// created one comes first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Retrieve a user's transactions dated within `date_range`, newest first.
///
/// The range is half-open: the start date is included and the end date is not.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_in_date_range(
    user_id: UserID,
    date_range: Range<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND date >= ?2 AND date < ?3
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            (user_id.as_i64(), date_range.start, date_range.end),
            map_transaction_row,
        )?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Retrieve a user's transaction by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite every field of a user's transaction.
///
/// Returns `false`, and changes nothing, if `id` does not refer to a
/// transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - validation error if `builder` fails [TransactionBuilder::validate],
///   in which case the database is not touched,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<bool, Error> {
    builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE transactions
         SET amount = ?1, category = ?2, type = ?3, date = ?4, description = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            builder.amount,
            &builder.category,
            builder.kind,
            builder.date,
            &builder.description,
            id,
            user_id.as_i64(),
        ),
    )?;

    Ok(rows_affected > 0)
}

/// Delete a user's transaction.
///
/// Returns `false` if `id` does not refer to a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(rows_affected > 0)
}

/// Get the total number of transactions in the database across all users.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date TEXT NOT NULL,
                description TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions(user_id);
         CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
         CREATE INDEX IF NOT EXISTS idx_transactions_type ON transactions(type);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        category: row.get(3)?,
        kind: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
