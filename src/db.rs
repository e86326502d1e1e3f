//! Database configuration, connection handling and schema management.
//!
//! There is no long-lived connection or pool. Callers open a connection with
//! [DbConfig::open] for a single operation and let it drop when done.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    transaction::{count_transactions, create_transaction_table},
    user::{count_users, create_user_table},
};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the application database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    path: PathBuf,
}

impl DbConfig {
    /// Create a config for the SQLite database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path of the database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new connection to the database, creating the file if needed.
    ///
    /// Foreign key enforcement is switched on for the connection so that
    /// deleting a user also deletes their transactions.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be opened.
    pub fn open(&self) -> Result<Connection, Error> {
        let connection = Connection::open(&self.path)?;
        connection.busy_timeout(BUSY_TIMEOUT)?;
        enable_foreign_keys(&connection)?;

        Ok(connection)
    }

    /// Open the database and create any missing tables.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be opened or the
    /// tables cannot be created.
    pub fn initialize(&self) -> Result<(), Error> {
        let connection = self.open()?;
        initialize(&connection)
    }
}

fn enable_foreign_keys(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Create the application tables and indexes if they do not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    enable_foreign_keys(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Delete all data by dropping the application tables and creating them again.
///
/// # Errors
/// Returns an [Error::SqlError] if the database cannot be opened or the
/// tables cannot be dropped or recreated.
pub fn reset_db(config: &DbConfig) -> Result<(), Error> {
    let connection = config.open()?;

    {
        let transaction =
            SqlTransaction::new_unchecked(&connection, TransactionBehavior::Exclusive)?;
        transaction.execute_batch(
            "DROP TABLE IF EXISTS transactions;
             DROP TABLE IF EXISTS users;",
        )?;
        transaction.commit()?;
    }

    tracing::info!("Dropped all tables in {:?}", config.path());

    initialize(&connection)
}

/// A snapshot of what the database contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStatus {
    /// The names of the tables in the database, sorted alphabetically.
    pub tables: Vec<String>,
    /// The number of users, if the users table exists.
    pub user_count: Option<usize>,
    /// The number of transactions across all users, if the transactions table exists.
    pub transaction_count: Option<u32>,
}

/// Describe the tables and row counts in the database.
///
/// Returns `None` if there is no database file at the configured path.
///
/// # Errors
/// Returns an [Error::SqlError] if the database cannot be read.
pub fn database_status(config: &DbConfig) -> Result<Option<DatabaseStatus>, Error> {
    if !config.path().is_file() {
        return Ok(None);
    }

    let connection = config.open()?;
    let tables = connection
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, rusqlite::Error>>()?;

    let has_table = |name: &str| tables.iter().any(|table| table == name);

    let user_count = if has_table("users") {
        Some(count_users(&connection)?)
    } else {
        None
    };

    let transaction_count = if has_table("transactions") {
        Some(count_transactions(&connection)?)
    } else {
        None
    };

    Ok(Some(DatabaseStatus {
        tables,
        user_count,
        transaction_count,
    }))
}
