//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, db::DbConfig, session::DEFAULT_SESSION_DURATION};

/// The state of the REST server.
///
/// The state only holds configuration. Route handlers open their own
/// database connection from [AppState::db_config] for each request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where to find the application database.
    pub db_config: DbConfig,

    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which session cookies are valid.
    pub session_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] for the SQLite database described by `db_config`.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_config: DbConfig,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        db_config.initialize()?;

        Ok(Self {
            db_config,
            cookie_key: create_cookie_key(cookie_secret),
            session_duration: DEFAULT_SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// The state needed by route handlers that only read or write the ledger.
#[derive(Debug, Clone)]
pub struct DbState {
    /// Where to find the application database.
    pub db_config: DbConfig,
}

impl FromRef<AppState> for DbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_config: state.db_config.clone(),
        }
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
