//! Helpers for testing the HTTP API against a real database file.

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;
use tempfile::TempDir;

use crate::{
    AppState, Error, build_router,
    db::DbConfig,
    session::{COOKIE_SESSION, set_session_cookie},
    user::{User, UserID, create_test_user},
};

const TEST_LOG_IN_ROUTE_PATH: &str = "/test/log_in/{user_id}";

async fn stub_log_in_route(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, Error> {
    set_session_cookie(jar, UserID::new(user_id), state.session_duration)
}

/// A server running the full app router on a temporary database.
///
/// The server has an extra route that starts a session for any user ID,
/// standing in for the authentication layer.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub db_config: DbConfig,
    // Keeps the database file alive until the test ends.
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_timezone("Etc/UTC")
    }

    pub fn with_timezone(local_timezone: &str) -> Self {
        let dir = tempfile::tempdir().expect("Could not create temporary directory.");
        let db_config = DbConfig::new(dir.path().join("test.db"));
        let state = AppState::new(db_config.clone(), "foobar", local_timezone)
            .expect("Could not create app state.");

        let app = build_router(state.clone()).merge(
            Router::new()
                .route(TEST_LOG_IN_ROUTE_PATH, post(stub_log_in_route))
                .with_state(state),
        );
        let server = TestServer::try_new(app).expect("Could not create test server.");

        Self {
            server,
            db_config,
            _dir: dir,
        }
    }

    pub fn connection(&self) -> Connection {
        self.db_config
            .open()
            .expect("Could not open database connection.")
    }

    pub fn create_user(&self, username: &str) -> User {
        create_test_user(username, &self.connection())
    }

    /// Start a session for `user` and return the session cookie.
    pub async fn log_in(&self, user: &User) -> Cookie<'static> {
        let path = TEST_LOG_IN_ROUTE_PATH.replace("{user_id}", &user.id.to_string());
        let response = self.server.post(&path).await;
        response.assert_status_ok();

        response.cookie(COOKIE_SESSION)
    }
}
