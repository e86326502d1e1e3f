//! Session cookies that identify the logged in user on each request.
//!
//! Checking credentials and starting a session belongs to the authentication
//! layer, which calls [set_session_cookie]. This module only trusts and
//! refreshes the resulting cookie.

mod cookie;
mod middleware;
mod token;

pub use cookie::{COOKIE_SESSION, DEFAULT_SESSION_DURATION, set_session_cookie};
pub use middleware::session_guard;
