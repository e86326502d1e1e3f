//! Reads and writes the private cookie that carries the session token.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, session::token::Token, user::UserID};

/// The name of the cookie holding the session token.
pub const COOKIE_SESSION: &str = "session";

/// The default duration for which session cookies are valid.
///
/// Every authenticated request pushes the expiry out by this duration again.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::minutes(30);

/// Add a session cookie for `user_id` to the cookie jar.
///
/// This is the hand-off point for the authentication layer: once it has
/// verified a user's credentials it calls this function, and every request
/// that carries the cookie is then treated as coming from `user_id`.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        user_id,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, token_string))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Get the user ID from the session cookie in `jar`.
///
/// Returns `None` if the cookie is missing, cannot be decrypted, holds a
/// malformed token or has expired.
pub(crate) fn get_user_id_from_cookies(jar: &PrivateCookieJar) -> Option<UserID> {
    let cookie = jar.get(COOKIE_SESSION)?;
    let token: Token = match serde_json::from_str(cookie.value()) {
        Ok(token) => token,
        Err(error) => {
            tracing::warn!("Could not parse session token: {error}");
            return None;
        }
    };

    token
        .is_valid_at(OffsetDateTime::now_utc())
        .then_some(token.user_id)
}
