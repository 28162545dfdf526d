//! Cookie-backed session adapter.
//!
//! The session layer is injected into the router at construction
//! (`server::app`), so there is no process-wide session singleton. Every
//! handler that needs the caller's identity resolves it fresh from the
//! session store through this module.

use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, Session};

use crate::error::ApiError;

/// Name of the signed session cookie.
pub const SESSION_COOKIE: &str = "SID";

/// Session key holding the signed-in account.
const ACCOUNT_KEY: &str = "account";

/// The caller has no resolvable account: the session is absent, expired,
/// or unreadable. Mutation handlers answer this with the in-band
/// login-required response, never an HTTP error.
#[derive(Debug)]
pub struct Unauthenticated;

/// Read the signed-in account, if any. Store failures surface as tier-3
/// errors; an absent value is a normal outcome.
pub async fn current_account(session: &Session) -> Result<Option<String>, ApiError> {
    Ok(session.get::<String>(ACCOUNT_KEY).await?)
}

/// The single identity check used by every mutation handler: resolves
/// the account once at handler entry, treating any session failure the
/// same as an absent account.
pub async fn authenticate(session: &Session) -> Result<String, Unauthenticated> {
    match session.get::<String>(ACCOUNT_KEY).await {
        Ok(Some(account)) => Ok(account),
        Ok(None) => Err(Unauthenticated),
        Err(err) => {
            tracing::warn!("session read failed during authentication: {}", err);
            Err(Unauthenticated)
        }
    }
}

/// Write the account into the session after a successful sign-in.
/// `remember` issues a persistent session; otherwise the cookie lasts
/// until the client closes.
pub async fn establish(session: &Session, account: &str, remember: bool) -> Result<(), ApiError> {
    session.insert(ACCOUNT_KEY, account.to_string()).await?;
    if remember {
        let expires =
            OffsetDateTime::now_utc() + Duration::days(crate::config::config().session.remember_days);
        session.set_expiry(Some(Expiry::AtDateTime(expires)));
    } else {
        session.set_expiry(Some(Expiry::OnSessionEnd));
    }
    Ok(())
}

/// Drop all session values and expire the cookie immediately.
pub async fn clear(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}
