//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Nothing in Naqlah needs
//! to survive a restart: a lost session only means logging in again.

use tower_sessions::{Expiry, Session, SessionManagerLayer};

use super::session_store::MokaSessionStore;
use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "naqlah_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

fn inactivity_expiry() -> Expiry {
    Expiry::OnInactivity(tower_sessions::cookie::time::Duration::seconds(
        SESSION_EXPIRY_SECONDS,
    ))
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &WebConfig) -> SessionManagerLayer<MokaSessionStore> {
    SessionManagerLayer::new(MokaSessionStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(inactivity_expiry())
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Apply the "save my data" choice from the login form.
///
/// Unticked means the cookie lasts only until the browser closes.
pub fn remember_login(session: &Session, save_data: bool) {
    let expiry = if save_data {
        inactivity_expiry()
    } else {
        Expiry::OnSessionEnd
    };
    session.set_expiry(Some(expiry));
}
