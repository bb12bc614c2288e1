//! Session-related types.
//!
//! Everything a visitor's browser used to keep in local storage lives in
//! the session instead: the logged-in user, UI preferences, an OTP login in
//! progress and the booking wizards.

use chrono::{DateTime, Duration, Utc};
use naqlah_core::auth::{AccountType, User};
use naqlah_core::{Locale, SaudiPhone};
use serde::{Deserialize, Serialize};

/// Session-stored user identity.
pub type CurrentUser = User;

/// How long an issued OTP stays valid.
pub const PENDING_LOGIN_TTL: Duration = Duration::minutes(5);

/// Phone step completed, waiting for the OTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub phone: SaudiPhone,
    pub account_type: AccountType,
    /// "Save my data": keep the session after the browser closes.
    pub save_data: bool,
    pub issued_at: DateTime<Utc>,
}

impl PendingLogin {
    #[must_use]
    pub fn new(phone: SaudiPhone, account_type: AccountType, save_data: bool) -> Self {
        Self {
            phone,
            account_type,
            save_data,
            issued_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > PENDING_LOGIN_TTL
    }

    /// Seconds until the code expires, for the countdown on the OTP page.
    #[must_use]
    pub fn seconds_left(&self, now: DateTime<Utc>) -> i64 {
        (PENDING_LOGIN_TTL - (now - self.issued_at)).num_seconds().max(0)
    }
}

/// UI preferences that survive reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub locale: Locale,
    pub sidebar_open: bool,
    pub install_prompt_dismissed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            sidebar_open: true,
            install_prompt_dismissed: false,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the OTP login in progress.
    pub const PENDING_LOGIN: &str = "pending_login";

    /// Key for UI preferences.
    pub const PREFERENCES: &str = "preferences";

    /// Where to go once the OTP login completes.
    pub const LOGIN_NEXT: &str = "login_next";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pending() -> PendingLogin {
        PendingLogin::new(
            SaudiPhone::parse("512345678").unwrap(),
            AccountType::Customer,
            true,
        )
    }

    #[test]
    fn test_pending_login_expires_after_five_minutes() {
        let login = pending();
        assert!(!login.is_expired(login.issued_at + Duration::minutes(4)));
        assert!(login.is_expired(login.issued_at + Duration::minutes(6)));
    }

    #[test]
    fn test_seconds_left() {
        let login = pending();
        assert_eq!(login.seconds_left(login.issued_at), 300);
        assert_eq!(login.seconds_left(login.issued_at + Duration::minutes(10)), 0);
    }

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.locale, Locale::Ar);
        assert!(prefs.sidebar_open);
        assert!(!prefs.install_prompt_dismissed);
    }
}
