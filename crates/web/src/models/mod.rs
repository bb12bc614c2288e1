//! Session-stored models.

pub mod session;

pub use session::{CurrentUser, PendingLogin, Preferences, keys as session_keys};
