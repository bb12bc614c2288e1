//! Per-visitor preferences and the page context every template receives.
//!
//! [`Page`] bundles what the layout needs on every request: the UI locale
//! (and with it `lang`/`dir`), the logged-in user, the sidebar state, and
//! whether to offer the install prompt.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
};
use naqlah_core::Locale;
use tower_sessions::Session;

use crate::i18n;
use crate::models::{CurrentUser, Preferences, session_keys};
use crate::pwa;

/// Read the visitor's preferences, falling back to defaults.
pub async fn load_preferences(session: &Session) -> Preferences {
    session
        .get::<Preferences>(session_keys::PREFERENCES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Apply a change to the stored preferences.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn update_preferences(
    session: &Session,
    change: impl FnOnce(&mut Preferences),
) -> Result<Preferences, tower_sessions::session::Error> {
    let mut prefs = load_preferences(session).await;
    change(&mut prefs);
    session.insert(session_keys::PREFERENCES, prefs).await?;
    Ok(prefs)
}

/// Layout context for templates.
#[derive(Debug, Clone)]
pub struct Page {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub path: String,
    pub sidebar_open: bool,
    pub show_install_prompt: bool,
}

impl Page {
    #[must_use]
    pub fn new(prefs: Preferences, user: Option<CurrentUser>, path: impl Into<String>) -> Self {
        Self {
            locale: prefs.locale,
            user,
            path: path.into(),
            sidebar_open: prefs.sidebar_open,
            show_install_prompt: !prefs.install_prompt_dismissed,
        }
    }

    /// Translated UI string.
    #[must_use]
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        i18n::t(self.locale, key)
    }

    #[must_use]
    pub const fn lang(&self) -> &'static str {
        self.locale.code()
    }

    #[must_use]
    pub const fn dir(&self) -> &'static str {
        self.locale.dir()
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn theme_color(&self) -> &'static str {
        pwa::theme_color(&self.path, self.is_logged_in())
    }

    /// The locale the switcher offers.
    #[must_use]
    pub const fn other_locale(&self) -> Locale {
        match self.locale {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    /// User display name, or empty for guests.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.name.as_str())
    }

    #[must_use]
    pub fn user_initial(&self) -> String {
        self.user.as_ref().map(CurrentUser::initial).unwrap_or_default()
    }

    /// Content hash of `main.css`, computed at build time.
    #[must_use]
    pub const fn css_hash(&self) -> &'static str {
        env!("CSS_HASH")
    }
}

impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path().to_owned(), |uri| uri.0.path().to_owned());
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::new(Preferences::default(), None, path));
        };

        let prefs = load_preferences(session).await;
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        Ok(Self::new(prefs, user, path))
    }
}
