//! Preference switches: language, sidebar and the install prompt.
//!
//! Each switch stores the choice in the session and redirects back to the
//! page it was posted from, so the change survives reloads.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use naqlah_core::Locale;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{safe_next, update_preferences};

/// Language switch form.
#[derive(Debug, Deserialize)]
pub struct LocaleForm {
    pub locale: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Sidebar switch form. Without `open` the sidebar toggles.
#[derive(Debug, Deserialize)]
pub struct SidebarForm {
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Install prompt dismissal form.
#[derive(Debug, Deserialize)]
pub struct DismissForm {
    #[serde(default)]
    pub next: Option<String>,
}

fn back_to(next: Option<&str>) -> Response {
    Redirect::to(safe_next(next).unwrap_or("/")).into_response()
}

/// Switch the UI language.
#[instrument(skip(session))]
pub async fn set_locale(session: Session, Form(form): Form<LocaleForm>) -> Result<Response> {
    let locale =
        Locale::parse(&form.locale).map_err(|e| AppError::BadRequest(e.to_string()))?;
    update_preferences(&session, |prefs| prefs.locale = locale).await?;
    tracing::debug!(%locale, "Locale changed");
    Ok(back_to(form.next.as_deref()))
}

/// Open, close or toggle the app sidebar.
#[instrument(skip(session))]
pub async fn set_sidebar(session: Session, Form(form): Form<SidebarForm>) -> Result<Response> {
    let open = form.open.as_deref().map(str::trim);
    update_preferences(&session, |prefs| {
        prefs.sidebar_open = match open {
            Some("true" | "1" | "on") => true,
            Some("false" | "0" | "off") => false,
            _ => !prefs.sidebar_open,
        };
    })
    .await?;
    Ok(back_to(form.next.as_deref()))
}

/// Stop offering the install prompt.
#[instrument(skip(session))]
pub async fn dismiss_install(session: Session, Form(form): Form<DismissForm>) -> Result<Response> {
    update_preferences(&session, |prefs| prefs.install_prompt_dismissed = true).await?;
    Ok(back_to(form.next.as_deref()))
}
