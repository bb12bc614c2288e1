//! Profile completion, dashboard and settings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use naqlah_core::Locale;
use naqlah_core::validation::{FieldErrors, ProfileForm};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Page, RequireAuth, set_current_user};

use super::SelectOption;

// =============================================================================
// Profile
// =============================================================================

/// Profile completion page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub page: Page,
    pub form: ProfileForm,
    pub errors: FieldErrors,
}

/// Display the profile page. Only users without a name need it.
pub async fn profile_page(RequireAuth(user): RequireAuth, page: Page) -> Response {
    if !user.needs_profile() {
        return Redirect::to("/dashboard").into_response();
    }

    let form = ProfileForm {
        phone: user.phone.as_str().to_owned(),
        ..ProfileForm::default()
    };

    ProfileTemplate {
        page,
        form,
        errors: FieldErrors::new(),
    }
    .into_response()
}

/// Save the profile and continue to a first order.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn save_profile(
    RequireAuth(mut user): RequireAuth,
    page: Page,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            let template = ProfileTemplate { page, form, errors };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    user.name = update.full_name();
    user.phone = update.phone;
    user.email = update.email;
    set_current_user(&session, &user).await?;
    tracing::info!("Profile completed");

    Ok(Redirect::to("/order-move").into_response())
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub submitted: Option<String>,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct DashboardTemplate {
    pub page: Page,
    /// An order was just submitted.
    pub submitted: bool,
}

/// Display the dashboard.
pub async fn dashboard(
    RequireAuth(_user): RequireAuth,
    page: Page,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    DashboardTemplate {
        page,
        submitted: query.submitted.is_some(),
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/settings.html")]
pub struct SettingsTemplate {
    pub page: Page,
    pub locales: Vec<SelectOption>,
}

/// Display the settings page.
pub async fn settings(RequireAuth(_user): RequireAuth, page: Page) -> impl IntoResponse {
    let locales = Locale::ALL
        .into_iter()
        .map(|l| SelectOption::new(l.code(), l.native_name(), l == page.locale))
        .collect();

    SettingsTemplate { page, locales }
}
