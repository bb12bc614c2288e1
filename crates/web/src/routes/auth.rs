//! Phone and OTP login.
//!
//! There is no SMS gateway and no user store: the "sent" code is logged,
//! the configured [`OtpPolicy`](naqlah_core::auth::OtpPolicy) decides which
//! codes pass, and the user is built from the phone number. Numbers ending
//! in `000` are treated as new users and sent to complete their profile.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use naqlah_core::auth::{AccountType, LoginOutcome, resolve_login};
use naqlah_core::validation::{FieldErrors, LoginForm, OtpForm};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{Page, clear_current_user, remember_login, safe_next, set_current_user};
use crate::models::{PendingLogin, session_keys};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Where to return after logging in.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Phone step.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub phone: String,
    pub is_company: bool,
    pub save_data: bool,
    pub errors: FieldErrors,
}

impl LoginTemplate {
    fn blank(page: Page) -> Self {
        Self {
            page,
            phone: String::new(),
            is_company: false,
            save_data: false,
            errors: FieldErrors::new(),
        }
    }
}

/// OTP step.
#[derive(Template, WebTemplate)]
#[template(path = "auth/otp.html")]
pub struct OtpTemplate {
    pub page: Page,
    /// Number the code was "sent" to, with country prefix.
    pub phone: String,
    pub seconds_left: i64,
    pub errors: FieldErrors,
    /// Translation key of a one-off notice.
    pub notice: Option<&'static str>,
}

impl OtpTemplate {
    fn new(page: Page, pending: &PendingLogin) -> Self {
        Self {
            page,
            phone: pending.phone.international(),
            seconds_left: pending.seconds_left(Utc::now()),
            errors: FieldErrors::new(),
            notice: None,
        }
    }
}

async fn pending_login(session: &Session) -> Result<Option<PendingLogin>> {
    Ok(session.get(session_keys::PENDING_LOGIN).await?)
}

// =============================================================================
// Phone Step
// =============================================================================

/// Display the phone step.
pub async fn login_page(
    page: Page,
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<Response> {
    if page.is_logged_in() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    if let Some(next) = safe_next(query.next.as_deref()) {
        session.insert(session_keys::LOGIN_NEXT, next).await?;
    }

    Ok(LoginTemplate::blank(page).into_response())
}

/// Validate the phone number and "send" the code.
///
/// An invalid number re-renders the phone step with the field error and
/// never reaches the OTP step.
#[instrument(skip_all)]
pub async fn login(page: Page, session: Session, Form(form): Form<LoginForm>) -> Result<Response> {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let template = LoginTemplate {
                page,
                phone: form.phone,
                is_company: AccountType::from_form(form.account_type.as_deref()).is_company(),
                save_data: naqlah_core::validation::is_checked(form.save_data.as_deref()),
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let pending = PendingLogin::new(request.phone, request.account_type, request.save_data);
    tracing::info!(
        phone = %pending.phone.international(),
        account_type = pending.account_type.as_str(),
        "Sending OTP"
    );
    session.insert(session_keys::PENDING_LOGIN, &pending).await?;

    Ok(Redirect::to("/auth/otp").into_response())
}

// =============================================================================
// OTP Step
// =============================================================================

/// Display the OTP step.
pub async fn otp_page(page: Page, session: Session) -> Result<Response> {
    let Some(pending) = pending_login(&session).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    Ok(OtpTemplate::new(page, &pending).into_response())
}

/// Check the code and log the user in.
#[instrument(skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    page: Page,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Result<Response> {
    let Some(pending) = pending_login(&session).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    let mut template = OtpTemplate::new(page, &pending);

    if pending.is_expired(Utc::now()) {
        template
            .errors
            .add("otp", "The code has expired, request a new one");
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
    }

    let code = match form.validate() {
        Ok(code) => code,
        Err(errors) => {
            template.errors = errors;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    if !state.otp_policy().accepts(&code) {
        tracing::warn!(phone = %pending.phone, "Rejected OTP");
        template.errors.add("otp", "Invalid verification code");
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
    }

    let outcome = resolve_login(pending.phone, pending.account_type);

    // New session id on privilege change
    session.cycle_id().await?;
    remember_login(&session, pending.save_data);
    session
        .remove::<PendingLogin>(session_keys::PENDING_LOGIN)
        .await?;
    set_current_user(&session, outcome.user()).await?;

    let user = outcome.user();
    set_sentry_user(&user.id, user.email.as_ref().map(|e| e.as_str()));
    add_breadcrumb("auth", "Logged in", Some(&[("account_type", pending.account_type.as_str())]));
    tracing::info!(user_id = %user.id, new_user = user.needs_profile(), "User logged in");

    let next: Option<String> = session.remove(session_keys::LOGIN_NEXT).await?;
    let target = match outcome {
        LoginOutcome::NewUser(_) => "/profile".to_owned(),
        LoginOutcome::Existing(_) => safe_next(next.as_deref())
            .unwrap_or("/dashboard")
            .to_owned(),
    };

    Ok(Redirect::to(&target).into_response())
}

/// "Send" a fresh code and restart the countdown.
#[instrument(skip_all)]
pub async fn resend_otp(page: Page, session: Session) -> Result<Response> {
    let Some(pending) = pending_login(&session).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    let renewed = PendingLogin::new(pending.phone, pending.account_type, pending.save_data);
    tracing::info!(phone = %renewed.phone.international(), "Resending OTP");
    session.insert(session_keys::PENDING_LOGIN, &renewed).await?;

    let mut template = OtpTemplate::new(page, &renewed);
    template.notice = Some("otp.resent");
    Ok(template.into_response())
}

/// Go back to the phone step with the number filled in.
pub async fn otp_back(page: Page, session: Session) -> Result<Response> {
    let pending: Option<PendingLogin> = session.remove(session_keys::PENDING_LOGIN).await?;

    let mut template = LoginTemplate::blank(page);
    if let Some(pending) = pending {
        template.phone = pending.phone.as_str().to_owned();
        template.is_company = pending.account_type.is_company();
        template.save_data = pending.save_data;
    }
    Ok(template.into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and drop everything in the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    session.flush().await?;
    clear_sentry_user();
    tracing::info!("User logged out");
    Ok(Redirect::to("/").into_response())
}
