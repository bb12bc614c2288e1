//! HTTP route handlers for Naqlah.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Marketing home page
//! POST /contact                 - Contact form
//! POST /newsletter              - Newsletter signup
//! GET  /health                  - Health check
//!
//! # PWA
//! GET  /manifest.json           - Web app manifest
//! GET  /sw.js                   - Service worker
//! GET  /offline                 - Offline fallback page
//!
//! # Auth (phone + OTP, mocked)
//! GET  /auth/login              - Phone step
//! POST /auth/login              - Validate phone, "send" OTP
//! GET  /auth/otp                - OTP step
//! POST /auth/otp                - Verify OTP, log in
//! POST /auth/otp/resend         - Resend OTP
//! POST /auth/otp/back           - Back to the phone step
//! POST /auth/logout             - Log out
//!
//! # Account
//! GET  /profile                 - Complete profile (new users)
//! POST /profile                 - Save profile
//! GET  /dashboard               - Dashboard (requires auth)
//! GET  /settings                - Settings (requires auth)
//!
//! # Preferences
//! POST /preferences/locale      - Switch UI language
//! POST /preferences/sidebar     - Open/close the app sidebar
//! POST /preferences/install     - Dismiss the install prompt
//!
//! # Company onboarding
//! GET  /register-company        - Registration form
//! POST /register-company        - Register (multipart)
//!
//! # Booking wizard (same routes under /request-move and /order-move)
//! GET  /{flow}                  - Current step, review or processing page
//! POST /{flow}                  - Post the current step (multipart)
//! POST /{flow}/back             - Previous step
//! POST /{flow}/edit/{step}      - Jump back to a step from the review
//! POST /{flow}/submit           - Submit the request
//! POST /{flow}/restart          - Discard the wizard
//!
//! # API
//! GET  /api/geo/search?q=       - Geocode a query (JSON)
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod company;
pub mod form_data;
pub mod home;
pub mod preferences;
pub mod pwa;
pub mod wizard;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use naqlah_core::order::Flow;

use crate::filters;
use crate::middleware::{Page, auth_rate_limiter};
use crate::state::AppState;

/// Largest multipart body: a handful of photos at the per-file limit.
const UPLOAD_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// A `<select>` option for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Create the auth routes router.
///
/// The POST endpoints are the ones that send or check codes, so only they
/// are rate limited.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let pages = Router::new()
        .route("/login", get(auth::login_page))
        .route("/otp", get(auth::otp_page))
        .route("/logout", post(auth::logout));

    let actions = Router::new()
        .route("/login", post(auth::login))
        .route("/otp", post(auth::verify_otp))
        .route("/otp/resend", post(auth::resend_otp))
        .route("/otp/back", post(auth::otp_back));

    let actions = if rate_limit {
        actions.route_layer(auth_rate_limiter())
    } else {
        actions
    };

    pages.merge(actions)
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile_page).post(account::save_profile))
        .route("/dashboard", get(account::dashboard))
        .route("/settings", get(account::settings))
}

/// Create the preference routes router.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/locale", post(preferences::set_locale))
        .route("/sidebar", post(preferences::set_sidebar))
        .route("/install", post(preferences::dismiss_install))
}

/// Create the booking wizard routes for one flow.
pub fn wizard_routes(flow: Flow) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(wizard::show)
                .post(wizard::post_step)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/back", post(wizard::back))
        .route("/edit/{step}", post(wizard::edit))
        .route("/submit", post(wizard::submit))
        .route("/restart", post(wizard::restart))
        .layer(Extension(flow))
}

/// Create all routes for the app.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        // Marketing site
        .route("/", get(home::home))
        .route("/contact", post(home::contact))
        .route("/newsletter", post(home::newsletter))
        .route("/health", get(health))
        // PWA
        .route("/manifest.json", get(pwa::manifest))
        .route("/sw.js", get(pwa::service_worker))
        .route("/offline", get(pwa::offline))
        // Auth and account
        .nest("/auth", auth_routes(rate_limit))
        .merge(account_routes())
        .nest("/preferences", preference_routes())
        // Company onboarding
        .route(
            "/register-company",
            get(company::register_page)
                .post(company::register)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Booking wizard
        .nest("/request-move", wizard_routes(Flow::RequestMove))
        .nest("/order-move", wizard_routes(Flow::OrderMove))
        // API
        .route("/api/geo/search", get(api::geo_search))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub page: Page,
}

/// Fallback for unknown paths.
pub async fn not_found(page: Page) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { page })
}
