//! Booking wizard handlers, shared by `/request-move` and `/order-move`.
//!
//! The [`Wizard`] lives in the session under the flow's key. `GET` renders
//! whatever the cursor points at; every action posts back and redirects
//! (303) to the flow's base path. Rejected steps re-render in place with
//! status 422 and the posted values.

pub mod parse;
pub mod views;

use axum::{
    Extension,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use naqlah_core::order::{Flow, Location, Step, StepUpdate, Wizard, WizardError};
use naqlah_core::validation::FieldErrors;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::geo::GeoError;
use crate::middleware::Page;
use crate::state::AppState;

use super::form_data::FormData;
use views::{Draft, ProcessingTemplate, ReviewTemplate, WizardChrome};

// =============================================================================
// Session helpers
// =============================================================================

async fn load_wizard(session: &Session, flow: Flow) -> Result<Wizard> {
    Ok(session
        .get::<Wizard>(flow.session_key())
        .await?
        .unwrap_or_else(|| Wizard::new(flow)))
}

async fn save_wizard(session: &Session, wizard: &Wizard) -> Result<()> {
    session.insert(wizard.flow().session_key(), wizard).await?;
    Ok(())
}

/// Guests are sent home from flows that need an account.
fn login_required(flow: Flow, page: &Page) -> Option<Response> {
    (flow.requires_login() && !page.is_logged_in()).then(|| Redirect::to("/").into_response())
}

fn to_start(flow: Flow) -> Response {
    Redirect::to(flow.base_path()).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Rendering
// =============================================================================

async fn render(state: &AppState, page: Page, wizard: &Wizard, draft: Draft) -> Result<Response> {
    let chrome = WizardChrome::new(wizard.flow(), wizard.step(), page.locale);

    match wizard.step() {
        Step::Review => {
            let data = wizard.data();
            let from = (data.pickup_location.lat, data.pickup_location.lng);
            let to = (data.destination_location.lat, data.destination_location.lng);
            let route = state.geo().route_or_estimate(from, to).await;

            Ok(ReviewTemplate {
                sections: views::review_sections(data, &page),
                page,
                chrome,
                route,
            }
            .into_response())
        }
        Step::Processing => Ok(ProcessingTemplate { page, chrome }.into_response()),
        _ => Ok(views::data_step_page(page, wizard, draft, today())
            .map_or_else(|| to_start(wizard.flow()), IntoResponse::into_response)),
    }
}

/// Display the current step, the review page or the processing page.
pub async fn show(
    State(state): State<AppState>,
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    let wizard = load_wizard(&session, flow).await?;
    render(&state, page, &wizard, Draft::default()).await
}

// =============================================================================
// Posting a step
// =============================================================================

fn location_update(step: Step, location: Location) -> StepUpdate {
    if step == Step::PickupLocation {
        StepUpdate::PickupLocation(location)
    } else {
        StepUpdate::DestinationLocation(location)
    }
}

fn stored_location(wizard: &Wizard, step: Step) -> &Location {
    if step == Step::PickupLocation {
        &wizard.data().pickup_location
    } else {
        &wizard.data().destination_location
    }
}

/// `action=search`: geocode the query and show the hit without advancing.
async fn search_location(
    state: &AppState,
    page: Page,
    wizard: &Wizard,
    data: &FormData,
) -> Result<Response> {
    let step = wizard.step();
    let query = data.text("query").to_owned();
    let posted = parse::location(data, stored_location(wizard, step)).location;
    let mut errors = FieldErrors::new();

    let location = match state.geo().search(&query, page.locale).await {
        Ok(place) => place.into(),
        // Too short to search; keep what was there
        Err(GeoError::QueryTooShort) => posted,
        Err(GeoError::NoResults) => {
            errors.add("query", page.t("wizard.no_results"));
            posted
        }
        Err(e) => {
            tracing::warn!(error = %e, "Location search failed");
            errors.add("query", page.t("wizard.no_results"));
            posted
        }
    };

    let draft = Draft {
        update: Some(location_update(step, location)),
        query,
        errors,
    };
    render(state, page, wizard, draft).await
}

/// `action=locate`: label the posted point (e.g. from the browser's
/// geolocation) without advancing.
async fn locate_location(
    state: &AppState,
    page: Page,
    wizard: &Wizard,
    data: &FormData,
) -> Result<Response> {
    let step = wizard.step();
    let posted = parse::location(data, stored_location(wizard, step));

    let location = if posted.explicit_point {
        let point = posted.location;
        state.geo().locate(point.lat, point.lng, page.locale).await
    } else {
        posted.location
    };

    let draft = Draft {
        update: Some(location_update(step, location)),
        ..Draft::default()
    };
    render(state, page, wizard, draft).await
}

/// Merge the posted step and advance.
#[instrument(skip_all, fields(flow = flow.base_path()))]
pub async fn post_step(
    State(state): State<AppState>,
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    let data = FormData::read(multipart).await?;
    let mut wizard = load_wizard(&session, flow).await?;
    let step = wizard.step();

    // A stale tab posting an old step just sees the current one
    let posted_step = data.opt("step").and_then(|s| s.parse::<u8>().ok());
    if posted_step.is_some_and(|n| n != step.number()) {
        tracing::debug!(?posted_step, current = step.number(), "Stale wizard post");
        return Ok(to_start(flow));
    }

    let update = if step.is_location_step() {
        match data.text("action") {
            "search" => return search_location(&state, page, &wizard, &data).await,
            "locate" => return locate_location(&state, page, &wizard, &data).await,
            _ => {}
        }

        let posted = parse::location(&data, stored_location(&wizard, step));
        let location = if posted.needs_lookup() {
            let point = posted.location;
            state.geo().locate(point.lat, point.lng, page.locale).await
        } else {
            posted.location
        };
        location_update(step, location)
    } else {
        let Some((update, errors)) = parse::step_update(step, &data, wizard.data()) else {
            tracing::debug!(step = step.number(), "Ignoring post without a step form");
            return Ok(to_start(flow));
        };
        if !errors.is_empty() {
            tracing::debug!(step = step.number(), fields = errors.len(), "Malformed step values");
            return render(&state, page, &wizard, Draft::invalid(update, errors)).await;
        }
        update
    };

    match wizard.next(update.clone(), today()) {
        Ok(next) => {
            save_wizard(&session, &wizard).await?;
            tracing::debug!(from = step.number(), to = next.number(), "Wizard advanced");
            Ok(to_start(flow))
        }
        Err(WizardError::Invalid(errors)) => {
            tracing::debug!(step = step.number(), fields = errors.len(), "Step rejected");
            render(&state, page, &wizard, Draft::invalid(update, errors)).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring wizard post");
            Ok(to_start(flow))
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Go back one step. A no-op on the first step and once submitted.
pub async fn back(
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    let mut wizard = load_wizard(&session, flow).await?;
    wizard.back();
    save_wizard(&session, &wizard).await?;
    Ok(to_start(flow))
}

/// Jump back to an earlier step from the review page.
pub async fn edit(
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
    Path(number): Path<u8>,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    let mut wizard = load_wizard(&session, flow).await?;
    let Some(target) = Step::from_number(number) else {
        return Ok(to_start(flow));
    };

    match wizard.edit(target) {
        Ok(_) => save_wizard(&session, &wizard).await?,
        Err(e) => tracing::debug!(error = %e, "Ignoring edit"),
    }
    Ok(to_start(flow))
}

/// Submit the request from the review page.
///
/// Request-move keeps the wizard to show the processing page; order-move
/// discards it and returns to the dashboard.
#[instrument(skip_all, fields(flow = flow.base_path()))]
pub async fn submit(
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    let mut wizard = load_wizard(&session, flow).await?;
    let order = match wizard.submit() {
        Ok(order) => order,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring submit");
            return Ok(to_start(flow));
        }
    };

    tracing::info!(
        order = %serde_json::to_string(&order).unwrap_or_default(),
        "Move request submitted"
    );
    add_breadcrumb("order", "Move request submitted", None);

    if flow.shows_processing() {
        save_wizard(&session, &wizard).await?;
        Ok(to_start(flow))
    } else {
        session.remove::<Wizard>(flow.session_key()).await?;
        Ok(Redirect::to("/dashboard?submitted=1").into_response())
    }
}

/// Discard the wizard and start again.
pub async fn restart(
    Extension(flow): Extension<Flow>,
    page: Page,
    session: Session,
) -> Result<Response> {
    if let Some(redirect) = login_required(flow, &page) {
        return Ok(redirect);
    }

    session.remove::<Wizard>(flow.session_key()).await?;
    Ok(to_start(flow))
}
