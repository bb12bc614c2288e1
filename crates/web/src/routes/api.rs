//! JSON endpoints used by the location search box.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::geo::{GeoError, Place};
use crate::middleware::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A search hit.
#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub city: String,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            lat: place.lat,
            lng: place.lng,
            address: place.display_name,
            city: place.city,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Geocode a query inside Saudi Arabia in the visitor's language.
///
/// Short queries answer 400 and misses 404, so the search box can tell
/// "keep typing" from "nothing found".
#[instrument(skip(state, page))]
pub async fn geo_search(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    match state.geo().search(&query.q, page.locale).await {
        Ok(place) => Ok(Json(PlaceResponse::from(place)).into_response()),
        Err(e @ GeoError::QueryTooShort) => Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response()),
        Err(e @ GeoError::NoResults) => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
