//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;

use crate::domain::{TerminalId, TripId};
use crate::itinerary::summarize_trips;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/about", get(about_page))
        .route("/api/terminals/search", get(search_terminals))
        .route("/search", get(search_trips))
        .route("/trip/:id/itinerary", get(trip_itinerary))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// About page.
async fn about_page() -> impl IntoResponse {
    Html(
        AboutTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Search terminals by city, name, or alias.
async fn search_terminals(
    State(state): State<AppState>,
    Query(req): Query<TerminalSearchRequest>,
) -> Json<TerminalSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let matches = state.terminals.search(&req.q, limit).await;

    let terminals = matches
        .into_iter()
        .map(TerminalSearchResult::from_match)
        .collect();

    Json(TerminalSearchResponse { terminals })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Search trips between two terminals.
async fn search_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<SearchTripsRequest>,
) -> Result<Response, AppError> {
    if req.origin == req.destination {
        return Err(AppError::BadRequest {
            message: "origin and destination must be different terminals".to_string(),
        });
    }

    let origin = TerminalId(req.origin);
    let destination = TerminalId(req.destination);

    // Fetch the flat stop rows (cached) and derive the trip cards.
    let rows = state
        .store
        .search_stops(origin, destination)
        .await
        .map_err(AppError::from)?;

    let summaries = summarize_trips(&rows, origin, destination);

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let trips: Vec<TripView> = summaries.iter().map(TripView::from_summary).collect();

        let template = TripListTemplate { trips };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let trips: Vec<TripResult> = summaries.iter().map(TripResult::from_summary).collect();

        Ok(Json(SearchTripsResponse { trips }).into_response())
    }
}

/// Full stop-by-stop itinerary for one trip.
async fn trip_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let trip = TripId(id);

    let rows = state.store.trip_stops(trip).await.map_err(AppError::from)?;

    if rows.is_empty() {
        return Err(AppError::NotFound {
            message: format!("Trip {} not found", trip),
        });
    }

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let stops: Vec<StopView> = rows.iter().map(StopView::from_record).collect();

        let template = ItineraryTemplate {
            trip_id: trip.to_string(),
            stops,
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let stops: Vec<StopResult> = rows.iter().map(StopResult::from_record).collect();

        Ok(Json(ItineraryResponse {
            trip_id: trip.0,
            stops,
        })
        .into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
