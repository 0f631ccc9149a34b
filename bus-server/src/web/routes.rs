//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::arrivals::fetch_arrivals;
use crate::catalog::{ROUTE_CODES, ROUTE_NUMBERS, STOP_LIST, SnapshotStore};
use crate::seta::{SetaError, VehicleCollection};
use crate::vehicles;

use super::dto::*;
use super::state::AppState;

/// Stop id that answers without calling upstream.
const TEST_STOP_ID: &str = "test";

/// Create the application router.
///
/// The `/api` and `/static` groups are only mounted when enabled in
/// `state.routes`.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health));

    if state.routes.seta_api {
        router = router
            .route("/api", get(api_index))
            .route("/api/arrivals/:stop_id", get(arrivals))
            .route("/api/buses-in-service", get(buses_in_service));
    }

    if state.routes.static_files {
        router = router
            .route("/static", get(static_index))
            .route("/static/route-codes", get(route_codes))
            .route("/static/route-numbers", get(route_numbers))
            .route("/static/stop-list", get(stop_list));
    }

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn api_index() -> Json<ApiIndex> {
    Json(ApiIndex::default())
}

/// Reconciled arrivals at one stop.
///
/// Upstream failures still answer 200 with the degraded board.
async fn arrivals(State(state): State<AppState>, Path(stop_id): Path<String>) -> Response {
    if stop_id == TEST_STOP_ID {
        return Json(MessageResponse {
            message: "Test successful",
        })
        .into_response();
    }

    let board = state
        .arrivals
        .get_or_fetch(
            &stop_id,
            fetch_arrivals(state.feed.as_ref(), &state.rules, &stop_id),
        )
        .await;

    Json(board.as_ref()).into_response()
}

async fn buses_in_service(
    State(state): State<AppState>,
) -> Result<Json<VehicleCollection>, AppError> {
    vehicles::buses_in_service(state.feed.as_ref(), &state.rules)
        .await
        .map(Json)
        .map_err(AppError::from)
}

async fn static_index() -> Json<StaticIndex> {
    Json(StaticIndex::default())
}

async fn route_codes(State(state): State<AppState>) -> Json<Value> {
    snapshot(&state, ROUTE_CODES)
}

async fn route_numbers(State(state): State<AppState>) -> Json<Value> {
    snapshot(&state, ROUTE_NUMBERS)
}

async fn stop_list(State(state): State<AppState>) -> Json<Value> {
    snapshot(&state, STOP_LIST)
}

/// Current contents of a snapshot, `{}` if there isn't a readable one.
fn snapshot(state: &AppState, name: &str) -> Json<Value> {
    Json(
        state
            .snapshots
            .load_or(name, Value::Object(Map::new())),
    )
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "Not found".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Internal { message: String },
}

impl From<SetaError> for AppError {
    fn from(e: SetaError) -> Self {
        warn!(error = %e, "upstream request failed");
        AppError::Internal {
            message: "Could not fetch buses in service".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, reason = %message, "request failed");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
