//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::input::{InputError, RunInput};
use crate::search::{ResultsCollector, SearchRunner};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Run a search for the posted input.
///
/// The whole run happens within the request; results come back sorted by
/// price together with the run counters.
async fn search(
    State(state): State<AppState>,
    Json(input): Json<RunInput>,
) -> Result<Json<SearchResponse>, AppError> {
    let roots = input.root_tasks()?;
    let config = input.search_config(state.config.as_ref().clone())?;

    let collector = Arc::new(ResultsCollector::new());
    let runner = SearchRunner::new(state.fetcher.as_ref(), &config, collector.clone());
    let summary = runner.run(roots).await;

    let results = collector.all_sorted();
    info!(
        results = results.len(),
        requests = summary.requests,
        "search request finished"
    );
    Ok(Json(SearchResponse::new(&results, summary)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        match e {
            InputError::Read { .. } => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
