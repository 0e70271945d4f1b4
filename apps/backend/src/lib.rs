//! Movie search backend library.
//!
//! Wires the OMDB search aggregator into an Axum service.
//! This library exposes modules for use in integration tests.

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use omdb_search::MovieSearchAggregator;

pub mod api;
pub mod config;
pub mod error;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<MovieSearchAggregator>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(search: MovieSearchAggregator) -> Self {
        Self {
            search: Arc::new(search),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get a reference to the movie search aggregator.
    pub fn search(&self) -> &MovieSearchAggregator {
        &self.search
    }

    /// Get the start time of the application.
    pub fn start_time(&self) -> std::time::Instant {
        self.start_time
    }
}

#[derive(Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub version: String,
    pub uptime_secs: u64,
}

pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Movie search backend is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time().elapsed().as_secs(),
    })
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/movies", get(api::movies::search_movies))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
