//! Jury - Judged Competition Engine
//!
//! Contestants submit entries to a competition, assigned judges score them
//! against a weighted rubric, and the engine aggregates the scores while
//! enforcing submission windows, uniqueness and soft-delete rules.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic and authorization
//! - **Store**: Storage trait with PostgreSQL and in-memory backends
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

use axum::{Router, http::StatusCode};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the HTTP application with all routes under `/api/v1`
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config().server.request_timeout();

    Router::new()
        .nest("/api/v1", handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
