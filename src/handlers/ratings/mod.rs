//! Rating, scoring and export handlers

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Routes under `/ratings`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::submit_rating))
        .route("/score", put(handler::submit_score))
}

/// Rating routes nested under `/entries`
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/ratings", get(handler::list_entry_ratings))
        .route("/{id}/scores", get(handler::entry_scores))
        .route("/{id}/completion", get(handler::completion_status))
}

/// Reporting routes nested under `/competitions`
pub fn competition_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/ratings", get(handler::list_competition_ratings))
        .route("/{id}/my-ratings", get(handler::my_ratings))
        .route("/{id}/summary", get(handler::competition_summary))
        .route("/{id}/export", get(handler::export_rows))
        .route("/{id}/export.csv", get(handler::export_csv))
}
