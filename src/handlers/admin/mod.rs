//! Admin handlers

mod handler;
pub mod response;

pub use response::*;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/sweep", post(handler::trigger_sweep))
}
