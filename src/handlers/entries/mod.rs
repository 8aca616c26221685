//! Entry handlers

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

/// Routes under `/entries`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(handler::update_entry).delete(handler::delete_entry),
        )
        .route("/{id}/status", put(handler::set_status))
}

/// Entry routes nested under `/competitions`
pub fn competition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/entries",
            get(handler::list_entries).post(handler::submit_entry),
        )
        .route("/{id}/entries/batch", post(handler::add_entries))
}
