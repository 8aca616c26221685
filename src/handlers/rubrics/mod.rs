//! Evaluation model (rubric) handlers

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

/// Rubric routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_rubrics).post(handler::create_rubric))
        .route(
            "/{id}",
            get(handler::get_rubric)
                .put(handler::update_rubric)
                .delete(handler::delete_rubric),
        )
        .route("/{id}/parameters", post(handler::add_parameter))
        .route(
            "/parameters/{id}",
            put(handler::update_parameter).delete(handler::delete_parameter),
        )
}
