//! Competition handlers

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Competition routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Competition CRUD
        .route(
            "/",
            get(handler::list_competitions).post(handler::create_competition),
        )
        .route("/created", get(handler::list_created))
        .route("/judged", get(handler::list_judged))
        .route(
            "/{id}",
            get(handler::get_competition)
                .put(handler::update_competition)
                .delete(handler::delete_competition),
        )
        // Lifecycle
        .route("/{id}/end", post(handler::end_competition))
        // Judges
        .route(
            "/{id}/judges",
            get(handler::list_judges).post(handler::assign_judge),
        )
        .route("/{id}/judges/{judge_id}", delete(handler::unassign_judge))
}
