//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod competitions;
pub mod entries;
pub mod health;
pub mod ratings;
pub mod rubrics;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/rubrics", rubrics::routes())
        .nest(
            "/competitions",
            competitions::routes()
                .merge(entries::competition_routes())
                .merge(ratings::competition_routes()),
        )
        .nest(
            "/entries",
            entries::routes().merge(ratings::entry_routes()),
        )
        .nest("/ratings", ratings::routes())
        .nest("/admin", admin::routes())
}
