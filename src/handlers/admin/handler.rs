//! Admin handler implementations

use axum::{Json, extract::State};

use crate::{
    error::AppResult,
    middleware::CurrentPrincipal,
    scheduler::ExpiryScheduler,
    services::authorization::require_admin,
    state::AppState,
};

use super::response::SweepResponse;

/// Run the expiry sweep now
pub async fn trigger_sweep(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> AppResult<Json<SweepResponse>> {
    require_admin(&principal)?;

    tracing::info!(admin_id = %principal.id, "Manual expiry sweep requested");
    let stats = ExpiryScheduler::run_once(&state).await?;

    Ok(Json(SweepResponse {
        ran: stats.is_some(),
        stats,
    }))
}
