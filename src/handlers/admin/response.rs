//! Admin response DTOs

use serde::Serialize;

use crate::services::SweepStats;

/// Result of an on-demand expiry sweep
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    /// False when a sweep was already running and this request did nothing
    pub ran: bool,
    pub stats: Option<SweepStats>,
}
