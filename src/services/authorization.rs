//! Authorization guards
//!
//! Restricted operations call one of these at their start. Each guard takes
//! the caller's principal and whatever record the decision depends on.

use crate::error::{AppError, AppResult};
use crate::models::{Competition, CompetitionEntry, Principal};
use crate::state::AppState;

// =============================================================================
// Capability checks
// =============================================================================

/// Only administrators pass
pub fn require_admin(principal: &Principal) -> AppResult<()> {
    if !principal.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

/// The competition's creator or an administrator
pub fn require_creator_or_admin(principal: &Principal, competition: &Competition) -> AppResult<()> {
    if principal.is_admin || competition.creator_id == principal.id {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the competition creator or an admin may do this".to_string(),
    ))
}

/// Export is limited to the creator and administrators
pub fn require_export_access(principal: &Principal, competition: &Competition) -> AppResult<()> {
    require_creator_or_admin(principal, competition)
}

/// The entry's contestant or an administrator
pub fn require_entry_editor(principal: &Principal, entry: &CompetitionEntry) -> AppResult<()> {
    if principal.is_admin || entry.is_contestant(principal.id) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the contestant or an admin may edit this entry".to_string(),
    ))
}

/// An administrator, the competition's creator, or the entry's contestant
pub fn require_entry_remover(
    principal: &Principal,
    competition: &Competition,
    entry: &CompetitionEntry,
) -> AppResult<()> {
    if principal.is_admin
        || competition.creator_id == principal.id
        || entry.is_contestant(principal.id)
    {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Not allowed to delete this entry".to_string(),
    ))
}

// =============================================================================
// Checks that consult the store
// =============================================================================

/// The principal must be assigned as a judge of the competition
pub async fn require_assigned_judge(
    state: &AppState,
    principal: &Principal,
    competition: &Competition,
) -> AppResult<()> {
    if !state.store().is_judge(competition.id, principal.id).await? {
        tracing::warn!(
            competition_id = %competition.id,
            principal_id = %principal.id,
            "Rating attempt by unassigned judge"
        );
        return Err(AppError::Forbidden(
            "Not an assigned judge for this competition".to_string(),
        ));
    }
    Ok(())
}

/// Rating data is public once the competition closed; before that only the
/// creator, assigned judges and administrators may see it
pub async fn require_rating_view_access(
    state: &AppState,
    principal: &Principal,
    competition: &Competition,
) -> AppResult<()> {
    if competition.is_ended()
        || competition.is_deadline_passed(state.now())
        || principal.is_admin
        || competition.creator_id == principal.id
        || state.store().is_judge(competition.id, principal.id).await?
    {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Rating data is not visible yet".to_string(),
    ))
}
