//! Competition handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::CurrentPrincipal,
    services::{CompetitionService, LifecycleService},
    state::AppState,
};

use super::{
    request::{AssignJudgeRequest, CreateCompetitionRequest, UpdateCompetitionRequest},
    response::{
        CompetitionDetailsResponse, CompetitionResponse, CompetitionsListResponse, JudgeResponse,
        JudgesListResponse,
    },
};

/// List active competitions, newest first
pub async fn list_competitions(
    State(state): State<AppState>,
) -> AppResult<Json<CompetitionsListResponse>> {
    let competitions = CompetitionService::list(&state).await?;
    Ok(Json(competitions.into()))
}

/// Competitions the caller created
pub async fn list_created(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> AppResult<Json<CompetitionsListResponse>> {
    let competitions = CompetitionService::list_created(&state, &principal).await?;
    Ok(Json(competitions.into()))
}

/// Competitions the caller judges
pub async fn list_judged(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> AppResult<Json<CompetitionsListResponse>> {
    let competitions = CompetitionService::list_judged(&state, &principal).await?;
    Ok(Json(competitions.into()))
}

/// Create a competition; the caller becomes its creator and first judge
pub async fn create_competition(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<CreateCompetitionRequest>,
) -> AppResult<(StatusCode, Json<CompetitionResponse>)> {
    payload.validate()?;

    let (draft, judge_ids) = payload.into_parts();
    let competition = CompetitionService::create(&state, &principal, draft, &judge_ids).await?;

    Ok((StatusCode::CREATED, Json(competition.into())))
}

/// Get a competition with its rubric, judges and active entries
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompetitionDetailsResponse>> {
    let details = CompetitionService::get_details(&state, id).await?;
    Ok(Json(details.into()))
}

/// Update a competition
pub async fn update_competition(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompetitionRequest>,
) -> AppResult<Json<CompetitionResponse>> {
    payload.validate()?;

    let competition = CompetitionService::update(&state, &principal, id, payload.into()).await?;
    Ok(Json(competition.into()))
}

/// Soft-delete a competition
pub async fn delete_competition(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    CompetitionService::delete(&state, &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// End a competition now
pub async fn end_competition(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompetitionResponse>> {
    let competition = LifecycleService::end_competition(&state, &principal, id).await?;
    Ok(Json(competition.into()))
}

/// List a competition's judges
pub async fn list_judges(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JudgesListResponse>> {
    let judges: Vec<JudgeResponse> = CompetitionService::list_judges(&state, &principal, id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(JudgesListResponse {
        total: judges.len(),
        judges,
    }))
}

/// Assign a judge
pub async fn assign_judge(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignJudgeRequest>,
) -> AppResult<(StatusCode, Json<JudgeResponse>)> {
    let judge = CompetitionService::assign_judge(&state, &principal, id, payload.judge_id).await?;
    Ok((StatusCode::CREATED, Json(judge.into())))
}

/// Remove a judge assignment
pub async fn unassign_judge(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((id, judge_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    CompetitionService::unassign_judge(&state, &principal, id, judge_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
