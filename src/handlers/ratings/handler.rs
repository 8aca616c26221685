//! Rating handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::CurrentPrincipal,
    models::{CompetitionRatingSummary, CompletionStatus, EntryScore},
    services::{ExportService, RatingService},
    state::AppState,
};

use super::{
    request::{SubmitRatingRequest, SubmitScoreRequest},
    response::{ExportResponse, RatingResponse, RatingsListResponse},
};

/// Rate every parameter of an entry
pub async fn submit_rating(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<SubmitRatingRequest>,
) -> AppResult<(StatusCode, Json<RatingsListResponse>)> {
    payload.validate()?;

    let scores = payload
        .scores
        .into_iter()
        .map(|s| (s.parameter_id, s.score))
        .collect();
    let ratings =
        RatingService::submit_rating(&state, &principal, payload.entry_id, scores, payload.note)
            .await?;

    Ok((StatusCode::CREATED, Json(ratings.into())))
}

/// Create or replace one parameter score
pub async fn submit_score(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<SubmitScoreRequest>,
) -> AppResult<Json<RatingResponse>> {
    payload.validate()?;

    let rating = RatingService::submit_or_update_score(
        &state,
        &principal,
        payload.entry_id,
        payload.parameter_id,
        payload.score,
        payload.note,
    )
    .await?;

    Ok(Json(rating.into()))
}

/// Active ratings of an entry
pub async fn list_entry_ratings(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RatingsListResponse>> {
    let ratings = RatingService::list_for_entry(&state, &principal, id).await?;
    Ok(Json(ratings.into()))
}

/// Parameter averages and weighted score of an entry
pub async fn entry_scores(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EntryScore>> {
    let score = RatingService::entry_score(&state, &principal, id).await?;
    Ok(Json(score))
}

/// Whether the caller rated every parameter of an entry
pub async fn completion_status(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompletionStatus>> {
    let status = RatingService::completion_status(&state, &principal, id).await?;
    Ok(Json(status))
}

/// Every active rating in a competition
pub async fn list_competition_ratings(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RatingsListResponse>> {
    let ratings = RatingService::list_for_competition(&state, &principal, id).await?;
    Ok(Json(ratings.into()))
}

/// The caller's ratings in a competition
pub async fn my_ratings(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RatingsListResponse>> {
    let ratings = RatingService::list_mine(&state, &principal, id).await?;
    Ok(Json(ratings.into()))
}

/// Scores of all approved entries
pub async fn competition_summary(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompetitionRatingSummary>> {
    let summary = RatingService::competition_summary(&state, &principal, id).await?;
    Ok(Json(summary))
}

/// Export rows as JSON
pub async fn export_rows(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExportResponse>> {
    let rows = ExportService::export_rows(&state, &principal, id).await?;
    Ok(Json(ExportResponse {
        competition_id: id,
        total: rows.len(),
        rows,
    }))
}

/// Export as CSV, one line per entry and judge
pub async fn export_csv(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let csv = ExportService::export_csv(&state, &principal, id).await?;
    let disposition = format!("attachment; filename=\"competition-{}.csv\"", id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
