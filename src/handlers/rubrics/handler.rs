//! Rubric handler implementations

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
    services::RubricService,
    state::AppState,
};

use super::{
    request::{CreateRubricRequest, ParameterRequest, UpdateParameterRequest, UpdateRubricRequest},
    response::{ParameterResponse, RubricResponse, RubricsListResponse},
};

/// List rubrics
pub async fn list_rubrics(State(state): State<AppState>) -> AppResult<Json<RubricsListResponse>> {
    let rubrics: Vec<RubricResponse> = RubricService::list(&state)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(RubricsListResponse {
        total: rubrics.len(),
        rubrics,
    }))
}

/// Create a rubric (admin)
pub async fn create_rubric(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<CreateRubricRequest>,
) -> AppResult<(StatusCode, Json<RubricResponse>)> {
    payload.validate()?;

    let parameters = payload.parameters.into_iter().map(Into::into).collect();
    let rubric = RubricService::create(&state, &principal, &payload.name, parameters).await?;

    Ok((StatusCode::CREATED, Json(rubric.into())))
}

/// Get a rubric
pub async fn get_rubric(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RubricResponse>> {
    let rubric = RubricService::get(&state, id).await?;
    Ok(Json(rubric.into()))
}

/// Rename a rubric or replace its parameters (admin, unused rubrics only)
pub async fn update_rubric(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRubricRequest>,
) -> AppResult<Json<RubricResponse>> {
    payload.validate()?;

    let parameters = payload
        .parameters
        .map(|p| p.into_iter().map(Into::into).collect());
    let rubric =
        RubricService::update(&state, &principal, id, payload.name.as_deref(), parameters).await?;

    Ok(Json(rubric.into()))
}

/// Soft-delete a rubric (admin, unused rubrics only)
pub async fn delete_rubric(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    RubricService::delete(&state, &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a parameter (admin)
pub async fn add_parameter(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<ParameterRequest>,
) -> AppResult<(StatusCode, Json<ParameterResponse>)> {
    payload.validate()?;

    let parameter = RubricService::add_parameter(&state, &principal, id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(parameter.into())))
}

/// Change a parameter's name or weight (admin)
pub async fn update_parameter(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParameterRequest>,
) -> AppResult<Json<ParameterResponse>> {
    payload.validate()?;

    let parameter = RubricService::update_parameter(
        &state,
        &principal,
        id,
        payload.name.as_deref(),
        payload.weight,
    )
    .await?;

    Ok(Json(parameter.into()))
}

/// Delete a parameter (admin, unused rubrics only)
pub async fn delete_parameter(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    RubricService::delete_parameter(&state, &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
