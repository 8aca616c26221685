//! Entry handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::CurrentPrincipal,
    services::EntryService,
    state::AppState,
};

use super::{
    request::{
        AddEntriesRequest, ListEntriesQuery, SetStatusRequest, SubmitEntryRequest,
        UpdateEntryRequest,
    },
    response::{EntriesListResponse, EntryResponse},
};

/// List active entries in display order
pub async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListEntriesQuery>,
) -> AppResult<Json<EntriesListResponse>> {
    let entries = EntryService::list_active(&state, id, query.status()?).await?;
    Ok(Json(entries.into()))
}

/// Submit an entry as its contestant
pub async fn submit_entry(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitEntryRequest>,
) -> AppResult<(StatusCode, Json<EntryResponse>)> {
    payload.validate()?;

    let entry = EntryService::submit_entry(
        &state,
        &principal,
        id,
        payload.name,
        payload.description,
        payload.file_path,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Add several entries at once (creator or admin)
pub async fn add_entries(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddEntriesRequest>,
) -> AppResult<(StatusCode, Json<EntriesListResponse>)> {
    payload.validate()?;

    let entries = payload.entries.into_iter().map(Into::into).collect();
    let created = EntryService::add_entries(&state, &principal, id, entries).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Edit an entry's details
pub async fn update_entry(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    payload.validate()?;

    let entry = EntryService::update_entry(&state, &principal, id, payload.into()).await?;
    Ok(Json(entry.into()))
}

/// Soft-delete an entry
pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    EntryService::soft_delete(&state, &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve, reject or reset an entry
pub async fn set_status(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<EntryResponse>> {
    let entry = EntryService::set_status(&state, &principal, id, payload.status).await?;
    Ok(Json(entry.into()))
}
