//! Caller identity extraction
//!
//! Authentication happens upstream. The gateway forwards the caller as
//! `X-Principal-Id` and, for administrators, `X-Principal-Admin: true`.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::{PRINCIPAL_ADMIN_HEADER, PRINCIPAL_ID_HEADER},
    error::AppError,
    models::Principal,
};

/// The caller of a request; rejects with 401 when no identity was forwarded
#[derive(Debug, Clone, Copy)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match principal_from_headers(&parts.headers) {
            Some(principal) => Ok(CurrentPrincipal(principal)),
            None => {
                debug!(path = %parts.uri.path(), "Missing or malformed principal header");
                Err(AppError::Unauthorized)
            }
        }
    }
}

fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let id = headers
        .get(PRINCIPAL_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())?;

    let is_admin = headers
        .get(PRINCIPAL_ADMIN_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"));

    Some(Principal { id, is_admin })
}
