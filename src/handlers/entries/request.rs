//! Entry request DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_FILE_PATH_LENGTH, MAX_NAME_LENGTH};
use crate::error::{AppError, AppResult};
use crate::models::{EntryChanges, EntryStatus, NewEntry};

/// Contestant's own submission
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitEntryRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    /// Reference to an already stored file
    #[validate(length(max = MAX_FILE_PATH_LENGTH))]
    pub file_path: Option<String>,
}

/// One entry of a bulk add by the creator
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BatchEntry {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(max = MAX_FILE_PATH_LENGTH))]
    pub file_path: Option<String>,

    pub contestant_id: Option<Uuid>,
}

impl From<BatchEntry> for NewEntry {
    fn from(e: BatchEntry) -> Self {
        NewEntry {
            name: e.name,
            description: e.description,
            file_path: e.file_path,
            contestant_id: e.contestant_id,
        }
    }
}

/// Bulk add request
#[derive(Debug, Deserialize, Validate)]
pub struct AddEntriesRequest {
    #[validate(length(min = 1), nested)]
    pub entries: Vec<BatchEntry>,
}

/// Update entry request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(max = MAX_FILE_PATH_LENGTH))]
    pub file_path: Option<String>,
}

impl From<UpdateEntryRequest> for EntryChanges {
    fn from(req: UpdateEntryRequest) -> Self {
        EntryChanges {
            name: req.name,
            description: req.description,
            file_path: req.file_path,
        }
    }
}

/// Moderation request
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: EntryStatus,
}

/// List entries query parameters
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// PENDING, APPROVED or REJECTED
    pub status: Option<String>,
}

impl ListEntriesQuery {
    pub fn status(&self) -> AppResult<Option<EntryStatus>> {
        self.status
            .as_deref()
            .map(|s| {
                EntryStatus::parse(&s.to_ascii_uppercase())
                    .ok_or_else(|| AppError::Validation(format!("Unknown entry status '{}'", s)))
            })
            .transpose()
    }
}
