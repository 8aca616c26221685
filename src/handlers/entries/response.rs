//! Entry response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CompetitionEntry, EntryStatus};

/// Entry response
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub display_order: i32,
    pub status: EntryStatus,
    pub contestant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompetitionEntry> for EntryResponse {
    fn from(e: CompetitionEntry) -> Self {
        Self {
            id: e.id,
            competition_id: e.competition_id,
            name: e.name,
            description: e.description,
            file_path: e.file_path,
            display_order: e.display_order,
            status: e.status,
            contestant_id: e.contestant_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Entry list response in display order
#[derive(Debug, Serialize)]
pub struct EntriesListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: usize,
}

impl From<Vec<CompetitionEntry>> for EntriesListResponse {
    fn from(entries: Vec<CompetitionEntry>) -> Self {
        Self {
            total: entries.len(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}
