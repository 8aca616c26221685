//! Competition entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Competition entry database model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionEntry {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Opaque reference to an uploaded image, never interpreted here
    pub file_path: Option<String>,
    pub display_order: i32,
    pub status: EntryStatus,
    pub contestant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CompetitionEntry {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_approved(&self) -> bool {
        self.status == EntryStatus::Approved
    }

    /// Check if the principal submitted this entry
    pub fn is_contestant(&self, principal_id: Uuid) -> bool {
        self.contestant_id == Some(principal_id)
    }
}

/// Moderation status; any transition between the three is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry fields supplied by the caller; order and status are assigned on insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub name: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub contestant_id: Option<Uuid>,
}

/// Editable entry details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
}
