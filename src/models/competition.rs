//! Competition model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CompetitionEntry, Rubric};

/// Competition database model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub model_id: Uuid,
    pub creator_id: Uuid,
    pub deadline: DateTime<Utc>,
    pub status: CompetitionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Competition {
    pub fn is_active(&self) -> bool {
        self.status == CompetitionStatus::Active
    }

    pub fn is_ended(&self) -> bool {
        self.status == CompetitionStatus::Ended
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if the deadline lies at or before `now`
    pub fn is_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Check if new entries are accepted: active and before the deadline
    pub fn can_accept_submissions(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && !self.is_deadline_passed(now)
    }

    /// Check if ratings are accepted.
    ///
    /// Shares the submission window: there is no grace period after the
    /// deadline, even if the expiry sweep has not run yet.
    pub fn can_accept_ratings(&self, now: DateTime<Utc>) -> bool {
        self.can_accept_submissions(now)
    }

    /// Explain why the open window is closed, if it is
    pub fn closed_reason(&self, now: DateTime<Utc>) -> Option<&'static str> {
        if self.is_ended() {
            Some("Competition has ended")
        } else if self.is_deadline_passed(now) {
            Some("Competition deadline has passed")
        } else {
            None
        }
    }
}

/// Competition status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    Active,
    Ended,
}

impl CompetitionStatus {
    /// Get status as stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Ended => "ENDED",
        }
    }

    /// Parse status from stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "ENDED" => Some(Self::Ended),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated competition input; every reference is optional until `build`
#[derive(Debug, Clone, Default)]
pub struct CompetitionDraft {
    pub name: String,
    pub description: Option<String>,
    pub model_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Validated competition ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompetition {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub model_id: Uuid,
    pub creator_id: Uuid,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CompetitionDraft {
    /// Validate the draft; the rubric, creator and deadline are mandatory
    pub fn build(self, now: DateTime<Utc>) -> AppResult<NewCompetition> {
        let model_id = self
            .model_id
            .ok_or_else(|| AppError::Validation("Evaluation model is required".to_string()))?;
        let creator_id = self
            .creator_id
            .ok_or_else(|| AppError::Validation("Creator is required".to_string()))?;
        let deadline = self
            .deadline
            .ok_or_else(|| AppError::Validation("Deadline is required".to_string()))?;

        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name must not be empty".to_string()));
        }
        if deadline <= now {
            return Err(AppError::Validation(
                "Deadline must be in the future".to_string(),
            ));
        }

        Ok(NewCompetition {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            description: self.description,
            model_id,
            creator_id,
            deadline,
            created_at: now,
        })
    }
}

/// Judge assignment: a principal allowed to rate a competition's entries
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CompetitionJudge {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub judge_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Competition loaded together with its rubric, judges and active entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionDetails {
    pub competition: Competition,
    pub rubric: Rubric,
    pub judges: Vec<CompetitionJudge>,
    pub entries: Vec<CompetitionEntry>,
}
