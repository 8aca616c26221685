//! Rating models and the aggregates computed from them

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One judge's score for one entry on one parameter
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CompetitionRating {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub entry_id: Uuid,
    pub judge_id: Uuid,
    pub parameter_id: Uuid,
    pub score: Decimal,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Rating to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub entry_id: Uuid,
    pub judge_id: Uuid,
    pub parameter_id: Uuid,
    pub score: Decimal,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Sum and count of active ratings for one parameter of one entry
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ParameterTally {
    pub parameter_id: Uuid,
    pub score_sum: Decimal,
    pub rating_count: i64,
}

/// Mean score of one rubric parameter across judges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAverage {
    pub parameter_id: Uuid,
    pub name: String,
    pub weight: i32,
    pub display_order: i32,
    /// None when no judge rated this parameter
    pub mean: Option<Decimal>,
    pub count: i64,
}

/// Per-parameter averages and the weighted aggregate of one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryScore {
    pub entry_id: Uuid,
    pub parameters: Vec<ParameterAverage>,
    /// None when no parameter has any rating
    pub weighted_score: Option<Decimal>,
}

/// How far one judge got with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    pub entry_id: Uuid,
    pub judge_id: Uuid,
    pub rated: i64,
    pub required: i64,
    pub complete: bool,
}

impl CompletionStatus {
    pub fn new(entry_id: Uuid, judge_id: Uuid, rated: i64, required: i64) -> Self {
        Self {
            entry_id,
            judge_id,
            rated,
            required,
            complete: required > 0 && rated == required,
        }
    }
}

/// Denormalized export line: one active rating with its identifying fields
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ExportRow {
    pub entry_id: Uuid,
    pub entry_name: String,
    pub entry_display_order: i32,
    pub entry_deleted: bool,
    pub judge_id: Uuid,
    pub parameter_id: Uuid,
    pub parameter_name: String,
    pub parameter_weight: i32,
    pub parameter_display_order: i32,
    pub score: Decimal,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Scores of one entry inside a competition summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub entry_id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub score: EntryScore,
    /// Assigned judges who rated every parameter of this entry
    pub completed_judges: i64,
}

/// Reporting view over every approved, active entry of a competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionRatingSummary {
    pub competition_id: Uuid,
    pub total_judges: i64,
    pub entries: Vec<EntrySummary>,
}
