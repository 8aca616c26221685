//! Rating response DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CompetitionRating, ExportRow};

/// Rating response
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub judge_id: Uuid,
    pub parameter_id: Uuid,
    pub score: Decimal,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<CompetitionRating> for RatingResponse {
    fn from(r: CompetitionRating) -> Self {
        Self {
            id: r.id,
            entry_id: r.entry_id,
            judge_id: r.judge_id,
            parameter_id: r.parameter_id,
            score: r.score,
            note: r.note,
            submitted_at: r.submitted_at,
        }
    }
}

/// Rating list response
#[derive(Debug, Serialize)]
pub struct RatingsListResponse {
    pub ratings: Vec<RatingResponse>,
    pub total: usize,
}

impl From<Vec<CompetitionRating>> for RatingsListResponse {
    fn from(ratings: Vec<CompetitionRating>) -> Self {
        Self {
            total: ratings.len(),
            ratings: ratings.into_iter().map(Into::into).collect(),
        }
    }
}

/// Export response; rows keep the export order
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub competition_id: Uuid,
    pub rows: Vec<ExportRow>,
    pub total: usize,
}
