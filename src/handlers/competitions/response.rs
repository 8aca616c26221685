//! Competition response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::entries::EntryResponse;
use crate::handlers::rubrics::RubricResponse;
use crate::models::{Competition, CompetitionDetails, CompetitionJudge, CompetitionStatus};

/// Competition response
#[derive(Debug, Serialize)]
pub struct CompetitionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub model_id: Uuid,
    pub creator_id: Uuid,
    pub deadline: DateTime<Utc>,
    pub status: CompetitionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Competition> for CompetitionResponse {
    fn from(c: Competition) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            model_id: c.model_id,
            creator_id: c.creator_id,
            deadline: c.deadline,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Competition list response
#[derive(Debug, Serialize)]
pub struct CompetitionsListResponse {
    pub competitions: Vec<CompetitionResponse>,
    pub total: usize,
}

impl From<Vec<Competition>> for CompetitionsListResponse {
    fn from(competitions: Vec<Competition>) -> Self {
        Self {
            total: competitions.len(),
            competitions: competitions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Judge assignment response
#[derive(Debug, Serialize)]
pub struct JudgeResponse {
    pub judge_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl From<CompetitionJudge> for JudgeResponse {
    fn from(j: CompetitionJudge) -> Self {
        Self {
            judge_id: j.judge_id,
            assigned_at: j.created_at,
        }
    }
}

/// Judges list response
#[derive(Debug, Serialize)]
pub struct JudgesListResponse {
    pub judges: Vec<JudgeResponse>,
    pub total: usize,
}

/// Competition with rubric, judges and active entries
#[derive(Debug, Serialize)]
pub struct CompetitionDetailsResponse {
    #[serde(flatten)]
    pub competition: CompetitionResponse,
    pub rubric: RubricResponse,
    pub judges: Vec<JudgeResponse>,
    pub entries: Vec<EntryResponse>,
}

impl From<CompetitionDetails> for CompetitionDetailsResponse {
    fn from(d: CompetitionDetails) -> Self {
        Self {
            competition: d.competition.into(),
            rubric: d.rubric.into(),
            judges: d.judges.into_iter().map(Into::into).collect(),
            entries: d.entries.into_iter().map(Into::into).collect(),
        }
    }
}
