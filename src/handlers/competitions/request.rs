//! Competition request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use crate::db::CompetitionChanges;
use crate::models::CompetitionDraft;

/// Create competition request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompetitionRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    /// Evaluation model the entries are judged by
    pub model_id: Uuid,

    /// Submissions and ratings close at this instant
    pub deadline: DateTime<Utc>,

    /// Judges besides the creator, who is always assigned
    #[serde(default)]
    pub judge_ids: Vec<Uuid>,
}

impl CreateCompetitionRequest {
    /// Split into the draft and the extra judges
    pub fn into_parts(self) -> (CompetitionDraft, Vec<Uuid>) {
        let draft = CompetitionDraft {
            name: self.name,
            description: self.description,
            model_id: Some(self.model_id),
            creator_id: None,
            deadline: Some(self.deadline),
        };
        (draft, self.judge_ids)
    }
}

/// Update competition request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub deadline: Option<DateTime<Utc>>,
}

impl From<UpdateCompetitionRequest> for CompetitionChanges {
    fn from(req: UpdateCompetitionRequest) -> Self {
        CompetitionChanges {
            name: req.name,
            description: req.description,
            deadline: req.deadline,
        }
    }
}

/// Assign judge request
#[derive(Debug, Deserialize)]
pub struct AssignJudgeRequest {
    pub judge_id: Uuid,
}
