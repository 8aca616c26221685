//! Rating request DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_NOTE_LENGTH;

/// One parameter score
#[derive(Debug, Serialize, Deserialize)]
pub struct ParameterScore {
    pub parameter_id: Uuid,
    /// 0 to 100, at most two decimal places
    pub score: Decimal,
}

/// Full rating of an entry: one score per rubric parameter
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    pub entry_id: Uuid,

    #[validate(length(min = 1))]
    pub scores: Vec<ParameterScore>,

    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub note: Option<String>,
}

/// Create or replace a single parameter score
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScoreRequest {
    pub entry_id: Uuid,
    pub parameter_id: Uuid,
    pub score: Decimal,

    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub note: Option<String>,
}
