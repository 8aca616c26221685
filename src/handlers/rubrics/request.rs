//! Rubric request DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::MAX_NAME_LENGTH;
use crate::models::NewParameter;

/// Parameter definition
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ParameterRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    /// Relative weight; need not sum to 100 across the rubric
    #[validate(range(min = 1))]
    pub weight: i32,
}

impl From<ParameterRequest> for NewParameter {
    fn from(req: ParameterRequest) -> Self {
        NewParameter::new(req.name, req.weight)
    }
}

/// Create rubric request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRubricRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    /// Display order follows the order given here
    #[validate(length(min = 1), nested)]
    pub parameters: Vec<ParameterRequest>,
}

/// Update rubric request; `parameters` replaces the whole list
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRubricRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(min = 1), nested)]
    pub parameters: Option<Vec<ParameterRequest>>,
}

/// Update parameter request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateParameterRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(range(min = 1))]
    pub weight: Option<i32>,
}
