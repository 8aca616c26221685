//! Rubric response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{EvaluationParameter, Rubric};

/// Parameter response
#[derive(Debug, Serialize)]
pub struct ParameterResponse {
    pub id: Uuid,
    pub name: String,
    pub weight: i32,
    pub display_order: i32,
}

impl From<EvaluationParameter> for ParameterResponse {
    fn from(p: EvaluationParameter) -> Self {
        Self {
            id: p.id,
            name: p.name,
            weight: p.weight,
            display_order: p.display_order,
        }
    }
}

/// Rubric response with parameters in display order
#[derive(Debug, Serialize)]
pub struct RubricResponse {
    pub id: Uuid,
    pub name: String,
    pub total_weight: i64,
    pub parameters: Vec<ParameterResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rubric> for RubricResponse {
    fn from(rubric: Rubric) -> Self {
        let total_weight = rubric.total_weight();
        Self {
            id: rubric.model.id,
            name: rubric.model.name,
            total_weight,
            parameters: rubric.parameters.into_iter().map(Into::into).collect(),
            created_at: rubric.model.created_at,
            updated_at: rubric.model.updated_at,
        }
    }
}

/// Rubric list response
#[derive(Debug, Serialize)]
pub struct RubricsListResponse {
    pub rubrics: Vec<RubricResponse>,
    pub total: usize,
}
