//! Rubric models: evaluation models and their weighted parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Evaluation model database model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EvaluationModel {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EvaluationModel {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Evaluation parameter database model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EvaluationParameter {
    pub id: Uuid,
    pub model_id: Uuid,
    pub name: String,
    /// Always positive
    pub weight: i32,
    /// Unique per model; drives display and aggregation order
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameter definition used when creating or replacing a rubric's parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParameter {
    pub name: String,
    pub weight: i32,
}

impl NewParameter {
    pub fn new(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// An evaluation model together with its parameters in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub model: EvaluationModel,
    pub parameters: Vec<EvaluationParameter>,
}

impl Rubric {
    /// Build a rubric, sorting parameters by display order
    pub fn new(model: EvaluationModel, mut parameters: Vec<EvaluationParameter>) -> Self {
        parameters.sort_by_key(|p| p.display_order);
        Self { model, parameters }
    }

    pub fn id(&self) -> Uuid {
        self.model.id
    }

    /// Look up one of this rubric's parameters
    pub fn parameter(&self, parameter_id: Uuid) -> Option<&EvaluationParameter> {
        self.parameters.iter().find(|p| p.id == parameter_id)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Sum of all parameter weights (need not be 100)
    pub fn total_weight(&self) -> i64 {
        self.parameters.iter().map(|p| i64::from(p.weight)).sum()
    }
}
