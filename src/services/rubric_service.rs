//! Rubric service

use uuid::Uuid;

use crate::{
    constants::{MAX_NAME_LENGTH, preset},
    error::{AppError, AppResult},
    models::{EvaluationParameter, NewParameter, Principal, Rubric},
    services::authorization::require_admin,
    state::AppState,
};

/// Rubric service for evaluation models and their parameters
pub struct RubricService;

impl RubricService {
    /// Create a model with parameters ordered as given
    pub async fn create(
        state: &AppState,
        principal: &Principal,
        name: &str,
        parameters: Vec<NewParameter>,
    ) -> AppResult<Rubric> {
        require_admin(principal)?;
        let name = validate_name(name, "Model name")?;
        if parameters.is_empty() {
            return Err(AppError::Validation(
                "At least one parameter is required".to_string(),
            ));
        }
        let parameters = validate_parameters(parameters)?;

        if state.store().find_model_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Evaluation model '{}' already exists",
                name
            )));
        }

        let rubric = state
            .store()
            .insert_rubric(&name, &parameters, state.now())
            .await
            .map_err(|e| duplicate_name(e, &name))?;

        tracing::info!(model_id = %rubric.id(), name = %name, "Evaluation model created");
        Ok(rubric)
    }

    /// List non-deleted rubrics
    pub async fn list(state: &AppState) -> AppResult<Vec<Rubric>> {
        state.store().list_rubrics().await
    }

    /// Get a non-deleted rubric
    pub async fn get(state: &AppState, model_id: Uuid) -> AppResult<Rubric> {
        state
            .store()
            .find_rubric(model_id)
            .await?
            .filter(|r| !r.model.is_deleted())
            .ok_or_else(|| AppError::not_found("Evaluation model"))
    }

    /// Rename a model and/or replace its parameters; refused while in use
    pub async fn update(
        state: &AppState,
        principal: &Principal,
        model_id: Uuid,
        name: Option<&str>,
        parameters: Option<Vec<NewParameter>>,
    ) -> AppResult<Rubric> {
        require_admin(principal)?;
        Self::get(state, model_id).await?;

        let name = name.map(|n| validate_name(n, "Model name")).transpose()?;
        let parameters = match parameters {
            Some(p) if p.is_empty() => {
                return Err(AppError::Validation(
                    "At least one parameter is required".to_string(),
                ));
            }
            Some(p) => Some(validate_parameters(p)?),
            None => None,
        };

        let rubric = state
            .store()
            .update_rubric(
                model_id,
                name.as_deref(),
                parameters.as_deref(),
                state.now(),
            )
            .await
            .map_err(|e| duplicate_name(e, name.as_deref().unwrap_or_default()))?;

        tracing::info!(model_id = %model_id, "Evaluation model updated");
        Ok(rubric)
    }

    /// Append a parameter after the current last one
    pub async fn add_parameter(
        state: &AppState,
        principal: &Principal,
        model_id: Uuid,
        parameter: NewParameter,
    ) -> AppResult<EvaluationParameter> {
        require_admin(principal)?;
        Self::get(state, model_id).await?;
        let parameter = validate_parameter(parameter)?;

        let created = state
            .store()
            .insert_parameter(model_id, &parameter, state.now())
            .await?;

        tracing::info!(
            model_id = %model_id,
            parameter_id = %created.id,
            display_order = created.display_order,
            "Evaluation parameter added"
        );
        Ok(created)
    }

    /// Change a parameter's name and/or weight
    pub async fn update_parameter(
        state: &AppState,
        principal: &Principal,
        parameter_id: Uuid,
        name: Option<&str>,
        weight: Option<i32>,
    ) -> AppResult<EvaluationParameter> {
        require_admin(principal)?;
        let name = name.map(|n| validate_name(n, "Parameter name")).transpose()?;
        if let Some(weight) = weight {
            validate_weight(weight)?;
        }

        state
            .store()
            .update_parameter(parameter_id, name.as_deref(), weight, state.now())
            .await
    }

    /// Delete a parameter; refused while its model is in use
    pub async fn delete_parameter(
        state: &AppState,
        principal: &Principal,
        parameter_id: Uuid,
    ) -> AppResult<()> {
        require_admin(principal)?;

        // The store checks usage in the same write as the delete
        if !state.store().delete_parameter(parameter_id).await? {
            return Err(AppError::not_found("Evaluation parameter"));
        }

        tracing::info!(parameter_id = %parameter_id, "Evaluation parameter deleted");
        Ok(())
    }

    /// Soft-delete a model; refused while in use
    pub async fn delete(state: &AppState, principal: &Principal, model_id: Uuid) -> AppResult<()> {
        require_admin(principal)?;
        Self::get(state, model_id).await?;

        state.store().soft_delete_rubric(model_id, state.now()).await?;

        tracing::info!(model_id = %model_id, "Evaluation model deleted");
        Ok(())
    }

    /// Create the preset rubric unless a model with its name exists
    pub async fn ensure_preset(state: &AppState) -> AppResult<Rubric> {
        if let Some(model) = state.store().find_model_by_name(preset::NAME).await? {
            return Self::get(state, model.id).await;
        }

        let parameters: Vec<NewParameter> = preset::PARAMETERS
            .iter()
            .map(|(name, weight)| NewParameter::new(*name, *weight))
            .collect();

        match state
            .store()
            .insert_rubric(preset::NAME, &parameters, state.now())
            .await
        {
            Ok(rubric) => {
                tracing::info!(model_id = %rubric.id(), "Preset evaluation model created");
                Ok(rubric)
            }
            // Another instance seeded it first
            Err(AppError::AlreadyExists(_)) => {
                let model = state
                    .store()
                    .find_model_by_name(preset::NAME)
                    .await?
                    .ok_or_else(|| AppError::not_found("Evaluation model"))?;
                Self::get(state, model.id).await
            }
            Err(e) => Err(e),
        }
    }
}

fn duplicate_name(err: AppError, name: &str) -> AppError {
    match err {
        AppError::AlreadyExists(_) => {
            AppError::Conflict(format!("Evaluation model '{}' already exists", name))
        }
        other => other,
    }
}

fn validate_name(name: &str, field: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if name.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn validate_weight(weight: i32) -> AppResult<()> {
    if weight <= 0 {
        return Err(AppError::Validation(
            "Parameter weight must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_parameter(parameter: NewParameter) -> AppResult<NewParameter> {
    validate_weight(parameter.weight)?;
    Ok(NewParameter {
        name: validate_name(&parameter.name, "Parameter name")?,
        weight: parameter.weight,
    })
}

fn validate_parameters(parameters: Vec<NewParameter>) -> AppResult<Vec<NewParameter>> {
    parameters.into_iter().map(validate_parameter).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestContext, admin, user};

    fn tea() -> Vec<NewParameter> {
        vec![
            NewParameter::new("Taste", 40),
            NewParameter::new("Color", 30),
            NewParameter::new("Aroma", 30),
        ]
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let ctx = TestContext::new();
        let result = RubricService::create(&ctx.state, &user(), "Tea", tea()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_assigns_orders_in_request_order() {
        let ctx = TestContext::new();
        let rubric = RubricService::create(&ctx.state, &admin(), " Tea ", tea())
            .await
            .unwrap();

        assert_eq!(rubric.model.name, "Tea");
        let orders: Vec<_> = rubric
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.display_order))
            .collect();
        assert_eq!(orders, [("Taste", 1), ("Color", 2), ("Aroma", 3)]);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let ctx = TestContext::new();
        let admin = admin();

        let empty = RubricService::create(&ctx.state, &admin, "Tea", vec![]).await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let zero = RubricService::create(&ctx.state, &admin, "Tea", vec![NewParameter::new("Taste", 0)]).await;
        assert!(matches!(zero, Err(AppError::Validation(_))));

        RubricService::create(&ctx.state, &admin, "Tea", tea()).await.unwrap();
        let duplicate = RubricService::create(&ctx.state, &admin, "Tea", tea()).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_in_use_model_is_locked() {
        let ctx = TestContext::new();
        let admin = admin();
        let rubric = RubricService::create(&ctx.state, &admin, "Tea", tea()).await.unwrap();
        ctx.competition(&user(), rubric.id()).await;

        let update = RubricService::update(&ctx.state, &admin, rubric.id(), Some("Green tea"), None).await;
        assert!(matches!(update, Err(AppError::Conflict(_))));

        let delete_param =
            RubricService::delete_parameter(&ctx.state, &admin, rubric.parameters[0].id).await;
        assert!(matches!(delete_param, Err(AppError::Conflict(_))));

        let delete = RubricService::delete(&ctx.state, &admin, rubric.id()).await;
        assert!(matches!(delete, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_parameter_lifecycle_on_unused_model() {
        let ctx = TestContext::new();
        let admin = admin();
        let rubric = RubricService::create(&ctx.state, &admin, "Tea", tea()).await.unwrap();

        let added = RubricService::add_parameter(&ctx.state, &admin, rubric.id(), NewParameter::new("Body", 10))
            .await
            .unwrap();
        assert_eq!(added.display_order, 4);

        let updated = RubricService::update_parameter(&ctx.state, &admin, added.id, None, Some(15))
            .await
            .unwrap();
        assert_eq!(updated.weight, 15);
        assert_eq!(updated.name, "Body");

        RubricService::delete_parameter(&ctx.state, &admin, added.id).await.unwrap();
        let rubric = RubricService::get(&ctx.state, rubric.id()).await.unwrap();
        assert_eq!(rubric.parameter_count(), 3);

        RubricService::delete(&ctx.state, &admin, rubric.id()).await.unwrap();
        let gone = RubricService::get(&ctx.state, rubric.id()).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
        assert!(RubricService::list(&ctx.state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preset_seeding_is_idempotent() {
        let ctx = TestContext::new();
        let first = RubricService::ensure_preset(&ctx.state).await.unwrap();
        let second = RubricService::ensure_preset(&ctx.state).await.unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(first.model.name, "Mango");
        assert_eq!(first.total_weight(), 100);
        assert_eq!(first.parameters[1].name, "Flavor");
        assert_eq!(first.parameters[1].weight, 24);
    }
}
