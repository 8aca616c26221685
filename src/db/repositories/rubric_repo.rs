//! Rubric repository

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{EvaluationModel, EvaluationParameter, NewParameter, Rubric},
};

/// Repository for evaluation models and their parameters
pub struct RubricRepository;

impl RubricRepository {
    /// Create a model and its parameters in one transaction
    pub async fn create(
        pool: &PgPool,
        name: &str,
        parameters: &[NewParameter],
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        let mut tx = pool.begin().await?;

        let model = sqlx::query_as::<_, EvaluationModel>(
            r#"
            INSERT INTO evaluation_models (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let parameters = Self::insert_parameters(&mut tx, model.id, parameters, now).await?;
        tx.commit().await?;

        Ok(Rubric::new(model, parameters))
    }

    /// Find a rubric by model ID (soft-deleted models included)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Rubric>> {
        let model =
            sqlx::query_as::<_, EvaluationModel>(r#"SELECT * FROM evaluation_models WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        let Some(model) = model else {
            return Ok(None);
        };
        let parameters = Self::parameters_of(pool, &[model.id]).await?;
        Ok(Some(Rubric::new(model, parameters)))
    }

    /// Find a non-deleted model by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> AppResult<Option<EvaluationModel>> {
        let model = sqlx::query_as::<_, EvaluationModel>(
            r#"SELECT * FROM evaluation_models WHERE name = $1 AND deleted_at IS NULL"#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(model)
    }

    /// List non-deleted rubrics, loading all parameters in a single query
    pub async fn list_active(pool: &PgPool) -> AppResult<Vec<Rubric>> {
        let models = sqlx::query_as::<_, EvaluationModel>(
            r#"
            SELECT * FROM evaluation_models
            WHERE deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut by_model: HashMap<Uuid, Vec<EvaluationParameter>> = HashMap::new();
        for parameter in Self::parameters_of(pool, &ids).await? {
            by_model.entry(parameter.model_id).or_default().push(parameter);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let parameters = by_model.remove(&model.id).unwrap_or_default();
                Rubric::new(model, parameters)
            })
            .collect())
    }

    /// Rename a model and/or replace its parameters in one transaction
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        parameters: Option<&[NewParameter]>,
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        let mut tx = pool.begin().await?;
        Self::lock_unused(&mut tx, id).await?;

        let model = sqlx::query_as::<_, EvaluationModel>(
            r#"
            UPDATE evaluation_models
            SET name = COALESCE($2, name), updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        if let Some(parameters) = parameters {
            sqlx::query(r#"DELETE FROM evaluation_parameters WHERE model_id = $1"#)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_parameters(&mut tx, id, parameters, now).await?;
        }

        let parameters = sqlx::query_as::<_, EvaluationParameter>(
            r#"SELECT * FROM evaluation_parameters WHERE model_id = $1 ORDER BY display_order"#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Rubric::new(model, parameters))
    }

    /// Append a parameter; the model row is locked while the next order is read
    pub async fn add_parameter(
        pool: &PgPool,
        model_id: Uuid,
        parameter: &NewParameter,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        let mut tx = pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM evaluation_models WHERE id = $1 FOR UPDATE"#)
            .bind(model_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        let max_order = sqlx::query_scalar::<_, i32>(
            r#"SELECT COALESCE(MAX(display_order), 0) FROM evaluation_parameters WHERE model_id = $1"#,
        )
        .bind(model_id)
        .fetch_one(&mut *tx)
        .await?;

        let created = Self::insert_parameter(&mut tx, model_id, parameter, max_order + 1, now).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Find parameter by ID
    pub async fn find_parameter(pool: &PgPool, id: Uuid) -> AppResult<Option<EvaluationParameter>> {
        let parameter = sqlx::query_as::<_, EvaluationParameter>(
            r#"SELECT * FROM evaluation_parameters WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(parameter)
    }

    /// Update parameter name and/or weight
    pub async fn update_parameter(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        weight: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        sqlx::query_as::<_, EvaluationParameter>(
            r#"
            UPDATE evaluation_parameters
            SET name = COALESCE($2, name), weight = COALESCE($3, weight), updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(weight)
        .bind(now)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Evaluation parameter"))
    }

    /// Delete parameter unless its model is in use
    pub async fn delete_parameter(pool: &PgPool, id: Uuid) -> AppResult<bool> {
        let mut tx = pool.begin().await?;

        let model_id = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT model_id FROM evaluation_parameters WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(model_id) = model_id else {
            return Ok(false);
        };
        Self::lock_unused(&mut tx, model_id).await?;

        let result = sqlx::query(r#"DELETE FROM evaluation_parameters WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark a model deleted unless it is in use
    pub async fn soft_delete(pool: &PgPool, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tx = pool.begin().await?;
        Self::lock_unused(&mut tx, id).await?;

        let result = sqlx::query(
            r#"
            UPDATE evaluation_models
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Share-lock a live model for a competition insert. Blocks while a rubric
    /// write holds the row and fails once the model is deleted.
    pub(super) async fn lock_for_use(conn: &mut PgConnection, model_id: Uuid) -> AppResult<()> {
        sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM evaluation_models WHERE id = $1 AND deleted_at IS NULL FOR SHARE"#,
        )
        .bind(model_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        Ok(())
    }

    /// Lock the model row and refuse if any competition, deleted or not,
    /// references it. Competition inserts share-lock the same row.
    async fn lock_unused(conn: &mut PgConnection, model_id: Uuid) -> AppResult<()> {
        sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM evaluation_models WHERE id = $1 FOR UPDATE"#)
            .bind(model_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        let in_use = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM competitions WHERE model_id = $1)"#,
        )
        .bind(model_id)
        .fetch_one(&mut *conn)
        .await?;

        if in_use {
            return Err(AppError::model_in_use());
        }
        Ok(())
    }

    async fn parameters_of(pool: &PgPool, model_ids: &[Uuid]) -> AppResult<Vec<EvaluationParameter>> {
        let parameters = sqlx::query_as::<_, EvaluationParameter>(
            r#"
            SELECT * FROM evaluation_parameters
            WHERE model_id = ANY($1)
            ORDER BY model_id, display_order
            "#,
        )
        .bind(model_ids)
        .fetch_all(pool)
        .await?;

        Ok(parameters)
    }

    async fn insert_parameters(
        conn: &mut PgConnection,
        model_id: Uuid,
        parameters: &[NewParameter],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<EvaluationParameter>> {
        let mut created = Vec::with_capacity(parameters.len());
        for (index, parameter) in parameters.iter().enumerate() {
            created.push(Self::insert_parameter(conn, model_id, parameter, index as i32 + 1, now).await?);
        }
        Ok(created)
    }

    async fn insert_parameter(
        conn: &mut PgConnection,
        model_id: Uuid,
        parameter: &NewParameter,
        display_order: i32,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        let created = sqlx::query_as::<_, EvaluationParameter>(
            r#"
            INSERT INTO evaluation_parameters
                (id, model_id, name, weight, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(model_id)
        .bind(&parameter.name)
        .bind(parameter.weight)
        .bind(display_order)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(created)
    }
}
