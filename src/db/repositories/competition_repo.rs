//! Competition repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{judge_repo::JudgeRepository, rubric_repo::RubricRepository};
use crate::{
    db::store::CompetitionChanges,
    error::{AppError, AppResult},
    models::{Competition, CompetitionStatus, NewCompetition},
};

#[derive(FromRow)]
struct CompetitionRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    model_id: Uuid,
    creator_id: Uuid,
    deadline: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<CompetitionRow> for Competition {
    type Error = AppError;

    fn try_from(row: CompetitionRow) -> Result<Self, Self::Error> {
        let status = CompetitionStatus::parse(&row.status).ok_or_else(|| {
            AppError::Database(format!("Unknown competition status: {}", row.status))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            model_id: row.model_id,
            creator_id: row.creator_id,
            deadline: row.deadline,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn convert_all(rows: Vec<CompetitionRow>) -> AppResult<Vec<Competition>> {
    rows.into_iter().map(Competition::try_from).collect()
}

/// Repository for competition database operations
pub struct CompetitionRepository;

impl CompetitionRepository {
    /// Create a competition and its initial judge assignments in one transaction
    pub async fn create(
        pool: &PgPool,
        competition: &NewCompetition,
        judge_ids: &[Uuid],
    ) -> AppResult<Competition> {
        let mut tx = pool.begin().await?;
        RubricRepository::lock_for_use(&mut tx, competition.model_id).await?;

        let row = sqlx::query_as::<_, CompetitionRow>(
            r#"
            INSERT INTO competitions (
                id, name, description, model_id, creator_id, deadline, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(competition.id)
        .bind(&competition.name)
        .bind(&competition.description)
        .bind(competition.model_id)
        .bind(competition.creator_id)
        .bind(competition.deadline)
        .bind(CompetitionStatus::Active.as_str())
        .bind(competition.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for judge_id in judge_ids {
            JudgeRepository::insert(&mut tx, competition.id, *judge_id, competition.created_at)
                .await?;
        }

        tx.commit().await?;
        row.try_into()
    }

    /// Find competition by ID (soft-deleted ones included)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Competition>> {
        let row = sqlx::query_as::<_, CompetitionRow>(r#"SELECT * FROM competitions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(Competition::try_from).transpose()
    }

    /// List non-deleted competitions, newest first
    pub async fn list_active(pool: &PgPool) -> AppResult<Vec<Competition>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(
            r#"
            SELECT * FROM competitions
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        convert_all(rows)
    }

    /// List non-deleted competitions created by a principal
    pub async fn list_by_creator(pool: &PgPool, creator_id: Uuid) -> AppResult<Vec<Competition>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(
            r#"
            SELECT * FROM competitions
            WHERE creator_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        convert_all(rows)
    }

    /// List non-deleted competitions a principal is assigned to judge
    pub async fn list_for_judge(pool: &PgPool, judge_id: Uuid) -> AppResult<Vec<Competition>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(
            r#"
            SELECT c.* FROM competitions c
            JOIN competition_judges j ON j.competition_id = c.id
            WHERE j.judge_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.created_at DESC, c.id ASC
            "#,
        )
        .bind(judge_id)
        .fetch_all(pool)
        .await?;

        convert_all(rows)
    }

    /// Update competition
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &CompetitionChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Competition> {
        let row = sqlx::query_as::<_, CompetitionRow>(
            r#"
            UPDATE competitions
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                deadline = COALESCE($4, deadline),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.deadline)
        .bind(now)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Competition"))?;

        row.try_into()
    }

    /// Mark a competition deleted
    pub async fn soft_delete(pool: &PgPool, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE competitions
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Move an ACTIVE competition to ENDED; a no-op on any other status
    pub async fn end(pool: &PgPool, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE competitions
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(CompetitionStatus::Ended.as_str())
        .bind(now)
        .bind(CompetitionStatus::Active.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find ACTIVE competitions whose deadline has passed
    pub async fn find_expired(pool: &PgPool, now: DateTime<Utc>) -> AppResult<Vec<Competition>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(
            r#"
            SELECT * FROM competitions
            WHERE status = $1 AND deadline < $2
            ORDER BY deadline ASC, id ASC
            "#,
        )
        .bind(CompetitionStatus::Active.as_str())
        .bind(now)
        .fetch_all(pool)
        .await?;

        convert_all(rows)
    }
}
