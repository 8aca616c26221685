//! Judge assignment repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{error::AppResult, models::CompetitionJudge};

/// Repository for competition judge assignments
pub struct JudgeRepository;

impl JudgeRepository {
    /// Assign a judge
    pub async fn create(
        pool: &PgPool,
        competition_id: Uuid,
        judge_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionJudge> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut conn, competition_id, judge_id, now).await
    }

    pub(super) async fn insert(
        conn: &mut PgConnection,
        competition_id: Uuid,
        judge_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionJudge> {
        let judge = sqlx::query_as::<_, CompetitionJudge>(
            r#"
            INSERT INTO competition_judges (id, competition_id, judge_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(competition_id)
        .bind(judge_id)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(judge)
    }

    /// Remove a judge assignment
    pub async fn delete(pool: &PgPool, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"DELETE FROM competition_judges WHERE competition_id = $1 AND judge_id = $2"#,
        )
        .bind(competition_id)
        .bind(judge_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a principal judges a competition
    pub async fn exists(pool: &PgPool, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM competition_judges WHERE competition_id = $1 AND judge_id = $2
            )
            "#,
        )
        .bind(competition_id)
        .bind(judge_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// List judges in assignment order
    pub async fn list_by_competition(
        pool: &PgPool,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionJudge>> {
        let judges = sqlx::query_as::<_, CompetitionJudge>(
            r#"
            SELECT * FROM competition_judges
            WHERE competition_id = $1
            ORDER BY created_at ASC, judge_id ASC
            "#,
        )
        .bind(competition_id)
        .fetch_all(pool)
        .await?;

        Ok(judges)
    }

    /// Count judges of a competition
    pub async fn count_by_competition(pool: &PgPool, competition_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM competition_judges WHERE competition_id = $1"#,
        )
        .bind(competition_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
