//! Rating repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CompetitionRating, ExportRow, NewRating, ParameterTally},
};

/// Repository for competition ratings
pub struct RatingRepository;

impl RatingRepository {
    /// Find the active rating for an (entry, judge, parameter) triple
    pub async fn find_active(
        pool: &PgPool,
        entry_id: Uuid,
        judge_id: Uuid,
        parameter_id: Uuid,
    ) -> AppResult<Option<CompetitionRating>> {
        let rating = sqlx::query_as::<_, CompetitionRating>(
            r#"
            SELECT * FROM competition_ratings
            WHERE entry_id = $1 AND judge_id = $2 AND parameter_id = $3 AND deleted_at IS NULL
            "#,
        )
        .bind(entry_id)
        .bind(judge_id)
        .bind(parameter_id)
        .fetch_optional(pool)
        .await?;

        Ok(rating)
    }

    /// Insert a rating; the partial unique index rejects a second active row
    pub async fn create(pool: &PgPool, rating: &NewRating) -> AppResult<CompetitionRating> {
        let created = sqlx::query_as::<_, CompetitionRating>(
            r#"
            INSERT INTO competition_ratings (
                id, competition_id, entry_id, judge_id, parameter_id, score, note, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(rating.id)
        .bind(rating.competition_id)
        .bind(rating.entry_id)
        .bind(rating.judge_id)
        .bind(rating.parameter_id)
        .bind(rating.score)
        .bind(&rating.note)
        .bind(rating.submitted_at)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    /// Overwrite score, note and submission time of an active rating
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        score: Decimal,
        note: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<CompetitionRating> {
        sqlx::query_as::<_, CompetitionRating>(
            r#"
            UPDATE competition_ratings
            SET score = $2, note = $3, submitted_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(score)
        .bind(note)
        .bind(submitted_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Rating"))
    }

    /// Count a judge's active ratings of an entry
    pub async fn count_active(pool: &PgPool, entry_id: Uuid, judge_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM competition_ratings
            WHERE entry_id = $1 AND judge_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(entry_id)
        .bind(judge_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Sum and count of active ratings per parameter
    pub async fn tallies(pool: &PgPool, entry_id: Uuid) -> AppResult<Vec<ParameterTally>> {
        let tallies = sqlx::query_as::<_, ParameterTally>(
            r#"
            SELECT parameter_id, SUM(score) AS score_sum, COUNT(*) AS rating_count
            FROM competition_ratings
            WHERE entry_id = $1 AND deleted_at IS NULL
            GROUP BY parameter_id
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await?;

        Ok(tallies)
    }

    /// List active ratings of an entry by judge, then parameter order
    pub async fn list_by_entry(pool: &PgPool, entry_id: Uuid) -> AppResult<Vec<CompetitionRating>> {
        let ratings = sqlx::query_as::<_, CompetitionRating>(
            r#"
            SELECT r.* FROM competition_ratings r
            JOIN evaluation_parameters p ON p.id = r.parameter_id
            WHERE r.entry_id = $1 AND r.deleted_at IS NULL
            ORDER BY r.judge_id, p.display_order
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await?;

        Ok(ratings)
    }

    /// List a judge's active ratings in a competition by entry, then parameter order
    pub async fn list_by_judge(
        pool: &PgPool,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let ratings = sqlx::query_as::<_, CompetitionRating>(
            r#"
            SELECT r.* FROM competition_ratings r
            JOIN competition_entries e ON e.id = r.entry_id
            JOIN evaluation_parameters p ON p.id = r.parameter_id
            WHERE r.competition_id = $1 AND r.judge_id = $2 AND r.deleted_at IS NULL
            ORDER BY e.display_order, p.display_order
            "#,
        )
        .bind(competition_id)
        .bind(judge_id)
        .fetch_all(pool)
        .await?;

        Ok(ratings)
    }

    /// List every active rating of a competition
    pub async fn list_by_competition(
        pool: &PgPool,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let ratings = sqlx::query_as::<_, CompetitionRating>(
            r#"
            SELECT r.* FROM competition_ratings r
            JOIN competition_entries e ON e.id = r.entry_id
            JOIN evaluation_parameters p ON p.id = r.parameter_id
            WHERE r.competition_id = $1 AND r.deleted_at IS NULL
            ORDER BY e.display_order, r.judge_id, p.display_order
            "#,
        )
        .bind(competition_id)
        .fetch_all(pool)
        .await?;

        Ok(ratings)
    }

    /// Full-detail export query
    pub async fn export_rows(pool: &PgPool, competition_id: Uuid) -> AppResult<Vec<ExportRow>> {
        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT
                e.id AS entry_id,
                e.name AS entry_name,
                e.display_order AS entry_display_order,
                (e.deleted_at IS NOT NULL) AS entry_deleted,
                r.judge_id,
                p.id AS parameter_id,
                p.name AS parameter_name,
                p.weight AS parameter_weight,
                p.display_order AS parameter_display_order,
                r.score,
                r.note,
                r.submitted_at
            FROM competition_ratings r
            JOIN competition_entries e ON e.id = r.entry_id
            JOIN evaluation_parameters p ON p.id = r.parameter_id
            WHERE r.competition_id = $1 AND r.deleted_at IS NULL
            ORDER BY e.display_order, r.judge_id, p.display_order
            "#,
        )
        .bind(competition_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
