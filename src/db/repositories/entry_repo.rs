//! Entry repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CompetitionEntry, EntryChanges, EntryStatus, NewEntry},
};

#[derive(FromRow)]
struct EntryRow {
    id: Uuid,
    competition_id: Uuid,
    name: String,
    description: Option<String>,
    file_path: Option<String>,
    display_order: i32,
    status: String,
    contestant_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<EntryRow> for CompetitionEntry {
    type Error = AppError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let status = EntryStatus::parse(&row.status)
            .ok_or_else(|| AppError::Database(format!("Unknown entry status: {}", row.status)))?;

        Ok(Self {
            id: row.id,
            competition_id: row.competition_id,
            name: row.name,
            description: row.description,
            file_path: row.file_path,
            display_order: row.display_order,
            status,
            contestant_id: row.contestant_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Repository for competition entries
pub struct EntryRepository;

impl EntryRepository {
    /// Create an entry at the next display order.
    ///
    /// The competition row is locked for the duration of the transaction so
    /// concurrent creations read and bump the maximum one at a time.
    pub async fn create(
        pool: &PgPool,
        competition_id: Uuid,
        entry: &NewEntry,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let mut tx = pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM competitions WHERE id = $1 FOR UPDATE"#)
            .bind(competition_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("Competition"))?;

        let max_order = sqlx::query_scalar::<_, i32>(
            r#"SELECT COALESCE(MAX(display_order), 0) FROM competition_entries WHERE competition_id = $1"#,
        )
        .bind(competition_id)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO competition_entries (
                id, competition_id, name, description, file_path, display_order,
                status, contestant_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(competition_id)
        .bind(&entry.name)
        .bind(&entry.description)
        .bind(&entry.file_path)
        .bind(max_order + 1)
        .bind(EntryStatus::Pending.as_str())
        .bind(entry.contestant_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Find entry by ID (soft-deleted ones included)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<CompetitionEntry>> {
        let row =
            sqlx::query_as::<_, EntryRow>(r#"SELECT * FROM competition_entries WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        row.map(CompetitionEntry::try_from).transpose()
    }

    /// List non-deleted entries in display order
    pub async fn list_active(
        pool: &PgPool,
        competition_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AppResult<Vec<CompetitionEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT * FROM competition_entries
            WHERE competition_id = $1
              AND deleted_at IS NULL
              AND ($2::VARCHAR IS NULL OR status = $2)
            ORDER BY display_order ASC
            "#,
        )
        .bind(competition_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(CompetitionEntry::try_from).collect()
    }

    /// Highest display order in the competition, deleted entries included
    pub async fn max_display_order(pool: &PgPool, competition_id: Uuid) -> AppResult<i32> {
        let max_order = sqlx::query_scalar::<_, i32>(
            r#"SELECT COALESCE(MAX(display_order), 0) FROM competition_entries WHERE competition_id = $1"#,
        )
        .bind(competition_id)
        .fetch_one(pool)
        .await?;

        Ok(max_order)
    }

    /// Update moderation status
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE competition_entries
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Entry"))?;

        row.try_into()
    }

    /// Update entry details
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE competition_entries
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                file_path = COALESCE($4, file_path),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.file_path)
        .bind(now)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Entry"))?;

        row.try_into()
    }

    /// Mark an entry deleted
    pub async fn soft_delete(pool: &PgPool, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE competition_entries
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
}
