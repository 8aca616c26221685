//! Storage collaborator
//!
//! Every query shape the engine needs, behind one object-safe trait. Stores
//! enforce the uniqueness rules themselves and report a rejected write as
//! `AppError::AlreadyExists`, which services treat as a lost race.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Competition, CompetitionEntry, CompetitionJudge, CompetitionRating, EntryChanges,
    EntryStatus, EvaluationModel, EvaluationParameter, ExportRow, NewCompetition, NewEntry,
    NewParameter, NewRating, ParameterTally, Rubric,
};

/// Fields of a competition that may change after creation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Check that the backing storage answers
    async fn ping(&self) -> AppResult<()>;

    // -------------------------------------------------------------------------
    // Rubrics
    // -------------------------------------------------------------------------

    /// Insert a model and its parameters (orders 1..n) atomically.
    /// A non-deleted model with the same name yields `AlreadyExists`.
    async fn insert_rubric(
        &self,
        name: &str,
        parameters: &[NewParameter],
        now: DateTime<Utc>,
    ) -> AppResult<Rubric>;

    /// Find a rubric by model id, soft-deleted models included
    async fn find_rubric(&self, model_id: Uuid) -> AppResult<Option<Rubric>>;

    /// Find a non-deleted model by name
    async fn find_model_by_name(&self, name: &str) -> AppResult<Option<EvaluationModel>>;

    /// Non-deleted rubrics, oldest first
    async fn list_rubrics(&self) -> AppResult<Vec<Rubric>>;

    /// Rename a model and/or replace all of its parameters atomically.
    /// Refused with `Conflict` while any competition references the model.
    async fn update_rubric(
        &self,
        model_id: Uuid,
        name: Option<&str>,
        parameters: Option<&[NewParameter]>,
        now: DateTime<Utc>,
    ) -> AppResult<Rubric>;

    /// Append a parameter after the model's current last one
    async fn insert_parameter(
        &self,
        model_id: Uuid,
        parameter: &NewParameter,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter>;

    async fn find_parameter(&self, parameter_id: Uuid) -> AppResult<Option<EvaluationParameter>>;

    async fn update_parameter(
        &self,
        parameter_id: Uuid,
        name: Option<&str>,
        weight: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter>;

    /// Hard delete; returns false when the parameter did not exist.
    /// Refused with `Conflict` while any competition references the model.
    async fn delete_parameter(&self, parameter_id: Uuid) -> AppResult<bool>;

    /// Returns false when the model was already deleted.
    /// Refused with `Conflict` while any competition references the model.
    async fn soft_delete_rubric(&self, model_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    // -------------------------------------------------------------------------
    // Competitions and judges
    // -------------------------------------------------------------------------

    /// Insert an ACTIVE competition together with its initial judges atomically.
    /// The model must exist and not be deleted; the check is serialized with
    /// the in-use guard of the rubric writes above.
    async fn insert_competition(
        &self,
        competition: &NewCompetition,
        judge_ids: &[Uuid],
    ) -> AppResult<Competition>;

    /// Find a competition by id, soft-deleted ones included
    async fn find_competition(&self, id: Uuid) -> AppResult<Option<Competition>>;

    /// Non-deleted competitions, newest first
    async fn list_competitions(&self) -> AppResult<Vec<Competition>>;

    async fn list_competitions_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Competition>>;

    /// Non-deleted competitions the principal judges, newest first
    async fn list_competitions_for_judge(&self, judge_id: Uuid) -> AppResult<Vec<Competition>>;

    async fn update_competition(
        &self,
        id: Uuid,
        changes: &CompetitionChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Competition>;

    async fn soft_delete_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// ACTIVE -> ENDED; returns false when the competition was not ACTIVE
    async fn end_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// ACTIVE competitions whose deadline lies strictly before `now`
    async fn find_expired_competitions(&self, now: DateTime<Utc>) -> AppResult<Vec<Competition>>;

    /// A duplicate (competition, judge) pair yields `AlreadyExists`
    async fn insert_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionJudge>;

    async fn delete_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool>;

    async fn is_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool>;

    /// Judges in assignment order
    async fn list_judges(&self, competition_id: Uuid) -> AppResult<Vec<CompetitionJudge>>;

    async fn count_judges(&self, competition_id: Uuid) -> AppResult<i64>;

    // -------------------------------------------------------------------------
    // Entries
    // -------------------------------------------------------------------------

    /// Insert a PENDING entry at `max display order + 1`; the read and the
    /// write are serialized per competition
    async fn insert_entry(
        &self,
        competition_id: Uuid,
        entry: &NewEntry,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry>;

    /// Find an entry by id, soft-deleted ones included
    async fn find_entry(&self, id: Uuid) -> AppResult<Option<CompetitionEntry>>;

    /// Non-deleted entries by display order, optionally filtered by status
    async fn list_active_entries(
        &self,
        competition_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AppResult<Vec<CompetitionEntry>>;

    /// Highest order ever assigned in the competition (deleted entries count), 0 if none
    async fn max_display_order(&self, competition_id: Uuid) -> AppResult<i32>;

    async fn update_entry_status(
        &self,
        id: Uuid,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry>;

    async fn update_entry(
        &self,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry>;

    async fn soft_delete_entry(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    // -------------------------------------------------------------------------
    // Ratings
    // -------------------------------------------------------------------------

    async fn find_active_rating(
        &self,
        entry_id: Uuid,
        judge_id: Uuid,
        parameter_id: Uuid,
    ) -> AppResult<Option<CompetitionRating>>;

    /// A second active rating for the same triple yields `AlreadyExists`
    async fn insert_rating(&self, rating: &NewRating) -> AppResult<CompetitionRating>;

    async fn update_rating(
        &self,
        id: Uuid,
        score: Decimal,
        note: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<CompetitionRating>;

    async fn count_active_ratings(&self, entry_id: Uuid, judge_id: Uuid) -> AppResult<i64>;

    /// Score sum and count per parameter over the entry's active ratings
    async fn parameter_tallies(&self, entry_id: Uuid) -> AppResult<Vec<ParameterTally>>;

    async fn list_ratings_for_entry(&self, entry_id: Uuid) -> AppResult<Vec<CompetitionRating>>;

    async fn list_ratings_for_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>>;

    /// Every active rating of the competition in one batch
    async fn list_ratings_for_competition(
        &self,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>>;

    /// Active ratings joined with entry and parameter, ordered by entry
    /// display order, judge id, parameter display order. Ratings of
    /// soft-deleted entries are included.
    async fn export_rows(&self, competition_id: Uuid) -> AppResult<Vec<ExportRow>>;
}
