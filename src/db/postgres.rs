//! PostgreSQL store backed by the repositories

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::connection::test_connection;
use super::repositories::{
    CompetitionRepository, EntryRepository, JudgeRepository, RatingRepository, RubricRepository,
};
use super::store::{CompetitionChanges, Store};
use crate::error::AppResult;
use crate::models::{
    Competition, CompetitionEntry, CompetitionJudge, CompetitionRating, EntryChanges,
    EntryStatus, EvaluationModel, EvaluationParameter, ExportRow, NewCompetition, NewEntry,
    NewParameter, NewRating, ParameterTally, Rubric,
};

/// Store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        test_connection(&self.pool).await?;
        Ok(())
    }

    async fn insert_rubric(
        &self,
        name: &str,
        parameters: &[NewParameter],
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        RubricRepository::create(&self.pool, name, parameters, now).await
    }

    async fn find_rubric(&self, model_id: Uuid) -> AppResult<Option<Rubric>> {
        RubricRepository::find_by_id(&self.pool, model_id).await
    }

    async fn find_model_by_name(&self, name: &str) -> AppResult<Option<EvaluationModel>> {
        RubricRepository::find_by_name(&self.pool, name).await
    }

    async fn list_rubrics(&self) -> AppResult<Vec<Rubric>> {
        RubricRepository::list_active(&self.pool).await
    }

    async fn update_rubric(
        &self,
        model_id: Uuid,
        name: Option<&str>,
        parameters: Option<&[NewParameter]>,
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        RubricRepository::update(&self.pool, model_id, name, parameters, now).await
    }

    async fn insert_parameter(
        &self,
        model_id: Uuid,
        parameter: &NewParameter,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        RubricRepository::add_parameter(&self.pool, model_id, parameter, now).await
    }

    async fn find_parameter(&self, parameter_id: Uuid) -> AppResult<Option<EvaluationParameter>> {
        RubricRepository::find_parameter(&self.pool, parameter_id).await
    }

    async fn update_parameter(
        &self,
        parameter_id: Uuid,
        name: Option<&str>,
        weight: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        RubricRepository::update_parameter(&self.pool, parameter_id, name, weight, now).await
    }

    async fn delete_parameter(&self, parameter_id: Uuid) -> AppResult<bool> {
        RubricRepository::delete_parameter(&self.pool, parameter_id).await
    }

    async fn soft_delete_rubric(&self, model_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        RubricRepository::soft_delete(&self.pool, model_id, now).await
    }

    async fn insert_competition(
        &self,
        competition: &NewCompetition,
        judge_ids: &[Uuid],
    ) -> AppResult<Competition> {
        CompetitionRepository::create(&self.pool, competition, judge_ids).await
    }

    async fn find_competition(&self, id: Uuid) -> AppResult<Option<Competition>> {
        CompetitionRepository::find_by_id(&self.pool, id).await
    }

    async fn list_competitions(&self) -> AppResult<Vec<Competition>> {
        CompetitionRepository::list_active(&self.pool).await
    }

    async fn list_competitions_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Competition>> {
        CompetitionRepository::list_by_creator(&self.pool, creator_id).await
    }

    async fn list_competitions_for_judge(&self, judge_id: Uuid) -> AppResult<Vec<Competition>> {
        CompetitionRepository::list_for_judge(&self.pool, judge_id).await
    }

    async fn update_competition(
        &self,
        id: Uuid,
        changes: &CompetitionChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Competition> {
        CompetitionRepository::update(&self.pool, id, changes, now).await
    }

    async fn soft_delete_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        CompetitionRepository::soft_delete(&self.pool, id, now).await
    }

    async fn end_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        CompetitionRepository::end(&self.pool, id, now).await
    }

    async fn find_expired_competitions(&self, now: DateTime<Utc>) -> AppResult<Vec<Competition>> {
        CompetitionRepository::find_expired(&self.pool, now).await
    }

    async fn insert_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionJudge> {
        JudgeRepository::create(&self.pool, competition_id, judge_id, now).await
    }

    async fn delete_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        JudgeRepository::delete(&self.pool, competition_id, judge_id).await
    }

    async fn is_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        JudgeRepository::exists(&self.pool, competition_id, judge_id).await
    }

    async fn list_judges(&self, competition_id: Uuid) -> AppResult<Vec<CompetitionJudge>> {
        JudgeRepository::list_by_competition(&self.pool, competition_id).await
    }

    async fn count_judges(&self, competition_id: Uuid) -> AppResult<i64> {
        JudgeRepository::count_by_competition(&self.pool, competition_id).await
    }

    async fn insert_entry(
        &self,
        competition_id: Uuid,
        entry: &NewEntry,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        EntryRepository::create(&self.pool, competition_id, entry, now).await
    }

    async fn find_entry(&self, id: Uuid) -> AppResult<Option<CompetitionEntry>> {
        EntryRepository::find_by_id(&self.pool, id).await
    }

    async fn list_active_entries(
        &self,
        competition_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AppResult<Vec<CompetitionEntry>> {
        EntryRepository::list_active(&self.pool, competition_id, status).await
    }

    async fn max_display_order(&self, competition_id: Uuid) -> AppResult<i32> {
        EntryRepository::max_display_order(&self.pool, competition_id).await
    }

    async fn update_entry_status(
        &self,
        id: Uuid,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        EntryRepository::update_status(&self.pool, id, status, now).await
    }

    async fn update_entry(
        &self,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        EntryRepository::update(&self.pool, id, changes, now).await
    }

    async fn soft_delete_entry(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        EntryRepository::soft_delete(&self.pool, id, now).await
    }

    async fn find_active_rating(
        &self,
        entry_id: Uuid,
        judge_id: Uuid,
        parameter_id: Uuid,
    ) -> AppResult<Option<CompetitionRating>> {
        RatingRepository::find_active(&self.pool, entry_id, judge_id, parameter_id).await
    }

    async fn insert_rating(&self, rating: &NewRating) -> AppResult<CompetitionRating> {
        RatingRepository::create(&self.pool, rating).await
    }

    async fn update_rating(
        &self,
        id: Uuid,
        score: Decimal,
        note: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<CompetitionRating> {
        RatingRepository::update(&self.pool, id, score, note, submitted_at).await
    }

    async fn count_active_ratings(&self, entry_id: Uuid, judge_id: Uuid) -> AppResult<i64> {
        RatingRepository::count_active(&self.pool, entry_id, judge_id).await
    }

    async fn parameter_tallies(&self, entry_id: Uuid) -> AppResult<Vec<ParameterTally>> {
        RatingRepository::tallies(&self.pool, entry_id).await
    }

    async fn list_ratings_for_entry(&self, entry_id: Uuid) -> AppResult<Vec<CompetitionRating>> {
        RatingRepository::list_by_entry(&self.pool, entry_id).await
    }

    async fn list_ratings_for_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        RatingRepository::list_by_judge(&self.pool, competition_id, judge_id).await
    }

    async fn list_ratings_for_competition(
        &self,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        RatingRepository::list_by_competition(&self.pool, competition_id).await
    }

    async fn export_rows(&self, competition_id: Uuid) -> AppResult<Vec<ExportRow>> {
        RatingRepository::export_rows(&self.pool, competition_id).await
    }
}
