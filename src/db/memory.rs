//! In-process store
//!
//! Holds every table behind one async `RwLock`. Each write takes the lock once,
//! so read-then-write sequences (next display order, uniqueness checks) are
//! atomic the same way a transaction makes them atomic in PostgreSQL.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{CompetitionChanges, Store};
use crate::error::{AppError, AppResult};
use crate::models::{
    Competition, CompetitionEntry, CompetitionJudge, CompetitionRating, CompetitionStatus,
    EntryChanges, EntryStatus, EvaluationModel, EvaluationParameter, ExportRow, NewCompetition,
    NewEntry, NewParameter, NewRating, ParameterTally, Rubric,
};

#[derive(Default)]
struct Tables {
    models: HashMap<Uuid, EvaluationModel>,
    parameters: HashMap<Uuid, EvaluationParameter>,
    competitions: HashMap<Uuid, Competition>,
    judges: Vec<CompetitionJudge>,
    entries: HashMap<Uuid, CompetitionEntry>,
    ratings: HashMap<Uuid, CompetitionRating>,
}

impl Tables {
    fn rubric(&self, model_id: Uuid) -> Option<Rubric> {
        let model = self.models.get(&model_id)?.clone();
        let parameters = self
            .parameters
            .values()
            .filter(|p| p.model_id == model_id)
            .cloned()
            .collect();
        Some(Rubric::new(model, parameters))
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.models
            .values()
            .any(|m| m.name == name && !m.is_deleted() && Some(m.id) != except)
    }

    fn ensure_unused(&self, model_id: Uuid) -> AppResult<()> {
        if self.competitions.values().any(|c| c.model_id == model_id) {
            return Err(AppError::model_in_use());
        }
        Ok(())
    }

    fn max_parameter_order(&self, model_id: Uuid) -> i32 {
        self.parameters
            .values()
            .filter(|p| p.model_id == model_id)
            .map(|p| p.display_order)
            .max()
            .unwrap_or(0)
    }

    fn max_entry_order(&self, competition_id: Uuid) -> i32 {
        self.entries
            .values()
            .filter(|e| e.competition_id == competition_id)
            .map(|e| e.display_order)
            .max()
            .unwrap_or(0)
    }

    fn active_competitions(&self) -> impl Iterator<Item = &Competition> {
        self.competitions.values().filter(|c| !c.is_deleted())
    }

    fn parameter_order(&self, parameter_id: Uuid) -> i32 {
        self.parameters
            .get(&parameter_id)
            .map(|p| p.display_order)
            .unwrap_or(i32::MAX)
    }

    fn entry_order(&self, entry_id: Uuid) -> i32 {
        self.entries
            .get(&entry_id)
            .map(|e| e.display_order)
            .unwrap_or(i32::MAX)
    }

    fn insert_parameters(&mut self, model_id: Uuid, parameters: &[NewParameter], now: DateTime<Utc>) {
        for (index, parameter) in parameters.iter().enumerate() {
            let id = Uuid::new_v4();
            self.parameters.insert(
                id,
                EvaluationParameter {
                    id,
                    model_id,
                    name: parameter.name.clone(),
                    weight: parameter.weight,
                    display_order: index as i32 + 1,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
    }
}

/// Store keeping all records in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    #[cfg(test)]
    failing_ends: std::sync::Mutex<std::collections::HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `end_competition` for this id fail
    #[cfg(test)]
    pub fn fail_end_for(&self, competition_id: Uuid) {
        self.failing_ends
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(competition_id);
    }

    #[cfg(test)]
    fn check_end_failure(&self, competition_id: Uuid) -> AppResult<()> {
        let failing = self.failing_ends.lock().unwrap_or_else(|e| e.into_inner());
        if failing.contains(&competition_id) {
            return Err(AppError::Database("injected failure".to_string()));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_end_failure(&self, _competition_id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

fn sorted_newest_first(mut competitions: Vec<Competition>) -> Vec<Competition> {
    competitions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    competitions
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_rubric(
        &self,
        name: &str,
        parameters: &[NewParameter],
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(name, None) {
            return Err(AppError::AlreadyExists(
                "evaluation_models_name_key".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        tables.models.insert(
            id,
            EvaluationModel {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        tables.insert_parameters(id, parameters, now);

        tables
            .rubric(id)
            .ok_or_else(|| AppError::not_found("Evaluation model"))
    }

    async fn find_rubric(&self, model_id: Uuid) -> AppResult<Option<Rubric>> {
        Ok(self.tables.read().await.rubric(model_id))
    }

    async fn find_model_by_name(&self, name: &str) -> AppResult<Option<EvaluationModel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .models
            .values()
            .find(|m| m.name == name && !m.is_deleted())
            .cloned())
    }

    async fn list_rubrics(&self) -> AppResult<Vec<Rubric>> {
        let tables = self.tables.read().await;
        let mut models: Vec<_> = tables.models.values().filter(|m| !m.is_deleted()).collect();
        models.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(models
            .into_iter()
            .filter_map(|m| tables.rubric(m.id))
            .collect())
    }

    async fn update_rubric(
        &self,
        model_id: Uuid,
        name: Option<&str>,
        parameters: Option<&[NewParameter]>,
        now: DateTime<Utc>,
    ) -> AppResult<Rubric> {
        let mut tables = self.tables.write().await;
        if !tables.models.contains_key(&model_id) {
            return Err(AppError::not_found("Evaluation model"));
        }
        tables.ensure_unused(model_id)?;
        if let Some(name) = name {
            if tables.name_taken(name, Some(model_id)) {
                return Err(AppError::AlreadyExists(
                    "evaluation_models_name_key".to_string(),
                ));
            }
        }

        if let Some(model) = tables.models.get_mut(&model_id) {
            if let Some(name) = name {
                model.name = name.to_string();
            }
            model.updated_at = now;
        }
        if let Some(parameters) = parameters {
            tables.parameters.retain(|_, p| p.model_id != model_id);
            tables.insert_parameters(model_id, parameters, now);
        }

        tables
            .rubric(model_id)
            .ok_or_else(|| AppError::not_found("Evaluation model"))
    }

    async fn insert_parameter(
        &self,
        model_id: Uuid,
        parameter: &NewParameter,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        let mut tables = self.tables.write().await;
        if !tables.models.contains_key(&model_id) {
            return Err(AppError::not_found("Evaluation model"));
        }

        let created = EvaluationParameter {
            id: Uuid::new_v4(),
            model_id,
            name: parameter.name.clone(),
            weight: parameter.weight,
            display_order: tables.max_parameter_order(model_id) + 1,
            created_at: now,
            updated_at: now,
        };
        tables.parameters.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_parameter(&self, parameter_id: Uuid) -> AppResult<Option<EvaluationParameter>> {
        Ok(self.tables.read().await.parameters.get(&parameter_id).cloned())
    }

    async fn update_parameter(
        &self,
        parameter_id: Uuid,
        name: Option<&str>,
        weight: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<EvaluationParameter> {
        let mut tables = self.tables.write().await;
        let parameter = tables
            .parameters
            .get_mut(&parameter_id)
            .ok_or_else(|| AppError::not_found("Evaluation parameter"))?;

        if let Some(name) = name {
            parameter.name = name.to_string();
        }
        if let Some(weight) = weight {
            parameter.weight = weight;
        }
        parameter.updated_at = now;
        Ok(parameter.clone())
    }

    async fn delete_parameter(&self, parameter_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(model_id) = tables.parameters.get(&parameter_id).map(|p| p.model_id) else {
            return Ok(false);
        };
        tables.ensure_unused(model_id)?;
        Ok(tables.parameters.remove(&parameter_id).is_some())
    }

    async fn soft_delete_rubric(&self, model_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.models.contains_key(&model_id) {
            return Err(AppError::not_found("Evaluation model"));
        }
        tables.ensure_unused(model_id)?;
        match tables.models.get_mut(&model_id) {
            Some(model) if !model.is_deleted() => {
                model.deleted_at = Some(now);
                model.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_competition(
        &self,
        competition: &NewCompetition,
        judge_ids: &[Uuid],
    ) -> AppResult<Competition> {
        let mut tables = self.tables.write().await;
        if !tables
            .models
            .get(&competition.model_id)
            .is_some_and(|m| !m.is_deleted())
        {
            return Err(AppError::not_found("Evaluation model"));
        }
        for (index, judge_id) in judge_ids.iter().enumerate() {
            if judge_ids[..index].contains(judge_id) {
                return Err(AppError::AlreadyExists(
                    "competition_judges_competition_id_judge_id_key".to_string(),
                ));
            }
        }

        let created = Competition {
            id: competition.id,
            name: competition.name.clone(),
            description: competition.description.clone(),
            model_id: competition.model_id,
            creator_id: competition.creator_id,
            deadline: competition.deadline,
            status: CompetitionStatus::Active,
            created_at: competition.created_at,
            updated_at: competition.created_at,
            deleted_at: None,
        };
        tables.competitions.insert(created.id, created.clone());
        for judge_id in judge_ids {
            tables.judges.push(CompetitionJudge {
                id: Uuid::new_v4(),
                competition_id: created.id,
                judge_id: *judge_id,
                created_at: competition.created_at,
            });
        }
        Ok(created)
    }

    async fn find_competition(&self, id: Uuid) -> AppResult<Option<Competition>> {
        Ok(self.tables.read().await.competitions.get(&id).cloned())
    }

    async fn list_competitions(&self) -> AppResult<Vec<Competition>> {
        let tables = self.tables.read().await;
        Ok(sorted_newest_first(
            tables.active_competitions().cloned().collect(),
        ))
    }

    async fn list_competitions_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Competition>> {
        let tables = self.tables.read().await;
        Ok(sorted_newest_first(
            tables
                .active_competitions()
                .filter(|c| c.creator_id == creator_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_competitions_for_judge(&self, judge_id: Uuid) -> AppResult<Vec<Competition>> {
        let tables = self.tables.read().await;
        Ok(sorted_newest_first(
            tables
                .active_competitions()
                .filter(|c| {
                    tables
                        .judges
                        .iter()
                        .any(|j| j.competition_id == c.id && j.judge_id == judge_id)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn update_competition(
        &self,
        id: Uuid,
        changes: &CompetitionChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Competition> {
        let mut tables = self.tables.write().await;
        let competition = tables
            .competitions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Competition"))?;

        if let Some(name) = &changes.name {
            competition.name = name.clone();
        }
        if let Some(description) = &changes.description {
            competition.description = Some(description.clone());
        }
        if let Some(deadline) = changes.deadline {
            competition.deadline = deadline;
        }
        competition.updated_at = now;
        Ok(competition.clone())
    }

    async fn soft_delete_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.competitions.get_mut(&id) {
            Some(competition) if !competition.is_deleted() => {
                competition.deleted_at = Some(now);
                competition.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn end_competition(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        self.check_end_failure(id)?;

        let mut tables = self.tables.write().await;
        match tables.competitions.get_mut(&id) {
            Some(competition) if competition.is_active() => {
                competition.status = CompetitionStatus::Ended;
                competition.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_expired_competitions(&self, now: DateTime<Utc>) -> AppResult<Vec<Competition>> {
        let tables = self.tables.read().await;
        let mut expired: Vec<_> = tables
            .competitions
            .values()
            .filter(|c| c.is_active() && c.deadline < now)
            .cloned()
            .collect();
        expired.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));
        Ok(expired)
    }

    async fn insert_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionJudge> {
        let mut tables = self.tables.write().await;
        if tables
            .judges
            .iter()
            .any(|j| j.competition_id == competition_id && j.judge_id == judge_id)
        {
            return Err(AppError::AlreadyExists(
                "competition_judges_competition_id_judge_id_key".to_string(),
            ));
        }

        let judge = CompetitionJudge {
            id: Uuid::new_v4(),
            competition_id,
            judge_id,
            created_at: now,
        };
        tables.judges.push(judge.clone());
        Ok(judge)
    }

    async fn delete_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.judges.len();
        tables
            .judges
            .retain(|j| !(j.competition_id == competition_id && j.judge_id == judge_id));
        Ok(tables.judges.len() < before)
    }

    async fn is_judge(&self, competition_id: Uuid, judge_id: Uuid) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .judges
            .iter()
            .any(|j| j.competition_id == competition_id && j.judge_id == judge_id))
    }

    async fn list_judges(&self, competition_id: Uuid) -> AppResult<Vec<CompetitionJudge>> {
        let tables = self.tables.read().await;
        let mut judges: Vec<_> = tables
            .judges
            .iter()
            .filter(|j| j.competition_id == competition_id)
            .cloned()
            .collect();
        judges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.judge_id.cmp(&b.judge_id)));
        Ok(judges)
    }

    async fn count_judges(&self, competition_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .judges
            .iter()
            .filter(|j| j.competition_id == competition_id)
            .count() as i64)
    }

    async fn insert_entry(
        &self,
        competition_id: Uuid,
        entry: &NewEntry,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let mut tables = self.tables.write().await;
        if !tables.competitions.contains_key(&competition_id) {
            return Err(AppError::not_found("Competition"));
        }

        let created = CompetitionEntry {
            id: Uuid::new_v4(),
            competition_id,
            name: entry.name.clone(),
            description: entry.description.clone(),
            file_path: entry.file_path.clone(),
            display_order: tables.max_entry_order(competition_id) + 1,
            status: EntryStatus::Pending,
            contestant_id: entry.contestant_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.entries.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_entry(&self, id: Uuid) -> AppResult<Option<CompetitionEntry>> {
        Ok(self.tables.read().await.entries.get(&id).cloned())
    }

    async fn list_active_entries(
        &self,
        competition_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AppResult<Vec<CompetitionEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<_> = tables
            .entries
            .values()
            .filter(|e| e.competition_id == competition_id && !e.is_deleted())
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.display_order);
        Ok(entries)
    }

    async fn max_display_order(&self, competition_id: Uuid) -> AppResult<i32> {
        Ok(self.tables.read().await.max_entry_order(competition_id))
    }

    async fn update_entry_status(
        &self,
        id: Uuid,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Entry"))?;
        entry.status = status;
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn update_entry(
        &self,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> AppResult<CompetitionEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Entry"))?;

        if let Some(name) = &changes.name {
            entry.name = name.clone();
        }
        if let Some(description) = &changes.description {
            entry.description = Some(description.clone());
        }
        if let Some(file_path) = &changes.file_path {
            entry.file_path = Some(file_path.clone());
        }
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn soft_delete_entry(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.entries.get_mut(&id) {
            Some(entry) if !entry.is_deleted() => {
                entry.deleted_at = Some(now);
                entry.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_active_rating(
        &self,
        entry_id: Uuid,
        judge_id: Uuid,
        parameter_id: Uuid,
    ) -> AppResult<Option<CompetitionRating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .find(|r| {
                r.deleted_at.is_none()
                    && r.entry_id == entry_id
                    && r.judge_id == judge_id
                    && r.parameter_id == parameter_id
            })
            .cloned())
    }

    async fn insert_rating(&self, rating: &NewRating) -> AppResult<CompetitionRating> {
        let mut tables = self.tables.write().await;
        if tables.ratings.values().any(|r| {
            r.deleted_at.is_none()
                && r.entry_id == rating.entry_id
                && r.judge_id == rating.judge_id
                && r.parameter_id == rating.parameter_id
        }) {
            return Err(AppError::AlreadyExists(
                "competition_ratings_active_triple_key".to_string(),
            ));
        }

        let created = CompetitionRating {
            id: rating.id,
            competition_id: rating.competition_id,
            entry_id: rating.entry_id,
            judge_id: rating.judge_id,
            parameter_id: rating.parameter_id,
            score: rating.score,
            note: rating.note.clone(),
            submitted_at: rating.submitted_at,
            deleted_at: None,
        };
        tables.ratings.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_rating(
        &self,
        id: Uuid,
        score: Decimal,
        note: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<CompetitionRating> {
        let mut tables = self.tables.write().await;
        let rating = tables
            .ratings
            .get_mut(&id)
            .filter(|r| r.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Rating"))?;
        rating.score = score;
        rating.note = note.map(str::to_string);
        rating.submitted_at = submitted_at;
        Ok(rating.clone())
    }

    async fn count_active_ratings(&self, entry_id: Uuid, judge_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|r| r.deleted_at.is_none() && r.entry_id == entry_id && r.judge_id == judge_id)
            .count() as i64)
    }

    async fn parameter_tallies(&self, entry_id: Uuid) -> AppResult<Vec<ParameterTally>> {
        let tables = self.tables.read().await;
        let mut tallies: HashMap<Uuid, ParameterTally> = HashMap::new();
        for rating in tables
            .ratings
            .values()
            .filter(|r| r.deleted_at.is_none() && r.entry_id == entry_id)
        {
            let tally = tallies
                .entry(rating.parameter_id)
                .or_insert_with(|| ParameterTally {
                    parameter_id: rating.parameter_id,
                    score_sum: Decimal::ZERO,
                    rating_count: 0,
                });
            tally.score_sum += rating.score;
            tally.rating_count += 1;
        }
        Ok(tallies.into_values().collect())
    }

    async fn list_ratings_for_entry(&self, entry_id: Uuid) -> AppResult<Vec<CompetitionRating>> {
        let tables = self.tables.read().await;
        let mut ratings: Vec<_> = tables
            .ratings
            .values()
            .filter(|r| r.deleted_at.is_none() && r.entry_id == entry_id)
            .cloned()
            .collect();
        ratings.sort_by_key(|r| (r.judge_id, tables.parameter_order(r.parameter_id)));
        Ok(ratings)
    }

    async fn list_ratings_for_judge(
        &self,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let tables = self.tables.read().await;
        let mut ratings: Vec<_> = tables
            .ratings
            .values()
            .filter(|r| {
                r.deleted_at.is_none()
                    && r.competition_id == competition_id
                    && r.judge_id == judge_id
            })
            .cloned()
            .collect();
        ratings.sort_by_key(|r| {
            (
                tables.entry_order(r.entry_id),
                tables.parameter_order(r.parameter_id),
            )
        });
        Ok(ratings)
    }

    async fn list_ratings_for_competition(
        &self,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let tables = self.tables.read().await;
        let mut ratings: Vec<_> = tables
            .ratings
            .values()
            .filter(|r| r.deleted_at.is_none() && r.competition_id == competition_id)
            .cloned()
            .collect();
        ratings.sort_by_key(|r| {
            (
                tables.entry_order(r.entry_id),
                r.judge_id,
                tables.parameter_order(r.parameter_id),
            )
        });
        Ok(ratings)
    }

    async fn export_rows(&self, competition_id: Uuid) -> AppResult<Vec<ExportRow>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .ratings
            .values()
            .filter(|r| r.deleted_at.is_none() && r.competition_id == competition_id)
            .filter_map(|r| {
                let entry = tables.entries.get(&r.entry_id)?;
                let parameter = tables.parameters.get(&r.parameter_id)?;
                Some(ExportRow {
                    entry_id: entry.id,
                    entry_name: entry.name.clone(),
                    entry_display_order: entry.display_order,
                    entry_deleted: entry.is_deleted(),
                    judge_id: r.judge_id,
                    parameter_id: parameter.id,
                    parameter_name: parameter.name.clone(),
                    parameter_weight: parameter.weight,
                    parameter_display_order: parameter.display_order,
                    score: r.score,
                    note: r.note.clone(),
                    submitted_at: r.submitted_at,
                })
            })
            .collect();
        rows.sort_by_key(|row| {
            (
                row.entry_display_order,
                row.judge_id,
                row.parameter_display_order,
            )
        });
        Ok(rows)
    }
}
