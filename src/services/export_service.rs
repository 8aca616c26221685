//! Rating export
//!
//! Rows are ordered by entry display order, then judge id, then parameter
//! display order. Report consumers depend on that order.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ExportRow, Principal, Rubric},
    services::{CompetitionService, authorization::require_export_access, scoring},
    state::AppState,
};

/// Export service for reporting
pub struct ExportService;

impl ExportService {
    /// Every active rating of a competition, joined with its entry and parameter.
    /// Ratings of soft-deleted entries are included.
    pub async fn export_rows(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<Vec<ExportRow>> {
        let competition = CompetitionService::get(state, competition_id).await?;
        require_export_access(principal, &competition)?;

        state.store().export_rows(competition_id).await
    }

    /// One CSV line per (entry, judge) in export order
    pub async fn export_csv(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<String> {
        let competition = CompetitionService::get(state, competition_id).await?;
        require_export_access(principal, &competition)?;

        let (rubric, rows) = tokio::try_join!(
            state.store().find_rubric(competition.model_id),
            state.store().export_rows(competition_id),
        )?;
        let rubric = rubric.ok_or_else(|| AppError::not_found("Evaluation model"))?;

        let csv = render_csv(&rubric, &rows)?;
        tracing::info!(
            competition_id = %competition_id,
            ratings = rows.len(),
            exported_by = %principal.id,
            "Ratings exported"
        );
        Ok(csv)
    }
}

fn render_csv(rubric: &Rubric, rows: &[ExportRow]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Entry".to_string(), "Judge".to_string()];
    header.extend(
        rubric
            .parameters
            .iter()
            .map(|p| format!("{}({})", p.name, p.weight)),
    );
    header.extend(["Weighted".to_string(), "Note".to_string()]);
    writer.write_record(&header).map_err(csv_error)?;

    for line in rows.chunk_by(|a, b| a.entry_id == b.entry_id && a.judge_id == b.judge_id) {
        let first = &line[0];
        let scores: Vec<_> = rubric
            .parameters
            .iter()
            .map(|p| {
                let score = line
                    .iter()
                    .find(|row| row.parameter_id == p.id)
                    .map(|row| row.score);
                (score, p.weight)
            })
            .collect();
        let weighted = scoring::weighted_score(scores.iter().copied()).map(scoring::round_score);

        let mut notes: Vec<&str> = Vec::new();
        for note in line.iter().filter_map(|row| row.note.as_deref()) {
            if !note.is_empty() && !notes.contains(&note) {
                notes.push(note);
            }
        }

        let mut record = vec![first.entry_name.clone(), first.judge_id.to_string()];
        record.extend(
            scores
                .iter()
                .map(|(score, _)| score.map(|s| s.to_string()).unwrap_or_default()),
        );
        record.push(weighted.map(|w| w.to_string()).unwrap_or_default());
        record.push(notes.join("; "));
        writer.write_record(&record).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}

fn csv_error(err: csv::Error) -> AppError {
    AppError::Internal(anyhow::Error::new(err))
}
