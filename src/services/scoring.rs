//! Score aggregation
//!
//! Pure functions over rubric parameters and rating tallies. Means are kept at
//! full precision while the weighted score is computed; both are rounded only
//! when they are reported.

use std::collections::{HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::constants::{MAX_SCORE, MIN_SCORE, REPORT_DECIMAL_PLACES, SCORE_DECIMAL_PLACES};
use crate::error::{AppError, AppResult};
use crate::models::{CompetitionRating, EntryScore, ParameterAverage, ParameterTally, Rubric};

/// Arithmetic mean, or None when nothing was rated
pub fn mean(sum: Decimal, count: i64) -> Option<Decimal> {
    if count <= 0 {
        return None;
    }
    Some(sum / Decimal::from(count))
}

/// Σ(mean × weight) / Σ(weight) over the parameters that have a mean.
///
/// Returns None when no parameter has a mean (never zero).
pub fn weighted_score<I>(parameters: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Option<Decimal>, i32)>,
{
    let (weighted_sum, weight_sum) = parameters
        .into_iter()
        .filter_map(|(mean, weight)| mean.map(|m| (m, Decimal::from(weight))))
        .fold((Decimal::ZERO, Decimal::ZERO), |(sum, weights), (m, w)| {
            (sum + m * w, weights + w)
        });

    if weight_sum.is_zero() {
        return None;
    }
    Some(weighted_sum / weight_sum)
}

/// Round a reported figure to the reporting precision
pub fn round_score(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(REPORT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-parameter averages in rubric order plus the weighted aggregate
pub fn entry_score(entry_id: Uuid, rubric: &Rubric, tallies: &[ParameterTally]) -> EntryScore {
    let by_parameter: HashMap<Uuid, &ParameterTally> =
        tallies.iter().map(|t| (t.parameter_id, t)).collect();

    let raw: Vec<(Option<Decimal>, i64)> = rubric
        .parameters
        .iter()
        .map(|p| match by_parameter.get(&p.id) {
            Some(tally) => (mean(tally.score_sum, tally.rating_count), tally.rating_count),
            None => (None, 0),
        })
        .collect();

    let weighted = weighted_score(
        rubric
            .parameters
            .iter()
            .zip(&raw)
            .map(|(p, (mean, _))| (*mean, p.weight)),
    );

    let parameters = rubric
        .parameters
        .iter()
        .zip(raw)
        .map(|(p, (mean, count))| ParameterAverage {
            parameter_id: p.id,
            name: p.name.clone(),
            weight: p.weight,
            display_order: p.display_order,
            mean: mean.map(round_score),
            count,
        })
        .collect();

    EntryScore {
        entry_id,
        parameters,
        weighted_score: weighted.map(round_score),
    }
}

/// Group ratings into per-parameter tallies
pub fn tally<'a, I>(ratings: I) -> Vec<ParameterTally>
where
    I: IntoIterator<Item = &'a CompetitionRating>,
{
    let mut tallies: Vec<ParameterTally> = Vec::new();
    for rating in ratings {
        match tallies.iter_mut().find(|t| t.parameter_id == rating.parameter_id) {
            Some(existing) => {
                existing.score_sum += rating.score;
                existing.rating_count += 1;
            }
            None => tallies.push(ParameterTally {
                parameter_id: rating.parameter_id,
                score_sum: rating.score,
                rating_count: 1,
            }),
        }
    }
    tallies
}

/// Count assigned judges who rated every parameter of the rubric
pub fn completed_judges<'a, I>(rubric: &Rubric, judge_ids: &HashSet<Uuid>, ratings: I) -> i64
where
    I: IntoIterator<Item = &'a CompetitionRating>,
{
    if rubric.parameters.is_empty() {
        return 0;
    }

    let mut rated: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for rating in ratings {
        if judge_ids.contains(&rating.judge_id) && rubric.parameter(rating.parameter_id).is_some() {
            rated
                .entry(rating.judge_id)
                .or_default()
                .insert(rating.parameter_id);
        }
    }

    rated
        .values()
        .filter(|parameters| parameters.len() == rubric.parameter_count())
        .count() as i64
}

/// Check a submitted score: within bounds and at most two decimal places
pub fn validate_score(score: Decimal) -> AppResult<()> {
    if score < Decimal::from(MIN_SCORE) || score > Decimal::from(MAX_SCORE) {
        return Err(AppError::Validation(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }
    if score.normalize().scale() > SCORE_DECIMAL_PLACES {
        return Err(AppError::Validation(format!(
            "Score may have at most {} decimal places",
            SCORE_DECIMAL_PLACES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::{EvaluationModel, EvaluationParameter};

    fn rubric(weights: &[(&str, i32)]) -> Rubric {
        let now = Utc::now();
        let model = EvaluationModel {
            id: Uuid::new_v4(),
            name: "Tea".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let parameters = weights
            .iter()
            .enumerate()
            .map(|(i, (name, weight))| EvaluationParameter {
                id: Uuid::new_v4(),
                model_id: model.id,
                name: name.to_string(),
                weight: *weight,
                display_order: i as i32 + 1,
                created_at: now,
                updated_at: now,
            })
            .collect();
        Rubric::new(model, parameters)
    }

    fn tally_of(parameter_id: Uuid, scores: &[i64]) -> ParameterTally {
        ParameterTally {
            parameter_id,
            score_sum: scores.iter().copied().map(Decimal::from).sum(),
            rating_count: scores.len() as i64,
        }
    }

    #[test]
    fn test_two_judge_example() {
        let rubric = rubric(&[("Taste", 40), ("Color", 30), ("Aroma", 30)]);
        let [taste, color, aroma] = [0, 1, 2].map(|i| rubric.parameters[i].id);
        let tallies = vec![
            tally_of(taste, &[90, 70]),
            tally_of(color, &[80, 90]),
            tally_of(aroma, &[70, 80]),
        ];

        let score = entry_score(Uuid::new_v4(), &rubric, &tallies);

        let means: Vec<_> = score.parameters.iter().map(|p| p.mean).collect();
        assert_eq!(
            means,
            vec![
                Some(Decimal::from(80)),
                Some(Decimal::from(85)),
                Some(Decimal::from(75))
            ]
        );
        assert_eq!(score.weighted_score, Some(Decimal::from(80)));
    }

    #[test]
    fn test_no_ratings_is_undefined() {
        let rubric = rubric(&[("Taste", 40), ("Color", 60)]);
        let score = entry_score(Uuid::new_v4(), &rubric, &[]);

        assert_eq!(score.weighted_score, None);
        assert!(score.parameters.iter().all(|p| p.mean.is_none() && p.count == 0));
        assert_eq!(weighted_score(std::iter::empty()), None);
    }

    #[test]
    fn test_normalizes_by_rated_weights_only() {
        let rubric = rubric(&[("Taste", 40), ("Color", 30), ("Aroma", 30)]);
        let tallies = vec![
            tally_of(rubric.parameters[0].id, &[90]),
            tally_of(rubric.parameters[2].id, &[60]),
        ];

        let score = entry_score(Uuid::new_v4(), &rubric, &tallies);

        // (90*40 + 60*30) / 70
        assert_eq!(score.weighted_score, Some(Decimal::new(7714, 2)));
        assert_eq!(score.parameters[1].mean, None);
        assert_eq!(score.parameters[1].count, 0);
    }

    #[test]
    fn test_weighted_uses_unrounded_means() {
        let rubric = rubric(&[("Taste", 1), ("Color", 2)]);
        let tallies = vec![
            tally_of(rubric.parameters[0].id, &[10, 10, 11]),
            tally_of(rubric.parameters[1].id, &[10]),
        ];

        let score = entry_score(Uuid::new_v4(), &rubric, &tallies);

        assert_eq!(score.parameters[0].mean, Some(Decimal::new(1033, 2)));
        // (31/3 + 20) / 3 = 10.111...
        assert_eq!(score.weighted_score, Some(Decimal::new(1011, 2)));
    }

    #[test]
    fn test_score_validation() {
        assert!(validate_score(Decimal::ZERO).is_ok());
        assert!(validate_score(Decimal::from(100)).is_ok());
        assert!(validate_score(Decimal::new(8725, 2)).is_ok());
        assert!(validate_score(Decimal::new(87500, 3)).is_ok());
        assert!(validate_score(Decimal::new(-1, 0)).is_err());
        assert!(validate_score(Decimal::new(10001, 2)).is_err());
        assert!(validate_score(Decimal::new(87255, 3)).is_err());
    }

    #[test]
    fn test_completed_judges_counts_full_sets() {
        let rubric = rubric(&[("Taste", 50), ("Color", 50)]);
        let (a, b, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let entry_id = Uuid::new_v4();
        let rating = |judge_id, parameter_id| CompetitionRating {
            id: Uuid::new_v4(),
            competition_id: Uuid::new_v4(),
            entry_id,
            judge_id,
            parameter_id,
            score: Decimal::from(50),
            note: None,
            submitted_at: Utc::now(),
            deleted_at: None,
        };
        let ratings = vec![
            rating(a, rubric.parameters[0].id),
            rating(a, rubric.parameters[1].id),
            rating(b, rubric.parameters[0].id),
            rating(outsider, rubric.parameters[0].id),
            rating(outsider, rubric.parameters[1].id),
        ];
        let judges: HashSet<Uuid> = [a, b].into_iter().collect();

        assert_eq!(completed_judges(&rubric, &judges, &ratings), 1);
        assert_eq!(tally(&ratings).len(), 2);
    }
}
