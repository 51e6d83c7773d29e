use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Assessment, AssessmentId, Athlete, AthleteId};
use super::progress::TrendReading;
use super::scoring::{compute_overall_score, OverallScore, ScoreBand};

/// Name shown when an assessment references an athlete that no longer exists.
pub const UNKNOWN_ATHLETE: &str = "Unknown Athlete";

/// Assessment row joined with its athlete's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentWithAthleteName {
    pub assessment_id: AssessmentId,
    pub athlete_id: AthleteId,
    pub athlete_name: String,
    pub date: NaiveDate,
    pub overall_score: OverallScore,
    pub band: ScoreBand,
    pub percentage: f64,
    pub trend: TrendReading,
}

/// Headline counts plus the most recent assessments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub athlete_count: usize,
    pub assessment_count: usize,
    pub recent_assessments: Vec<AssessmentWithAthleteName>,
}

impl DashboardSummary {
    pub fn build(athletes: &[Athlete], assessments: &[Assessment], recent_limit: usize) -> Self {
        Self {
            athlete_count: athletes.len(),
            assessment_count: assessments.len(),
            recent_assessments: recent_assessments(athletes, assessments, recent_limit),
        }
    }
}

/// Criteria for the assessment list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentFilter {
    /// Matched case-insensitively against the athlete name and the MM/DD/YYYY date.
    pub search: String,
    pub athlete: Option<AthleteId>,
}

/// Joins every assessment with its athlete's name, preserving input order.
pub fn join_assessments(
    athletes: &[Athlete],
    assessments: &[Assessment],
) -> Vec<AssessmentWithAthleteName> {
    let names: HashMap<&AthleteId, &str> = athletes
        .iter()
        .map(|athlete| (&athlete.id, athlete.name.as_str()))
        .collect();

    assessments
        .iter()
        .map(|assessment| {
            let overall_score = compute_overall_score(&assessment.performance_metrics);
            AssessmentWithAthleteName {
                assessment_id: assessment.id.clone(),
                athlete_id: assessment.athlete_id.clone(),
                athlete_name: names
                    .get(&assessment.athlete_id)
                    .copied()
                    .unwrap_or(UNKNOWN_ATHLETE)
                    .to_string(),
                date: assessment.date,
                overall_score,
                band: overall_score.band(),
                percentage: overall_score.percentage(),
                trend: assessment.progress.trend,
            }
        })
        .collect()
}

/// Newest assessments first, at most `limit` of them.
pub fn recent_assessments(
    athletes: &[Athlete],
    assessments: &[Assessment],
    limit: usize,
) -> Vec<AssessmentWithAthleteName> {
    let mut joined = join_assessments(athletes, assessments);
    joined.sort_by(|a, b| b.date.cmp(&a.date));
    joined.truncate(limit);
    joined
}

/// Case-insensitive match on name, sport or position. An empty term matches everyone.
pub fn search_athletes<'a>(athletes: &'a [Athlete], term: &str) -> Vec<&'a Athlete> {
    let needle = term.trim().to_lowercase();
    athletes
        .iter()
        .filter(|athlete| {
            needle.is_empty()
                || [&athlete.name, &athlete.sport, &athlete.position]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn filter_assessments(
    rows: Vec<AssessmentWithAthleteName>,
    filter: &AssessmentFilter,
) -> Vec<AssessmentWithAthleteName> {
    let needle = filter.search.trim().to_lowercase();
    rows.into_iter()
        .filter(|row| {
            filter
                .athlete
                .as_ref()
                .map_or(true, |athlete| &row.athlete_id == athlete)
        })
        .filter(|row| {
            needle.is_empty()
                || row.athlete_name.to_lowercase().contains(&needle)
                || format_display_date(row.date).contains(&needle)
        })
        .collect()
}

/// US-style display date, e.g. `03/07/2025`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        assert_eq!(format_display_date(date), "03/07/2025");
    }
}
