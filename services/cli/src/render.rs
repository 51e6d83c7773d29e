use std::fmt::Write as _;

use coach_tracker::coaching::{
    format_display_date, Assessment, AssessmentWithAthleteName, Athlete, CascadeSummary,
    Competition, DashboardSummary, MetricKind, PerformanceOverview, ResetSummary,
};
use coach_tracker::error::AppError;
use serde::Serialize;

pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn athlete_line(athlete: &Athlete) -> String {
    let mut line = format!("{} | {}", athlete.id, athlete.name);
    for detail in [&athlete.sport, &athlete.position, &athlete.age_grade] {
        if !detail.is_empty() {
            let _ = write!(line, " | {detail}");
        }
    }
    line
}

pub(crate) fn athletes(athletes: &[&Athlete]) -> String {
    if athletes.is_empty() {
        return "No athletes found".to_string();
    }
    athletes
        .iter()
        .map(|athlete| format!("- {}", athlete_line(athlete)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn cascade(name: &str, summary: &CascadeSummary) -> String {
    format!(
        "Deleted {name} with {} assessment(s) and {} competition(s)",
        summary.assessments_removed, summary.competitions_removed
    )
}

pub(crate) fn reset(summary: &ResetSummary) -> String {
    format!(
        "Cleared {} athlete(s), {} assessment(s) and {} competition(s)",
        summary.athletes_removed, summary.assessments_removed, summary.competitions_removed
    )
}

pub(crate) fn recorded_assessment(assessment: &Assessment) -> String {
    let entry = assessment.progress_entry();
    let score = entry.overall_score;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Recorded assessment {} on {}",
        assessment.id,
        format_display_date(assessment.date)
    );
    for kind in MetricKind::ordered() {
        let rating = assessment.performance_metrics.get(kind);
        let _ = writeln!(out, "  {:<20} {} ({})", kind.label(), rating, rating.label());
    }
    let _ = writeln!(
        out,
        "  Overall: {score} ({:.1}%) {}",
        score.percentage(),
        score.band().label()
    );
    if !entry.key_focus.is_empty() {
        let _ = writeln!(out, "  Key focus: {}", entry.key_focus);
    }
    let _ = write!(
        out,
        "  Trend: {} over {} assessment(s)",
        assessment.progress.trend,
        assessment.progress.history.len()
    );
    out
}

pub(crate) fn assessment_rows(rows: &[AssessmentWithAthleteName]) -> String {
    if rows.is_empty() {
        return "No assessments found".to_string();
    }
    rows.iter()
        .map(|row| {
            format!(
                "- {} | {} | {} | {} {} ({:.1}%) | {}",
                row.assessment_id,
                format_display_date(row.date),
                row.athlete_name,
                row.overall_score,
                row.band.label(),
                row.percentage,
                row.trend
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn overview(overview: &PerformanceOverview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Performance for {}", athlete_line(&overview.athlete));
    let _ = writeln!(out, "Assessments: {}", overview.assessment_count);
    match (overview.latest_score, overview.latest_band) {
        (Some(score), Some(band)) => {
            let _ = writeln!(
                out,
                "Latest score: {score} ({:.1}%) {}",
                score.percentage(),
                band.label()
            );
        }
        _ => {
            let _ = writeln!(out, "Latest score: none recorded");
        }
    }
    let _ = write!(out, "Trend: {} [{}]", overview.trend, overview.trend.icon());

    if !overview.history.is_empty() {
        let _ = write!(out, "\n\nHistory");
        for entry in &overview.history {
            let _ = write!(
                out,
                "\n- {} | {}",
                format_display_date(entry.date),
                entry.overall_score
            );
            if !entry.key_focus.is_empty() {
                let _ = write!(out, " | focus: {}", entry.key_focus);
            }
        }
    }
    out
}

pub(crate) fn competition_line(competition: &Competition) -> String {
    format!(
        "{} | {} | vs {} | {} | readiness {} execution {} adaptability {}",
        competition.id,
        format_display_date(competition.date),
        competition.opponent,
        competition.result,
        competition.mental_readiness,
        competition.execution_of_game_plan,
        competition.adaptability
    )
}

pub(crate) fn competitions(competitions: &[Competition]) -> String {
    if competitions.is_empty() {
        return "No competitions found".to_string();
    }
    competitions
        .iter()
        .map(|competition| format!("- {}", competition_line(competition)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn dashboard(summary: &DashboardSummary) -> String {
    format!(
        "Athletes: {}\nAssessments: {}\n\nRecent assessments\n{}",
        summary.athlete_count,
        summary.assessment_count,
        assessment_rows(&summary.recent_assessments)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use coach_tracker::coaching::{AthleteId, OverallScore, ProgressEntry, TrendReading};

    fn athlete() -> Athlete {
        Athlete {
            id: AthleteId("a-1".to_string()),
            name: "Mere Tipene".to_string(),
            sport: "Netball".to_string(),
            position: String::new(),
            age_grade: "U17".to_string(),
            season: String::new(),
            goals: String::new(),
            profile_image: None,
        }
    }

    #[test]
    fn athlete_line_skips_empty_details() {
        assert_eq!(athlete_line(&athlete()), "a-1 | Mere Tipene | Netball | U17");
    }

    #[test]
    fn overview_without_assessments_reports_insufficient_data() {
        let overview = PerformanceOverview {
            athlete: athlete(),
            assessment_count: 0,
            latest_assessment: None,
            latest_score: None,
            latest_band: None,
            latest_percentage: None,
            history: Vec::new(),
            trend: TrendReading::InsufficientData,
        };
        let text = super::overview(&overview);
        assert!(text.contains("Latest score: none recorded"));
        assert!(text.contains("Trend: insufficientData"));
        assert!(!text.contains("History"));
    }

    #[test]
    fn overview_lists_history_with_focus() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).expect("valid date");
        let score = OverallScore::try_from(21_i64).expect("score in range");
        let overview = PerformanceOverview {
            athlete: athlete(),
            assessment_count: 1,
            latest_assessment: None,
            latest_score: Some(score),
            latest_band: Some(score.band()),
            latest_percentage: Some(score.percentage()),
            history: vec![ProgressEntry {
                date,
                overall_score: score,
                key_focus: "Footwork".to_string(),
            }],
            trend: TrendReading::InsufficientData,
        };
        let text = super::overview(&overview);
        assert!(text.contains("Latest score: 21/30 (70.0%) good"));
        assert!(text.contains("- 05/02/2025 | 21/30 | focus: Footwork"));
    }
}
