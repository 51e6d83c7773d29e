use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use coach_tracker::coaching::{
    AssessmentDraft, AthleteDraft, CoachingRepository, CoachingService, CompetitionDraft,
    DashboardSummary, DevelopmentPlan, MetricsDraft, PerformanceOverview,
};
use coach_tracker::config::AppConfig;
use coach_tracker::error::AppError;
use serde::Serialize;
use tracing::info;

use crate::infra::memory_service;
use crate::render;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First assessment date (YYYY-MM-DD). Defaults to twelve weeks before today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) season_start: Option<NaiveDate>,
    /// Number of recent assessments in the dashboard section
    #[arg(long, default_value_t = 5)]
    pub(crate) recent: usize,
}

struct ScriptedAthlete {
    name: &'static str,
    sport: &'static str,
    position: &'static str,
    /// One rating set per fortnightly session, with that session's focus area.
    sessions: &'static [([i64; 6], &'static str)],
}

const ROSTER: &[ScriptedAthlete] = &[
    ScriptedAthlete {
        name: "Aroha Ngata",
        sport: "Rugby",
        position: "First five",
        sessions: &[
            ([2, 3, 3, 2, 3, 3], "Kicking under pressure"),
            ([3, 3, 3, 3, 3, 3], "Kicking under pressure"),
            ([3, 3, 4, 3, 3, 3], "Defensive reads"),
            ([4, 3, 4, 4, 3, 4], "Defensive reads"),
        ],
    },
    ScriptedAthlete {
        name: "Liam Chen",
        sport: "Basketball",
        position: "Point guard",
        sessions: &[
            ([4, 4, 3, 3, 4, 4], "Weak-hand finishing"),
            ([3, 3, 3, 2, 3, 3], "Composure"),
            ([4, 4, 4, 3, 4, 4], "Composure"),
            ([3, 3, 3, 2, 3, 3], "Composure"),
        ],
    },
    ScriptedAthlete {
        name: "Priya Raman",
        sport: "Football",
        position: "Winger",
        sessions: &[
            ([2, 2, 3, 2, 3, 3], "Crossing"),
            ([3, 2, 3, 2, 3, 3], "Crossing"),
            ([3, 3, 3, 3, 3, 3], "Tracking back"),
            ([5, 4, 4, 4, 4, 5], "Leadership"),
        ],
    },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DemoReport {
    pub(crate) overviews: Vec<PerformanceOverview>,
    pub(crate) dashboard: DashboardSummary,
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs, json: bool) -> Result<(), AppError> {
    let season_start = args
        .season_start
        .unwrap_or_else(|| Local::now().date_naive() - Duration::weeks(12));
    let service = memory_service(config);
    let report = play_season(&service, season_start, args.recent)?;

    if json {
        println!("{}", render::json(&report)?);
        return Ok(());
    }

    println!("Coaching season demo (in-memory store)");
    println!("Season start: {}", season_start);
    for overview in &report.overviews {
        println!("\n{}", render::overview(overview));
    }
    println!("\n{}", render::dashboard(&report.dashboard));
    Ok(())
}

/// Registers the scripted roster, records every session and logs one competition per athlete.
pub(crate) fn play_season<R>(
    service: &CoachingService<R>,
    season_start: NaiveDate,
    recent: usize,
) -> Result<DemoReport, AppError>
where
    R: CoachingRepository + 'static,
{
    let mut overviews = Vec::with_capacity(ROSTER.len());

    for scripted in ROSTER {
        let athlete = service.register_athlete(AthleteDraft {
            name: scripted.name.to_string(),
            sport: scripted.sport.to_string(),
            position: scripted.position.to_string(),
            season: season_start.format("%Y").to_string(),
            ..AthleteDraft::default()
        })?;

        for (index, (ratings, focus)) in scripted.sessions.iter().enumerate() {
            let date = season_start + Duration::weeks(2 * index as i64);
            service.record_assessment(AssessmentDraft {
                athlete_id: athlete.id.clone(),
                date,
                metrics: MetricsDraft {
                    technical_skills: Some(ratings[0]),
                    tactical_awareness: Some(ratings[1]),
                    physical_fitness: Some(ratings[2]),
                    mental_fortitude: Some(ratings[3]),
                    teamwork: Some(ratings[4]),
                    coachability: Some(ratings[5]),
                },
                development_plan: DevelopmentPlan {
                    areas_for_improvement: vec![focus.to_string()],
                    ..DevelopmentPlan::default()
                },
                notes: String::new(),
                technical_skills: Vec::new(),
                self_assessment: None,
            })?;
        }

        service.record_competition(CompetitionDraft {
            athlete_id: athlete.id.clone(),
            date: season_start + Duration::weeks(7),
            opponent: "Harbour Districts".to_string(),
            result: "W 3-1".to_string(),
            playing_time: "60 min".to_string(),
            pre_competition_goals: vec!["Win the first contest".to_string()],
            key_statistics: Vec::new(),
            highlight_moments: Vec::new(),
            challenge_areas: Vec::new(),
            mental_readiness: 4,
            execution_of_game_plan: 3,
            adaptability: 4,
            additional_observations: String::new(),
        })?;

        let overview = service.performance_overview(&athlete.id)?;
        info!(athlete = scripted.name, trend = %overview.trend, "demo athlete scripted");
        overviews.push(overview);
    }

    Ok(DemoReport {
        overviews,
        dashboard: service.dashboard(recent)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_tracker::coaching::{
        KeyValueRepository, MemoryStore, PerformanceTrend, ThresholdTrendPolicy, TrendPolicyConfig,
        TrendReading,
    };
    use std::sync::Arc;

    #[test]
    fn scripted_season_covers_distinct_trends() {
        let service = CoachingService::new(
            Arc::new(KeyValueRepository::new(MemoryStore::new())),
            Arc::new(ThresholdTrendPolicy::new(TrendPolicyConfig::default())),
        );
        let start = NaiveDate::from_ymd_opt(2025, 2, 3).expect("valid date");
        let report = play_season(&service, start, 5).expect("season plays");

        let trends: Vec<TrendReading> = report.overviews.iter().map(|o| o.trend).collect();
        assert_eq!(
            trends,
            vec![
                TrendReading::Classified(PerformanceTrend::Improving),
                TrendReading::Classified(PerformanceTrend::Inconsistent),
                TrendReading::Classified(PerformanceTrend::Breakthrough),
            ]
        );
        assert_eq!(report.dashboard.athlete_count, 3);
        assert_eq!(report.dashboard.assessment_count, 12);
        assert_eq!(report.dashboard.recent_assessments.len(), 5);
        assert_eq!(
            service.repository().list_competitions().expect("list").len(),
            3
        );
    }
}
