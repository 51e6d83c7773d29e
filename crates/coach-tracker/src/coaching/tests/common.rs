use std::sync::Arc;

use chrono::NaiveDate;

use crate::coaching::domain::{
    Assessment, AssessmentId, Athlete, AthleteId, DevelopmentPlan, MetricsDraft,
    PerformanceMetrics, ProgressRecord,
};
use crate::coaching::progress::{ThresholdTrendPolicy, TrendReading};
use crate::coaching::rating::validate_rating;
use crate::coaching::repository::KeyValueRepository;
use crate::coaching::service::{AssessmentDraft, AthleteDraft, CoachingService};
use crate::coaching::store::MemoryStore;

pub(super) type MemoryRepository = KeyValueRepository<MemoryStore>;

pub(super) fn memory_repository() -> Arc<MemoryRepository> {
    Arc::new(KeyValueRepository::new(MemoryStore::new()))
}

pub(super) fn service(repository: Arc<MemoryRepository>) -> CoachingService<MemoryRepository> {
    CoachingService::new(repository, Arc::new(ThresholdTrendPolicy::default()))
}

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn athlete_draft(name: &str) -> AthleteDraft {
    AthleteDraft {
        name: name.to_string(),
        sport: "Rugby".to_string(),
        position: "Fly-half".to_string(),
        age_grade: "U18".to_string(),
        season: "2025".to_string(),
        goals: "Lead the back line".to_string(),
        profile_image: None,
    }
}

pub(super) fn athlete(id: &str, name: &str) -> Athlete {
    Athlete {
        id: AthleteId(id.to_string()),
        name: name.to_string(),
        sport: "Netball".to_string(),
        position: "Goal Attack".to_string(),
        age_grade: "Senior".to_string(),
        season: "2025".to_string(),
        goals: String::new(),
        profile_image: None,
    }
}

/// Ratings in stored field order, technical skills through coachability.
pub(super) fn metrics_draft(values: [i64; 6]) -> MetricsDraft {
    MetricsDraft {
        technical_skills: Some(values[0]),
        tactical_awareness: Some(values[1]),
        physical_fitness: Some(values[2]),
        mental_fortitude: Some(values[3]),
        teamwork: Some(values[4]),
        coachability: Some(values[5]),
    }
}

pub(super) fn metrics(values: [i64; 6]) -> PerformanceMetrics {
    metrics_draft(values).validate().expect("valid metrics")
}

pub(super) fn uniform(value: i64) -> PerformanceMetrics {
    PerformanceMetrics::uniform(validate_rating(value).expect("valid rating"))
}

pub(super) fn plan(focus: &str) -> DevelopmentPlan {
    DevelopmentPlan {
        strengths: vec!["Kicking game".to_string()],
        areas_for_improvement: vec![focus.to_string()],
        ..DevelopmentPlan::default()
    }
}

pub(super) fn assessment_draft(
    athlete_id: &AthleteId,
    when: NaiveDate,
    values: [i64; 6],
    focus: &str,
) -> AssessmentDraft {
    AssessmentDraft {
        athlete_id: athlete_id.clone(),
        date: when,
        metrics: metrics_draft(values),
        development_plan: plan(focus),
        notes: String::new(),
        technical_skills: Vec::new(),
        self_assessment: None,
    }
}

/// A stored assessment with a single-entry history, as the repository tests need no scoring.
pub(super) fn stored_assessment(
    id: &str,
    athlete_id: &str,
    when: NaiveDate,
    metrics: PerformanceMetrics,
) -> Assessment {
    let mut assessment = Assessment {
        id: AssessmentId(id.to_string()),
        athlete_id: AthleteId(athlete_id.to_string()),
        date: when,
        performance_metrics: metrics,
        development_plan: DevelopmentPlan::default(),
        progress: ProgressRecord {
            history: Vec::new(),
            trend: TrendReading::InsufficientData,
            notes: String::new(),
        },
        technical_skills: Vec::new(),
        self_assessment: None,
        competitions: Vec::new(),
    };
    assessment.progress.history = vec![assessment.progress_entry()];
    assessment
}
