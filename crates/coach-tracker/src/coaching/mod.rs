//! Athlete assessment scoring, progress history and trend classification.
//!
//! The rating, scoring and progress modules are pure functions over explicit inputs. Storage is
//! reached only through [`CoachingRepository`], which the [`CoachingService`] receives as a handle.

pub mod dashboard;
pub mod domain;
pub mod progress;
pub mod rating;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use dashboard::{
    filter_assessments, format_display_date, join_assessments, recent_assessments,
    search_athletes, AssessmentFilter, AssessmentWithAthleteName, DashboardSummary,
};
pub use domain::{
    Assessment, AssessmentId, Athlete, AthleteId, Competition, CompetitionId, DevelopmentPlan,
    MetricKind, MetricsDraft, PerformanceMetrics, ProgressRecord, SelfAssessment, TechnicalSkill,
};
pub use progress::{
    append_progress_entry, classify_trend, PerformanceTrend, ProgressEntry, ThresholdTrendPolicy,
    TrendPolicy, TrendPolicyConfig, TrendReading,
};
pub use rating::{
    rating_color, rating_label, validate_rating, validate_rating_value, ColorToken,
    InvalidRatingError, Rating,
};
pub use repository::{
    CascadeSummary, CoachingRepository, KeyValueRepository, RepositoryError, ResetSummary,
};
pub use scoring::{
    compute_overall_score, score_band, score_percentage, MetricsError, OverallScore, ScoreBand,
};
pub use service::{
    AssessmentDraft, AthleteDraft, CoachingService, CoachingServiceError, CompetitionDraft,
    PerformanceOverview,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
