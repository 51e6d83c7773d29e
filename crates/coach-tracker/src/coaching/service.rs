use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::dashboard::DashboardSummary;
use super::domain::{
    Assessment, AssessmentId, Athlete, AthleteId, Competition, CompetitionId, DevelopmentPlan,
    MetricsDraft, ProgressRecord, SelfAssessment, TechnicalSkill,
};
use super::progress::{append_progress_entry, ProgressEntry, TrendPolicy, TrendReading};
use super::rating::{validate_rating, InvalidRatingError, Rating};
use super::repository::{CascadeSummary, CoachingRepository, RepositoryError, ResetSummary};
use super::scoring::{compute_overall_score, MetricsError, OverallScore, ScoreBand};

/// Roster fields supplied when registering an athlete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AthleteDraft {
    pub name: String,
    pub sport: String,
    pub position: String,
    pub age_grade: String,
    pub season: String,
    pub goals: String,
    pub profile_image: Option<String>,
}

/// Everything a coach enters in the assessment flow, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDraft {
    pub athlete_id: AthleteId,
    pub date: NaiveDate,
    pub metrics: MetricsDraft,
    #[serde(default)]
    pub development_plan: DevelopmentPlan,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub technical_skills: Vec<TechnicalSkill>,
    #[serde(default)]
    pub self_assessment: Option<SelfAssessment>,
}

/// Competition log input; the three game-day ratings are raw until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDraft {
    pub athlete_id: AthleteId,
    pub date: NaiveDate,
    pub opponent: String,
    pub result: String,
    #[serde(default)]
    pub playing_time: String,
    #[serde(default)]
    pub pre_competition_goals: Vec<String>,
    #[serde(default)]
    pub key_statistics: Vec<String>,
    #[serde(default)]
    pub highlight_moments: Vec<String>,
    #[serde(default)]
    pub challenge_areas: Vec<String>,
    pub mental_readiness: i64,
    pub execution_of_game_plan: i64,
    pub adaptability: i64,
    #[serde(default)]
    pub additional_observations: String,
}

/// Athlete performance page: latest score, full history and the current trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceOverview {
    pub athlete: Athlete,
    pub assessment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_assessment: Option<AssessmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_score: Option<OverallScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_band: Option<ScoreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_percentage: Option<f64>,
    pub history: Vec<ProgressEntry>,
    pub trend: TrendReading,
}

/// Service composing the repository handle and the trend policy.
pub struct CoachingService<R> {
    repository: Arc<R>,
    policy: Arc<dyn TrendPolicy>,
}

impl<R> CoachingService<R>
where
    R: CoachingRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: Arc<dyn TrendPolicy>) -> Self {
        Self { repository, policy }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn register_athlete(&self, draft: AthleteDraft) -> Result<Athlete, CoachingServiceError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(CoachingServiceError::MissingField("name"));
        }

        let athlete = Athlete {
            id: AthleteId(next_id()),
            name: name.to_string(),
            sport: draft.sport.trim().to_string(),
            position: draft.position.trim().to_string(),
            age_grade: draft.age_grade.trim().to_string(),
            season: draft.season.trim().to_string(),
            goals: draft.goals,
            profile_image: draft.profile_image,
        };

        self.repository.save_athlete(athlete.clone())?;
        info!(athlete_id = %athlete.id, name = %athlete.name, "athlete registered");
        Ok(athlete)
    }

    pub fn update_athlete(&self, athlete: Athlete) -> Result<Athlete, CoachingServiceError> {
        self.require_athlete(&athlete.id)?;
        self.repository.save_athlete(athlete.clone())?;
        Ok(athlete)
    }

    pub fn delete_athlete(&self, id: &AthleteId) -> Result<CascadeSummary, CoachingServiceError> {
        self.repository.delete_athlete(id).map_err(|err| match err {
            RepositoryError::NotFound => CoachingServiceError::AthleteNotFound(id.clone()),
            other => other.into(),
        })
    }

    /// Validate, score and persist a new assessment.
    ///
    /// The stored progress history holds the athlete's entries dated on or before this
    /// assessment, ending with its own, and the trend is classified over that history. A
    /// backdated assessment therefore never sees scores recorded after its date.
    pub fn record_assessment(
        &self,
        draft: AssessmentDraft,
    ) -> Result<Assessment, CoachingServiceError> {
        let id = AssessmentId(next_id());
        let assessment = self.build_assessment(id, draft)?;
        self.repository.save_assessment(assessment.clone())?;

        info!(
            assessment_id = %assessment.id,
            athlete_id = %assessment.athlete_id,
            score = assessment.progress_entry().overall_score.value(),
            trend = %assessment.progress.trend,
            "assessment recorded"
        );
        Ok(assessment)
    }

    /// Replace an existing assessment with a fresh draft. Its history is rebuilt from the other
    /// assessments of the (possibly new) athlete; nested competition entries are carried over.
    pub fn revise_assessment(
        &self,
        id: &AssessmentId,
        draft: AssessmentDraft,
    ) -> Result<Assessment, CoachingServiceError> {
        let existing = self
            .repository
            .get_assessment(id)?
            .ok_or_else(|| CoachingServiceError::AssessmentNotFound(id.clone()))?;

        let mut assessment = self.build_assessment(id.clone(), draft)?;
        assessment.competitions = existing.competitions;
        self.repository.save_assessment(assessment.clone())?;
        info!(assessment_id = %id, "assessment revised");
        Ok(assessment)
    }

    pub fn delete_assessment(&self, id: &AssessmentId) -> Result<(), CoachingServiceError> {
        self.repository
            .delete_assessment(id)
            .map_err(|err| match err {
                RepositoryError::NotFound => CoachingServiceError::AssessmentNotFound(id.clone()),
                other => other.into(),
            })
    }

    /// Current standing for an athlete, recomputed from stored metrics.
    pub fn performance_overview(
        &self,
        athlete_id: &AthleteId,
    ) -> Result<PerformanceOverview, CoachingServiceError> {
        let athlete = self.require_athlete(athlete_id)?;
        let assessments = self.repository.get_assessments_for_athlete(athlete_id)?;

        let history = assessments.iter().fold(Vec::new(), |history, assessment| {
            append_progress_entry(&history, assessment.progress_entry())
        });
        let trend = self.policy.classify(&history);

        let latest = assessments.last();
        let latest_score =
            latest.map(|assessment| compute_overall_score(&assessment.performance_metrics));

        Ok(PerformanceOverview {
            athlete,
            assessment_count: assessments.len(),
            latest_assessment: latest.map(|assessment| assessment.id.clone()),
            latest_score,
            latest_band: latest_score.map(OverallScore::band),
            latest_percentage: latest_score.map(OverallScore::percentage),
            history,
            trend,
        })
    }

    pub fn record_competition(
        &self,
        draft: CompetitionDraft,
    ) -> Result<Competition, CoachingServiceError> {
        self.require_athlete(&draft.athlete_id)?;

        let rating = |field: &'static str, value: i64| -> Result<Rating, CoachingServiceError> {
            validate_rating(value)
                .map_err(|source| CoachingServiceError::InvalidRating { field, source })
        };

        let competition = Competition {
            id: CompetitionId(next_id()),
            mental_readiness: rating("mentalReadiness", draft.mental_readiness)?,
            execution_of_game_plan: rating("executionOfGamePlan", draft.execution_of_game_plan)?,
            adaptability: rating("adaptability", draft.adaptability)?,
            athlete_id: draft.athlete_id,
            date: draft.date,
            opponent: draft.opponent.trim().to_string(),
            result: draft.result.trim().to_string(),
            playing_time: draft.playing_time,
            pre_competition_goals: draft.pre_competition_goals,
            key_statistics: draft.key_statistics,
            highlight_moments: draft.highlight_moments,
            challenge_areas: draft.challenge_areas,
            additional_observations: draft.additional_observations,
        };

        self.repository.save_competition(competition.clone())?;
        info!(
            competition_id = %competition.id,
            athlete_id = %competition.athlete_id,
            "competition recorded"
        );
        Ok(competition)
    }

    pub fn delete_competition(&self, id: &CompetitionId) -> Result<(), CoachingServiceError> {
        self.repository
            .delete_competition(id)
            .map_err(|err| match err {
                RepositoryError::NotFound => CoachingServiceError::CompetitionNotFound(id.clone()),
                other => other.into(),
            })
    }

    pub fn dashboard(&self, recent_limit: usize) -> Result<DashboardSummary, CoachingServiceError> {
        let athletes = self.repository.list_athletes()?;
        let assessments = self.repository.list_assessments()?;
        Ok(DashboardSummary::build(&athletes, &assessments, recent_limit))
    }

    /// Removes every athlete, assessment and competition.
    pub fn reset(&self) -> Result<ResetSummary, CoachingServiceError> {
        Ok(self.repository.clear_all()?)
    }

    fn require_athlete(&self, id: &AthleteId) -> Result<Athlete, CoachingServiceError> {
        self.repository
            .get_athlete(id)?
            .ok_or_else(|| CoachingServiceError::AthleteNotFound(id.clone()))
    }

    fn build_assessment(
        &self,
        id: AssessmentId,
        draft: AssessmentDraft,
    ) -> Result<Assessment, CoachingServiceError> {
        // Metrics are validated before anything is scored or read from storage.
        let metrics = draft.metrics.validate().inspect_err(|err| {
            warn!(athlete_id = %draft.athlete_id, error = %err, "assessment rejected");
        })?;
        self.require_athlete(&draft.athlete_id)?;

        let entry = ProgressEntry {
            date: draft.date,
            overall_score: compute_overall_score(&metrics),
            key_focus: draft.development_plan.key_focus(),
        };

        let prior = self
            .repository
            .get_assessments_for_athlete(&draft.athlete_id)?
            .into_iter()
            .filter(|assessment| assessment.id != id)
            .fold(Vec::new(), |history, assessment| {
                append_progress_entry(&history, assessment.progress_entry())
            });
        // Snapshot as of the assessment date: later entries belong to later assessments.
        let cutoff = prior.partition_point(|existing| existing.date <= draft.date);
        let history = append_progress_entry(&prior[..cutoff], entry);
        let trend = self.policy.classify(&history);

        Ok(Assessment {
            id,
            athlete_id: draft.athlete_id,
            date: draft.date,
            performance_metrics: metrics,
            development_plan: draft.development_plan,
            progress: ProgressRecord {
                history,
                trend,
                notes: draft.notes,
            },
            technical_skills: draft.technical_skills,
            self_assessment: draft.self_assessment,
            competitions: Vec::new(),
        })
    }
}

fn next_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Error raised by the coaching service.
#[derive(Debug, thiserror::Error)]
pub enum CoachingServiceError {
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("{field}: {source}")]
    InvalidRating {
        field: &'static str,
        #[source]
        source: InvalidRatingError,
    },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("athlete '{0}' not found")]
    AthleteNotFound(AthleteId),
    #[error("assessment '{0}' not found")]
    AssessmentNotFound(AssessmentId),
    #[error("competition '{0}' not found")]
    CompetitionNotFound(CompetitionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
