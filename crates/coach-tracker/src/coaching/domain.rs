use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::progress::{ProgressEntry, TrendReading};
use super::rating::{validate_rating, Rating};
use super::scoring::{compute_overall_score, MetricsError};

/// Identifier wrapper for registered athletes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AthleteId(pub String);

/// Identifier wrapper for saved assessments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for logged competitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitionId(pub String);

impl fmt::Display for AthleteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster entry for a coached athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: AthleteId,
    pub name: String,
    pub sport: String,
    pub position: String,
    pub age_grade: String,
    pub season: String,
    pub goals: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// The six rated performance dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    TechnicalSkills,
    TacticalAwareness,
    PhysicalFitness,
    MentalFortitude,
    Teamwork,
    Coachability,
}

impl MetricKind {
    pub const fn ordered() -> [MetricKind; 6] {
        [
            MetricKind::TechnicalSkills,
            MetricKind::TacticalAwareness,
            MetricKind::PhysicalFitness,
            MetricKind::MentalFortitude,
            MetricKind::Teamwork,
            MetricKind::Coachability,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            MetricKind::TechnicalSkills => "Technical Skills",
            MetricKind::TacticalAwareness => "Tactical Awareness",
            MetricKind::PhysicalFitness => "Physical Fitness",
            MetricKind::MentalFortitude => "Mental Fortitude",
            MetricKind::Teamwork => "Teamwork",
            MetricKind::Coachability => "Coachability",
        }
    }

    /// Field name used in stored records.
    pub const fn key(self) -> &'static str {
        match self {
            MetricKind::TechnicalSkills => "technicalSkills",
            MetricKind::TacticalAwareness => "tacticalAwareness",
            MetricKind::PhysicalFitness => "physicalFitness",
            MetricKind::MentalFortitude => "mentalFortitude",
            MetricKind::Teamwork => "teamwork",
            MetricKind::Coachability => "coachability",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A complete, validated set of the six metric ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub technical_skills: Rating,
    pub tactical_awareness: Rating,
    pub physical_fitness: Rating,
    pub mental_fortitude: Rating,
    pub teamwork: Rating,
    pub coachability: Rating,
}

impl PerformanceMetrics {
    pub fn get(&self, kind: MetricKind) -> Rating {
        match kind {
            MetricKind::TechnicalSkills => self.technical_skills,
            MetricKind::TacticalAwareness => self.tactical_awareness,
            MetricKind::PhysicalFitness => self.physical_fitness,
            MetricKind::MentalFortitude => self.mental_fortitude,
            MetricKind::Teamwork => self.teamwork,
            MetricKind::Coachability => self.coachability,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, Rating)> + '_ {
        MetricKind::ordered()
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    /// The same rating for every metric. Handy for quick assessments and fixtures.
    pub fn uniform(rating: Rating) -> Self {
        Self {
            technical_skills: rating,
            tactical_awareness: rating,
            physical_fitness: rating,
            mental_fortitude: rating,
            teamwork: rating,
            coachability: rating,
        }
    }
}

/// Unvalidated metric input as collected by a form or command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsDraft {
    pub technical_skills: Option<i64>,
    pub tactical_awareness: Option<i64>,
    pub physical_fitness: Option<i64>,
    pub mental_fortitude: Option<i64>,
    pub teamwork: Option<i64>,
    pub coachability: Option<i64>,
}

impl MetricsDraft {
    pub fn get(&self, kind: MetricKind) -> Option<i64> {
        match kind {
            MetricKind::TechnicalSkills => self.technical_skills,
            MetricKind::TacticalAwareness => self.tactical_awareness,
            MetricKind::PhysicalFitness => self.physical_fitness,
            MetricKind::MentalFortitude => self.mental_fortitude,
            MetricKind::Teamwork => self.teamwork,
            MetricKind::Coachability => self.coachability,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: i64) {
        let slot = match kind {
            MetricKind::TechnicalSkills => &mut self.technical_skills,
            MetricKind::TacticalAwareness => &mut self.tactical_awareness,
            MetricKind::PhysicalFitness => &mut self.physical_fitness,
            MetricKind::MentalFortitude => &mut self.mental_fortitude,
            MetricKind::Teamwork => &mut self.teamwork,
            MetricKind::Coachability => &mut self.coachability,
        };
        *slot = Some(value);
    }

    /// Turns the draft into ratings. Missing metrics are reported before range errors so the
    /// caller sees every empty field at once; no missing field is ever defaulted.
    pub fn validate(&self) -> Result<PerformanceMetrics, MetricsError> {
        let missing: Vec<MetricKind> = MetricKind::ordered()
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(MetricsError::Incomplete { missing });
        }

        let rating = |kind: MetricKind| -> Result<Rating, MetricsError> {
            let raw = self.get(kind).unwrap_or_default();
            validate_rating(raw).map_err(|source| MetricsError::InvalidRating {
                metric: kind,
                source,
            })
        };

        Ok(PerformanceMetrics {
            technical_skills: rating(MetricKind::TechnicalSkills)?,
            tactical_awareness: rating(MetricKind::TacticalAwareness)?,
            physical_fitness: rating(MetricKind::PhysicalFitness)?,
            mental_fortitude: rating(MetricKind::MentalFortitude)?,
            teamwork: rating(MetricKind::Teamwork)?,
            coachability: rating(MetricKind::Coachability)?,
        })
    }
}

impl From<PerformanceMetrics> for MetricsDraft {
    fn from(metrics: PerformanceMetrics) -> Self {
        let mut draft = MetricsDraft::default();
        for (kind, rating) in metrics.iter() {
            draft.set(kind, i64::from(rating.value()));
        }
        draft
    }
}

/// Free-text development buckets captured alongside the ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevelopmentPlan {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub short_term_goals: Vec<String>,
    pub medium_term_goals: Vec<String>,
    pub long_term_goals: Vec<String>,
    pub recommended_drills: Vec<String>,
}

impl DevelopmentPlan {
    /// The headline focus recorded in progress history: the first non-blank area for
    /// improvement, trimmed. Blank leading entries are skipped.
    pub fn key_focus(&self) -> String {
        self.areas_for_improvement
            .iter()
            .map(|area| area.trim())
            .find(|area| !area.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSkill {
    pub name: String,
    pub rating: Rating,
    #[serde(default)]
    pub notes: String,
}

/// Athlete-authored reflection attached to an assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelfAssessment {
    pub what_went_well: String,
    pub challenges: String,
    pub preparation_effectiveness: String,
    pub skill_focus: String,
    pub coach_support_needed: String,
}

/// Point-in-time progress snapshot stored with an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub history: Vec<ProgressEntry>,
    pub trend: TrendReading,
    #[serde(default)]
    pub notes: String,
}

/// A saved assessment. Updates replace the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: AssessmentId,
    pub athlete_id: AthleteId,
    pub date: NaiveDate,
    pub performance_metrics: PerformanceMetrics,
    #[serde(default)]
    pub development_plan: DevelopmentPlan,
    pub progress: ProgressRecord,
    #[serde(default)]
    pub technical_skills: Vec<TechnicalSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_assessment: Option<SelfAssessment>,
    /// Competition entries the browser client nests in an assessment. Kept opaque and written
    /// back unchanged; competitions logged here live in their own collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitions: Vec<serde_json::Value>,
}

impl Assessment {
    /// This assessment's own entry, recomputed from its metrics rather than read from history.
    pub fn progress_entry(&self) -> ProgressEntry {
        ProgressEntry {
            date: self.date,
            overall_score: compute_overall_score(&self.performance_metrics),
            key_focus: self.development_plan.key_focus(),
        }
    }
}

/// Competition log entry with the three game-day ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
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
    pub mental_readiness: Rating,
    pub execution_of_game_plan: Rating,
    pub adaptability: Rating,
    #[serde(default)]
    pub additional_observations: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(areas: &[&str]) -> DevelopmentPlan {
        DevelopmentPlan {
            areas_for_improvement: areas.iter().map(|area| area.to_string()).collect(),
            ..DevelopmentPlan::default()
        }
    }

    #[test]
    fn key_focus_is_the_first_non_blank_area() {
        assert_eq!(plan(&["  Scanning ", "Passing"]).key_focus(), "Scanning");
        assert_eq!(plan(&["", "   ", "Passing"]).key_focus(), "Passing");
        assert_eq!(plan(&["  "]).key_focus(), "");
        assert_eq!(plan(&[]).key_focus(), "");
    }
}
