use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{MetricKind, PerformanceMetrics};
use super::rating::InvalidRatingError;

/// Sum of the six metric ratings, always within `6..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct OverallScore(u8);

impl OverallScore {
    pub const MIN: u8 = 6;
    pub const MAX: u8 = 30;

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> ScoreBand {
        score_band(self)
    }

    pub fn percentage(self) -> f64 {
        score_percentage(self)
    }
}

impl TryFrom<i64> for OverallScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<OverallScore> for u8 {
    fn from(value: OverallScore) -> Self {
        value.0
    }
}

impl fmt::Display for OverallScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A stored score snapshot that cannot have come from six valid ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("overall score {0} is outside 6..=30")]
pub struct ScoreOutOfRange(pub i64);

/// Errors raised while turning metric input into a scorable set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("{metric}: {source}")]
    InvalidRating {
        metric: MetricKind,
        #[source]
        source: InvalidRatingError,
    },
    #[error("incomplete metrics: missing {}", format_missing(.missing))]
    Incomplete { missing: Vec<MetricKind> },
}

fn format_missing(missing: &[MetricKind]) -> String {
    missing
        .iter()
        .map(|kind| kind.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Qualitative band for an overall score. Distinct from the per-rating labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Good,
    Fair,
    Low,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Low => "low",
        }
    }

    /// Theme palette slot used for score chips.
    pub const fn color_token(self) -> &'static str {
        match self {
            ScoreBand::High => "success.main",
            ScoreBand::Good => "info.main",
            ScoreBand::Fair => "warning.main",
            ScoreBand::Low => "error.main",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const HIGH_THRESHOLD: f64 = 80.0;
const GOOD_THRESHOLD: f64 = 60.0;
const FAIR_THRESHOLD: f64 = 40.0;

pub fn compute_overall_score(metrics: &PerformanceMetrics) -> OverallScore {
    let total: u8 = metrics.iter().map(|(_, rating)| rating.value()).sum();
    OverallScore(total)
}

/// Lower band edges are inclusive: 24 is high, 18 good, 12 fair.
pub fn score_band(score: OverallScore) -> ScoreBand {
    // Compare in integer space so 24/30 lands exactly on 80%.
    let scaled = u32::from(score.value()) * 100;
    let max = u32::from(OverallScore::MAX);
    if scaled >= HIGH_THRESHOLD as u32 * max {
        ScoreBand::High
    } else if scaled >= GOOD_THRESHOLD as u32 * max {
        ScoreBand::Good
    } else if scaled >= FAIR_THRESHOLD as u32 * max {
        ScoreBand::Fair
    } else {
        ScoreBand::Low
    }
}

pub fn score_percentage(score: OverallScore) -> f64 {
    f64::from(score.value()) / f64::from(OverallScore::MAX) * 100.0
}
