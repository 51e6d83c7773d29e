mod config;
mod policy;

pub use config::TrendPolicyConfig;
pub use policy::{ThresholdTrendPolicy, TrendPolicy};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rating::ColorToken;
use super::scoring::OverallScore;

/// Immutable history point captured when an assessment is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub overall_score: OverallScore,
    #[serde(default)]
    pub key_focus: String,
}

/// Named direction of an athlete's recent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceTrend {
    Improving,
    Plateaued,
    Inconsistent,
    Declining,
    Breakthrough,
}

impl PerformanceTrend {
    pub const fn ordered() -> [PerformanceTrend; 5] {
        [
            PerformanceTrend::Improving,
            PerformanceTrend::Plateaued,
            PerformanceTrend::Inconsistent,
            PerformanceTrend::Declining,
            PerformanceTrend::Breakthrough,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PerformanceTrend::Improving => "improving",
            PerformanceTrend::Plateaued => "plateaued",
            PerformanceTrend::Inconsistent => "inconsistent",
            PerformanceTrend::Declining => "declining",
            PerformanceTrend::Breakthrough => "breakthrough",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            PerformanceTrend::Improving => "trending_up",
            PerformanceTrend::Plateaued => "trending_flat",
            PerformanceTrend::Inconsistent => "shuffle",
            PerformanceTrend::Declining => "trending_down",
            PerformanceTrend::Breakthrough => "star",
        }
    }

    pub const fn color(self) -> ColorToken {
        match self {
            PerformanceTrend::Improving => ColorToken::Green,
            PerformanceTrend::Plateaued => ColorToken::Yellow,
            PerformanceTrend::Inconsistent => ColorToken::Orange,
            PerformanceTrend::Declining => ColorToken::Red,
            PerformanceTrend::Breakthrough => ColorToken::Blue,
        }
    }
}

/// Result of trend classification. Too little history is a normal state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrendReading {
    InsufficientData,
    Classified(PerformanceTrend),
}

impl TrendReading {
    const INSUFFICIENT_DATA: &'static str = "insufficientData";

    pub const fn as_str(self) -> &'static str {
        match self {
            TrendReading::InsufficientData => Self::INSUFFICIENT_DATA,
            TrendReading::Classified(trend) => trend.as_str(),
        }
    }

    pub const fn trend(self) -> Option<PerformanceTrend> {
        match self {
            TrendReading::InsufficientData => None,
            TrendReading::Classified(trend) => Some(trend),
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            TrendReading::InsufficientData => "help",
            TrendReading::Classified(trend) => trend.icon(),
        }
    }

    pub const fn color(self) -> ColorToken {
        match self {
            TrendReading::InsufficientData => ColorToken::Grey,
            TrendReading::Classified(trend) => trend.color(),
        }
    }
}

impl fmt::Display for TrendReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendReading {
    type Err = UnknownTrend;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == Self::INSUFFICIENT_DATA {
            return Ok(TrendReading::InsufficientData);
        }
        PerformanceTrend::ordered()
            .into_iter()
            .find(|trend| trend.as_str() == raw)
            .map(TrendReading::Classified)
            .ok_or_else(|| UnknownTrend(raw.to_string()))
    }
}

impl TryFrom<String> for TrendReading {
    type Error = UnknownTrend;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TrendReading> for String {
    fn from(value: TrendReading) -> Self {
        value.as_str().to_string()
    }
}

impl From<PerformanceTrend> for TrendReading {
    fn from(value: PerformanceTrend) -> Self {
        TrendReading::Classified(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown performance trend '{0}'")]
pub struct UnknownTrend(pub String);

/// Inserts `entry` after every entry dated on or before it, keeping the history oldest first.
///
/// Entries saved in date order are simply appended. Entries sharing a date keep the order in
/// which they were added.
pub fn append_progress_entry(
    history: &[ProgressEntry],
    entry: ProgressEntry,
) -> Vec<ProgressEntry> {
    let position = history.partition_point(|existing| existing.date <= entry.date);
    let mut next = Vec::with_capacity(history.len() + 1);
    next.extend_from_slice(&history[..position]);
    next.push(entry);
    next.extend_from_slice(&history[position..]);
    next
}

/// Classifies with the default thresholds. Use a [`TrendPolicy`] directly to tune them.
pub fn classify_trend(history: &[ProgressEntry]) -> TrendReading {
    ThresholdTrendPolicy::default().classify(history)
}
