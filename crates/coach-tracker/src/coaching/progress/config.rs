use serde::{Deserialize, Serialize};

/// Thresholds for [`super::ThresholdTrendPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPolicyConfig {
    /// Number of prior entries averaged against the latest score.
    pub window: usize,
    pub improvement_delta: f64,
    pub decline_delta: f64,
    /// Minimum lead over every prior score for a breakthrough.
    pub breakthrough_margin: u8,
    /// Trailing score changes that must alternate direction to count as inconsistent.
    pub inconsistency_transitions: usize,
}

impl Default for TrendPolicyConfig {
    fn default() -> Self {
        Self {
            window: 3,
            improvement_delta: 2.0,
            decline_delta: 2.0,
            breakthrough_margin: 5,
            inconsistency_transitions: 3,
        }
    }
}
