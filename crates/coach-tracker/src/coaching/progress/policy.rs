use super::config::TrendPolicyConfig;
use super::{PerformanceTrend, ProgressEntry, TrendReading};

/// Strategy that turns a date-ordered history into a trend reading.
pub trait TrendPolicy: Send + Sync {
    fn classify(&self, history: &[ProgressEntry]) -> TrendReading;
}

/// Default policy: compare the latest score with the mean of a trailing window of priors.
///
/// Checks run in order and the first match wins:
/// breakthrough, inconsistent, improving, declining, then plateaued.
/// Fewer than two entries yield [`TrendReading::InsufficientData`].
#[derive(Debug, Clone, Default)]
pub struct ThresholdTrendPolicy {
    config: TrendPolicyConfig,
}

impl ThresholdTrendPolicy {
    pub fn new(config: TrendPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendPolicyConfig {
        &self.config
    }

    fn is_breakthrough(&self, latest: i32, priors: &[ProgressEntry]) -> bool {
        priors
            .iter()
            .map(score_of)
            .max()
            .map(|best| latest - best >= i32::from(self.config.breakthrough_margin))
            .unwrap_or(false)
    }

    fn is_inconsistent(&self, history: &[ProgressEntry]) -> bool {
        let transitions = self.config.inconsistency_transitions;
        if transitions < 2 || history.len() <= transitions {
            return false;
        }

        let tail = &history[history.len() - (transitions + 1)..];
        let deltas: Vec<i32> = tail
            .windows(2)
            .map(|pair| score_of(&pair[1]) - score_of(&pair[0]))
            .collect();

        deltas.iter().all(|delta| *delta != 0)
            && deltas
                .windows(2)
                .all(|pair| pair[0].signum() != pair[1].signum())
    }

    fn window_mean(&self, priors: &[ProgressEntry]) -> f64 {
        let window = self.config.window.max(1);
        let recent = &priors[priors.len().saturating_sub(window)..];
        let total: i32 = recent.iter().map(score_of).sum();
        f64::from(total) / recent.len() as f64
    }
}

impl TrendPolicy for ThresholdTrendPolicy {
    fn classify(&self, history: &[ProgressEntry]) -> TrendReading {
        let Some((latest, priors)) = history.split_last() else {
            return TrendReading::InsufficientData;
        };
        if priors.is_empty() {
            return TrendReading::InsufficientData;
        }

        let latest_score = score_of(latest);

        let trend = if self.is_breakthrough(latest_score, priors) {
            PerformanceTrend::Breakthrough
        } else if self.is_inconsistent(history) {
            PerformanceTrend::Inconsistent
        } else {
            let delta = f64::from(latest_score) - self.window_mean(priors);
            if delta >= self.config.improvement_delta {
                PerformanceTrend::Improving
            } else if delta <= -self.config.decline_delta {
                PerformanceTrend::Declining
            } else {
                PerformanceTrend::Plateaued
            }
        };

        TrendReading::Classified(trend)
    }
}

fn score_of(entry: &ProgressEntry) -> i32 {
    i32::from(entry.overall_score.value())
}
