use crate::coaching::{CoachingServiceError, RepositoryError, StoreError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Storage(StoreError),
    Coaching(CoachingServiceError),
    Output(serde_json::Error),
}

impl AppError {
    /// Process exit status: 2 for rejected input, 3 for missing records, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Coaching(
                CoachingServiceError::Metrics(_)
                | CoachingServiceError::InvalidRating { .. }
                | CoachingServiceError::MissingField(_),
            ) => 2,
            AppError::Coaching(
                CoachingServiceError::AthleteNotFound(_)
                | CoachingServiceError::AssessmentNotFound(_)
                | CoachingServiceError::CompetitionNotFound(_),
            ) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Coaching(err) => write!(f, "{}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Coaching(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<CoachingServiceError> for AppError {
    fn from(value: CoachingServiceError) -> Self {
        Self::Coaching(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Coaching(CoachingServiceError::Repository(value))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
