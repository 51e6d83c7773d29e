use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use coach_tracker::coaching::{
    CoachingService, FileStore, KeyValueRepository, MemoryStore, ThresholdTrendPolicy,
};
use coach_tracker::config::AppConfig;
use coach_tracker::error::AppError;
use tracing::debug;

pub(crate) type FileRepository = KeyValueRepository<FileStore>;
pub(crate) type MemoryRepository = KeyValueRepository<MemoryStore>;

pub(crate) fn file_service(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
) -> Result<CoachingService<FileRepository>, AppError> {
    let root = data_dir.unwrap_or_else(|| config.storage.data_dir.clone());
    let store = FileStore::open(&root)?;
    debug!(data_dir = %root.display(), "opened file store");
    let repository = Arc::new(KeyValueRepository::new(store));
    let policy = Arc::new(ThresholdTrendPolicy::new(config.trend.clone()));
    Ok(CoachingService::new(repository, policy))
}

pub(crate) fn memory_service(config: &AppConfig) -> CoachingService<MemoryRepository> {
    let repository = Arc::new(KeyValueRepository::new(MemoryStore::new()));
    let policy = Arc::new(ThresholdTrendPolicy::new(config.trend.clone()));
    CoachingService::new(repository, policy)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
