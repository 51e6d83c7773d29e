use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{Assessment, AssessmentId, Athlete, AthleteId, Competition, CompetitionId};
use super::store::{KeyValueStore, StoreError};

/// Storage keys. The browser client writes the same three collections.
pub const ATHLETES_KEY: &str = "athletes";
pub const ASSESSMENTS_KEY: &str = "assessments";
pub const COMPETITIONS_KEY: &str = "competitions";

/// Explicit handle over the coaching collections.
///
/// `get_assessments_for_athlete` returns assessments oldest first. `save_*` inserts a new record
/// or replaces the stored record with the same id as a whole.
pub trait CoachingRepository: Send + Sync {
    fn list_athletes(&self) -> Result<Vec<Athlete>, RepositoryError>;
    fn get_athlete(&self, id: &AthleteId) -> Result<Option<Athlete>, RepositoryError>;
    fn save_athlete(&self, athlete: Athlete) -> Result<(), RepositoryError>;
    /// Removes the athlete together with every assessment and competition referencing it.
    fn delete_athlete(&self, id: &AthleteId) -> Result<CascadeSummary, RepositoryError>;

    fn list_assessments(&self) -> Result<Vec<Assessment>, RepositoryError>;
    fn get_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn get_assessments_for_athlete(
        &self,
        athlete_id: &AthleteId,
    ) -> Result<Vec<Assessment>, RepositoryError>;
    fn save_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    fn delete_assessment(&self, id: &AssessmentId) -> Result<(), RepositoryError>;

    fn list_competitions(&self) -> Result<Vec<Competition>, RepositoryError>;
    fn get_competitions_for_athlete(
        &self,
        athlete_id: &AthleteId,
    ) -> Result<Vec<Competition>, RepositoryError>;
    fn save_competition(&self, competition: Competition) -> Result<(), RepositoryError>;
    fn delete_competition(&self, id: &CompetitionId) -> Result<(), RepositoryError>;

    /// Empties all three collections in one write.
    fn clear_all(&self) -> Result<ResetSummary, RepositoryError>;
}

/// What a cascading athlete delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeSummary {
    pub assessments_removed: usize,
    pub competitions_removed: usize,
}

/// Record counts dropped by [`CoachingRepository::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub athletes_removed: usize,
    pub assessments_removed: usize,
    pub competitions_removed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("stored '{key}' collection is malformed: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{key}' collection: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// [`CoachingRepository`] persisted as three JSON arrays in a [`KeyValueStore`].
///
/// Every operation reads the collections it needs, and writes happen under a single lock so
/// concurrent callers on one handle cannot interleave a read-modify-write.
pub struct KeyValueRepository<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KeyValueRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, RepositoryError> {
        self.write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, RepositoryError> {
        match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|source| RepositoryError::Corrupt { key, source }),
            _ => Ok(Vec::new()),
        }
    }

    /// Entry count of a stored collection. A malformed collection counts as empty so that a
    /// reset can still clear it.
    fn count(&self, key: &'static str) -> Result<usize, RepositoryError> {
        match self.load::<serde_json::Value>(key) {
            Ok(entries) => Ok(entries.len()),
            Err(RepositoryError::Corrupt { source, .. }) => {
                warn!(key, error = %source, "clearing malformed collection");
                Ok(0)
            }
            Err(err) => Err(err),
        }
    }

    fn encode<T: Serialize>(key: &'static str, records: &[T]) -> Result<String, RepositoryError> {
        serde_json::to_string(records).map_err(|source| RepositoryError::Encode { key, source })
    }

    fn persist<T>(&self, key: &'static str, records: &[T]) -> Result<(), RepositoryError>
    where
        T: Serialize,
    {
        let encoded = Self::encode(key, records)?;
        self.store.set(key, encoded)?;
        Ok(())
    }

    fn upsert<T, F>(&self, key: &'static str, record: T, same_id: F) -> Result<(), RepositoryError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T, &T) -> bool,
    {
        let _guard = self.lock()?;
        let mut records: Vec<T> = self.load(key)?;
        match records.iter_mut().find(|existing| same_id(existing, &record)) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
        self.persist(key, &records)
    }

    fn remove<T, F>(&self, key: &'static str, matches: F) -> Result<(), RepositoryError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let _guard = self.lock()?;
        let mut records: Vec<T> = self.load(key)?;
        let before = records.len();
        records.retain(|record| !matches(record));
        if records.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.persist(key, &records)
    }
}

impl<S: KeyValueStore> CoachingRepository for KeyValueRepository<S> {
    fn list_athletes(&self) -> Result<Vec<Athlete>, RepositoryError> {
        self.load(ATHLETES_KEY)
    }

    fn get_athlete(&self, id: &AthleteId) -> Result<Option<Athlete>, RepositoryError> {
        let athletes: Vec<Athlete> = self.load(ATHLETES_KEY)?;
        Ok(athletes.into_iter().find(|athlete| &athlete.id == id))
    }

    fn save_athlete(&self, athlete: Athlete) -> Result<(), RepositoryError> {
        debug!(athlete_id = %athlete.id, "saving athlete");
        self.upsert(ATHLETES_KEY, athlete, |a: &Athlete, b| a.id == b.id)
    }

    fn delete_athlete(&self, id: &AthleteId) -> Result<CascadeSummary, RepositoryError> {
        let _guard = self.lock()?;
        let mut athletes: Vec<Athlete> = self.load(ATHLETES_KEY)?;
        let before = athletes.len();
        athletes.retain(|athlete| &athlete.id != id);
        if athletes.len() == before {
            return Err(RepositoryError::NotFound);
        }

        let mut assessments: Vec<Assessment> = self.load(ASSESSMENTS_KEY)?;
        let assessments_before = assessments.len();
        assessments.retain(|assessment| &assessment.athlete_id != id);

        let mut competitions: Vec<Competition> = self.load(COMPETITIONS_KEY)?;
        let competitions_before = competitions.len();
        competitions.retain(|competition| &competition.athlete_id != id);

        let summary = CascadeSummary {
            assessments_removed: assessments_before - assessments.len(),
            competitions_removed: competitions_before - competitions.len(),
        };

        self.store.set_many(vec![
            (ASSESSMENTS_KEY, Self::encode(ASSESSMENTS_KEY, &assessments)?),
            (COMPETITIONS_KEY, Self::encode(COMPETITIONS_KEY, &competitions)?),
            (ATHLETES_KEY, Self::encode(ATHLETES_KEY, &athletes)?),
        ])?;

        info!(
            athlete_id = %id,
            assessments_removed = summary.assessments_removed,
            competitions_removed = summary.competitions_removed,
            "athlete deleted"
        );
        Ok(summary)
    }

    fn list_assessments(&self) -> Result<Vec<Assessment>, RepositoryError> {
        self.load(ASSESSMENTS_KEY)
    }

    fn get_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let assessments: Vec<Assessment> = self.load(ASSESSMENTS_KEY)?;
        Ok(assessments.into_iter().find(|assessment| &assessment.id == id))
    }

    fn get_assessments_for_athlete(
        &self,
        athlete_id: &AthleteId,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let mut assessments: Vec<Assessment> = self
            .load::<Assessment>(ASSESSMENTS_KEY)?
            .into_iter()
            .filter(|assessment| &assessment.athlete_id == athlete_id)
            .collect();
        // Stable sort keeps insertion order for assessments on the same day.
        assessments.sort_by_key(|assessment| assessment.date);
        Ok(assessments)
    }

    fn save_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        debug!(
            assessment_id = %assessment.id,
            athlete_id = %assessment.athlete_id,
            "saving assessment"
        );
        self.upsert(ASSESSMENTS_KEY, assessment, |a: &Assessment, b| a.id == b.id)
    }

    fn delete_assessment(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        self.remove(ASSESSMENTS_KEY, |assessment: &Assessment| &assessment.id == id)
    }

    fn list_competitions(&self) -> Result<Vec<Competition>, RepositoryError> {
        self.load(COMPETITIONS_KEY)
    }

    fn get_competitions_for_athlete(
        &self,
        athlete_id: &AthleteId,
    ) -> Result<Vec<Competition>, RepositoryError> {
        let mut competitions: Vec<Competition> = self
            .load::<Competition>(COMPETITIONS_KEY)?
            .into_iter()
            .filter(|competition| &competition.athlete_id == athlete_id)
            .collect();
        competitions.sort_by_key(|competition| competition.date);
        Ok(competitions)
    }

    fn save_competition(&self, competition: Competition) -> Result<(), RepositoryError> {
        self.upsert(COMPETITIONS_KEY, competition, |a: &Competition, b| a.id == b.id)
    }

    fn delete_competition(&self, id: &CompetitionId) -> Result<(), RepositoryError> {
        self.remove(COMPETITIONS_KEY, |competition: &Competition| &competition.id == id)
    }

    fn clear_all(&self) -> Result<ResetSummary, RepositoryError> {
        let _guard = self.lock()?;
        let summary = ResetSummary {
            athletes_removed: self.count(ATHLETES_KEY)?,
            assessments_removed: self.count(ASSESSMENTS_KEY)?,
            competitions_removed: self.count(COMPETITIONS_KEY)?,
        };

        let empty = || Self::encode::<Athlete>(ATHLETES_KEY, &[]);
        self.store.set_many(vec![
            (ASSESSMENTS_KEY, empty()?),
            (COMPETITIONS_KEY, empty()?),
            (ATHLETES_KEY, empty()?),
        ])?;

        info!(
            athletes_removed = summary.athletes_removed,
            assessments_removed = summary.assessments_removed,
            competitions_removed = summary.competitions_removed,
            "all coaching data cleared"
        );
        Ok(summary)
    }
}
