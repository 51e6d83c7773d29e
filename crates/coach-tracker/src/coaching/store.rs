use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

/// Opaque string key-value substrate the repository persists through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Writes several keys as one unit where the backend allows it.
    fn set_many(&self, entries: Vec<(&str, String)>) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage i/o failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Process-local store, used by tests and the CLI demo.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn set_many(&self, entries: Vec<(&str, String)>) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        for (key, value) in entries {
            guard.insert(key.to_string(), value);
        }
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory.
///
/// Values are written to a temporary sibling and renamed into place, so readers never observe a
/// partially written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    fn stage(&self, key: &str, value: &str) -> Result<(PathBuf, PathBuf), StoreError> {
        let target = self.path_for(key)?;
        let staged = target.with_extension("json.tmp");
        fs::write(&staged, value).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        Ok((staged, target))
    }

    fn commit(key: &str, staged: &Path, target: &Path) -> Result<(), StoreError> {
        fs::rename(staged, target).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn roll_back(&self, committed: &[(&str, PathBuf, Option<String>)]) {
        for (key, target, previous) in committed.iter().rev() {
            let restored = match previous {
                Some(value) => self
                    .stage(key, value)
                    .and_then(|(staged, target)| Self::commit(key, &staged, &target)),
                None => fs::remove_file(target).map_err(|source| StoreError::Io {
                    key: key.to_string(),
                    source,
                }),
            };
            match restored {
                Ok(()) => warn!(key = *key, "rolled back partial multi-key write"),
                Err(err) => error!(key = *key, error = %err, "failed to roll back key"),
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        read_value(key, &path)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let (staged, target) = self.stage(key, &value)?;
        if let Err(err) = Self::commit(key, &staged, &target) {
            discard_staged(&[(key, (staged, target))]);
            return Err(err);
        }
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    /// All-or-nothing across keys: every value is staged first, then committed one rename at a
    /// time. If any step fails, keys already committed get their previous contents back and
    /// leftover staged files are removed.
    fn set_many(&self, entries: Vec<(&str, String)>) -> Result<(), StoreError> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            match self.stage(key, value) {
                Ok(paths) => staged.push((*key, paths)),
                Err(err) => {
                    discard_staged(&staged);
                    return Err(err);
                }
            }
        }

        let mut committed: Vec<(&str, PathBuf, Option<String>)> =
            Vec::with_capacity(staged.len());
        for (index, (key, (staged_path, target))) in staged.iter().enumerate() {
            let outcome = read_value(key, target).and_then(|previous| {
                Self::commit(key, staged_path, target)?;
                Ok(previous)
            });
            match outcome {
                Ok(previous) => committed.push((*key, target.clone(), previous)),
                Err(err) => {
                    self.roll_back(&committed);
                    discard_staged(&staged[index..]);
                    return Err(err);
                }
            }
        }

        debug!(keys = entries.len(), "stored values");
        Ok(())
    }
}

/// Contents at `target`, or `None` when the key has never been written.
fn read_value(key: &str, target: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(target) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            key: key.to_string(),
            source,
        }),
    }
}

fn discard_staged(staged: &[(&str, (PathBuf, PathBuf))]) {
    for (key, (staged_path, _)) in staged {
        if let Err(err) = fs::remove_file(staged_path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(key = *key, error = %err, "failed to remove staged value");
            }
        }
    }
}
