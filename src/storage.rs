use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, warn};

use crate::error::AppError;

/// Client-local key-value storage backed by a single JSON file.
///
/// Every mutating call computes the new map, writes it to a temporary file
/// next to the target and renames it into place. The in-memory map only
/// changes after the rename succeeds, so a batch is either fully applied or
/// not applied at all.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!("opened local store at {} ({} keys)", path.display(), entries.len());
        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.set_all(&[(key, value)])
    }

    /// Writes every pair as one atomic batch.
    pub fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), AppError> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        for (key, value) in pairs {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    /// Removes every key as one atomic batch. Absent keys are ignored.
    pub fn remove_all(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut entries = self.lock();
        if keys.iter().all(|key| !entries.contains_key(*key)) {
            return Ok(());
        }
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // The map is only ever replaced wholesale, so a poisoned value is still consistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec_pretty(entries)?;
        let tmp = temp_path(path);
        if let Err(err) = fs::write(&tmp, payload).and_then(|_| fs::rename(&tmp, path)) {
            error!("failed to persist local store {}: {}", path.display(), err);
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("failed to parse local store {}: {}", path.display(), err);
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read local store {}: {}", path.display(), err);
            BTreeMap::new()
        }
    }
}
