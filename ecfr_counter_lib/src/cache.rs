//! Amendment-date cache backed by `DashMap` for concurrent access.
//!
//! Maps `"{title}-{chapter}"` to the amendment date that was last counted.
//! Workers read any key and write only the key of the unit they just
//! recounted, so writes never contend on the same entry within a run. If the
//! agency snapshot lists the same title/chapter twice, the last worker to
//! finish wins.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::Path;

use dashmap::DashMap;

use crate::error::CounterError;

/// Thread-safe map of processed amendment dates.
#[derive(Debug, Default)]
pub struct AmendmentCache {
    store: DashMap<String, String>,
}

impl AmendmentCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot written by [`AmendmentCache::save`].
    ///
    /// A missing file yields an empty cache (first run). A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, CounterError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No amendment cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(CounterError::io(path, e)),
        };
        let entries: HashMap<String, String> = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded {} cached amendment dates", entries.len());
        Ok(entries.into_iter().collect())
    }

    /// Writes the cache as pretty-printed JSON, replacing any previous snapshot.
    ///
    /// The bytes go to a sibling temp file that is then renamed over `path`,
    /// so readers never observe a half-written snapshot.
    pub fn save(&self, path: &Path) -> Result<(), CounterError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);
        std::fs::write(tmp, json).map_err(|e| CounterError::io(tmp, e))?;
        std::fs::rename(tmp, path).map_err(|e| CounterError::io(path, e))?;
        Ok(())
    }

    /// Returns the last processed amendment date for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    /// Records `date` as processed for `key`.
    pub fn set(&self, key: String, date: String) {
        self.store.insert(key, date);
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Point-in-time copy with sorted keys.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.store
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl FromIterator<(String, String)> for AmendmentCache {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            store: iter.into_iter().collect(),
        }
    }
}
