use async_trait::async_trait;
use detour_core::{
    FromPath, ReadStore, RedirectKey, RedirectRecord, RedirectStore, Result, SiteScope,
    StorageError, WriteMode,
};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

/// In-memory implementation of the redirect store.
///
/// Lookups take a shared read lock and run in parallel; `put` and `remove`
/// take the write lock, so a completed write is visible to every later read.
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryRedirectStore {
    records: RwLock<HashMap<RedirectKey, RedirectRecord>>,
}

impl InMemoryRedirectStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ReadStore for InMemoryRedirectStore {
    async fn find_exact(&self, site: SiteScope, from: &FromPath) -> Result<Option<RedirectRecord>> {
        let key = RedirectKey::new(site, from.clone());
        let found = self.records.read().get(&key).cloned();

        if found.is_none() {
            trace!(key = %key, "no redirect stored");
        }
        Ok(found)
    }

    async fn list(&self) -> Result<Vec<RedirectRecord>> {
        let mut records: Vec<RedirectRecord> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| (a.site(), a.from_path()).cmp(&(b.site(), b.from_path())));
        Ok(records)
    }
}

#[async_trait]
impl RedirectStore for InMemoryRedirectStore {
    async fn put(&self, record: RedirectRecord, mode: WriteMode) -> Result<()> {
        let key = record.key();
        let mut records = self.records.write();

        match (records.entry(key), mode) {
            (Entry::Occupied(entry), WriteMode::Create) => {
                Err(StorageError::DuplicateKey(entry.key().to_string()))
            }
            (Entry::Occupied(mut entry), WriteMode::Overwrite) => {
                debug!(key = %entry.key(), to = %record.to(), "replacing redirect");
                entry.insert(record);
                Ok(())
            }
            (Entry::Vacant(entry), _) => {
                debug!(key = %entry.key(), to = %record.to(), "storing redirect");
                entry.insert(record);
                Ok(())
            }
        }
    }

    async fn remove(&self, site: SiteScope, from: &FromPath) -> Result<()> {
        let key = RedirectKey::new(site, from.clone());

        match self.records.write().remove(&key) {
            Some(_) => {
                debug!(key = %key, "removed redirect");
                Ok(())
            }
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }
}
