//! In-memory implementation of the URL store.
//!
//! Process-local and lost on restart; used for development and tests. Dedup is
//! strict: the reverse index is claimed with an entry lock, so a concurrent
//! duplicate `put` loses with [`StoreError::OriginalConflict`].

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::UrlEntry;
use crate::domain::repositories::{StoreError, UrlStore};

#[derive(Debug, Clone)]
struct Slot {
    entry: UrlEntry,
    seq: u64,
}

/// In-memory store backed by sharded `DashMap`s.
#[derive(Debug, Default)]
pub struct MemoryUrlStore {
    entries: DashMap<String, Slot>,
    by_original: DashMap<String, String>,
    seq: AtomicU64,
}

impl MemoryUrlStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, code: &str, original: &str) -> Result<UrlEntry, StoreError> {
        let entry = UrlEntry::fresh(code, original);

        match self.entries.entry(code.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::CodeConflict(code.to_string())),
            Entry::Vacant(slot) => {
                let seq = self.seq.fetch_add(1, Ordering::SeqCst);
                slot.insert(Slot {
                    entry: entry.clone(),
                    seq,
                });
            }
        }

        let existing_code = match self.by_original.entry(original.to_string()) {
            Entry::Occupied(owner) => owner.get().clone(),
            Entry::Vacant(index) => {
                index.insert(code.to_string());
                return Ok(entry);
            }
        };

        self.entries.remove(code);
        Err(StoreError::OriginalConflict { existing_code })
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<UrlEntry>, StoreError> {
        Ok(self.entries.get(code).map(|slot| slot.entry.clone()))
    }

    async fn get_by_original(&self, original: &str) -> Result<Option<String>, StoreError> {
        Ok(self.by_original.get(original).map(|code| code.clone()))
    }

    async fn increment_hit(&self, code: &str) -> Result<(), StoreError> {
        if let Some(mut slot) = self.entries.get_mut(code) {
            slot.entry = slot.entry.with_hit();
        }
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut slots: Vec<Slot> = self.entries.iter().map(|s| s.value().clone()).collect();
        slots.sort_by(|a, b| {
            b.entry
                .created_at
                .cmp(&a.entry.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        slots.truncate(limit);

        Ok(slots.into_iter().map(|s| s.entry).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
