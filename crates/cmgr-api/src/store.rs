//! # Entry Storage
//!
//! In-memory storage of content-type entries. One [`EntryStore`] per
//! content type, grouped in an [`EntryRepository`] whose key set is fixed
//! at startup from the content-type registry.
//!
//! All operations are synchronous (the lock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await` points.
//! Writes happen under a single write lock, so a write is either fully
//! applied or not at all.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use cmgr_schema::{ContentTypeRegistry, FieldValues};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A stored entry. Serializes as a flat object:
/// `{"id": 1, "<field>": <value>, ..., "created_at": ..., "updated_at": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    #[serde(flatten)]
    pub fields: FieldValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct StoreInner {
    next_id: u64,
    entries: BTreeMap<u64, Entry>,
}

/// Entries of one content type, ordered by id.
#[derive(Debug)]
pub struct EntryStore {
    inner: RwLock<StoreInner>,
}

impl EntryStore {
    /// Create an empty store. The first entry gets id 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_id: 1,
                entries: BTreeMap::new(),
            }),
        }
    }

    /// Persist a new entry with the next id.
    pub fn create(&self, fields: FieldValues) -> Entry {
        let now = Utc::now();
        let mut guard = self.inner.write();
        let id = guard.next_id;
        guard.next_id += 1;
        let entry = Entry {
            id,
            fields,
            created_at: now,
            updated_at: now,
        };
        guard.entries.insert(id, entry.clone());
        entry
    }

    /// Retrieve an entry by id.
    pub fn get(&self, id: u64) -> Option<Entry> {
        self.inner.read().entries.get(&id).cloned()
    }

    /// Entries in id order, skipping `start` and returning at most `limit`.
    pub fn list(&self, start: usize, limit: Option<usize>) -> Vec<Entry> {
        let guard = self.inner.read();
        let page = guard.entries.values().skip(start);
        match limit {
            Some(limit) => page.take(limit).cloned().collect(),
            None => page.cloned().collect(),
        }
    }

    /// Merge `fields` into an existing entry. Fields not in `fields` keep
    /// their stored value. Returns the updated entry, or `None` if the id
    /// is unknown.
    pub fn update(&self, id: u64, fields: FieldValues) -> Option<Entry> {
        let mut guard = self.inner.write();
        let entry = guard.entries.get_mut(&id)?;
        entry.fields.extend(fields);
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    /// Remove an entry, returning it.
    pub fn remove(&self, id: u64) -> Option<Entry> {
        self.inner.write().entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One [`EntryStore`] per registered content type, keyed by uid.
#[derive(Debug, Default)]
pub struct EntryRepository {
    stores: HashMap<String, EntryStore>,
}

impl EntryRepository {
    /// Create an empty store for every content type in `registry`.
    pub fn for_registry(registry: &ContentTypeRegistry) -> Self {
        Self {
            stores: registry
                .uids()
                .map(|uid| (uid.to_string(), EntryStore::new()))
                .collect(),
        }
    }

    pub fn store(&self, uid: &str) -> Option<&EntryStore> {
        self.stores.get(uid)
    }
}
