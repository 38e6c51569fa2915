//! TTL-bounded per-subject grant cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use evently_security::Capability;
use tokio::time::Instant;

struct CacheEntry {
    grants: Arc<HashSet<Capability>>,
    fetched_at: Instant,
}

/// Concurrent `subject_id -> grant set` map.
///
/// An entry is served only while `now - fetched_at < ttl`, where `fetched_at` is the
/// instant the grant store was queried, so a revoked grant stops being honoured
/// within one TTL. Only successful lookups are ever inserted.
pub struct GrantCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl GrantCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Fresh grants for `subject_id`, if any. Expired entries are dropped on read.
    #[must_use]
    pub fn get(&self, subject_id: &str) -> Option<Arc<HashSet<Capability>>> {
        let now = Instant::now();
        let (fetched_at, grants) = {
            let entry = self.entries.get(subject_id)?;
            (entry.fetched_at, Arc::clone(&entry.grants))
        };

        if now.saturating_duration_since(fetched_at) < self.ttl {
            return Some(grants);
        }

        self.entries
            .remove_if(subject_id, |_, e| now.saturating_duration_since(e.fetched_at) >= self.ttl);
        None
    }

    /// Store grants fetched from the store at `fetched_at`.
    ///
    /// An older result never replaces a newer one for the same subject.
    pub fn insert(&self, subject_id: &str, grants: Arc<HashSet<Capability>>, fetched_at: Instant) {
        if self.max_entries == 0 || self.ttl.is_zero() {
            return;
        }

        if !self.entries.contains_key(subject_id) && self.entries.len() >= self.max_entries {
            self.evict();
        }

        self.entries
            .entry(subject_id.to_owned())
            .and_modify(|e| {
                if fetched_at >= e.fetched_at {
                    e.grants = Arc::clone(&grants);
                    e.fetched_at = fetched_at;
                }
            })
            .or_insert_with(|| CacheEntry {
                grants: Arc::clone(&grants),
                fetched_at,
            });
    }

    pub fn invalidate(&self, subject_id: &str) {
        self.entries.remove(subject_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.fetched_at) < self.ttl);

        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().fetched_at)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
