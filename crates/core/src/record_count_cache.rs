// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-scoped memo table for record counts.
//!
//! Counting a federated entity means one aggregate query per database, which
//! is too expensive to repeat for every page a client requests. The cache
//! only remembers; recomputing a missing count is the caller's job.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bms_interop_domain::EntityKind;
use tracing::debug;

type EntryKey = (EntityKind, Option<String>);

/// A cached count for one entity type and filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCountCacheEntry {
    pub entity: EntityKind,
    pub filter_clause: Option<String>,
    pub count: u64,
}

#[derive(Debug, Default)]
pub struct RecordCountCache {
    sessions: Mutex<HashMap<String, HashMap<EntryKey, u64>>>,
}

impl RecordCountCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, HashMap<EntryKey, u64>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached count, or `None` when nothing is cached.
    #[must_use]
    pub fn get_entry(
        &self,
        session_id: &str,
        entity: EntityKind,
        filter_clause: Option<&str>,
    ) -> Option<RecordCountCacheEntry> {
        let key: EntryKey = (entity, filter_clause.map(str::to_string));
        self.sessions()
            .get(session_id)
            .and_then(|entries| entries.get(&key))
            .map(|count| RecordCountCacheEntry {
                entity,
                filter_clause: key.1.clone(),
                count: *count,
            })
    }

    /// Starts an empty entry table for the session, discarding any entries
    /// it already had.
    pub fn open_session(&self, session_id: &str) {
        if let Some(previous) = self
            .sessions()
            .insert(session_id.to_string(), HashMap::new())
        {
            debug!(
                removed = previous.len(),
                "Reset record count cache entries for session"
            );
        }
    }

    #[must_use]
    pub fn is_open(&self, session_id: &str) -> bool {
        self.sessions().contains_key(session_id)
    }

    /// Stores a count, replacing any previous value for the same key.
    ///
    /// Returns `false` and stores nothing when the session is not open.
    pub fn set_entry(
        &self,
        session_id: &str,
        entity: EntityKind,
        filter_clause: Option<&str>,
        count: u64,
    ) -> bool {
        let mut sessions = self.sessions();
        let Some(entries) = sessions.get_mut(session_id) else {
            debug!(%entity, "Ignoring record count for a closed session");
            return false;
        };
        entries.insert((entity, filter_clause.map(str::to_string)), count);
        true
    }

    /// Closes the session, dropping its entries. Returns how many there were.
    pub fn remove_entries_for(&self, session_id: &str) -> usize {
        let removed = self
            .sessions()
            .remove(session_id)
            .map_or(0, |entries| entries.len());
        debug!(removed, "Purged record count cache entries for session");
        removed
    }

    /// Drops every entry for every session.
    pub fn clear(&self) {
        self.sessions().clear();
    }

    /// Number of open sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }
}
