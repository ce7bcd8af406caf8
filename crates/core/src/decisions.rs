//! Persisted saved/dismissed decision sets.
//!
//! Each set is stored as a JSON array of event ids under its own key. The
//! sets are independent: an id may be in both.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};
use crate::types::EventId;

/// Storage key for saved event ids.
pub const SAVED_KEY: &str = "saved_events";

/// Storage key for dismissed event ids.
pub const DISMISSED_KEY: &str = "dismissed_events";

/// A user's verdict on one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Save,
    Dismiss,
}

impl Decision {
    /// The set this decision is recorded in.
    pub fn set(self) -> DecisionSet {
        match self {
            Decision::Save => DecisionSet::Saved,
            Decision::Dismiss => DecisionSet::Dismissed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSet {
    Saved,
    Dismissed,
}

impl DecisionSet {
    pub fn storage_key(self) -> &'static str {
        match self {
            DecisionSet::Saved => SAVED_KEY,
            DecisionSet::Dismissed => DISMISSED_KEY,
        }
    }
}

/// Ordered, duplicate-free id sets over a [`KeyValueStore`].
///
/// Plain reads never fail: missing, unreadable or malformed values are
/// treated as an empty set. Writes surface [`StorageError`], including a
/// failed read of the set being modified.
#[derive(Debug)]
pub struct DecisionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> DecisionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Every id in `set`, in insertion order.
    pub fn all(&self, set: DecisionSet) -> Vec<EventId> {
        self.load(set).unwrap_or_else(|e| {
            tracing::warn!(key = set.storage_key(), error = %e, "Decision set unreadable, treating as empty");
            Vec::new()
        })
    }

    /// Like [`all`](Self::all) but keeps storage read failures, so a write
    /// built on the result never replaces ids it could not see. Malformed
    /// values still read as empty.
    fn load(&self, set: DecisionSet) -> Result<Vec<EventId>, StorageError> {
        let key = set.storage_key();
        let Some(raw) = self.storage.read(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<EventId>>(&raw) {
            Ok(ids) => Ok(dedup_preserving_order(ids)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Decision set malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn contains(&self, set: DecisionSet, id: &str) -> bool {
        self.all(set).iter().any(|existing| existing == id)
    }

    /// Append `id` to `set` unless already present.
    ///
    /// Returns `true` if the id was inserted.
    pub fn add(&mut self, set: DecisionSet, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.load(set)?;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.persist(set, &ids)?;
        Ok(true)
    }

    /// Remove `id` from `set`. Returns `true` if it was present.
    pub fn remove(&mut self, set: DecisionSet, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.load(set)?;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.persist(set, &ids)?;
        Ok(true)
    }

    /// Empty one set, leaving the other untouched.
    pub fn clear(&mut self, set: DecisionSet) -> Result<(), StorageError> {
        self.storage.delete(set.storage_key())
    }

    pub fn record(&mut self, decision: Decision, id: &str) -> Result<bool, StorageError> {
        self.add(decision.set(), id)
    }

    fn persist(&mut self, set: DecisionSet, ids: &[EventId]) -> Result<(), StorageError> {
        let json = serde_json::to_string(ids)
            .map_err(|e| StorageError::Unavailable(format!("Cannot encode decision set: {e}")))?;
        self.storage.write(set.storage_key(), &json)
    }
}

fn dedup_preserving_order(ids: Vec<EventId>) -> Vec<EventId> {
    let mut out: Vec<EventId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
