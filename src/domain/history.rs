//! Change history of versioned records
//!
//! Every change to a versioned record appends one [`VersionEntry`]. An entry
//! stores the state of the record as it stood before the change was applied,
//! so replaying entry `n` recovers the record as of version `n`. The creation
//! entry has no prior state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of change that produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEvent {
    Create,
    Update,
}

/// One entry in a record's change log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry<T> {
    pub event: ChangeEvent,

    /// Captured state, `None` for creation events
    pub object: Option<T>,

    pub recorded_at: DateTime<Utc>,
}

/// Append-only change log for a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHistory<T> {
    entries: Vec<VersionEntry<T>>,
}

impl<T> Default for VersionHistory<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> VersionHistory<T> {
    /// Starts a history with the creation event
    pub fn created(at: DateTime<Utc>) -> Self {
        Self {
            entries: vec![VersionEntry {
                event: ChangeEvent::Create,
                object: None,
                recorded_at: at,
            }],
        }
    }

    /// Appends an update entry capturing the state before the change
    pub fn record_update(&mut self, previous: T, at: DateTime<Utc>) {
        self.entries.push(VersionEntry {
            event: ChangeEvent::Update,
            object: Some(previous),
            recorded_at: at,
        });
    }

    /// Recovers the record as of `version`
    ///
    /// Returns `None` when no entry was recorded at that index or when the
    /// entry carries no state (the creation event).
    pub fn reify(&self, version: u32) -> Option<T> {
        self.entries
            .get(version as usize)
            .and_then(|entry| entry.object.clone())
    }

    /// Number of recorded changes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
