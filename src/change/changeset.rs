// src/change/changeset.rs
use super::{ChangeCause, Subject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A change and every cause recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry<C> {
    pub change: C,
    #[serde(default)]
    pub causes: BTreeSet<ChangeCause>,
}

/// Deduplicated collection of pending changes. Adding a change equal to one
/// already present only merges its causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet<C> {
    entries: Vec<ChangeEntry<C>>,
}

impl<C> Default for ChangeSet<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Clone + Ord + Subject> ChangeSet<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the change was not present yet.
    pub fn add(&mut self, change: C) -> bool {
        self.insert(change, None)
    }

    /// Adds a change with one cause, merging the cause into an existing
    /// entry. Returns true if the change was not present yet.
    pub fn add_with_cause(&mut self, change: C, cause: ChangeCause) -> bool {
        self.insert(change, Some(cause))
    }

    fn insert(&mut self, change: C, cause: Option<ChangeCause>) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.change == change) {
            entry.causes.extend(cause);
            return false;
        }
        self.entries.push(ChangeEntry {
            change,
            causes: cause.into_iter().collect(),
        });
        true
    }

    #[must_use]
    pub fn contains(&self, change: &C) -> bool {
        self.entries.iter().any(|e| &e.change == change)
    }

    pub fn remove(&mut self, change: &C) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.change != change);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns every entry.
    pub fn drain(&mut self) -> Vec<ChangeEntry<C>> {
        std::mem::take(&mut self.entries)
    }

    /// Entries ordered by subject GAV, then by change.
    #[must_use]
    pub fn list(&self) -> Vec<&ChangeEntry<C>> {
        let mut sorted: Vec<&ChangeEntry<C>> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            a.change
                .subject()
                .cmp(b.change.subject())
                .then_with(|| a.change.cmp(&b.change))
        });
        sorted
    }

    /// Changes in insertion order.
    pub fn changes(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().map(|e| &e.change)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
