// src/change/processor.rs
//! Processors derive new graph changes from the ones already staged.
//!
//! A processing pass runs every registered processor once over a snapshot of
//! the changeset. Derived changes land in the changeset only after the pass,
//! so propagating further means running another pass.

use super::{ChangeCause, ChangeSet, GraphChange};
use crate::gav::Gav;
use crate::graph::DependencyGraph;

pub trait ChangeProcessor {
    /// Identifier recorded in the causes of derived changes.
    fn id(&self) -> &'static str;

    /// Changes implied by `change`, given the whole changeset and the graph.
    fn derive(
        &self,
        change: &GraphChange,
        changes: &ChangeSet<GraphChange>,
        graph: &DependencyGraph,
    ) -> Vec<GraphChange>;
}

/// Ordered list of processors.
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn ChangeProcessor>>,
}

impl ProcessorRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, processor: Box<dyn ChangeProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.id()).collect()
    }

    /// Runs one pass and merges the derived changes into `changes`.
    /// Returns the number of changes that were not present before.
    pub fn process(&self, changes: &mut ChangeSet<GraphChange>, graph: &DependencyGraph) -> usize {
        let snapshot: Vec<GraphChange> = changes.changes().cloned().collect();
        let mut derived = Vec::new();
        for processor in &self.processors {
            for change in &snapshot {
                for new_change in processor.derive(change, changes, graph) {
                    derived.push((new_change, ChangeCause::new(processor.id(), change)));
                }
            }
        }

        let mut added = 0;
        for (change, cause) in derived {
            tracing::debug!(processor = %cause.processor, "derived {change}");
            if changes.add_with_cause(change, cause) {
                added += 1;
            }
        }
        added
    }
}

impl Default for ProcessorRegistry {
    /// propagator, releaser, opener.
    fn default() -> Self {
        Self::empty()
            .with(Box::new(Propagator))
            .with(Box::new(Releaser))
            .with(Box::new(Opener))
    }
}

/// True when a rename of `gav` is already staged.
fn rename_pending(changes: &ChangeSet<GraphChange>, gav: &Gav) -> bool {
    changes
        .changes()
        .any(|c| matches!(c, GraphChange::Gav { source, .. } if source == gav))
}

/// Retargets every relation pointing at a renamed GAV.
pub struct Propagator;

impl ChangeProcessor for Propagator {
    fn id(&self) -> &'static str {
        "propagator"
    }

    fn derive(
        &self,
        change: &GraphChange,
        _changes: &ChangeSet<GraphChange>,
        graph: &DependencyGraph,
    ) -> Vec<GraphChange> {
        let GraphChange::Gav { source: old, new } = change else {
            return Vec::new();
        };
        graph
            .relations_to(old)
            .into_iter()
            .map(|r| GraphChange::relation(r.source().clone(), r.key(), Some(new.clone())))
            .collect()
    }
}

/// When a project is released, releases the snapshots it depends on.
pub struct Releaser;

impl ChangeProcessor for Releaser {
    fn id(&self) -> &'static str {
        "releaser"
    }

    fn derive(
        &self,
        change: &GraphChange,
        changes: &ChangeSet<GraphChange>,
        graph: &DependencyGraph,
    ) -> Vec<GraphChange> {
        let GraphChange::Gav { source: old, new } = change else {
            return Vec::new();
        };
        if new.is_snapshot() {
            return Vec::new();
        }
        graph
            .relations_from(old)
            .into_iter()
            .map(|r| r.target())
            .filter(|target| target.is_snapshot() && !rename_pending(changes, target))
            .map(|target| GraphChange::gav(target.clone(), target.released()))
            .collect()
    }
}

/// When a project opens a new snapshot, moves the children that shared its
/// version along with it.
pub struct Opener;

impl ChangeProcessor for Opener {
    fn id(&self) -> &'static str {
        "opener"
    }

    fn derive(
        &self,
        change: &GraphChange,
        changes: &ChangeSet<GraphChange>,
        graph: &DependencyGraph,
    ) -> Vec<GraphChange> {
        let GraphChange::Gav { source: old, new } = change else {
            return Vec::new();
        };
        if !new.is_snapshot() {
            return Vec::new();
        }
        graph
            .children(old)
            .into_iter()
            .filter(|child| child.version == old.version && !rename_pending(changes, child))
            .map(|child| GraphChange::gav(child.clone(), child.with_version(&new.version)))
            .collect()
    }
}
