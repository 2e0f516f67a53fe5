// src/graph/transaction.rs
//! Staged, all-or-nothing graph mutation.

use super::{DependencyGraph, Relation};
use crate::error::{PomError, Result};
use crate::gav::Gav;
use std::collections::BTreeSet;

/// Buffers removals and additions; nothing reaches the graph until
/// [`WriteTransaction::commit`]. Dropping the transaction discards it.
#[must_use = "a transaction does nothing unless committed"]
pub struct WriteTransaction<'g> {
    graph: &'g mut DependencyGraph,
    removed: BTreeSet<Relation>,
    added_nodes: BTreeSet<Gav>,
    added: BTreeSet<Relation>,
}

/// What a commit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub relations_removed: usize,
    pub nodes_added: usize,
    pub relations_added: usize,
}

impl<'g> WriteTransaction<'g> {
    pub(super) fn new(graph: &'g mut DependencyGraph) -> Self {
        Self {
            graph,
            removed: BTreeSet::new(),
            added_nodes: BTreeSet::new(),
            added: BTreeSet::new(),
        }
    }

    /// Committed relations whose source is `gav`.
    #[must_use]
    pub fn relations(&self, gav: &Gav) -> Vec<Relation> {
        self.graph.relations_from(gav).into_iter().cloned().collect()
    }

    pub fn remove_relations<I>(&mut self, relations: I)
    where
        I: IntoIterator<Item = Relation>,
    {
        for relation in relations {
            self.added.remove(&relation);
            self.removed.insert(relation);
        }
    }

    pub fn add_gav(&mut self, gav: &Gav) {
        if !self.graph.contains_gav(gav) {
            self.added_nodes.insert(gav.clone());
        }
    }

    fn knows(&self, gav: &Gav) -> bool {
        self.graph.contains_gav(gav) || self.added_nodes.contains(gav)
    }

    /// Stages a relation. Both endpoints must already be nodes, committed or
    /// staged in this transaction.
    ///
    /// # Errors
    /// Returns `PomError::GraphTransaction` naming the missing endpoint.
    pub fn add_relation(&mut self, relation: Relation) -> Result<()> {
        for endpoint in [relation.source(), relation.target()] {
            if !self.knows(endpoint) {
                return Err(PomError::GraphTransaction {
                    gav: relation.source().clone(),
                    reason: format!("relation '{relation}' references unknown node {endpoint}"),
                });
            }
        }
        self.removed.remove(&relation);
        self.added.insert(relation);
        Ok(())
    }

    /// Applies all staged changes at once.
    pub fn commit(self) -> CommitSummary {
        let mut summary = CommitSummary::default();
        for relation in &self.removed {
            if self.graph.relations.remove(relation) {
                summary.relations_removed += 1;
            }
        }
        for gav in self.added_nodes {
            if self.graph.nodes.insert(gav) {
                summary.nodes_added += 1;
            }
        }
        for relation in self.added {
            if self.graph.relations.insert(relation) {
                summary.relations_added += 1;
            }
        }
        summary
    }
}
