// src/graph/mod.rs
//! Directed multigraph of GAV nodes linked by typed relations.
//!
//! All mutation goes through [`DependencyGraph::write`], one transaction per
//! project, so a relation never references a node outside the node set.

mod relation;
mod transaction;

pub use relation::{Relation, RelationKey};
pub use transaction::{CommitSummary, WriteTransaction};

use crate::gav::Gav;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeSet<Gav>,
    relations: BTreeSet<Relation>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a write transaction.
    pub fn write(&mut self) -> WriteTransaction<'_> {
        WriteTransaction::new(self)
    }

    #[must_use]
    pub fn contains_gav(&self, gav: &Gav) -> bool {
        self.nodes.contains(gav)
    }

    pub fn gavs(&self) -> impl Iterator<Item = &Gav> {
        self.nodes.iter()
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    /// Outgoing relations of `gav`.
    #[must_use]
    pub fn relations_from(&self, gav: &Gav) -> Vec<&Relation> {
        self.relations.iter().filter(|r| r.source() == gav).collect()
    }

    /// Incoming relations of `gav`.
    #[must_use]
    pub fn relations_to(&self, gav: &Gav) -> Vec<&Relation> {
        self.relations.iter().filter(|r| r.target() == gav).collect()
    }

    /// Sources of `Parent` relations pointing at `gav`.
    #[must_use]
    pub fn children(&self, gav: &Gav) -> Vec<&Gav> {
        self.relations_to(gav)
            .into_iter()
            .filter(|r| matches!(r, Relation::Parent { .. }))
            .map(Relation::source)
            .collect()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}
