// src/change/graph_change.rs
use super::Subject;
use crate::gav::Gav;
use crate::graph::RelationKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structural edit of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum GraphChange {
    /// Renames `source` to `new`.
    Gav { source: Gav, new: Gav },
    /// Points the relation `key` of `source` at `new_target`, or removes it
    /// when there is no new target.
    Relation {
        source: Gav,
        key: RelationKey,
        new_target: Option<Gav>,
    },
}

impl GraphChange {
    #[must_use]
    pub fn gav(source: Gav, new: Gav) -> Self {
        Self::Gav { source, new }
    }

    #[must_use]
    pub fn relation(source: Gav, key: RelationKey, new_target: Option<Gav>) -> Self {
        Self::Relation {
            source,
            key,
            new_target,
        }
    }

    #[must_use]
    pub fn source(&self) -> &Gav {
        match self {
            Self::Gav { source, .. } | Self::Relation { source, .. } => source,
        }
    }
}

impl Subject for GraphChange {
    fn subject(&self) -> &Gav {
        self.source()
    }
}

impl fmt::Display for GraphChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gav { source, new } => write!(f, "gav {source} -> {new}"),
            Self::Relation {
                source,
                key,
                new_target: Some(target),
            } => write!(f, "relation {source} {key} -> {target}"),
            Self::Relation {
                source,
                key,
                new_target: None,
            } => write!(f, "relation {source} {key} removed"),
        }
    }
}
