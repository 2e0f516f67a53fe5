// src/change/mod.rs
//! Staged edits and the pipeline that derives and resolves them.
//!
//! Graph changes describe structural intent (rename a GAV, retarget or drop
//! a relation). Project changes are concrete descriptor edits. Processors
//! derive more graph changes from existing ones; resolution turns graph
//! changes into project changes; an editor finally applies project changes.

mod changeset;
mod editor;
mod graph_change;
pub mod processor;
mod project_change;
mod resolve;

pub use changeset::{ChangeEntry, ChangeSet};
pub use editor::{apply, ApplyReport, DescriptorEditor, DryRunEditor};
pub use graph_change::GraphChange;
pub use processor::{ChangeProcessor, ProcessorRegistry};
pub use project_change::{ProjectChange, ProjectOperation};
pub use resolve::{resolve, ResolveReport};

use crate::gav::Gav;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of a derived change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChangeCause {
    /// Id of the processor (or stage) that produced the change.
    pub processor: String,
    /// The change that triggered it.
    pub change: String,
}

impl ChangeCause {
    #[must_use]
    pub fn new(processor: &str, change: &impl fmt::Display) -> Self {
        Self {
            processor: processor.to_string(),
            change: change.to_string(),
        }
    }
}

impl fmt::Display for ChangeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processor:{} {}", self.processor, self.change)
    }
}

/// A change addressed to one GAV, used for listing order.
pub trait Subject {
    fn subject(&self) -> &Gav;
}
