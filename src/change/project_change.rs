// src/change/project_change.rs
use super::Subject;
use crate::gav::Gav;
use crate::pom::Project;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ProjectOperation {
    Set { value: String },
    Remove,
}

/// A concrete edit of one descriptor: set or remove the element `node_name`
/// under `location`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectChange {
    pub project: Gav,
    /// Descriptor the edit targets.
    pub path: PathBuf,
    pub location: String,
    pub node_name: String,
    pub operation: ProjectOperation,
}

impl ProjectChange {
    #[must_use]
    pub fn set(project: &Project, location: &str, node_name: &str, value: &str) -> Self {
        Self::new(
            project,
            location,
            node_name,
            ProjectOperation::Set {
                value: value.to_string(),
            },
        )
    }

    #[must_use]
    pub fn remove(project: &Project, location: &str, node_name: &str) -> Self {
        Self::new(project, location, node_name, ProjectOperation::Remove)
    }

    fn new(project: &Project, location: &str, node_name: &str, operation: ProjectOperation) -> Self {
        Self {
            project: project.gav().clone(),
            path: project.path().to_path_buf(),
            location: location.to_string(),
            node_name: node_name.to_string(),
            operation,
        }
    }

    /// The new value for `set` edits.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.operation {
            ProjectOperation::Set { value } => Some(value),
            ProjectOperation::Remove => None,
        }
    }
}

impl Subject for ProjectChange {
    fn subject(&self) -> &Gav {
        &self.project
    }
}

impl fmt::Display for ProjectChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            ProjectOperation::Set { value } => write!(
                f,
                "{} set {}/{} = {value}",
                self.project, self.location, self.node_name
            ),
            ProjectOperation::Remove => {
                write!(f, "{} remove {}/{}", self.project, self.location, self.node_name)
            }
        }
    }
}
