// src/store.rs
//! Session-scoped project registry.

use crate::error::{PomError, Result};
use crate::gav::Gav;
use crate::pom::Project;
use std::collections::BTreeMap;

/// Resolves a GAV to a loaded project.
pub trait ProjectLookup {
    fn project(&self, gav: &Gav) -> Option<&Project>;
}

/// GAV → project, at most one project per GAV.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: BTreeMap<Gav, Project>,
}

impl ProjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a project. An existing entry is never overwritten.
    ///
    /// # Errors
    /// Returns `PomError::DuplicateProject` if the GAV is already present.
    pub fn add(&mut self, project: Project) -> Result<()> {
        if let Some(existing) = self.projects.get(project.gav()) {
            return Err(PomError::DuplicateProject {
                gav: project.gav().clone(),
                canonical: existing.path().to_path_buf(),
            });
        }
        self.projects.insert(project.gav().clone(), project);
        Ok(())
    }

    /// Inserts or replaces, returning the previous project for that GAV.
    pub fn replace(&mut self, project: Project) -> Option<Project> {
        self.projects.insert(project.gav().clone(), project)
    }

    pub fn remove(&mut self, gav: &Gav) -> Option<Project> {
        self.projects.remove(gav)
    }

    #[must_use]
    pub fn for_gav(&self, gav: &Gav) -> Option<&Project> {
        self.projects.get(gav)
    }

    #[must_use]
    pub fn contains(&self, gav: &Gav) -> bool {
        self.projects.contains_key(gav)
    }

    /// Projects in GAV order.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn gavs(&self) -> impl Iterator<Item = &Gav> {
        self.projects.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectLookup for ProjectStore {
    fn project(&self, gav: &Gav) -> Option<&Project> {
        self.for_gav(gav)
    }
}
