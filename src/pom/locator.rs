// src/pom/locator.rs
//! Finding descriptor files for coordinates that were not scanned.

use super::Project;
use crate::config::Config;
use crate::gav::Gav;
use std::path::{Path, PathBuf};

/// Finds the descriptor file of a GAV, optionally using the project that
/// needs it as a hint.
pub trait DescriptorLocator {
    fn locate(&self, gav: &Gav, hint: Option<&Project>) -> Option<PathBuf>;
}

/// Follows the hinting project's `<parent><relativePath>` (default
/// `../pom.xml`). Only answers for the hint's own parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativePathLocator;

impl DescriptorLocator for RelativePathLocator {
    fn locate(&self, gav: &Gav, hint: Option<&Project>) -> Option<PathBuf> {
        let project = hint?;
        let parent = project.model().parent.as_ref()?;
        if &parent.gav != gav {
            return None;
        }
        let relative = match parent.relative_path.as_deref() {
            Some("") => return None,
            Some(rel) => rel,
            None => "../pom.xml",
        };
        let base = project.path().parent()?;
        let candidate = base.join(relative);
        let candidate = if candidate.is_dir() {
            candidate.join("pom.xml")
        } else {
            candidate
        };
        candidate.canonicalize().ok().filter(|p| p.is_file())
    }
}

/// Looks up `group/as/dirs/artifact/version/artifact-version.pom` under each
/// repository root.
#[derive(Debug, Clone, Default)]
pub struct RepositoryLocator {
    roots: Vec<PathBuf>,
}

impl RepositoryLocator {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Path of a GAV's descriptor relative to a repository root.
    #[must_use]
    pub fn relative_path(gav: &Gav) -> PathBuf {
        let mut path: PathBuf = gav.group_id.split('.').collect();
        path.push(&gav.artifact_id);
        path.push(&gav.version);
        path.push(format!("{}-{}.pom", gav.artifact_id, gav.version));
        path
    }

    fn candidate(root: &Path, gav: &Gav) -> Option<PathBuf> {
        let path = root.join(Self::relative_path(gav));
        path.is_file().then_some(path)
    }
}

impl DescriptorLocator for RepositoryLocator {
    fn locate(&self, gav: &Gav, _hint: Option<&Project>) -> Option<PathBuf> {
        if gav.version.is_empty() {
            return None;
        }
        self.roots.iter().find_map(|root| Self::candidate(root, gav))
    }
}

/// Asks each locator in turn; the first hit wins.
#[derive(Default)]
pub struct ChainLocator {
    locators: Vec<Box<dyn DescriptorLocator>>,
}

impl ChainLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, locator: Box<dyn DescriptorLocator>) -> Self {
        self.locators.push(locator);
        self
    }

    /// Relative parent paths first, then the configured repositories.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with(Box::new(RelativePathLocator))
            .with(Box::new(RepositoryLocator::new(config.repositories.clone())))
    }
}

impl DescriptorLocator for ChainLocator {
    fn locate(&self, gav: &Gav, hint: Option<&Project>) -> Option<PathBuf> {
        self.locators.iter().find_map(|l| l.locate(gav, hint))
    }
}
