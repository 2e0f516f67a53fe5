// src/session.rs
//! The mutable analysis context: configuration, project store, dependency
//! graph and the two changesets.
//!
//! A session belongs to one caller at a time. The command line keeps one
//! across invocations by persisting the analysed roots and both changesets
//! in `.pomgraph/session.json`, together with the profiles, repositories
//! and ignores in effect; the store and graph are rebuilt by re-analysing
//! the roots under those settings.

use crate::analysis::{self, AnalysisReport};
use crate::change::{
    self, ApplyReport, ChangeEntry, ChangeSet, DescriptorEditor, GraphChange, ProcessorRegistry,
    ProjectChange, ResolveReport,
};
use crate::config::{Config, PomGraphToml};
use crate::filter::GavFilter;
use crate::gav::Gav;
use crate::graph::{DependencyGraph, RelationKey};
use crate::pom::{ChainLocator, DescriptorLoader, DescriptorLocator};
use crate::store::ProjectStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding persisted session state, relative to the workspace.
pub const SESSION_DIR: &str = ".pomgraph";

/// The state file inside [`SESSION_DIR`].
pub const STATE_FILE: &str = "session.json";

#[must_use]
pub fn state_file_path(workspace: &Path) -> PathBuf {
    workspace.join(SESSION_DIR).join(STATE_FILE)
}

/// What survives between command invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Directories analysed so far, in order.
    pub roots: Vec<PathBuf>,
    /// Configuration in effect when the roots were analysed.
    #[serde(default)]
    pub settings: PomGraphToml,
    #[serde(default)]
    pub graph_changes: ChangeSet<GraphChange>,
    #[serde(default)]
    pub project_changes: ChangeSet<ProjectChange>,
}

impl SessionState {
    /// Loads state from a JSON file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))
    }

    /// Saves state to a JSON file, creating its directory.
    ///
    /// # Errors
    /// Returns error if file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session dir: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write session file: {}", path.display()))
    }
}

/// Listing of both changesets in presentation order.
pub struct ChangeListing<'a> {
    pub graph: Vec<&'a ChangeEntry<GraphChange>>,
    pub project: Vec<&'a ChangeEntry<ProjectChange>>,
}

pub struct Session {
    pub(crate) config: Config,
    pub(crate) store: ProjectStore,
    pub(crate) graph: DependencyGraph,
    graph_changes: ChangeSet<GraphChange>,
    project_changes: ChangeSet<ProjectChange>,
    processors: ProcessorRegistry,
    roots: Vec<PathBuf>,
}

impl Session {
    /// Empty session with the default processors.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: ProjectStore::new(),
            graph: DependencyGraph::new(),
            graph_changes: ChangeSet::new(),
            project_changes: ChangeSet::new(),
            processors: ProcessorRegistry::default(),
            roots: Vec::new(),
        }
    }

    /// Rebuilds a session from persisted state: the saved settings are
    /// merged over `config`, roots are analysed again, then the changesets
    /// are restored.
    #[must_use]
    pub fn restore(mut config: Config, state: SessionState) -> Self {
        config.merge(state.settings);
        let mut session = Self::new(config);
        for root in &state.roots {
            let report = session.analyze(root);
            tracing::debug!(root = %root.display(), projects = report.completed.len(), "restored root");
        }
        session.graph_changes = state.graph_changes;
        session.project_changes = state.project_changes;
        session
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState {
            roots: self.roots.clone(),
            settings: PomGraphToml {
                verbose: false,
                ..self.config.to_toml()
            },
            graph_changes: self.graph_changes.clone(),
            project_changes: self.project_changes.clone(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configuration used by the next analysis.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    #[must_use]
    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn graph_changes(&self) -> &ChangeSet<GraphChange> {
        &self.graph_changes
    }

    #[must_use]
    pub fn project_changes(&self) -> &ChangeSet<ProjectChange> {
        &self.project_changes
    }

    /// Analyses `dir` with the default parser and the configured locators.
    pub fn analyze(&mut self, dir: &Path) -> AnalysisReport {
        let loader = DescriptorLoader::default();
        let locator = ChainLocator::from_config(&self.config);
        self.analyze_with(dir, &loader, &locator)
    }

    /// Analyses `dir` with explicit collaborators and remembers it as a root.
    pub fn analyze_with(
        &mut self,
        dir: &Path,
        loader: &DescriptorLoader,
        locator: &dyn DescriptorLocator,
    ) -> AnalysisReport {
        let root = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        if !self.roots.contains(&root) {
            self.roots.push(root.clone());
        }
        analysis::run_full_recursive_analysis(&root, self, loader, locator)
    }

    #[must_use]
    pub fn list_changes(&self) -> ChangeListing<'_> {
        ChangeListing {
            graph: self.graph_changes.list(),
            project: self.project_changes.list(),
        }
    }

    /// Runs one processing pass. Returns the number of new graph changes.
    pub fn process_changes(&mut self) -> usize {
        let added = self.processors.process(&mut self.graph_changes, &self.graph);
        tracing::info!(added, total = self.graph_changes.len(), "processed graph changes");
        added
    }

    pub fn resolve_changes(&mut self) -> ResolveReport {
        change::resolve(&mut self.graph_changes, &mut self.project_changes, &self.store)
    }

    pub fn add_gav_change(&mut self, source: Gav, new: Gav) -> bool {
        self.add_graph_change(GraphChange::gav(source, new))
    }

    pub fn add_relation_change(&mut self, source: Gav, key: RelationKey, new_target: Gav) -> bool {
        self.add_graph_change(GraphChange::relation(source, key, Some(new_target)))
    }

    pub fn remove_relation(&mut self, source: Gav, key: RelationKey) -> bool {
        self.add_graph_change(GraphChange::relation(source, key, None))
    }

    fn add_graph_change(&mut self, change: GraphChange) -> bool {
        tracing::info!("added change in change set: {change}");
        self.graph_changes.add(change)
    }

    pub fn remove_graph_change(&mut self, change: &GraphChange) -> bool {
        let removed = self.graph_changes.remove(change);
        if removed {
            tracing::info!("removed change from change set: {change}");
        }
        removed
    }

    pub fn remove_project_change(&mut self, change: &ProjectChange) -> bool {
        self.project_changes.remove(change)
    }

    /// Stages `set(location, node_name, value)` on every project matching
    /// `filter`. Returns the changes that were new.
    pub fn set_project(
        &mut self,
        filter: &GavFilter,
        location: &str,
        node_name: &str,
        value: &str,
    ) -> Vec<ProjectChange> {
        self.add_project_changes(filter, |project| {
            ProjectChange::set(project, location, node_name, value)
        })
    }

    /// Stages `remove(location, node_name)` on every project matching `filter`.
    pub fn remove_project(
        &mut self,
        filter: &GavFilter,
        location: &str,
        node_name: &str,
    ) -> Vec<ProjectChange> {
        self.add_project_changes(filter, |project| {
            ProjectChange::remove(project, location, node_name)
        })
    }

    fn add_project_changes<F>(&mut self, filter: &GavFilter, make: F) -> Vec<ProjectChange>
    where
        F: Fn(&crate::pom::Project) -> ProjectChange,
    {
        let selected = filter.select(self.store.gavs());
        if selected.is_empty() {
            tracing::warn!(pattern = filter.pattern(), "no project for gav");
        }
        let mut added = Vec::new();
        for gav in selected {
            let Some(project) = self.store.for_gav(&gav) else {
                continue;
            };
            let change = make(project);
            if self.project_changes.add(change.clone()) {
                tracing::info!("added change in change set: {change}");
                added.push(change);
            }
        }
        added
    }

    /// Drops every staged project change on a project matching `filter` at
    /// `location`/`node_name`, whatever its operation. Returns the dropped
    /// changes.
    pub fn remove_project_changes(
        &mut self,
        filter: &GavFilter,
        location: &str,
        node_name: &str,
    ) -> Vec<ProjectChange> {
        let matching: Vec<ProjectChange> = self
            .project_changes
            .changes()
            .filter(|c| {
                c.location == location && c.node_name == node_name && filter.matches(&c.project)
            })
            .cloned()
            .collect();
        for change in &matching {
            if self.remove_project_change(change) {
                tracing::info!("removed change from change set: {change}");
            }
        }
        matching
    }

    pub fn clear_changes(&mut self) {
        self.graph_changes.clear();
        self.project_changes.clear();
    }

    /// Hands every project change to `editor`; applied ones leave the
    /// changeset, rejected ones stay.
    pub fn apply_changes(&mut self, editor: &mut dyn DescriptorEditor) -> ApplyReport {
        change::apply(&mut self.project_changes, editor)
    }
}
