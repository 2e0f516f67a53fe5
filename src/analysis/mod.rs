// src/analysis/mod.rs
//! Full recursive analysis: scan, load, resolve completeness, register in the
//! session store and insert into the dependency graph.
//!
//! Each stage is a separate method so callers (and tests) can drive the run
//! one step at a time. [`run_full_recursive_analysis`] chains them.

pub mod resolver;

pub use resolver::{CompletenessResolver, ProjectFailure, ResolutionOutcome};

use crate::config::Config;
use crate::discovery::FileScanner;
use crate::error::{PomError, Result};
use crate::gav::Gav;
use crate::graph::{CommitSummary, DependencyGraph, Relation};
use crate::pom::interpolate;
use crate::pom::{DescriptorLoader, DescriptorLocator, Project};
use crate::session::Session;
use crate::store::{ProjectLookup, ProjectStore};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of one analysis run. Every list is sorted.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Descriptor files found by scanning.
    pub files: Vec<PathBuf>,
    /// Projects parsed from scanned files.
    pub loaded: Vec<Gav>,
    /// Completed projects, scanned and external.
    pub completed: Vec<Gav>,
    pub duplicates: Vec<ProjectFailure>,
    pub unresolvable: Vec<ProjectFailure>,
    /// Files that could not be parsed or read. They are in no bucket.
    pub load_failures: Vec<PomError>,
    pub added_to_graph: Vec<Gav>,
    /// Completed projects whose graph transaction was discarded.
    pub graph_failures: Vec<PomError>,
    pub elapsed: Duration,
}

impl AnalysisReport {
    /// True when any file or project ended up outside the graph.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        !self.duplicates.is_empty()
            || !self.unresolvable.is_empty()
            || !self.load_failures.is_empty()
            || !self.graph_failures.is_empty()
    }
}

pub struct PomAnalysis<'a> {
    store: &'a mut ProjectStore,
    graph: &'a mut DependencyGraph,
    loader: &'a DescriptorLoader,
    locator: &'a dyn DescriptorLocator,
    scanner: FileScanner,
    profiles: Vec<String>,
    started: Instant,
    files: BTreeSet<PathBuf>,
    pending_files: Vec<PathBuf>,
    loaded: Vec<Project>,
    completed: Vec<Project>,
    report: AnalysisReport,
}

impl<'a> PomAnalysis<'a> {
    #[must_use]
    pub fn new(
        store: &'a mut ProjectStore,
        graph: &'a mut DependencyGraph,
        loader: &'a DescriptorLoader,
        locator: &'a dyn DescriptorLocator,
        config: &Config,
    ) -> Self {
        Self {
            store,
            graph,
            loader,
            locator,
            scanner: FileScanner::from_config(config),
            profiles: config.profiles.clone(),
            started: Instant::now(),
            files: BTreeSet::new(),
            pending_files: Vec::new(),
            loaded: Vec::new(),
            completed: Vec::new(),
            report: AnalysisReport::default(),
        }
    }

    /// Queues every descriptor under `dir`. A missing or unreadable root is
    /// recorded as a load failure.
    pub fn add_directory(&mut self, dir: &Path) -> usize {
        match self.scanner.scan(dir) {
            Ok(found) => {
                tracing::info!(dir = %dir.display(), files = found.len(), "scanned directory");
                found.into_iter().filter(|f| self.add_file(f)).count()
            }
            Err(e) => {
                tracing::error!(dir = %dir.display(), "{e}");
                self.report.load_failures.push(e);
                0
            }
        }
    }

    /// Queues a single descriptor. Returns false if it was already queued.
    pub fn add_file(&mut self, file: &Path) -> bool {
        if !self.files.insert(file.to_path_buf()) {
            return false;
        }
        self.pending_files.push(file.to_path_buf());
        true
    }

    /// Parses every queued file.
    pub fn load_projects(&mut self) -> usize {
        let mut count = 0;
        for path in std::mem::take(&mut self.pending_files) {
            match self.loader.load(&path, false) {
                Ok(project) => {
                    self.loaded.push(project);
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    self.report.load_failures.push(e);
                }
            }
        }
        count
    }

    /// Classifies every loaded project. Returns the number completed,
    /// including external ancestors.
    pub fn complete_loaded_projects(&mut self) -> usize {
        let mut resolver =
            CompletenessResolver::new(self.store, self.loader, self.locator, &self.profiles);
        self.report
            .loaded
            .extend(self.loaded.iter().map(|p| p.gav().clone()));
        resolver.extend(std::mem::take(&mut self.loaded));
        let outcome = resolver.resolve_all();

        self.report.duplicates.extend(outcome.duplicates);
        self.report.unresolvable.extend(outcome.unresolvable);
        let count = outcome.completed.len();
        self.completed.extend(outcome.completed);
        count
    }

    /// Registers completed projects in the session store. A project read
    /// again from the same file replaces its previous entry.
    pub fn add_completed_projects_to_session(&mut self) {
        for project in &self.completed {
            self.report.completed.push(project.gav().clone());
            let same_file = self
                .store
                .for_gav(project.gav())
                .is_some_and(|existing| existing.same_instance(project));
            if same_file {
                self.store.replace(project.clone());
            } else if let Err(e) = self.store.add(project.clone()) {
                tracing::warn!("{e}");
            }
        }
    }

    /// Inserts every completed project into the graph, one transaction each.
    /// Expects the projects to be registered in the session store already.
    pub fn add_completed_projects_to_graph(&mut self) -> usize {
        let mut added = 0;
        for project in std::mem::take(&mut self.completed) {
            match add_project_to_graph(self.graph, &project, &self.profiles, &*self.store) {
                Ok(summary) => {
                    tracing::debug!(
                        gav = %project.gav(),
                        removed = summary.relations_removed,
                        nodes = summary.nodes_added,
                        relations = summary.relations_added,
                        "graph transaction committed"
                    );
                    self.report.added_to_graph.push(project.gav().clone());
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    self.report.graph_failures.push(e);
                }
            }
        }
        added
    }

    #[must_use]
    pub fn into_report(self) -> AnalysisReport {
        let mut report = self.report;
        report.files = self.files.into_iter().collect();
        report.loaded.sort();
        report.completed.sort();
        report.added_to_graph.sort();
        report.duplicates.sort_by(|a, b| a.project.path().cmp(b.project.path()));
        report.unresolvable.sort_by(|a, b| a.project.gav().cmp(b.project.gav()));
        report.elapsed = self.started.elapsed();
        report
    }
}

/// Replaces the outgoing structure of `project` in the graph: parent,
/// local dependencies and local build plugins. Nothing is committed if any
/// part fails.
///
/// # Errors
/// Returns `PomError::GraphTransaction` when a dependency cannot be resolved
/// or a relation references an unknown node.
pub fn add_project_to_graph(
    graph: &mut DependencyGraph,
    project: &Project,
    profiles: &[String],
    lookup: &dyn ProjectLookup,
) -> Result<CommitSummary> {
    let dependencies = interpolate::local_dependencies(project, profiles, lookup)?;
    let plugins = interpolate::local_plugins(project, profiles, lookup);
    let source = project.gav();

    let mut tx = graph.write();
    let existing = tx.relations(source);
    tx.remove_relations(existing);
    tx.add_gav(source);

    if let Some(parent) = project.parent_gav() {
        tx.add_gav(parent);
        tx.add_relation(Relation::Parent {
            source: source.clone(),
            target: parent.clone(),
        })?;
    }
    for dep in dependencies {
        tx.add_gav(&dep.gav);
        tx.add_relation(Relation::Dependency {
            source: source.clone(),
            target: dep.gav,
            scope: dep.scope,
            classifier: dep.classifier,
            kind: dep.kind,
        })?;
    }
    for plugin in plugins {
        tx.add_gav(&plugin);
        tx.add_relation(Relation::BuildDependency {
            source: source.clone(),
            target: plugin,
        })?;
    }
    Ok(tx.commit())
}

/// Scans `dir` and runs every stage against the session's store and graph.
pub fn run_full_recursive_analysis(
    dir: &Path,
    session: &mut Session,
    loader: &DescriptorLoader,
    locator: &dyn DescriptorLocator,
) -> AnalysisReport {
    let mut analysis = PomAnalysis::new(
        &mut session.store,
        &mut session.graph,
        loader,
        locator,
        &session.config,
    );
    analysis.add_directory(dir);
    analysis.load_projects();
    analysis.complete_loaded_projects();
    analysis.add_completed_projects_to_session();
    analysis.add_completed_projects_to_graph();
    let report = analysis.into_report();

    tracing::info!(
        dir = %dir.display(),
        loaded = report.loaded.len(),
        completed = report.completed.len(),
        duplicates = report.duplicates.len(),
        unresolvable = report.unresolvable.len(),
        added_to_graph = report.added_to_graph.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "analysis finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::RelativePathLocator;
    use std::fs;
    use tempfile::TempDir;

    fn write_pom(root: &Path, rel: &str, body: &str) -> anyhow::Result<PathBuf> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("<project>{body}</project>"))?;
        Ok(path)
    }

    #[test]
    fn test_stages_in_sequence() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write_pom(
            dir.path(),
            "app/pom.xml",
            "<groupId>g</groupId><artifactId>app</artifactId><version>1</version>",
        )?;
        write_pom(dir.path(), "broken/pom.xml", "<groupId>g</groupId>")?;

        let (mut store, mut graph) = (ProjectStore::new(), DependencyGraph::new());
        let loader = DescriptorLoader::default();
        let config = Config::new();
        let mut analysis =
            PomAnalysis::new(&mut store, &mut graph, &loader, &RelativePathLocator, &config);

        assert_eq!(analysis.add_directory(dir.path()), 2);
        assert_eq!(analysis.load_projects(), 1);
        assert_eq!(analysis.complete_loaded_projects(), 1);
        analysis.add_completed_projects_to_session();
        assert_eq!(analysis.add_completed_projects_to_graph(), 1);

        let report = analysis.into_report();
        assert_eq!(report.load_failures.len(), 1);
        assert!(report.has_problems());
        assert_eq!(store.len(), 1);
        assert_eq!(graph.node_count(), 1);
        Ok(())
    }

    #[test]
    fn test_add_file_ignores_repeats() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let pom = write_pom(
            dir.path(),
            "pom.xml",
            "<groupId>g</groupId><artifactId>a</artifactId><version>1</version>",
        )?;
        let (mut store, mut graph) = (ProjectStore::new(), DependencyGraph::new());
        let loader = DescriptorLoader::default();
        let config = Config::new();
        let mut analysis =
            PomAnalysis::new(&mut store, &mut graph, &loader, &RelativePathLocator, &config);
        assert!(analysis.add_file(&pom));
        assert!(!analysis.add_file(&pom));
        assert_eq!(analysis.load_projects(), 1);
        Ok(())
    }

    #[test]
    fn test_unresolved_dependency_version_keeps_project_out_of_graph() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write_pom(
            dir.path(),
            "pom.xml",
            "<groupId>g</groupId><artifactId>a</artifactId><version>1</version>\
             <dependencies><dependency><groupId>g</groupId><artifactId>lib</artifactId>\
             </dependency></dependencies>",
        )?;
        let (mut store, mut graph) = (ProjectStore::new(), DependencyGraph::new());
        let loader = DescriptorLoader::default();
        let config = Config::new();
        let mut analysis =
            PomAnalysis::new(&mut store, &mut graph, &loader, &RelativePathLocator, &config);
        analysis.add_directory(dir.path());
        analysis.load_projects();
        analysis.complete_loaded_projects();
        analysis.add_completed_projects_to_session();
        assert_eq!(analysis.add_completed_projects_to_graph(), 0);

        let report = analysis.into_report();
        assert_eq!(report.completed, vec![Gav::new("g", "a", "1")]);
        assert_eq!(report.graph_failures.len(), 1);
        assert_eq!(graph.node_count(), 0);
        Ok(())
    }

    #[test]
    fn test_failed_transaction_leaves_other_projects_in_graph() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write_pom(
            dir.path(),
            "a/pom.xml",
            "<groupId>g</groupId><artifactId>a</artifactId><version>1</version>\
             <dependencies><dependency><groupId>g</groupId><artifactId>lib</artifactId>\
             </dependency></dependencies>",
        )?;
        write_pom(
            dir.path(),
            "b/pom.xml",
            "<groupId>g</groupId><artifactId>b</artifactId><version>1</version>\
             <dependencies><dependency><groupId>g</groupId><artifactId>lib</artifactId>\
             <version>2</version></dependency></dependencies>",
        )?;
        let (mut store, mut graph) = (ProjectStore::new(), DependencyGraph::new());
        let loader = DescriptorLoader::default();
        let config = Config::new();
        let mut analysis =
            PomAnalysis::new(&mut store, &mut graph, &loader, &RelativePathLocator, &config);
        analysis.add_directory(dir.path());
        analysis.load_projects();
        assert_eq!(analysis.complete_loaded_projects(), 2);
        analysis.add_completed_projects_to_session();
        assert_eq!(analysis.add_completed_projects_to_graph(), 1);

        let report = analysis.into_report();
        assert_eq!(report.added_to_graph, vec![Gav::new("g", "b", "1")]);
        assert_eq!(report.graph_failures.len(), 1);
        assert!(!graph.contains_gav(&Gav::new("g", "a", "1")));
        assert!(graph.contains_gav(&Gav::new("g", "b", "1")));
        let targets: Vec<&Gav> = graph
            .relations_from(&Gav::new("g", "b", "1"))
            .into_iter()
            .map(crate::graph::Relation::target)
            .collect();
        assert_eq!(targets, vec![&Gav::new("g", "lib", "2")]);
        assert_eq!(graph.node_count(), 2);
        Ok(())
    }
}
