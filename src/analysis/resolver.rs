// src/analysis/resolver.rs
//! Completeness resolution: every loaded project ends up completed,
//! unresolvable or duplicate.
//!
//! A project is complete once its parent and every aggregator import can be
//! found, either through the lookup chain (session store, then projects
//! completed this run, then ancestors staged for the current project, then
//! projects still pending) or by locating and recursively resolving the
//! missing descriptor. Newly located ancestors join the completed set only
//! together with the project that needed them.

use crate::error::PomError;
use crate::gav::Gav;
use crate::pom::interpolate;
use crate::pom::{DescriptorLoader, DescriptorLocator, Project};
use crate::store::{ProjectLookup, ProjectStore};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A project that did not make it into the completed set, and why.
#[derive(Debug)]
pub struct ProjectFailure {
    pub project: Project,
    pub error: PomError,
}

/// Final classification of one resolution run.
#[derive(Debug, Default)]
pub struct ResolutionOutcome {
    /// Completed projects, scanned and external, in GAV order.
    pub completed: Vec<Project>,
    pub unresolvable: Vec<ProjectFailure>,
    pub duplicates: Vec<ProjectFailure>,
}

pub struct CompletenessResolver<'a> {
    store: &'a ProjectStore,
    loader: &'a DescriptorLoader,
    locator: &'a dyn DescriptorLocator,
    profiles: &'a [String],
    loaded: VecDeque<Project>,
    completed: BTreeMap<Gav, Project>,
    staged: Vec<Project>,
    unresolvable: Vec<ProjectFailure>,
    duplicates: Vec<ProjectFailure>,
}

impl<'a> CompletenessResolver<'a> {
    #[must_use]
    pub fn new(
        store: &'a ProjectStore,
        loader: &'a DescriptorLoader,
        locator: &'a dyn DescriptorLocator,
        profiles: &'a [String],
    ) -> Self {
        Self {
            store,
            loader,
            locator,
            profiles,
            loaded: VecDeque::new(),
            completed: BTreeMap::new(),
            staged: Vec::new(),
            unresolvable: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Queues projects for resolution. They are visible as forward
    /// references to each other until classified.
    pub fn extend<I>(&mut self, projects: I)
    where
        I: IntoIterator<Item = Project>,
    {
        self.loaded.extend(projects);
    }

    /// Classifies every queued project, in queue order.
    #[must_use]
    pub fn resolve_all(mut self) -> ResolutionOutcome {
        while let Some(project) = self.loaded.pop_front() {
            self.classify(project);
        }
        ResolutionOutcome {
            completed: self.completed.into_values().collect(),
            unresolvable: self.unresolvable,
            duplicates: self.duplicates,
        }
    }

    fn classify(&mut self, project: Project) {
        if let Some(existing) = self.canonical(project.gav()) {
            if !existing.same_instance(&project) {
                let error = PomError::DuplicateProject {
                    gav: project.gav().clone(),
                    canonical: existing.path().to_path_buf(),
                };
                tracing::warn!(gav = %project.gav(), path = %project.path().display(), "{error}");
                self.duplicates.push(ProjectFailure { project, error });
                return;
            }
        }

        let mut in_progress = BTreeSet::new();
        match self.resolve_prerequisites(&project, &mut in_progress) {
            Ok(()) => {
                for ancestor in std::mem::take(&mut self.staged) {
                    tracing::debug!(gav = %ancestor.gav(), dependent = %project.gav(), "resolved external project");
                    self.completed.insert(ancestor.gav().clone(), ancestor);
                }
                self.completed.insert(project.gav().clone(), project);
            }
            Err(error) => {
                self.staged.clear();
                tracing::warn!(gav = %project.gav(), "{error}");
                self.unresolvable.push(ProjectFailure { project, error });
            }
        }
    }

    /// Project already owning `gav` for duplicate detection: session store
    /// first, then this run's completed set.
    fn canonical(&self, gav: &Gav) -> Option<&Project> {
        self.store.for_gav(gav).or_else(|| self.completed.get(gav))
    }

    /// Resolves the parent first, then aggregator imports interpolated with
    /// whatever ancestors are known by then. Stops at the first failure.
    fn resolve_prerequisites(
        &mut self,
        project: &Project,
        in_progress: &mut BTreeSet<Gav>,
    ) -> Result<(), PomError> {
        let entered = in_progress.insert(project.gav().clone());

        let result = self.resolve_parent_then_imports(project, in_progress);

        if entered {
            in_progress.remove(project.gav());
        }
        result
    }

    fn resolve_parent_then_imports(
        &mut self,
        project: &Project,
        in_progress: &mut BTreeSet<Gav>,
    ) -> Result<(), PomError> {
        if let Some(parent) = project.parent_gav() {
            self.require(parent, project, in_progress)?;
        }
        let imports = interpolate::aggregator_imports(project, self.profiles, &*self);
        for import in &imports {
            self.require(import, project, in_progress)?;
        }
        Ok(())
    }

    /// Makes `gav` available, loading and resolving it if needed. A GAV that
    /// is currently being resolved counts as available, which breaks cycles.
    fn require(
        &mut self,
        gav: &Gav,
        dependent: &Project,
        in_progress: &mut BTreeSet<Gav>,
    ) -> Result<(), PomError> {
        if in_progress.contains(gav) || self.project(gav).is_some() {
            return Ok(());
        }

        let unresolved = |reason: String| PomError::UnresolvedPrerequisite {
            prerequisite: gav.clone(),
            dependent: dependent.gav().clone(),
            reason,
        };

        let Some(path) = self.locator.locate(gav, Some(dependent)) else {
            return Err(unresolved("descriptor not found".to_string()));
        };
        let external = self
            .loader
            .load(&path, true)
            .map_err(|e| unresolved(e.to_string()))?;
        if external.gav() != gav {
            return Err(unresolved(format!(
                "{} declares {} instead",
                path.display(),
                external.gav()
            )));
        }

        self.resolve_prerequisites(&external, in_progress)
            .map_err(|e| unresolved(e.to_string()))?;
        self.staged.push(external);
        Ok(())
    }
}

impl ProjectLookup for CompletenessResolver<'_> {
    fn project(&self, gav: &Gav) -> Option<&Project> {
        self.store
            .for_gav(gav)
            .or_else(|| self.completed.get(gav))
            .or_else(|| self.staged.iter().find(|p| p.gav() == gav))
            .or_else(|| self.loaded.iter().find(|p| p.gav() == gav))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::parser::{DescriptorParser, ParsedDescriptor};
    use crate::pom::PomModel;
    use crate::pom::{DependencyDecl, ParentRef};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Parser backed by in-memory descriptors keyed by path.
    struct FakeParser(HashMap<PathBuf, ParsedDescriptor>);

    impl DescriptorParser for FakeParser {
        fn parse(&self, path: &Path) -> crate::error::Result<ParsedDescriptor> {
            self.0.get(path).cloned().ok_or_else(|| PomError::Parse {
                path: path.to_path_buf(),
                message: "unknown fixture".into(),
            })
        }
    }

    /// Locator resolving `g:a:v` to `repo/g:a:v`, counting lookups.
    struct FakeLocator {
        known: BTreeSet<Gav>,
        calls: RefCell<usize>,
    }

    impl DescriptorLocator for FakeLocator {
        fn locate(&self, gav: &Gav, _hint: Option<&Project>) -> Option<PathBuf> {
            *self.calls.borrow_mut() += 1;
            self.known.contains(gav).then(|| repo_path(gav))
        }
    }

    fn repo_path(gav: &Gav) -> PathBuf {
        PathBuf::from(format!("repo/{gav}"))
    }

    fn gav(s: &str) -> Gav {
        s.parse().unwrap_or_else(|e| panic!("{e}"))
    }

    fn descriptor(g: &str, parent: Option<&str>, imports: &[&str]) -> ParsedDescriptor {
        let gav = gav(g);
        let parent = parent.map(gav_of);
        let mut model = PomModel {
            parent: parent.clone().map(|gav| ParentRef {
                gav,
                relative_path: None,
            }),
            ..PomModel::default()
        };
        for import in imports {
            let i = gav_of(import);
            model.declarations.dependency_management.push(DependencyDecl {
                group_id: i.group_id,
                artifact_id: i.artifact_id,
                version: Some(i.version),
                scope: Some("import".into()),
                kind: Some("pom".into()),
                ..DependencyDecl::default()
            });
        }
        ParsedDescriptor { gav, parent, model }
    }

    fn gav_of(s: &str) -> Gav {
        gav(s)
    }

    struct Fixture {
        loader: DescriptorLoader,
        locator: FakeLocator,
        scanned: Vec<PathBuf>,
    }

    /// `scanned` descriptors live under `ws/`, `external` ones in the fake repository.
    fn fixture(scanned: Vec<ParsedDescriptor>, external: Vec<ParsedDescriptor>) -> Fixture {
        let mut files = HashMap::new();
        let mut scanned_paths = Vec::new();
        for d in scanned {
            let path = PathBuf::from(format!("ws/{}/pom.xml", d.gav.artifact_id));
            scanned_paths.push(path.clone());
            files.insert(path, d);
        }
        let mut known = BTreeSet::new();
        for d in external {
            known.insert(d.gav.clone());
            files.insert(repo_path(&d.gav), d);
        }
        Fixture {
            loader: DescriptorLoader::new(Box::new(FakeParser(files))),
            locator: FakeLocator {
                known,
                calls: RefCell::new(0),
            },
            scanned: scanned_paths,
        }
    }

    fn run(fx: &Fixture, store: &ProjectStore) -> ResolutionOutcome {
        let mut resolver = CompletenessResolver::new(store, &fx.loader, &fx.locator, &[]);
        let projects: Vec<Project> = fx
            .scanned
            .iter()
            .filter_map(|p| fx.loader.load(p, false).ok())
            .collect();
        resolver.extend(projects);
        resolver.resolve_all()
    }

    fn completed_gavs(outcome: &ResolutionOutcome) -> Vec<String> {
        outcome.completed.iter().map(|p| p.gav().to_string()).collect()
    }

    #[test]
    fn test_project_without_prerequisites_completes_immediately() {
        let fx = fixture(vec![descriptor("g:a:1", None, &[])], vec![]);
        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(completed_gavs(&outcome), vec!["g:a:1"]);
        assert_eq!(*fx.locator.calls.borrow(), 0);
    }

    #[test]
    fn test_missing_parent_is_unresolvable() {
        let fx = fixture(vec![descriptor("g:child:1", Some("g:parent:1"), &[])], vec![]);
        let outcome = run(&fx, &ProjectStore::new());
        assert!(outcome.completed.is_empty());
        assert_eq!(outcome.unresolvable.len(), 1);
        match &outcome.unresolvable[0].error {
            PomError::UnresolvedPrerequisite {
                prerequisite,
                dependent,
                ..
            } => {
                assert_eq!(prerequisite, &gav("g:parent:1"));
                assert_eq!(dependent, &gav("g:child:1"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_external_ancestors_complete_with_dependent() {
        let fx = fixture(
            vec![descriptor("g:child:1", Some("g:parent:1"), &[])],
            vec![
                descriptor("g:parent:1", Some("g:root:1"), &["g:bom:1"]),
                descriptor("g:root:1", None, &[]),
                descriptor("g:bom:1", None, &[]),
            ],
        );
        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(
            completed_gavs(&outcome),
            vec!["g:bom:1", "g:child:1", "g:parent:1", "g:root:1"]
        );
        let externals = outcome.completed.iter().filter(|p| p.is_external()).count();
        assert_eq!(externals, 3);
    }

    #[test]
    fn test_failed_ancestor_chain_stages_nothing() {
        let fx = fixture(
            vec![descriptor("g:child:1", Some("g:parent:1"), &["g:bom:1"])],
            vec![descriptor("g:parent:1", None, &[])],
        );
        let outcome = run(&fx, &ProjectStore::new());
        assert!(outcome.completed.is_empty(), "parent must not complete without its dependent");
        assert_eq!(outcome.unresolvable.len(), 1);
    }

    #[test]
    fn test_forward_reference_within_batch() {
        let fx = fixture(
            vec![
                descriptor("g:child:1", Some("g:parent:1"), &[]),
                descriptor("g:parent:1", None, &[]),
            ],
            vec![],
        );
        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(completed_gavs(&outcome), vec!["g:child:1", "g:parent:1"]);
        assert_eq!(*fx.locator.calls.borrow(), 0);
    }

    #[test]
    fn test_cyclic_imports_terminate() {
        let fx = fixture(
            vec![descriptor("g:a:1", None, &["g:b:1"])],
            vec![descriptor("g:b:1", None, &["g:a:1"])],
        );
        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(completed_gavs(&outcome), vec!["g:a:1", "g:b:1"]);
    }

    #[test]
    fn test_cyclic_imports_both_scanned() {
        let fx = fixture(
            vec![
                descriptor("g:a:1", None, &["g:b:1"]),
                descriptor("g:b:1", None, &["g:a:1"]),
            ],
            vec![],
        );
        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(outcome.completed.len(), 2);
        assert!(outcome.unresolvable.is_empty());
    }

    #[test]
    fn test_duplicate_against_store_keeps_canonical() {
        let fx = fixture(vec![descriptor("g:a:1", None, &[])], vec![]);
        let mut store = ProjectStore::new();
        let canonical = Project::new(
            gav("g:a:1"),
            None,
            PathBuf::from("elsewhere/pom.xml"),
            false,
            PomModel::default(),
        );
        assert!(store.add(canonical).is_ok());

        let outcome = run(&fx, &store);
        assert!(outcome.completed.is_empty());
        assert_eq!(outcome.duplicates.len(), 1);
        assert!(matches!(
            &outcome.duplicates[0].error,
            PomError::DuplicateProject { canonical, .. } if canonical == Path::new("elsewhere/pom.xml")
        ));
    }

    #[test]
    fn test_same_file_reanalysed_is_not_duplicate() {
        let fx = fixture(vec![descriptor("g:a:1", None, &[])], vec![]);
        let mut store = ProjectStore::new();
        if let Some(project) = fx.scanned.first().and_then(|p| fx.loader.load(p, false).ok()) {
            assert!(store.add(project).is_ok());
        }
        let outcome = run(&fx, &store);
        assert_eq!(outcome.completed.len(), 1);
        assert!(outcome.duplicates.is_empty());
    }

    #[test]
    fn test_duplicate_within_batch_first_wins() {
        let mut second = descriptor("g:a:1", None, &[]);
        second.model.artifact_id = Some("copy".into());
        let fx = fixture(vec![descriptor("g:a:1", None, &[])], vec![]);
        let mut files = HashMap::new();
        files.insert(PathBuf::from("ws/a/pom.xml"), descriptor("g:a:1", None, &[]));
        files.insert(PathBuf::from("ws/copy/pom.xml"), second);
        let loader = DescriptorLoader::new(Box::new(FakeParser(files)));

        let store = ProjectStore::new();
        let mut resolver = CompletenessResolver::new(&store, &loader, &fx.locator, &[]);
        for path in ["ws/a/pom.xml", "ws/copy/pom.xml"] {
            if let Ok(p) = loader.load(Path::new(path), false) {
                resolver.extend([p]);
            }
        }
        let outcome = resolver.resolve_all();
        assert_eq!(outcome.completed.len(), 1);
        assert_eq!(outcome.completed[0].path(), Path::new("ws/a/pom.xml"));
        assert_eq!(outcome.duplicates.len(), 1);
    }

    #[test]
    fn test_located_descriptor_with_wrong_gav_is_unresolvable() {
        let mut fx = fixture(vec![descriptor("g:child:1", Some("g:parent:1"), &[])], vec![]);
        fx.locator.known.insert(gav("g:parent:1"));
        let mut files = HashMap::new();
        files.insert(PathBuf::from("ws/child/pom.xml"), descriptor("g:child:1", Some("g:parent:1"), &[]));
        files.insert(repo_path(&gav("g:parent:1")), descriptor("g:other:1", None, &[]));
        fx.loader = DescriptorLoader::new(Box::new(FakeParser(files)));

        let outcome = run(&fx, &ProjectStore::new());
        assert_eq!(outcome.unresolvable.len(), 1);
        assert!(outcome.completed.is_empty());
    }
}
