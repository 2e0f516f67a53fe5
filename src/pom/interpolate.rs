// src/pom/interpolate.rs
//! Property interpolation and local dependency resolution.
//!
//! Every function works against the best context currently available: the
//! ancestors reachable through the given [`ProjectLookup`]. Missing ancestors
//! simply contribute nothing, so results may be partial while a batch is
//! still being resolved.

use super::{Declarations, DependencyDecl, Project, Scope};
use crate::error::{PomError, Result};
use crate::gav::Gav;
use crate::store::ProjectLookup;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

/// groupId used for plugins declared without one.
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

const MAX_DEPTH: usize = 10;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|_| panic!("Invalid Regex")));

pub type Properties = BTreeMap<String, String>;

/// Replaces `${name}` placeholders, following nested references a bounded
/// number of times. Unknown placeholders stay literal.
#[must_use]
pub fn interpolate(value: &str, props: &Properties) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_DEPTH {
        if !PLACEHOLDER_RE.is_match(&current) {
            break;
        }
        let next = PLACEHOLDER_RE
            .replace_all(&current, |caps: &Captures| {
                props
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[must_use]
pub fn has_placeholder(value: &str) -> bool {
    PLACEHOLDER_RE.is_match(value)
}

/// Declared properties plus the `project.*` built-ins of one descriptor.
#[must_use]
pub fn own_properties(gav: &Gav, parent: Option<&Gav>, decls: &Declarations) -> Properties {
    let mut props = decls.properties.clone();
    insert_builtins(&mut props, gav, parent);
    props
}

fn insert_builtins(props: &mut Properties, gav: &Gav, parent: Option<&Gav>) {
    for prefix in ["project", "pom"] {
        props.insert(format!("{prefix}.groupId"), gav.group_id.clone());
        props.insert(format!("{prefix}.artifactId"), gav.artifact_id.clone());
        props.insert(format!("{prefix}.version"), gav.version.clone());
    }
    if let Some(parent) = parent {
        props.insert("project.parent.groupId".into(), parent.group_id.clone());
        props.insert("project.parent.artifactId".into(), parent.artifact_id.clone());
        props.insert("project.parent.version".into(), parent.version.clone());
    }
}

/// Effective properties: ancestors first, then the project, then its
/// explicitly activated profiles.
#[must_use]
pub fn properties(project: &Project, profiles: &[String], lookup: &dyn ProjectLookup) -> Properties {
    let mut visited = BTreeSet::from([project.gav().clone()]);
    collect_properties(project, profiles, lookup, &mut visited)
}

fn collect_properties(
    project: &Project,
    profiles: &[String],
    lookup: &dyn ProjectLookup,
    visited: &mut BTreeSet<Gav>,
) -> Properties {
    let mut props = Properties::new();
    if let Some(parent_gav) = project.parent_gav() {
        if visited.insert(parent_gav.clone()) {
            if let Some(parent) = lookup.project(parent_gav) {
                props = collect_properties(parent, profiles, lookup, visited);
            }
        }
    }
    for decls in project.model().active_declarations(profiles) {
        props.extend(decls.properties.clone());
    }
    insert_builtins(&mut props, project.gav(), project.parent_gav());
    props
}

/// Identity of a dependency inside a dependency-management section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub kind: String,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.kind)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// A dependency after interpolation and management lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub gav: Gav,
    pub scope: Scope,
    pub classifier: Option<String>,
    pub kind: String,
}

struct InterpolatedDependency {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    scope: Option<String>,
    classifier: Option<String>,
    kind: String,
}

impl InterpolatedDependency {
    fn new(decl: &DependencyDecl, props: &Properties) -> Self {
        let opt = |v: &Option<String>| v.as_deref().map(|s| interpolate(s, props));
        Self {
            group_id: interpolate(&decl.group_id, props),
            artifact_id: interpolate(&decl.artifact_id, props),
            version: opt(&decl.version),
            scope: opt(&decl.scope),
            classifier: opt(&decl.classifier),
            kind: opt(&decl.kind).unwrap_or_else(|| "jar".to_string()),
        }
    }

    fn key(&self) -> DependencyKey {
        DependencyKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            kind: self.kind.clone(),
        }
    }

    fn is_aggregator_import(&self) -> bool {
        self.scope.as_deref().and_then(Scope::parse) == Some(Scope::Import) && self.kind == "pom"
    }

    fn gav(&self) -> Gav {
        Gav {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone().unwrap_or_default(),
        }
    }
}

/// Aggregator imports (`scope=import`, `type=pom`) declared in the project's
/// dependency management, including explicitly activated profiles.
#[must_use]
pub fn aggregator_imports(project: &Project, profiles: &[String], lookup: &dyn ProjectLookup) -> Vec<Gav> {
    let props = properties(project, profiles, lookup);
    project
        .model()
        .active_declarations(profiles)
        .flat_map(|decls| decls.dependency_management.iter())
        .map(|d| InterpolatedDependency::new(d, &props))
        .filter(InterpolatedDependency::is_aggregator_import)
        .map(|d| d.gav())
        .collect()
}

#[derive(Debug, Clone)]
struct Managed {
    version: Option<String>,
    scope: Option<String>,
}

/// Own entries win over inherited ones, which win over imported ones.
fn managed_dependencies(
    project: &Project,
    profiles: &[String],
    lookup: &dyn ProjectLookup,
    visited: &mut BTreeSet<Gav>,
) -> BTreeMap<DependencyKey, Managed> {
    let props = properties(project, profiles, lookup);
    let mut managed = BTreeMap::new();
    let mut imports = Vec::new();

    for decls in project.model().active_declarations(profiles) {
        for decl in &decls.dependency_management {
            let dep = InterpolatedDependency::new(decl, &props);
            if dep.is_aggregator_import() {
                imports.push(dep.gav());
                continue;
            }
            managed.entry(dep.key()).or_insert(Managed {
                version: dep.version,
                scope: dep.scope,
            });
        }
    }

    let sources = project.parent_gav().cloned().into_iter().chain(imports);
    for gav in sources {
        if !visited.insert(gav.clone()) {
            continue;
        }
        if let Some(other) = lookup.project(&gav) {
            for (key, entry) in managed_dependencies(other, profiles, lookup, visited) {
                managed.entry(key).or_insert(entry);
            }
        }
    }
    managed
}

/// Dependencies declared by the project itself (not inherited, not
/// transitive), with versions and scopes completed from dependency
/// management.
///
/// # Errors
/// Returns `PomError::GraphTransaction` when a dependency has no resolvable
/// version, keeps an unresolved placeholder, or declares an unknown scope.
pub fn local_dependencies(
    project: &Project,
    profiles: &[String],
    lookup: &dyn ProjectLookup,
) -> Result<Vec<ResolvedDependency>> {
    let props = properties(project, profiles, lookup);
    let mut visited = BTreeSet::from([project.gav().clone()]);
    let managed = managed_dependencies(project, profiles, lookup, &mut visited);
    let mut resolved: BTreeMap<DependencyKey, ResolvedDependency> = BTreeMap::new();

    for decls in project.model().active_declarations(profiles) {
        for decl in &decls.dependencies {
            let dep = InterpolatedDependency::new(decl, &props);
            let key = dep.key();
            let entry = managed.get(&key);

            let version = dep
                .version
                .clone()
                .or_else(|| entry.and_then(|m| m.version.clone()))
                .ok_or_else(|| staging_error(project, format!("no version for dependency {key}")))?;
            let coordinates = format!("{}:{}:{version}", dep.group_id, dep.artifact_id);
            if has_placeholder(&coordinates) {
                return Err(staging_error(
                    project,
                    format!("unresolved property in dependency {coordinates}"),
                ));
            }

            let raw_scope = dep
                .scope
                .clone()
                .or_else(|| entry.and_then(|m| m.scope.clone()))
                .unwrap_or_else(|| Scope::Compile.to_string());
            let scope = Scope::parse(&raw_scope).ok_or_else(|| {
                staging_error(project, format!("unknown scope '{raw_scope}' for dependency {key}"))
            })?;

            resolved.insert(
                key,
                ResolvedDependency {
                    gav: Gav {
                        group_id: dep.group_id,
                        artifact_id: dep.artifact_id,
                        version,
                    },
                    scope,
                    classifier: dep.classifier,
                    kind: dep.kind,
                },
            );
        }
    }
    Ok(resolved.into_values().collect())
}

fn staging_error(project: &Project, reason: String) -> PomError {
    PomError::GraphTransaction {
        gav: project.gav().clone(),
        reason,
    }
}

type PluginKey = (String, String);

/// Plugin versions from plugin management and plugins declared with a
/// version, own declarations first, then ancestors.
fn managed_plugins(
    project: &Project,
    profiles: &[String],
    lookup: &dyn ProjectLookup,
    visited: &mut BTreeSet<Gav>,
) -> BTreeMap<PluginKey, String> {
    let props = properties(project, profiles, lookup);
    let mut managed = BTreeMap::new();
    for decls in project.model().active_declarations(profiles) {
        for plugin in decls.plugin_management.iter().chain(&decls.plugins) {
            let Some(version) = plugin.version.as_deref() else { continue };
            let group = plugin.group_id.as_deref().unwrap_or(DEFAULT_PLUGIN_GROUP);
            managed
                .entry((interpolate(group, &props), interpolate(&plugin.artifact_id, &props)))
                .or_insert_with(|| interpolate(version, &props));
        }
    }
    if let Some(parent_gav) = project.parent_gav() {
        if visited.insert(parent_gav.clone()) {
            if let Some(parent) = lookup.project(parent_gav) {
                for (key, version) in managed_plugins(parent, profiles, lookup, visited) {
                    managed.entry(key).or_insert(version);
                }
            }
        }
    }
    managed
}

/// Build plugins declared by the project itself. Plugins whose version
/// cannot be resolved are skipped.
#[must_use]
pub fn local_plugins(project: &Project, profiles: &[String], lookup: &dyn ProjectLookup) -> Vec<Gav> {
    let props = properties(project, profiles, lookup);
    let mut visited = BTreeSet::from([project.gav().clone()]);
    let managed = managed_plugins(project, profiles, lookup, &mut visited);
    let mut plugins = BTreeMap::new();

    for decls in project.model().active_declarations(profiles) {
        for plugin in &decls.plugins {
            let group = plugin.group_id.as_deref().unwrap_or(DEFAULT_PLUGIN_GROUP);
            let key = (interpolate(group, &props), interpolate(&plugin.artifact_id, &props));
            let version = plugin
                .version
                .as_deref()
                .map(|v| interpolate(v, &props))
                .or_else(|| managed.get(&key).cloned());

            match version {
                Some(v) if !has_placeholder(&v) && !has_placeholder(&key.0) && !has_placeholder(&key.1) => {
                    let gav = Gav {
                        group_id: key.0.clone(),
                        artifact_id: key.1.clone(),
                        version: v,
                    };
                    plugins.insert(key, gav);
                }
                _ => tracing::debug!(project = %project.gav(), plugin = %key.1, "skipping plugin without resolvable version"),
            }
        }
    }
    plugins.into_values().collect()
}
