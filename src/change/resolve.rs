// src/change/resolve.rs
use super::{ChangeCause, ChangeSet, GraphChange, ProjectChange};
use crate::error::PomError;
use crate::store::ProjectStore;

const RESOLVER_ID: &str = "resolver";

/// What a resolution pass did with the drained graph changes.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// Graph changes removed from the changeset.
    pub drained: usize,
    /// Project changes not present before the pass.
    pub project_changes: usize,
    /// Changes whose source GAV has no project in the store.
    pub unknown: Vec<PomError>,
    /// Relation changes, which do not resolve to descriptor edits yet.
    pub unsupported: Vec<GraphChange>,
}

/// Drains `graph_changes` and turns each rename into edits of the renamed
/// project's own `groupId`, `artifactId` and `version`. Nothing is re-queued.
pub fn resolve(
    graph_changes: &mut ChangeSet<GraphChange>,
    project_changes: &mut ChangeSet<ProjectChange>,
    store: &ProjectStore,
) -> ResolveReport {
    let drained = graph_changes.drain();
    let mut report = ResolveReport {
        drained: drained.len(),
        ..ResolveReport::default()
    };
    tracing::info!(count = report.drained, "resolving graph changes");

    for entry in drained {
        let change = entry.change;
        let Some(project) = store.for_gav(change.source()) else {
            let error = PomError::ChangeResolution {
                gav: change.source().clone(),
                change: change.to_string(),
            };
            tracing::warn!("{error}");
            report.unknown.push(error);
            continue;
        };

        match change {
            GraphChange::Gav { ref new, .. } => {
                let edits = [
                    ProjectChange::set(project, "project", "groupId", &new.group_id),
                    ProjectChange::set(project, "project", "artifactId", &new.artifact_id),
                    ProjectChange::set(project, "project", "version", &new.version),
                ];
                for edit in edits {
                    if project_changes.add_with_cause(edit, ChangeCause::new(RESOLVER_ID, &change)) {
                        report.project_changes += 1;
                    }
                }
            }
            relation @ GraphChange::Relation { .. } => {
                tracing::warn!("relation changes cannot be resolved yet, dropping {relation}");
                report.unsupported.push(relation);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gav::Gav;
    use crate::pom::{PomModel, Project};
    use std::path::PathBuf;

    fn store_with(gav: &Gav) -> ProjectStore {
        let mut store = ProjectStore::new();
        let project = Project::new(
            gav.clone(),
            None,
            PathBuf::from("a/pom.xml"),
            false,
            PomModel::default(),
        );
        assert!(store.add(project).is_ok());
        store
    }

    #[test]
    fn test_rename_yields_three_edits() {
        let old = Gav::new("g", "a", "1.0");
        let store = store_with(&old);
        let mut graph_changes = ChangeSet::new();
        let mut project_changes = ChangeSet::new();
        graph_changes.add(GraphChange::gav(old.clone(), Gav::new("h", "b", "2.0")));

        let report = resolve(&mut graph_changes, &mut project_changes, &store);

        assert_eq!(report.drained, 1);
        assert_eq!(report.project_changes, 3);
        assert!(graph_changes.is_empty());
        let values: Vec<(String, Option<String>)> = project_changes
            .changes()
            .map(|c| (c.node_name.clone(), c.value().map(str::to_string)))
            .collect();
        assert_eq!(
            values,
            vec![
                ("groupId".into(), Some("h".into())),
                ("artifactId".into(), Some("b".into())),
                ("version".into(), Some("2.0".into())),
            ]
        );
        assert!(project_changes.changes().all(|c| c.location == "project"));
    }

    #[test]
    fn test_unknown_gav_is_dropped() {
        let store = store_with(&Gav::new("g", "a", "1.0"));
        let mut graph_changes = ChangeSet::new();
        let mut project_changes = ChangeSet::new();
        graph_changes.add(GraphChange::gav(Gav::new("x", "y", "1"), Gav::new("x", "y", "2")));

        let report = resolve(&mut graph_changes, &mut project_changes, &store);

        assert_eq!(report.unknown.len(), 1);
        assert!(graph_changes.is_empty());
        assert!(project_changes.is_empty());
    }

    #[test]
    fn test_relation_change_is_drained_without_edits() -> anyhow::Result<()> {
        let source = Gav::new("g", "a", "1.0");
        let store = store_with(&source);
        let mut graph_changes = ChangeSet::new();
        let mut project_changes = ChangeSet::new();
        graph_changes.add(GraphChange::relation(source, "parent".parse()?, None));

        let report = resolve(&mut graph_changes, &mut project_changes, &store);

        assert_eq!(report.unsupported.len(), 1);
        assert!(graph_changes.is_empty());
        assert!(project_changes.is_empty());
        Ok(())
    }
}
