// tests/integration_changes.rs
use anyhow::Result;
use pomgraph_core::change::{DryRunEditor, GraphChange, ProjectOperation};
use pomgraph_core::cli::handlers::{self, Workspace};
use pomgraph_core::config::Config;
use pomgraph_core::filter::GavFilter;
use pomgraph_core::gav::Gav;
use pomgraph_core::session::Session;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn gav(s: &str) -> Gav {
    s.parse().unwrap_or_else(|e| panic!("{e}"))
}

/// parent 1.0-SNAPSHOT with module `core` (inherits the version) and `app`
/// depending on `core`.
fn workspace(root: &Path) -> Result<()> {
    write(
        root,
        "pom.xml",
        "<project><groupId>org</groupId><artifactId>parent</artifactId>\
         <version>1.0-SNAPSHOT</version><packaging>pom</packaging></project>",
    )?;
    write(
        root,
        "core/pom.xml",
        "<project><parent><groupId>org</groupId><artifactId>parent</artifactId>\
         <version>1.0-SNAPSHOT</version></parent><artifactId>core</artifactId></project>",
    )?;
    write(
        root,
        "app/pom.xml",
        "<project><groupId>org</groupId><artifactId>app</artifactId><version>2.0-SNAPSHOT</version>\
         <dependencies><dependency><groupId>org</groupId><artifactId>core</artifactId>\
         <version>1.0-SNAPSHOT</version></dependency></dependencies></project>",
    )?;
    Ok(())
}

fn analysed_session(tmp: &TempDir) -> Result<Session> {
    let ws = tmp.path().join("ws");
    workspace(&ws)?;
    let mut config = Config::new();
    config.repositories = Vec::new();
    let mut session = Session::new(config);
    let report = session.analyze(&ws);
    anyhow::ensure!(!report.has_problems(), "fixture did not analyse cleanly: {report:?}");
    Ok(session)
}

#[test]
fn test_gav_change_resolves_to_three_project_changes() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut session = analysed_session(&tmp)?;

    assert!(session.add_gav_change(gav("org:app:2.0-SNAPSHOT"), gav("org:app:2.0")));
    let report = session.resolve_changes();

    assert_eq!(report.drained, 1);
    assert!(session.graph_changes().is_empty());
    let listing = session.list_changes();
    let edits: Vec<(&str, Option<&str>)> = listing
        .project
        .iter()
        .map(|e| (e.change.node_name.as_str(), e.change.value()))
        .collect();
    assert_eq!(edits.len(), 3);
    assert!(edits.contains(&("groupId", Some("org"))));
    assert!(edits.contains(&("artifactId", Some("app"))));
    assert!(edits.contains(&("version", Some("2.0"))));
    assert!(listing
        .project
        .iter()
        .all(|e| e.change.path.ends_with("app/pom.xml")));
    Ok(())
}

#[test]
fn test_unknown_gav_change_is_drained() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut session = analysed_session(&tmp)?;

    session.add_gav_change(gav("org:ghost:1"), gav("org:ghost:2"));
    let report = session.resolve_changes();

    assert_eq!(report.unknown.len(), 1);
    assert!(session.graph_changes().is_empty());
    assert!(session.project_changes().is_empty());
    Ok(())
}

#[test]
fn test_release_propagates_over_passes() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut session = analysed_session(&tmp)?;
    session.add_gav_change(gav("org:app:2.0-SNAPSHOT"), gav("org:app:2.0"));

    // releaser: core must be released too.
    assert_eq!(session.process_changes(), 1);
    let core_release = GraphChange::gav(gav("org:core:1.0-SNAPSHOT"), gav("org:core:1.0"));
    assert!(session.graph_changes().contains(&core_release));

    // next pass: propagator retargets app -> core, releaser releases parent.
    session.process_changes();
    let retarget = GraphChange::relation(
        gav("org:app:2.0-SNAPSHOT"),
        "dependency:org:core:jar".parse()?,
        Some(gav("org:core:1.0")),
    );
    assert!(session.graph_changes().contains(&retarget));
    assert!(session
        .graph_changes()
        .contains(&GraphChange::gav(gav("org:parent:1.0-SNAPSHOT"), gav("org:parent:1.0"))));
    Ok(())
}

#[test]
fn test_opening_parent_moves_children() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut session = analysed_session(&tmp)?;
    session.add_gav_change(gav("org:parent:1.0-SNAPSHOT"), gav("org:parent:1.1-SNAPSHOT"));

    session.process_changes();

    assert!(session
        .graph_changes()
        .contains(&GraphChange::gav(gav("org:core:1.0-SNAPSHOT"), gav("org:core:1.1-SNAPSHOT"))));
    Ok(())
}

#[test]
fn test_filtered_project_changes_and_dry_run_apply() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut session = analysed_session(&tmp)?;

    let added = session.set_project(&GavFilter::new("org:*:*-SNAPSHOT")?, "properties", "release", "true");
    assert_eq!(added.len(), 3);
    let removed = session.remove_project(&GavFilter::new("org:app:*")?, "project", "description");
    assert!(matches!(removed.as_slice(), [c] if c.operation == ProjectOperation::Remove));

    let mut editor = DryRunEditor::default();
    let report = session.apply_changes(&mut editor);
    assert_eq!(report.applied.len(), 4);
    assert_eq!(editor.performed.len(), 4);
    assert!(session.project_changes().is_empty());
    Ok(())
}

#[test]
fn test_workspace_persists_changes_between_invocations() -> Result<()> {
    let tmp = TempDir::new()?;
    let ws = tmp.path().join("ws");
    workspace(&ws)?;
    write(tmp.path(), "pomgraph.toml", "repositories = []\n")?;

    {
        let mut first = Workspace::open_at(tmp.path(), Config::load_from(tmp.path())?)?;
        first.session.analyze(&ws);
        first
            .session
            .add_gav_change(gav("org:app:2.0-SNAPSHOT"), gav("org:app:2.0"));
        first.save()?;
    }
    assert!(tmp.path().join(".pomgraph/session.json").is_file());

    let second = Workspace::open_at(tmp.path(), Config::load_from(tmp.path())?)?;
    assert_eq!(second.session.store().len(), 3, "roots are analysed again");
    assert_eq!(second.session.graph_changes().len(), 1);
    Ok(())
}

fn reopen(root: &Path) -> Result<Workspace> {
    Workspace::open_at(root, Config::load_from(root)?)
}

#[test]
fn test_analyze_profiles_survive_next_invocation() -> Result<()> {
    let tmp = TempDir::new()?;
    let ws = tmp.path().join("ws");
    write(
        &ws,
        "app/pom.xml",
        "<project><groupId>org</groupId><artifactId>app</artifactId><version>1</version>\
         <profiles><profile><id>extra</id><dependencies><dependency><groupId>org</groupId>\
         <artifactId>extra</artifactId><version>1</version></dependency></dependencies>\
         </profile></profiles></project>",
    )?;
    write(tmp.path(), "pomgraph.toml", "repositories = []\n")?;

    let mut first = reopen(tmp.path())?;
    handlers::handle_analyze(&mut first, &[ws], &["extra".to_string()], Vec::new(), &[]);
    let app = gav("org:app:1");
    assert_eq!(first.session.graph().relations_from(&app).len(), 1);
    first.save()?;

    let second = reopen(tmp.path())?;
    assert_eq!(second.session.config().profiles, vec!["extra".to_string()]);
    assert_eq!(second.session.graph().relations_from(&app).len(), 1);
    Ok(())
}

#[test]
fn test_analyze_repository_survives_next_invocation() -> Result<()> {
    let tmp = TempDir::new()?;
    let repo = tmp.path().join("repo");
    write(
        &repo,
        "org/parent/1/parent-1.pom",
        "<project><groupId>org</groupId><artifactId>parent</artifactId><version>1</version>\
         <packaging>pom</packaging></project>",
    )?;
    let ws = tmp.path().join("ws");
    write(
        &ws,
        "child/pom.xml",
        "<project><parent><groupId>org</groupId><artifactId>parent</artifactId><version>1</version>\
         <relativePath>../none/pom.xml</relativePath></parent><artifactId>child</artifactId></project>",
    )?;
    write(tmp.path(), "pomgraph.toml", "repositories = []\n")?;

    let mut first = reopen(tmp.path())?;
    handlers::handle_analyze(&mut first, &[ws], &[], vec![repo], &[]);
    assert_eq!(first.session.store().len(), 2);
    first
        .session
        .add_gav_change(gav("org:child:1"), gav("org:child:2"));
    first.save()?;

    let mut second = reopen(tmp.path())?;
    assert_eq!(second.session.store().len(), 2);
    let report = second.session.resolve_changes();
    assert!(report.unknown.is_empty());
    assert_eq!(report.project_changes, 3);
    Ok(())
}

#[test]
fn test_analyze_ignores_survive_next_invocation() -> Result<()> {
    let tmp = TempDir::new()?;
    workspace(&tmp.path().join("ws"))?;
    write(tmp.path(), "pomgraph.toml", "repositories = []\n")?;
    let ws = tmp.path().join("ws");

    let mut first = reopen(tmp.path())?;
    let ignores = ["APP".to_string()];
    handlers::handle_analyze(&mut first, &[ws], &[], Vec::new(), &ignores);
    assert!(first.session.store().for_gav(&gav("org:app:2.0-SNAPSHOT")).is_none());
    assert_eq!(first.session.store().len(), 2);
    first.save()?;

    let second = reopen(tmp.path())?;
    assert_eq!(second.session.store().len(), 2);
    Ok(())
}

#[test]
fn test_drop_handlers_remove_single_changes() -> Result<()> {
    let tmp = TempDir::new()?;
    write(tmp.path(), "pomgraph.toml", "repositories = []\n")?;
    let mut ws = reopen(tmp.path())?;
    ws.session.add_gav_change(gav("org:app:1"), gav("org:app:2"));
    ws.session.remove_relation(gav("org:app:1"), "parent".parse()?);

    handlers::handle_drop_gav(&mut ws, "org:app:1", "org:app:2")?;
    assert_eq!(ws.session.graph_changes().len(), 1);
    handlers::handle_drop_relation(&mut ws, "org:app:1", "parent", Some("org:p:1"))?;
    assert_eq!(ws.session.graph_changes().len(), 1, "different target is another change");
    handlers::handle_drop_relation(&mut ws, "org:app:1", "parent", None)?;
    assert!(ws.session.graph_changes().is_empty());
    Ok(())
}
