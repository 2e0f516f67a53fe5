// src/cli/handlers.rs
use crate::change::{DryRunEditor, GraphChange};
use crate::config::Config;
use crate::exit::PomGraphExit;
use crate::filter::GavFilter;
use crate::gav::Gav;
use crate::graph::RelationKey;
use crate::reporting;
use crate::session::{self, Session, SessionState};
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// The session of the current directory, persisted under `.pomgraph/`.
pub struct Workspace {
    root: PathBuf,
    pub session: Session,
}

impl Workspace {
    /// Opens the saved session of the current directory, re-analysing the
    /// recorded roots with `config` plus the saved settings.
    ///
    /// # Errors
    /// Returns error if an existing session file cannot be read.
    pub fn open(config: Config) -> Result<Self> {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::open_at(&root, config)
    }

    /// # Errors
    /// Returns error if an existing session file cannot be read.
    pub fn open_at(root: &Path, config: Config) -> Result<Self> {
        let path = session::state_file_path(root);
        let state = if path.is_file() {
            SessionState::load(&path)?
        } else {
            SessionState::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            session: Session::restore(config, state),
        })
    }

    /// # Errors
    /// Returns error if the session file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.session
            .state()
            .save(&session::state_file_path(&self.root))
    }
}

/// Analyses `dirs` after folding the command's profiles, repositories and
/// ignores into the session config, where they persist.
pub fn handle_analyze(
    workspace: &mut Workspace,
    dirs: &[PathBuf],
    profiles: &[String],
    repositories: Vec<PathBuf>,
    ignores: &[String],
) -> PomGraphExit {
    let config = workspace.session.config_mut();
    for profile in profiles {
        config.add_profile(profile);
    }
    for ignore in ignores {
        config.add_ignore(ignore);
    }
    for repository in repositories {
        if !config.repositories.contains(&repository) {
            config.repositories.push(repository);
        }
    }

    let mut exit = PomGraphExit::Success;
    for dir in dirs {
        let report = workspace.session.analyze(dir);
        reporting::print_analysis(&report);
        if report.has_problems() {
            exit = PomGraphExit::AnalysisIncomplete;
        }
    }
    exit
}

/// # Errors
/// Returns error if `gav` does not parse.
pub fn handle_graph(workspace: &Workspace, gav: Option<&str>) -> Result<PomGraphExit> {
    let focus = gav.map(str::parse::<Gav>).transpose()?;
    reporting::print_graph(workspace.session.graph(), focus.as_ref());
    Ok(PomGraphExit::Success)
}

#[must_use]
pub fn handle_list(workspace: &Workspace) -> PomGraphExit {
    reporting::print_changes(&workspace.session.list_changes());
    PomGraphExit::Success
}

pub fn handle_process(workspace: &mut Workspace) -> PomGraphExit {
    println!("Processing changes...");
    let added = workspace.session.process_changes();
    println!(
        "Done! {} new graph changes. Use 'change list' to see the changesets.",
        added.to_string().green()
    );
    PomGraphExit::Success
}

pub fn handle_resolve(workspace: &mut Workspace) -> PomGraphExit {
    let report = workspace.session.resolve_changes();
    reporting::print_resolve(&report);
    PomGraphExit::Success
}

pub fn handle_apply(workspace: &mut Workspace) -> PomGraphExit {
    let mut editor = DryRunEditor::default();
    let report = workspace.session.apply_changes(&mut editor);
    reporting::print_apply(&report, &editor.performed);
    if report.failed.is_empty() {
        PomGraphExit::Success
    } else {
        PomGraphExit::Error
    }
}

pub fn handle_clear(workspace: &mut Workspace) -> PomGraphExit {
    workspace.session.clear_changes();
    println!("changesets cleared");
    PomGraphExit::Success
}

/// # Errors
/// Returns error if either GAV does not parse.
pub fn handle_gav(workspace: &mut Workspace, source: &str, new: &str) -> Result<PomGraphExit> {
    let (source, new): (Gav, Gav) = (source.parse()?, new.parse()?);
    report_added(workspace.session.add_gav_change(source, new));
    Ok(PomGraphExit::Success)
}

/// Stages a relation retarget, or a removal when `target` is `None`.
///
/// # Errors
/// Returns error if a GAV or the relation key does not parse.
pub fn handle_relation(
    workspace: &mut Workspace,
    source: &str,
    key: &str,
    target: Option<&str>,
) -> Result<PomGraphExit> {
    let source: Gav = source.parse()?;
    let key: RelationKey = key.parse()?;
    let added = match target {
        Some(target) => workspace
            .session
            .add_relation_change(source, key, target.parse()?),
        None => workspace.session.remove_relation(source, key),
    };
    report_added(added);
    Ok(PomGraphExit::Success)
}

/// Stages `set` (with a value) or `remove` on every project matching `filter`.
///
/// # Errors
/// Returns error if the filter does not compile.
pub fn handle_set(
    workspace: &mut Workspace,
    filter: &str,
    location: &str,
    node: &str,
    value: Option<&str>,
) -> Result<PomGraphExit> {
    let filter = GavFilter::new(filter)?;
    let added = match value {
        Some(value) => workspace.session.set_project(&filter, location, node, value),
        None => workspace.session.remove_project(&filter, location, node),
    };
    if added.is_empty() {
        println!("no change added");
    }
    for change in added {
        println!("added change in change set: {change}");
    }
    Ok(PomGraphExit::Success)
}

/// # Errors
/// Returns error if either GAV does not parse.
pub fn handle_drop_gav(workspace: &mut Workspace, source: &str, new: &str) -> Result<PomGraphExit> {
    let change = GraphChange::gav(source.parse()?, new.parse()?);
    report_dropped(workspace.session.remove_graph_change(&change));
    Ok(PomGraphExit::Success)
}

/// # Errors
/// Returns error if a GAV or the relation key does not parse.
pub fn handle_drop_relation(
    workspace: &mut Workspace,
    source: &str,
    key: &str,
    target: Option<&str>,
) -> Result<PomGraphExit> {
    let target = target.map(str::parse::<Gav>).transpose()?;
    let change = GraphChange::relation(source.parse()?, key.parse()?, target);
    report_dropped(workspace.session.remove_graph_change(&change));
    Ok(PomGraphExit::Success)
}

/// # Errors
/// Returns error if the filter does not compile.
pub fn handle_drop_project(
    workspace: &mut Workspace,
    filter: &str,
    location: &str,
    node: &str,
) -> Result<PomGraphExit> {
    let filter = GavFilter::new(filter)?;
    let dropped = workspace
        .session
        .remove_project_changes(&filter, location, node);
    if dropped.is_empty() {
        println!("{}", "no matching change in change set".dimmed());
    }
    for change in dropped {
        println!("removed change from change set: {change}");
    }
    Ok(PomGraphExit::Success)
}

fn report_dropped(removed: bool) {
    if removed {
        println!("removed change from change set");
    } else {
        println!("{}", "change not in change set".dimmed());
    }
}

fn report_added(added: bool) {
    if added {
        println!("added change in change set");
    } else {
        println!("{}", "change already in change set".dimmed());
    }
}
