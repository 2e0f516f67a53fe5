// src/cli/dispatch.rs
//! Command dispatch logic extracted from the binary.

use super::args::{ChangeCommand, Commands, DropCommand};
use super::handlers::{self, Workspace};
use crate::config::Config;
use crate::exit::PomGraphExit;
use anyhow::Result;

/// Executes the parsed command against the persisted session of the
/// current directory.
///
/// # Errors
/// Returns error if the session cannot be loaded or saved, or an argument
/// does not parse.
pub fn execute(command: Commands, config: Config) -> Result<PomGraphExit> {
    let mut workspace = Workspace::open(config)?;
    let exit = match command {
        Commands::Analyze {
            dirs,
            profiles,
            repositories,
            ignores,
        } => handlers::handle_analyze(&mut workspace, &dirs, &profiles, repositories, &ignores),
        Commands::Graph { gav } => handlers::handle_graph(&workspace, gav.as_deref())?,
        Commands::Change(change) => handle_change(&mut workspace, change)?,
    };
    workspace.save()?;
    Ok(exit)
}

fn handle_change(workspace: &mut Workspace, command: ChangeCommand) -> Result<PomGraphExit> {
    match command {
        ChangeCommand::List => Ok(handlers::handle_list(workspace)),
        ChangeCommand::Process => Ok(handlers::handle_process(workspace)),
        ChangeCommand::Resolve => Ok(handlers::handle_resolve(workspace)),
        ChangeCommand::Apply => Ok(handlers::handle_apply(workspace)),
        ChangeCommand::Clear => Ok(handlers::handle_clear(workspace)),
        ChangeCommand::Drop(drop) => handle_drop(workspace, drop),
        ChangeCommand::Gav { source, new } => handlers::handle_gav(workspace, &source, &new),
        ChangeCommand::Relation {
            source,
            key,
            target,
        } => handlers::handle_relation(workspace, &source, &key, Some(&target)),
        ChangeCommand::RemoveRelation { source, key } => {
            handlers::handle_relation(workspace, &source, &key, None)
        }
        ChangeCommand::Set {
            filter,
            location,
            node,
            value,
        } => handlers::handle_set(workspace, &filter, &location, &node, Some(&value)),
        ChangeCommand::Unset {
            filter,
            location,
            node,
        } => handlers::handle_set(workspace, &filter, &location, &node, None),
    }
}

fn handle_drop(workspace: &mut Workspace, command: DropCommand) -> Result<PomGraphExit> {
    match command {
        DropCommand::Gav { source, new } => handlers::handle_drop_gav(workspace, &source, &new),
        DropCommand::Relation {
            source,
            key,
            target,
        } => handlers::handle_drop_relation(workspace, &source, &key, target.as_deref()),
        DropCommand::Project {
            filter,
            location,
            node,
        } => handlers::handle_drop_project(workspace, &filter, &location, &node),
    }
}
