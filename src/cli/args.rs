// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pomgraph", version, about = "Maven project graph explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Debug-level diagnostics
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan directories for descriptors and add them to the session graph
    Analyze {
        #[arg(value_name = "DIR", required = true)]
        dirs: Vec<PathBuf>,
        /// Activate a profile (repeatable)
        #[arg(long = "profile", short = 'P', value_name = "ID")]
        profiles: Vec<String>,
        /// Additional local repository root (repeatable)
        #[arg(long = "repository", value_name = "DIR")]
        repositories: Vec<PathBuf>,
        /// Skip a directory name, or a directory path (repeatable)
        #[arg(long = "ignore", value_name = "NAME|PATH")]
        ignores: Vec<String>,
    },
    /// Print the dependency graph
    Graph {
        /// Show only the relations of this GAV
        #[arg(long, value_name = "GAV")]
        gav: Option<String>,
    },
    /// Manage the session's changesets
    #[command(subcommand)]
    Change(ChangeCommand),
}

#[derive(Subcommand)]
pub enum ChangeCommand {
    /// List the graph and project changesets
    List,
    /// Run each processor once (propagator, releaser, opener)
    Process,
    /// Turn graph changes into project changes
    Resolve,
    /// Hand project changes to the editor (dry run)
    Apply,
    /// Empty both changesets
    Clear,
    /// Take a single staged change back out of its changeset
    #[command(subcommand)]
    Drop(DropCommand),
    /// Rename a GAV in the graph
    Gav {
        #[arg(value_name = "GAV")]
        source: String,
        #[arg(value_name = "NEW")]
        new: String,
    },
    /// Retarget a relation
    Relation {
        #[arg(value_name = "SRC")]
        source: String,
        /// parent | dependency:group:artifact[:type[:classifier]] | build:group:artifact
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "TARGET")]
        target: String,
    },
    /// Remove a relation
    RemoveRelation {
        #[arg(value_name = "SRC")]
        source: String,
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Set a descriptor element on every matching project
    Set {
        /// GAV pattern, `*` matches anything
        #[arg(value_name = "FILTER")]
        filter: String,
        #[arg(value_name = "LOCATION")]
        location: String,
        #[arg(value_name = "NODE")]
        node: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Remove a descriptor element from every matching project
    Unset {
        #[arg(value_name = "FILTER")]
        filter: String,
        #[arg(value_name = "LOCATION")]
        location: String,
        #[arg(value_name = "NODE")]
        node: String,
    },
}

#[derive(Subcommand)]
pub enum DropCommand {
    /// Drop a staged rename
    Gav {
        #[arg(value_name = "GAV")]
        source: String,
        #[arg(value_name = "NEW")]
        new: String,
    },
    /// Drop a staged relation retarget, or a staged removal without TARGET
    Relation {
        #[arg(value_name = "SRC")]
        source: String,
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "TARGET")]
        target: Option<String>,
    },
    /// Drop staged descriptor edits of every matching project
    Project {
        #[arg(value_name = "FILTER")]
        filter: String,
        #[arg(value_name = "LOCATION")]
        location: String,
        #[arg(value_name = "NODE")]
        node: String,
    },
}
