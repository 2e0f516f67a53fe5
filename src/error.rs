// src/error.rs
use crate::gav::Gav;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PomError {
    #[error("I/O error: {source} (path: {path})")]
    FileSystem {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("cannot load descriptor {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("cannot resolve project {dependent}: missing prerequisite {prerequisite} ({reason})")]
    UnresolvedPrerequisite {
        prerequisite: Gav,
        dependent: Gav,
        reason: String,
    },

    #[error("duplicated project {gav}, already inserted from {canonical}")]
    DuplicateProject { gav: Gav, canonical: PathBuf },

    #[error("cannot add project {gav} to graph: {reason}")]
    GraphTransaction { gav: Gav, reason: String },

    #[error("no project for gav {gav}, change cannot be resolved ({change})")]
    ChangeResolution { gav: Gav, change: String },

    #[error("invalid gav '{0}', expected group:artifact:version")]
    InvalidGav(String),

    #[error("invalid relation key '{0}'")]
    InvalidRelationKey(String),

    #[error("invalid gav filter: {0}")]
    InvalidFilter(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, PomError>;

// Allow `?` on std::io::Error by converting to PomError::FileSystem with unknown path.
impl From<std::io::Error> for PomError {
    fn from(source: std::io::Error) -> Self {
        PomError::FileSystem {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<walkdir::Error> for PomError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map_or_else(|| PathBuf::from("<unknown>"), PathBuf::from);
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        PomError::FileSystem { source, path }
    }
}
