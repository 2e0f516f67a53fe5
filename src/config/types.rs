// src/config/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// On-disk shape of `pomgraph.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PomGraphToml {
    #[serde(default)]
    pub ignored_dirs: Vec<String>,
    #[serde(default)]
    pub ignored_paths: Vec<PathBuf>,
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory names skipped during scanning (defaults plus additions).
    pub ignored_dirs: Vec<String>,
    /// Absolute directory paths skipped during scanning.
    pub ignored_paths: Vec<PathBuf>,
    /// Explicitly activated profile ids. Nothing is activated implicitly.
    pub profiles: Vec<String>,
    /// Local repository roots searched for missing parents and imports.
    pub repositories: Vec<PathBuf>,
    pub verbose: bool,
}
