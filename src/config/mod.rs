// src/config/mod.rs
pub mod types;

pub use self::types::{Config, PomGraphToml};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional per-workspace configuration file.
pub const CONFIG_FILE: &str = "pomgraph.toml";

/// Directory names never descended into while scanning.
pub const IGNORED_DIRS: &[&str] = &[
    "target",
    "bin",
    "src",
    "node_modules",
    ".git",
    "war",
    "gwt-unitCache",
    ".idea",
    ".settings",
];

impl Config {
    /// Configuration with the default ignore list and no session additions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignored_dirs: IGNORED_DIRS.iter().map(|s| (*s).to_string()).collect(),
            ignored_paths: Vec::new(),
            profiles: Vec::new(),
            repositories: default_repositories(),
            verbose: false,
        }
    }

    /// Creates a config and merges `pomgraph.toml` from the current directory.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&cwd)
    }

    /// Creates a config and merges `pomgraph.toml` found in `dir`, if any.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut config = Self::new();
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            config
                .parse_toml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
        }
        Ok(config)
    }

    /// Parses TOML content and merges it into this config.
    ///
    /// # Errors
    /// Returns error if the content is not valid configuration TOML.
    pub fn parse_toml(&mut self, content: &str) -> Result<()> {
        let parsed: PomGraphToml = toml::from_str(content).context("invalid pomgraph.toml")?;
        self.merge(parsed);
        Ok(())
    }

    pub fn merge(&mut self, toml: PomGraphToml) {
        for dir in toml.ignored_dirs {
            self.add_ignored_dir(&dir);
        }
        for path in toml.ignored_paths {
            self.add_ignored_path(path);
        }
        for profile in toml.profiles {
            self.add_profile(&profile);
        }
        if !toml.repositories.is_empty() {
            self.repositories = toml.repositories;
        }
        self.verbose |= toml.verbose;
    }

    pub fn add_ignored_dir(&mut self, name: &str) {
        if !self.ignored_dirs.iter().any(|d| d.eq_ignore_ascii_case(name)) {
            self.ignored_dirs.push(name.to_string());
        }
    }

    pub fn add_profile(&mut self, id: &str) {
        if !self.profiles.iter().any(|p| p == id) {
            self.profiles.push(id.to_string());
        }
    }

    pub fn add_ignored_path(&mut self, path: PathBuf) {
        if !self.ignored_paths.contains(&path) {
            self.ignored_paths.push(path);
        }
    }

    /// Adds an `--ignore` value: a bare name extends the name list, anything
    /// with a separator is a directory path.
    pub fn add_ignore(&mut self, value: &str) {
        let path = Path::new(value);
        if path.components().count() > 1 || path.is_absolute() {
            let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            self.add_ignored_path(path);
        } else {
            self.add_ignored_dir(value);
        }
    }

    /// The part of this config that differs from the built-in defaults, in
    /// the shape of `pomgraph.toml`.
    #[must_use]
    pub fn to_toml(&self) -> PomGraphToml {
        PomGraphToml {
            ignored_dirs: self
                .ignored_dirs
                .iter()
                .filter(|d| !IGNORED_DIRS.contains(&d.as_str()))
                .cloned()
                .collect(),
            ignored_paths: self.ignored_paths.clone(),
            profiles: self.profiles.clone(),
            repositories: self.repositories.clone(),
            verbose: self.verbose,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_repositories() -> Vec<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".m2").join("repository"))
        .filter(|p| p.is_dir())
        .into_iter()
        .collect()
}
