// src/pom/mod.rs
//! Project descriptor model and the collaborators that produce it.
//!
//! A [`Project`] keeps its declarations raw (uninterpolated). Values are
//! interpolated on demand against whatever ancestors are currently known,
//! see [`interpolate`].

pub mod interpolate;
pub mod loader;
pub mod locator;
pub mod parser;
pub mod xml;

pub use loader::DescriptorLoader;
pub use locator::{ChainLocator, DescriptorLocator, RelativePathLocator, RepositoryLocator};
pub use parser::{DescriptorParser, ParsedDescriptor, PomXmlParser};

use crate::gav::Gav;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// Case-insensitive parse; `None` for unknown scopes.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compile" => Some(Self::Compile),
            "provided" => Some(Self::Provided),
            "runtime" => Some(Self::Runtime),
            "test" => Some(Self::Test),
            "system" => Some(Self::System),
            "import" => Some(Self::Import),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<dependency>` as written in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDecl {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    /// The `<type>` element.
    pub kind: Option<String>,
}

/// A build `<plugin>` as written in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginDecl {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
}

/// Declarations that appear both at project level and inside profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub properties: BTreeMap<String, String>,
    pub dependency_management: Vec<DependencyDecl>,
    pub dependencies: Vec<DependencyDecl>,
    pub plugins: Vec<PluginDecl>,
    pub plugin_management: Vec<PluginDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDecl {
    pub id: String,
    pub declarations: Declarations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub gav: Gav,
    pub relative_path: Option<String>,
}

/// Raw content of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomModel {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<ParentRef>,
    pub declarations: Declarations,
    pub profiles: Vec<ProfileDecl>,
}

impl PomModel {
    /// Project-level declarations followed by those of each explicitly
    /// activated profile, in declaration order.
    pub fn active_declarations<'a>(
        &'a self,
        profiles: &'a [String],
    ) -> impl Iterator<Item = &'a Declarations> + 'a {
        std::iter::once(&self.declarations).chain(
            self.profiles
                .iter()
                .filter(move |p| profiles.iter().any(|id| id == &p.id))
                .map(|p| &p.declarations),
        )
    }
}

/// A loaded descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    gav: Gav,
    parent: Option<Gav>,
    path: PathBuf,
    external: bool,
    model: PomModel,
}

impl Project {
    #[must_use]
    pub fn new(gav: Gav, parent: Option<Gav>, path: PathBuf, external: bool, model: PomModel) -> Self {
        Self {
            gav,
            parent,
            path,
            external,
            model,
        }
    }

    #[must_use]
    pub fn gav(&self) -> &Gav {
        &self.gav
    }

    #[must_use]
    pub fn parent_gav(&self) -> Option<&Gav> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the project was loaded only as an ancestor or import of a
    /// scanned project.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.external
    }

    #[must_use]
    pub fn model(&self) -> &PomModel {
        &self.model
    }

    /// Two values are the same instance when they come from the same file.
    #[must_use]
    pub fn same_instance(&self, other: &Project) -> bool {
        self.path == other.path
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gav)?;
        if self.external {
            f.write_str(" (external)")?;
        }
        Ok(())
    }
}
