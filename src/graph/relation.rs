// src/graph/relation.rs
//! Typed edges between GAV nodes.

use crate::error::PomError;
use crate::gav::Gav;
use crate::pom::Scope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    Parent {
        source: Gav,
        target: Gav,
    },
    Dependency {
        source: Gav,
        target: Gav,
        scope: Scope,
        classifier: Option<String>,
        /// The dependency `<type>`.
        kind: String,
    },
    BuildDependency {
        source: Gav,
        target: Gav,
    },
}

impl Relation {
    #[must_use]
    pub fn source(&self) -> &Gav {
        match self {
            Self::Parent { source, .. }
            | Self::Dependency { source, .. }
            | Self::BuildDependency { source, .. } => source,
        }
    }

    #[must_use]
    pub fn target(&self) -> &Gav {
        match self {
            Self::Parent { target, .. }
            | Self::Dependency { target, .. }
            | Self::BuildDependency { target, .. } => target,
        }
    }

    /// Identifies this relation among its source's relations independently
    /// of the target's version.
    #[must_use]
    pub fn key(&self) -> RelationKey {
        match self {
            Self::Parent { .. } => RelationKey::Parent,
            Self::Dependency {
                target,
                classifier,
                kind,
                ..
            } => RelationKey::Dependency {
                group_id: target.group_id.clone(),
                artifact_id: target.artifact_id.clone(),
                kind: kind.clone(),
                classifier: classifier.clone(),
            },
            Self::BuildDependency { target, .. } => RelationKey::BuildDependency {
                group_id: target.group_id.clone(),
                artifact_id: target.artifact_id.clone(),
            },
        }
    }

    /// The same relation pointing at another target.
    #[must_use]
    pub fn retarget(&self, target: Gav) -> Self {
        match self {
            Self::Parent { source, .. } => Self::Parent {
                source: source.clone(),
                target,
            },
            Self::Dependency {
                source,
                scope,
                classifier,
                kind,
                ..
            } => Self::Dependency {
                source: source.clone(),
                target,
                scope: *scope,
                classifier: classifier.clone(),
                kind: kind.clone(),
            },
            Self::BuildDependency { source, .. } => Self::BuildDependency {
                source: source.clone(),
                target,
            },
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent { source, target } => write!(f, "{source} -parent-> {target}"),
            Self::Dependency {
                source,
                target,
                scope,
                classifier,
                kind,
            } => {
                write!(f, "{source} -{scope}-> {target} ({kind}")?;
                if let Some(c) = classifier {
                    write!(f, ", {c}")?;
                }
                f.write_str(")")
            }
            Self::BuildDependency { source, target } => write!(f, "{source} -build-> {target}"),
        }
    }
}

/// Kind-and-coordinates key of a relation, used by relation changes.
///
/// Text forms: `parent`, `dependency:group:artifact:type[:classifier]`,
/// `build:group:artifact`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "relation", rename_all = "snake_case")]
pub enum RelationKey {
    Parent,
    Dependency {
        group_id: String,
        artifact_id: String,
        kind: String,
        classifier: Option<String>,
    },
    BuildDependency {
        group_id: String,
        artifact_id: String,
    },
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent"),
            Self::Dependency {
                group_id,
                artifact_id,
                kind,
                classifier,
            } => {
                write!(f, "dependency:{group_id}:{artifact_id}:{kind}")?;
                if let Some(c) = classifier {
                    write!(f, ":{c}")?;
                }
                Ok(())
            }
            Self::BuildDependency {
                group_id,
                artifact_id,
            } => write!(f, "build:{group_id}:{artifact_id}"),
        }
    }
}

impl FromStr for RelationKey {
    type Err = PomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().skip(1).any(|p| p.is_empty()) {
            return Err(PomError::InvalidRelationKey(s.to_string()));
        }
        match parts.as_slice() {
            ["parent"] => Ok(Self::Parent),
            ["dependency", g, a] => Ok(Self::dependency(g, a, "jar", None)),
            ["dependency", g, a, t] => Ok(Self::dependency(g, a, t, None)),
            ["dependency", g, a, t, c] => Ok(Self::dependency(g, a, t, Some(*c))),
            ["build", g, a] => Ok(Self::BuildDependency {
                group_id: (*g).to_string(),
                artifact_id: (*a).to_string(),
            }),
            _ => Err(PomError::InvalidRelationKey(s.to_string())),
        }
    }
}

impl RelationKey {
    fn dependency(group: &str, artifact: &str, kind: &str, classifier: Option<&str>) -> Self {
        Self::Dependency {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            kind: kind.to_string(),
            classifier: classifier.map(str::to_string),
        }
    }
}
