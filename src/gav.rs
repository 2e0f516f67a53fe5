// src/gav.rs
//! Group/artifact/version coordinates.

use crate::error::PomError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Identity of a project or dependency. Ordering is lexicographic on
/// group, then artifact, then version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Gav {
    #[must_use]
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }

    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_SUFFIX)
    }

    /// Same coordinates with the `-SNAPSHOT` qualifier dropped.
    #[must_use]
    pub fn released(&self) -> Self {
        let version = self
            .version
            .strip_suffix(SNAPSHOT_SUFFIX)
            .unwrap_or(&self.version);
        self.with_version(version)
    }

    #[must_use]
    pub fn with_version(&self, version: &str) -> Self {
        Self::new(&self.group_id, &self.artifact_id, version)
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl FromStr for Gav {
    type Err = PomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [g, a, v] if !g.is_empty() && !a.is_empty() && !v.is_empty() => Ok(Self::new(g, a, v)),
            _ => Err(PomError::InvalidGav(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> Result<(), PomError> {
        let gav: Gav = "org.acme:core:1.2.0".parse()?;
        assert_eq!(gav.group_id, "org.acme");
        assert_eq!(gav.artifact_id, "core");
        assert_eq!(gav.version, "1.2.0");
        assert_eq!(gav.to_string(), "org.acme:core:1.2.0");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "a:b", "a:b:c:d", "a::c", ":b:c"] {
            assert!(input.parse::<Gav>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_snapshot_release() {
        let gav = Gav::new("g", "a", "2.0-SNAPSHOT");
        assert!(gav.is_snapshot());
        assert_eq!(gav.released(), Gav::new("g", "a", "2.0"));
        assert!(!gav.released().is_snapshot());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut gavs = vec![
            Gav::new("org", "b", "1"),
            Gav::new("com", "z", "9"),
            Gav::new("org", "a", "2"),
        ];
        gavs.sort();
        let rendered: Vec<String> = gavs.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["com:z:9", "org:a:2", "org:b:1"]);
    }
}
