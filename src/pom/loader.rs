// src/pom/loader.rs
use super::parser::{DescriptorParser, PomXmlParser};
use super::Project;
use crate::error::Result;
use std::path::Path;

/// Thin adapter turning descriptor files into [`Project`] values.
pub struct DescriptorLoader {
    parser: Box<dyn DescriptorParser>,
}

impl DescriptorLoader {
    #[must_use]
    pub fn new(parser: Box<dyn DescriptorParser>) -> Self {
        Self { parser }
    }

    /// Loads a descriptor. `external` marks projects pulled in as ancestors
    /// or imports rather than found by scanning.
    ///
    /// # Errors
    /// Propagates the parser's `PomError::Parse`.
    pub fn load(&self, path: &Path, external: bool) -> Result<Project> {
        let parsed = self.parser.parse(path)?;
        tracing::debug!(gav = %parsed.gav, path = %path.display(), external, "loaded descriptor");
        Ok(Project::new(
            parsed.gav,
            parsed.parent,
            path.to_path_buf(),
            external,
            parsed.model,
        ))
    }
}

impl Default for DescriptorLoader {
    fn default() -> Self {
        Self::new(Box::new(PomXmlParser))
    }
}
