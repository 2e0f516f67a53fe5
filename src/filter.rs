// src/filter.rs
//! GAV selection patterns for bulk project changes.

use crate::error::Result;
use crate::gav::Gav;
use regex::Regex;

/// Matches `group:artifact:version` strings. `*` matches any run of
/// characters; everything else is literal.
#[derive(Debug, Clone)]
pub struct GavFilter {
    pattern: String,
    re: Regex,
}

impl GavFilter {
    /// # Errors
    /// Returns `PomError::InvalidFilter` if the pattern cannot be compiled.
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let re = Regex::new(&format!("^{body}$"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            re,
        })
    }

    #[must_use]
    pub fn matches(&self, gav: &Gav) -> bool {
        self.re.is_match(&gav.to_string())
    }

    /// The matching GAVs, preserving input order.
    pub fn select<'a, I>(&self, gavs: I) -> Vec<Gav>
    where
        I: IntoIterator<Item = &'a Gav>,
    {
        gavs.into_iter().filter(|g| self.matches(g)).cloned().collect()
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards() -> Result<()> {
        let gavs = [
            Gav::new("org.acme", "core", "1.0"),
            Gav::new("org.acme", "web", "1.0"),
            Gav::new("org.acmex", "core", "2.0"),
        ];
        let filter = GavFilter::new("org.acme:*:1.0")?;
        assert_eq!(filter.select(&gavs).len(), 2);

        let exact = GavFilter::new("org.acme:core:1.0")?;
        assert_eq!(exact.select(&gavs), vec![gavs[0].clone()]);

        let all = GavFilter::new("*")?;
        assert_eq!(all.select(&gavs).len(), 3);
        Ok(())
    }

    #[test]
    fn test_dots_are_literal() -> Result<()> {
        let filter = GavFilter::new("org.acme:*")?;
        assert!(!filter.matches(&Gav::new("orgXacme", "core", "1")));
        Ok(())
    }
}
