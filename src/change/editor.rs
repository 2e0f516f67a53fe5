// src/change/editor.rs
use super::{ChangeSet, ProjectChange};
use anyhow::Result;

/// Writes project changes back to descriptor files.
pub trait DescriptorEditor {
    /// # Errors
    /// Returns an error if the edit could not be performed.
    fn apply(&mut self, change: &ProjectChange) -> Result<()>;
}

/// Editor that only records what it would do.
#[derive(Debug, Default)]
pub struct DryRunEditor {
    pub performed: Vec<String>,
}

impl DescriptorEditor for DryRunEditor {
    fn apply(&mut self, change: &ProjectChange) -> Result<()> {
        let line = format!("{} in {}", change, change.path.display());
        tracing::info!("would apply {line}");
        self.performed.push(line);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<ProjectChange>,
    /// Changes the editor rejected; they stay in the changeset.
    pub failed: Vec<(ProjectChange, String)>,
}

/// Hands every change to `editor` in listing order and removes the applied
/// ones from `changes`.
pub fn apply(changes: &mut ChangeSet<ProjectChange>, editor: &mut dyn DescriptorEditor) -> ApplyReport {
    let pending: Vec<ProjectChange> = changes.list().into_iter().map(|e| e.change.clone()).collect();
    let mut report = ApplyReport::default();
    for change in pending {
        match editor.apply(&change) {
            Ok(()) => {
                changes.remove(&change);
                report.applied.push(change);
            }
            Err(e) => {
                tracing::warn!("cannot apply {change}: {e:#}");
                report.failed.push((change, format!("{e:#}")));
            }
        }
    }
    report
}
