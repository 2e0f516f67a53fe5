// src/exit.rs
//! Process exit codes for `pomgraph`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PomGraphExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (e.g. IO, session file, config).
    Error = 1,
    /// Command arguments could not be interpreted (bad GAV, relation key or filter).
    InvalidInput = 2,
    /// Analysis finished but some projects are unresolvable, duplicated or missing from the graph.
    AnalysisIncomplete = 3,
}

impl PomGraphExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Exit code for a failed command: bad arguments map to `InvalidInput`.
    #[must_use]
    pub fn from_error(e: &anyhow::Error) -> Self {
        if e.downcast_ref::<crate::error::PomError>().is_some_and(is_input_error) {
            Self::InvalidInput
        } else {
            Self::Error
        }
    }
}

impl Termination for PomGraphExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<()>> for PomGraphExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                Self::from_error(&e)
            }
        }
    }
}

fn is_input_error(e: &crate::error::PomError) -> bool {
    use crate::error::PomError;
    matches!(
        e,
        PomError::InvalidGav(_) | PomError::InvalidRelationKey(_) | PomError::InvalidFilter(_)
    )
}
