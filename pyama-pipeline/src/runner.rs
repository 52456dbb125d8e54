//! Stage runner that delegates to an external pipeline program.
//!
//! The processing algorithms (segmentation, tracking, ROI generation,
//! export writers) live outside this service. This runner hands them the
//! canonical job as JSON on the command line and treats a non-zero exit
//! status as stage failure.

use std::path::PathBuf;
use std::process::Command;

use crate::dispatch::StageRunner;
use crate::error::StageError;
use crate::job::JobSpec;

/// Runs pipeline stages by invoking a configured external program.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
}

impl CommandRunner {
    /// Creates a runner for the given pipeline program.
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl StageRunner for CommandRunner {
    fn preflight(&self, _job: &JobSpec) -> Result<(), StageError> {
        // Only explicit paths can be checked up front; bare program names
        // are resolved through PATH at spawn time.
        if self.program.components().count() > 1 && !self.program.is_file() {
            return Err(StageError::Unavailable(format!(
                "pipeline program not found: {}",
                self.program.display()
            )));
        }
        Ok(())
    }

    fn run(&self, job: &JobSpec) -> Result<(), StageError> {
        let payload = serde_json::to_string(job)?;
        let status = Command::new(&self.program)
            .arg("--job")
            .arg(payload)
            .status()?;
        if !status.success() {
            return Err(StageError::Failed(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }
        Ok(())
    }
}
