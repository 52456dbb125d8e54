//! Dataset metadata probe backed by the external pipeline program.
//!
//! The ND2 format is the pipeline backend's concern; the server asks it for
//! the axis extents by invoking the configured program with `--describe`,
//! expecting the descriptor as JSON on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use pyama_core::DatasetDescriptor;
use pyama_io::{Error, MetadataReader, Result};

/// Probes dataset extents through the configured pipeline program.
#[derive(Debug, Clone)]
pub struct CommandMetadataReader {
    program: PathBuf,
}

impl CommandMetadataReader {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl MetadataReader for CommandMetadataReader {
    fn extents(&self, dataset: &Path) -> Result<DatasetDescriptor> {
        let output = Command::new(&self.program)
            .arg("--describe")
            .arg(dataset)
            .output()?;
        if !output.status.success() {
            return Err(Error::metadata(
                dataset,
                format!("{} exited with {}", self.program.display(), output.status),
            ));
        }
        serde_json::from_slice(&output.stdout).map_err(|e| Error::metadata(dataset, e.to_string()))
    }
}
