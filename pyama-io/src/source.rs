//! Dataset bootstrap.
//!
//! Binds a microscopy file and output directory into the snapshot a viewer
//! session opens. Axis extents come from two sides of the seam: a
//! [`MetadataReader`] probes the dataset file itself, and the output tree
//! contributes whatever completed stages have written. The descriptor is
//! the elementwise maximum of both, so a freshly selected dataset is
//! addressable by pipeline stages before any output exists.

use std::path::{Path, PathBuf};

use pyama_core::{DatasetDescriptor, DatasetSnapshot};

use crate::error::{Error, Result};
use crate::scanner::{scan_positions, PositionDir};
use crate::tracks::read_tracks;

/// Reads axis extents out of the dataset file.
///
/// The microscopy format itself is a collaborator concern; implementations
/// typically delegate to whatever backend understands it.
pub trait MetadataReader: Send + Sync {
    /// Axis extents of the dataset file.
    fn extents(&self, dataset: &Path) -> Result<DatasetDescriptor>;
}

/// Reader used when no metadata backend is available; reports empty
/// extents, leaving the output tree as the only source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataReader for NoMetadata {
    fn extents(&self, _dataset: &Path) -> Result<DatasetDescriptor> {
        Ok(DatasetDescriptor::default())
    }
}

/// An opened dataset: the snapshot plus the paths the session layer needs
/// for persistence.
#[derive(Debug, Clone)]
pub struct OpenDataset {
    /// Snapshot consumed by `ViewerSession::open`.
    pub snapshot: DatasetSnapshot,
    /// Track file backing the snapshot, when any position is complete.
    /// Enablement toggles are persisted here.
    pub tracks_path: Option<PathBuf>,
    /// Position directories found in the output tree.
    pub positions: Vec<PositionDir>,
}

/// Bootstraps datasets from the dataset file's metadata and the pipeline's
/// output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputScanSource;

impl OutputScanSource {
    /// Opens a (dataset file, output directory) pair.
    ///
    /// Fails with `InvalidPath` if the dataset file is not a file or the
    /// output path is not a directory. Extents from the metadata reader are
    /// merged with extents derived from the output tree (position count
    /// from complete position directories, frame extent from the track
    /// file, channel extent from the number of fluorescence brightness
    /// columns), taking the maximum per axis.
    pub fn open(
        &self,
        nd2_path: &Path,
        out_path: &Path,
        metadata: &dyn MetadataReader,
    ) -> Result<OpenDataset> {
        if !nd2_path.is_file() {
            return Err(Error::invalid_path(nd2_path, "dataset file not found"));
        }
        if !out_path.is_dir() {
            return Err(Error::invalid_path(out_path, "output directory not found"));
        }

        let meta = metadata.extents(nd2_path)?;
        let positions = scan_positions(out_path)?;
        let Some(first) = positions.first() else {
            return Ok(OpenDataset {
                snapshot: DatasetSnapshot {
                    descriptor: meta,
                    ..DatasetSnapshot::default()
                },
                tracks_path: None,
                positions,
            });
        };

        let tracks_path = first.tracks_path();
        let file = read_tracks(&tracks_path)?;
        let derived = DatasetDescriptor::new(
            positions.len(),
            file.fluorescence_channels,
            file.table.max_frame(),
        );

        Ok(OpenDataset {
            snapshot: DatasetSnapshot {
                descriptor: merge_extents(meta, derived),
                tracks: file.table,
                disabled: file.disabled,
            },
            tracks_path: Some(tracks_path),
            positions,
        })
    }
}

fn merge_extents(a: DatasetDescriptor, b: DatasetDescriptor) -> DatasetDescriptor {
    DatasetDescriptor::new(
        a.n_positions.max(b.n_positions),
        a.n_channels.max(b.n_channels),
        a.n_frames.max(b.n_frames),
    )
}
