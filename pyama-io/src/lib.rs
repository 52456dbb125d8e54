//! pyama-io: Filesystem bootstrap for PyAMA datasets.
//!
//! A dataset is a (microscopy file, output directory) pair. The pipeline
//! writes one `XY<number>` directory per stage position into the output
//! directory; this crate scans those directories, reads the per-position
//! track file, and assembles the dataset snapshot the viewer session opens.

pub mod error;
pub mod scanner;
pub mod source;
pub mod tracks;

pub use error::{Error, Result};
pub use scanner::{scan_positions, PositionDir, REQUIRED_FILES};
pub use source::{MetadataReader, NoMetadata, OpenDataset, OutputScanSource};
pub use tracks::{read_tracks, write_enabled, TrackFile};
