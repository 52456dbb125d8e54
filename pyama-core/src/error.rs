//! Error types for pyama-core.

use thiserror::Error;

use crate::coordinate::Axis;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for session operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No dataset/output-path pair has been selected yet.
    #[error("no dataset open: select an ND2 file and output directory first")]
    NotBootstrapped,

    /// A viewer coordinate axis is outside the bounds of the active dataset.
    ///
    /// `end` is the exclusive upper bound of valid indices for `axis`.
    #[error("{axis} index {value} out of bounds (valid range 0..{end})")]
    CoordinateOutOfRange {
        axis: Axis,
        value: usize,
        end: usize,
    },

    /// A particle identifier outside `[0, all_particles_len)`.
    #[error("invalid particle id {id}: {len} particles tracked")]
    InvalidParticleId { id: usize, len: usize },

    /// Artifact rendering failed.
    #[error("render error: {0}")]
    Render(String),
}
