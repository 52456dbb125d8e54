//! Error types for request validation and stage execution.

use thiserror::Error;

/// Rejection reasons for pipeline stage requests.
///
/// Every message names the violated bound or parameter so the caller can
/// correct the request; requests are never silently clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidateError {
    /// Position range with min > max.
    #[error("position range {min}..={max} is empty: min exceeds max")]
    PositionRangeInverted { min: usize, max: usize },

    /// Position range reaching past the last stage position.
    #[error("position range {min}..={max} out of bounds: dataset has {n_positions} positions")]
    PositionRangeOutOfBounds {
        min: usize,
        max: usize,
        n_positions: usize,
    },

    /// Frame range with min > max.
    #[error("frame range {min}..={max} is empty: min exceeds max")]
    FrameRangeInverted { min: usize, max: usize },

    /// Frame range reaching past the last frame index.
    #[error("frame range {min}..={max} out of bounds: highest frame index is {n_frames}")]
    FrameRangeOutOfBounds {
        min: usize,
        max: usize,
        n_frames: usize,
    },

    /// A channel role assigned to a channel the dataset does not have.
    #[error("channel {channel} out of range: highest channel index is {n_channels}")]
    ChannelOutOfRange { channel: usize, n_channels: usize },

    /// Segmentation requested without any Brightfield channel.
    #[error("no segmentation channel: at least one channel must be assigned the Brightfield role")]
    NoSegmentationChannel,

    /// Square ROI size must be positive.
    #[error("invalid square size {0}: must be greater than zero")]
    InvalidSquareSize(f64),

    /// Export time-per-frame must be positive.
    #[error("invalid frame interval {0} minutes: must be greater than zero")]
    InvalidInterval(f64),
}

/// Failures raised by a stage runner.
#[derive(Error, Debug)]
pub enum StageError {
    /// The backend refused the job or cannot be reached. Surfaced
    /// synchronously as a `rejected` acknowledgment.
    #[error("pipeline backend unavailable: {0}")]
    Unavailable(String),

    /// The stage started but failed while running. Only visible on the
    /// dispatcher's event channel, never in the acknowledgment.
    #[error("stage failed: {0}")]
    Failed(String),

    /// I/O error while launching or talking to the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Job description could not be serialized for the backend.
    #[error("job encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
