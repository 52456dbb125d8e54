//! Static shape of an opened dataset.

use serde::{Deserialize, Serialize};

/// Static shape of the loaded dataset.
///
/// `n_positions` counts imaged stage positions, while `n_channels` and
/// `n_frames` are the highest valid 0-based indices on their axes (the
/// actual channel and frame counts are one greater). Created once per
/// opened dataset and replaced wholesale when a new dataset is opened or a
/// pipeline stage changes the track count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Count of imaged stage positions.
    pub n_positions: usize,
    /// Highest channel index (0-indexed).
    pub n_channels: usize,
    /// Highest frame index (0-indexed).
    pub n_frames: usize,
}

impl DatasetDescriptor {
    /// Creates a descriptor from the axis extents.
    pub fn new(n_positions: usize, n_channels: usize, n_frames: usize) -> Self {
        Self {
            n_positions,
            n_channels,
            n_frames,
        }
    }

    /// Returns true if `position` addresses an existing stage position.
    pub fn position_in_range(&self, position: usize) -> bool {
        position < self.n_positions
    }

    /// Returns true if `channel` addresses an existing channel.
    pub fn channel_in_range(&self, channel: usize) -> bool {
        channel <= self.n_channels
    }

    /// Returns true if `frame` addresses an existing timepoint.
    pub fn frame_in_range(&self, frame: usize) -> bool {
        frame <= self.n_frames
    }
}
