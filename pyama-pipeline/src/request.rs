//! Stage request types and their validation.
//!
//! Validation is a pure function from (request, current dataset descriptor)
//! to a canonical [`JobSpec`] or a [`ValidateError`]; nothing here mutates
//! session state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pyama_core::DatasetDescriptor;

use crate::error::ValidateError;
use crate::job::JobSpec;

/// User-assigned interpretation of a channel, driving which algorithm
/// consumes it. Role semantics are interpreted by the backend; validation
/// only checks membership and channel range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelRole {
    /// Channel not used by segmentation.
    #[default]
    #[serde(rename = "None")]
    Unassigned,
    /// Cellular morphology channel consumed by segmentation.
    Brightfield,
    /// Fluorescence channel sampled for brightness readout.
    Fluorescent,
}

/// Mapping from channel index to role.
///
/// Arbitrary size; the bound is the dataset's channel count, checked at
/// request time. Channels absent from the mapping default to `Unassigned`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelRoleAssignment(BTreeMap<usize, ChannelRole>);

impl ChannelRoleAssignment {
    /// Creates an empty assignment (every channel `Unassigned`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a role to a channel, replacing any previous role.
    pub fn assign(&mut self, channel: usize, role: ChannelRole) {
        self.0.insert(channel, role);
    }

    /// The role of a channel, defaulting to `Unassigned`.
    pub fn role(&self, channel: usize) -> ChannelRole {
        self.0.get(&channel).copied().unwrap_or_default()
    }

    /// Channels carrying the given role, in ascending order.
    pub fn channels_with(&self, role: ChannelRole) -> Vec<usize> {
        self.0
            .iter()
            .filter(|&(_, r)| *r == role)
            .map(|(&c, _)| c)
            .collect()
    }

    /// Checks that every assigned channel index exists in the dataset.
    fn validate(&self, descriptor: &DatasetDescriptor) -> Result<(), ValidateError> {
        if let Some(&channel) = self.0.keys().find(|&&c| !descriptor.channel_in_range(c)) {
            return Err(ValidateError::ChannelOutOfRange {
                channel,
                n_channels: descriptor.n_channels,
            });
        }
        Ok(())
    }
}

impl FromIterator<(usize, ChannelRole)> for ChannelRoleAssignment {
    fn from_iter<I: IntoIterator<Item = (usize, ChannelRole)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Inclusive range of stage positions a stage operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub min: usize,
    pub max: usize,
}

impl PositionRange {
    /// Creates a range; bounds are checked by `validate`.
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Checks `0 <= min <= max <= n_positions - 1`.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<(), ValidateError> {
        if self.min > self.max {
            return Err(ValidateError::PositionRangeInverted {
                min: self.min,
                max: self.max,
            });
        }
        if !descriptor.position_in_range(self.max) {
            return Err(ValidateError::PositionRangeOutOfBounds {
                min: self.min,
                max: self.max,
                n_positions: descriptor.n_positions,
            });
        }
        Ok(())
    }

    /// Expands the range into the explicit position list carried by
    /// canonical jobs.
    pub fn positions(&self) -> Vec<usize> {
        (self.min..=self.max).collect()
    }
}

/// Inclusive frame range; only meaningful for segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub min: usize,
    pub max: usize,
}

impl FrameRange {
    /// Creates a range; bounds are checked by `validate`.
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Checks `0 <= min <= max <= n_frames`.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<(), ValidateError> {
        if self.min > self.max {
            return Err(ValidateError::FrameRangeInverted {
                min: self.min,
                max: self.max,
            });
        }
        if !descriptor.frame_in_range(self.max) {
            return Err(ValidateError::FrameRangeOutOfBounds {
                min: self.min,
                max: self.max,
                n_frames: descriptor.n_frames,
            });
        }
        Ok(())
    }
}

/// Cell segmentation over a position and frame range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationRequest {
    pub positions: PositionRange,
    pub frames: FrameRange,
    pub channels: ChannelRoleAssignment,
}

impl SegmentationRequest {
    /// Validates ranges and channel roles, producing the canonical job.
    ///
    /// At least one channel must carry the Brightfield role for
    /// segmentation to be meaningful.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<JobSpec, ValidateError> {
        self.positions.validate(descriptor)?;
        self.frames.validate(descriptor)?;
        self.channels.validate(descriptor)?;

        let segmentation_channels = self.channels.channels_with(ChannelRole::Brightfield);
        if segmentation_channels.is_empty() {
            return Err(ValidateError::NoSegmentationChannel);
        }

        Ok(JobSpec::Segmentation {
            positions: self.positions.positions(),
            frame_min: self.frames.min,
            frame_max: self.frames.max,
            segmentation_channels,
            fluorescence_channels: self.channels.channels_with(ChannelRole::Fluorescent),
        })
    }
}

/// Particle tracking over a position range.
///
/// Tracking always spans the full time axis of the selected positions, so
/// there is no frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRequest {
    pub positions: PositionRange,
    /// Whether segmentation masks are morphologically expanded before
    /// linking. Forwarded opaquely to the backend algorithm.
    pub expand_labels: bool,
}

impl TrackingRequest {
    /// Validates the position range, producing the canonical job.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<JobSpec, ValidateError> {
        self.positions.validate(descriptor)?;
        Ok(JobSpec::Tracking {
            positions: self.positions.positions(),
            expand_labels: self.expand_labels,
        })
    }
}

/// Square ROI generation over a position range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareRoiRequest {
    pub positions: PositionRange,
    /// Side length of the generated ROI squares, in physical units.
    pub square_size: f64,
}

impl SquareRoiRequest {
    /// Validates the range and square size, producing the canonical job.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<JobSpec, ValidateError> {
        self.positions.validate(descriptor)?;
        if self.square_size <= 0.0 {
            return Err(ValidateError::InvalidSquareSize(self.square_size));
        }
        Ok(JobSpec::SquareRoi {
            positions: self.positions.positions(),
            square_size: self.square_size,
        })
    }
}

/// CSV export over a position range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub positions: PositionRange,
    /// Minutes per frame, used to convert frame indices to elapsed time in
    /// the output.
    pub minutes: f64,
}

impl ExportRequest {
    /// Validates the range and frame interval, producing the canonical job.
    pub fn validate(&self, descriptor: &DatasetDescriptor) -> Result<JobSpec, ValidateError> {
        self.positions.validate(descriptor)?;
        if self.minutes <= 0.0 {
            return Err(ValidateError::InvalidInterval(self.minutes));
        }
        Ok(JobSpec::Export {
            positions: self.positions.positions(),
            minutes: self.minutes,
        })
    }
}
