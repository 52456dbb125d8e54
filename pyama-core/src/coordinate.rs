//! Viewer navigation coordinate and its validation.

use serde::{Deserialize, Serialize};

use crate::descriptor::DatasetDescriptor;
use crate::error::{Error, Result};

/// Axis of the 4-D viewer coordinate, used in out-of-range reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Position,
    Channel,
    Frame,
    Particle,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Position => write!(f, "position"),
            Axis::Channel => write!(f, "channel"),
            Axis::Frame => write!(f, "frame"),
            Axis::Particle => write!(f, "particle"),
        }
    }
}

/// The current navigation coordinate of a viewer session.
///
/// Created with defaults `(0, 0, 0, 0)` when a session opens, mutated by
/// every navigation request, never persisted beyond the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerCoordinate {
    pub position: usize,
    pub channel: usize,
    pub frame: usize,
    /// Index into the particle registry, not the raw track identifier.
    pub particle: usize,
}

impl ViewerCoordinate {
    /// Creates a coordinate without validating it.
    pub fn new(position: usize, channel: usize, frame: usize, particle: usize) -> Self {
        Self {
            position,
            channel,
            frame,
            particle,
        }
    }

    /// Validates every axis against the descriptor and the particle count.
    ///
    /// Each field is checked independently; the first violation is reported
    /// with its axis, offending value, and the exclusive upper bound.
    /// Before tracking has produced particles (`n_particles == 0`), particle
    /// index 0 is accepted as the empty-selection placeholder so the default
    /// coordinate stays navigable.
    pub fn validate(&self, descriptor: &DatasetDescriptor, n_particles: usize) -> Result<()> {
        if !descriptor.position_in_range(self.position) {
            return Err(Error::CoordinateOutOfRange {
                axis: Axis::Position,
                value: self.position,
                end: descriptor.n_positions,
            });
        }
        if !descriptor.channel_in_range(self.channel) {
            return Err(Error::CoordinateOutOfRange {
                axis: Axis::Channel,
                value: self.channel,
                end: descriptor.n_channels + 1,
            });
        }
        if !descriptor.frame_in_range(self.frame) {
            return Err(Error::CoordinateOutOfRange {
                axis: Axis::Frame,
                value: self.frame,
                end: descriptor.n_frames + 1,
            });
        }
        let particle_ok = self.particle < n_particles || (self.particle == 0 && n_particles == 0);
        if !particle_ok {
            return Err(Error::CoordinateOutOfRange {
                axis: Axis::Particle,
                value: self.particle,
                end: n_particles,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DatasetDescriptor {
        DatasetDescriptor::new(3, 1, 10)
    }

    #[test]
    fn test_upper_bounds_are_valid() {
        let coord = ViewerCoordinate::new(2, 1, 10, 4);
        assert!(coord.validate(&descriptor(), 5).is_ok());
    }

    #[test]
    fn test_position_past_count_is_rejected() {
        let coord = ViewerCoordinate::new(3, 0, 0, 0);
        let err = coord.validate(&descriptor(), 5).unwrap_err();
        match err {
            Error::CoordinateOutOfRange { axis, value, end } => {
                assert_eq!(axis, Axis::Position);
                assert_eq!(value, 3);
                assert_eq!(end, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_each_axis_reports_its_own_violation() {
        let d = descriptor();
        let cases = [
            (ViewerCoordinate::new(9, 0, 0, 0), Axis::Position),
            (ViewerCoordinate::new(0, 2, 0, 0), Axis::Channel),
            (ViewerCoordinate::new(0, 0, 11, 0), Axis::Frame),
            (ViewerCoordinate::new(0, 0, 0, 5), Axis::Particle),
        ];
        for (coord, expected) in cases {
            match coord.validate(&d, 5).unwrap_err() {
                Error::CoordinateOutOfRange { axis, .. } => assert_eq!(axis, expected),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_default_coordinate_valid_before_tracking() {
        let coord = ViewerCoordinate::default();
        assert!(coord.validate(&descriptor(), 0).is_ok());

        // Any non-zero particle index is still rejected.
        let coord = ViewerCoordinate::new(0, 0, 0, 1);
        assert!(coord.validate(&descriptor(), 0).is_err());
    }
}
