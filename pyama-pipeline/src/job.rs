//! Canonical job descriptions and the acknowledgment contract.

use serde::{Deserialize, Serialize};

use crate::dispatch::JobId;

/// A validated, normalized pipeline job ready for dispatch.
///
/// Ranges are expanded into explicit position lists and channel roles are
/// split into the segmentation/fluorescence sets the backend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum JobSpec {
    /// Cell segmentation over positions and a frame window.
    Segmentation {
        positions: Vec<usize>,
        frame_min: usize,
        frame_max: usize,
        segmentation_channels: Vec<usize>,
        fluorescence_channels: Vec<usize>,
    },
    /// Particle tracking across the full time axis of each position.
    Tracking {
        positions: Vec<usize>,
        expand_labels: bool,
    },
    /// Square ROI generation around tracked particles.
    SquareRoi {
        positions: Vec<usize>,
        square_size: f64,
    },
    /// CSV export with a frame-to-minutes conversion.
    Export { positions: Vec<usize>, minutes: f64 },
}

impl JobSpec {
    /// Human-readable stage name used in acknowledgments and logs.
    pub fn stage_name(&self) -> &'static str {
        match self {
            JobSpec::Segmentation { .. } => "segmentation",
            JobSpec::Tracking { .. } => "tracking",
            JobSpec::SquareRoi { .. } => "square ROI generation",
            JobSpec::Export { .. } => "export",
        }
    }
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// The job was handed off for background execution. Not a completion
    /// signal.
    Accepted,
    /// The backend refused the job; nothing was started.
    Rejected,
}

/// Fire-and-forget acknowledgment returned by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub state: JobState,
    /// Terse human-readable outcome.
    pub message: String,
    /// Handle of the started job, present only when accepted.
    pub job_id: Option<JobId>,
}

impl JobStatus {
    /// Acknowledgment for a job that was handed off.
    pub fn accepted(job_id: JobId, message: impl Into<String>) -> Self {
        Self {
            state: JobState::Accepted,
            message: message.into(),
            job_id: Some(job_id),
        }
    }

    /// Acknowledgment for a refused job.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            state: JobState::Rejected,
            message: message.into(),
            job_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_spec_wire_shape() {
        let job = JobSpec::Tracking {
            positions: vec![0, 1],
            expand_labels: true,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["stage"], "tracking");
        assert_eq!(json["expand_labels"], true);
    }

    #[test]
    fn test_status_constructors() {
        let ok = JobStatus::accepted(3, "tracking started in background");
        assert_eq!(ok.state, JobState::Accepted);
        assert_eq!(ok.job_id, Some(3));

        let no = JobStatus::rejected("backend unavailable");
        assert_eq!(no.state, JobState::Rejected);
        assert_eq!(no.job_id, None);
    }
}
