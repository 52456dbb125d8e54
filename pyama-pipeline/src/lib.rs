//! pyama-pipeline: Stage request validation and background job dispatch.
//!
//! User-facing range/parameter requests are validated against the dataset
//! descriptor and normalized into canonical job descriptions, which the
//! dispatcher hands to a long-running backend as fire-and-forget background
//! work. The acknowledgment returned to the caller is accept/reject only;
//! completion is reported out-of-band on the dispatcher's event channel.

pub mod dispatch;
pub mod error;
pub mod job;
pub mod request;
pub mod runner;

pub use dispatch::{Dispatcher, JobEvent, JobId, StageRunner};
pub use error::{StageError, ValidateError};
pub use job::{JobSpec, JobState, JobStatus};
pub use request::{
    ChannelRole, ChannelRoleAssignment, ExportRequest, FrameRange, PositionRange,
    SegmentationRequest, SquareRoiRequest, TrackingRequest,
};
pub use runner::CommandRunner;
