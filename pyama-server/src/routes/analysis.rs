//! Pipeline stage endpoints.
//!
//! Each handler copies the dataset descriptor out of the session lock,
//! validates the request against it, and hands the canonical job to the
//! dispatcher. The acknowledgment only says whether the job was handed off;
//! completion is reported on the dispatcher's event channel.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use pyama_core::DatasetDescriptor;
use pyama_pipeline::{
    ChannelRoleAssignment, ExportRequest, FrameRange, JobId, JobState, JobStatus, PositionRange,
    SegmentationRequest, SquareRoiRequest, TrackingRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SegmentationPayload {
    pub position_min: usize,
    pub position_max: usize,
    pub frame_min: usize,
    pub frame_max: usize,
    pub channels: ChannelRoleAssignment,
}

#[derive(Debug, Deserialize)]
pub struct TrackingPayload {
    pub position_min: usize,
    pub position_max: usize,
    pub expand_labels: bool,
}

#[derive(Debug, Deserialize)]
pub struct SquareRoiPayload {
    pub position_min: usize,
    pub position_max: usize,
    pub square_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExportPayload {
    pub position_min: usize,
    pub position_max: usize,
    pub minutes: f64,
}

/// Dispatch acknowledgment body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: JobState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

impl From<JobStatus> for StatusResponse {
    fn from(status: JobStatus) -> Self {
        Self {
            status: status.state,
            message: status.message,
            job_id: status.job_id,
        }
    }
}

/// Descriptor of the open dataset, for populating stage request forms.
pub async fn get_analysis(
    State(state): State<AppState>,
) -> Result<Json<DatasetDescriptor>, ApiError> {
    Ok(Json(descriptor(&state)?))
}

pub async fn do_segmentation(
    State(state): State<AppState>,
    Json(payload): Json<SegmentationPayload>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = SegmentationRequest {
        positions: PositionRange::new(payload.position_min, payload.position_max),
        frames: FrameRange::new(payload.frame_min, payload.frame_max),
        channels: payload.channels,
    };
    let job = request.validate(&descriptor(&state)?)?;
    Ok(Json(state.inner.dispatcher.dispatch(job).into()))
}

pub async fn do_tracking(
    State(state): State<AppState>,
    Json(payload): Json<TrackingPayload>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = TrackingRequest {
        positions: PositionRange::new(payload.position_min, payload.position_max),
        expand_labels: payload.expand_labels,
    };
    let job = request.validate(&descriptor(&state)?)?;
    Ok(Json(state.inner.dispatcher.dispatch(job).into()))
}

pub async fn do_square_rois(
    State(state): State<AppState>,
    Json(payload): Json<SquareRoiPayload>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = SquareRoiRequest {
        positions: PositionRange::new(payload.position_min, payload.position_max),
        square_size: payload.square_size,
    };
    let job = request.validate(&descriptor(&state)?)?;
    Ok(Json(state.inner.dispatcher.dispatch(job).into()))
}

pub async fn do_export(
    State(state): State<AppState>,
    Json(payload): Json<ExportPayload>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = ExportRequest {
        positions: PositionRange::new(payload.position_min, payload.position_max),
        minutes: payload.minutes,
    };
    let job = request.validate(&descriptor(&state)?)?;
    Ok(Json(state.inner.dispatcher.dispatch(job).into()))
}

/// Copies the descriptor out of the session lock so validation and dispatch
/// run without holding it.
fn descriptor(state: &AppState) -> Result<DatasetDescriptor, ApiError> {
    let guard = state.session();
    let open = guard.as_ref().ok_or(pyama_core::Error::NotBootstrapped)?;
    Ok(*open.session.descriptor())
}
