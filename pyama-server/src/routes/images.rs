//! Viewer session endpoints: dataset bootstrap, navigation, and particle
//! enablement.
//!
//! All handlers operate on the single active session behind the state
//! mutex. The coordinate and toggle endpoints re-render both artifacts on
//! every call; nothing is cached across requests.

use std::path::PathBuf;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use pyama_core::{Artifact, ViewState, ViewerCoordinate, ViewerSession};
use pyama_io::OutputScanSource;

use crate::error::ApiError;
use crate::state::{AppState, OpenSession};

/// Dataset selection request: the microscopy file and the pipeline output
/// directory.
#[derive(Debug, Deserialize)]
pub struct PathSelection {
    pub nd2_path: PathBuf,
    pub out_path: PathBuf,
}

/// Requested navigation coordinate, one value per axis.
#[derive(Debug, Deserialize)]
pub struct ImageUpdate {
    pub position: usize,
    pub channel: usize,
    pub frame: usize,
    pub particle: usize,
}

/// Enablement toggle for the particle at the current coordinate.
#[derive(Debug, Deserialize)]
pub struct ParticleEnabledUpdate {
    pub enabled: bool,
}

/// Bootstrap acknowledgment: the `status` flag the frontend checks, plus
/// the initial viewer state.
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub view: ViewResponse,
}

/// Full viewer state: artifacts plus the dataset extents the frontend
/// builds its sliders from.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub channel_image: Artifact,
    pub brightness_plot: Artifact,
    pub n_positions: usize,
    pub n_channels: usize,
    pub n_frames: usize,
    pub all_particles_len: usize,
    pub current_particle_index: usize,
    pub disabled_particles: Vec<usize>,
}

impl ViewResponse {
    fn assemble(session: &ViewerSession, state: ViewState) -> Self {
        let descriptor = session.descriptor();
        Self {
            channel_image: state.channel_image,
            brightness_plot: state.brightness_plot,
            n_positions: descriptor.n_positions,
            n_channels: descriptor.n_channels,
            n_frames: descriptor.n_frames,
            all_particles_len: state.all_particles_len,
            current_particle_index: session.current_particle_index(),
            disabled_particles: state.disabled_particles,
        }
    }
}

/// Artifacts refreshed by a navigation or toggle operation.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub channel_image: Artifact,
    pub brightness_plot: Artifact,
    pub all_particles_len: usize,
    pub disabled_particles: Vec<usize>,
}

impl From<ViewState> for ImageResponse {
    fn from(state: ViewState) -> Self {
        Self {
            channel_image: state.channel_image,
            brightness_plot: state.brightness_plot,
            all_particles_len: state.all_particles_len,
            disabled_particles: state.disabled_particles,
        }
    }
}

/// Opens a dataset, replacing any previously active session.
pub async fn select_paths(
    State(state): State<AppState>,
    Json(selection): Json<PathSelection>,
) -> Result<Json<SelectResponse>, ApiError> {
    let opened = OutputScanSource.open(
        &selection.nd2_path,
        &selection.out_path,
        state.inner.metadata.as_ref(),
    )?;
    let session = ViewerSession::open(opened.snapshot)?;
    info!(
        nd2 = %selection.nd2_path.display(),
        out = %selection.out_path.display(),
        positions = opened.positions.len(),
        particles = session.registry().all_particles_len(),
        "dataset opened"
    );

    let view = session.view(&state.inner.renderer)?;
    let response = SelectResponse {
        status: "success",
        view: ViewResponse::assemble(&session, view),
    };
    *state.session() = Some(OpenSession {
        session,
        tracks_path: opened.tracks_path,
    });
    Ok(Json(response))
}

/// Current viewer state without any mutation.
pub async fn get_view(State(state): State<AppState>) -> Result<Json<ViewResponse>, ApiError> {
    let guard = state.session();
    let open = guard.as_ref().ok_or(pyama_core::Error::NotBootstrapped)?;
    let view = open.session.view(&state.inner.renderer)?;
    Ok(Json(ViewResponse::assemble(&open.session, view)))
}

/// Moves the session to a new coordinate and returns fresh artifacts.
pub async fn update_image(
    State(state): State<AppState>,
    Json(update): Json<ImageUpdate>,
) -> Result<Json<ImageResponse>, ApiError> {
    let mut guard = state.session();
    let open = guard.as_mut().ok_or(pyama_core::Error::NotBootstrapped)?;
    let coordinate = ViewerCoordinate::new(
        update.position,
        update.channel,
        update.frame,
        update.particle,
    );
    let view = open
        .session
        .update_coordinate(coordinate, &state.inner.renderer)?;
    Ok(Json(view.into()))
}

/// Toggles the particle at the current coordinate, persisting the change to
/// the track file when the dataset has one.
///
/// Persistence comes first: the in-memory registry only changes once the
/// track file holds the new flag, so a failed write leaves the session
/// exactly as the client last saw it.
pub async fn update_particle_enabled(
    State(state): State<AppState>,
    Json(update): Json<ParticleEnabledUpdate>,
) -> Result<Json<ImageResponse>, ApiError> {
    let mut guard = state.session();
    let open = guard.as_mut().ok_or(pyama_core::Error::NotBootstrapped)?;

    let mut staged = open.session.registry().clone();
    staged.set_enabled(open.session.current_particle_index(), update.enabled)?;
    if let Some(path) = &open.tracks_path {
        pyama_io::write_enabled(path, open.session.tracks(), &staged)?;
        info!(
            particle = open.session.current_particle_index(),
            enabled = update.enabled,
            path = %path.display(),
            "enablement persisted"
        );
    }

    let view = open
        .session
        .set_particle_enabled(update.enabled, &state.inner.renderer)?;
    Ok(Json(view.into()))
}
