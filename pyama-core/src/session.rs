//! Viewer session state machine.
//!
//! One session exists per open (dataset file, output directory) pair. It
//! owns the dataset descriptor, the particle registry, the track table, and
//! the current navigation coordinate, and it produces the pair of visual
//! artifacts for that coordinate on demand. All mutation goes through
//! single-coordinate or single-toggle operations; a whole-session `refresh`
//! replaces the dataset state after a pipeline stage completes.

use crate::coordinate::ViewerCoordinate;
use crate::descriptor::DatasetDescriptor;
use crate::error::{Error, Result};
use crate::registry::ParticleRegistry;
use crate::render::{Artifact, ArtifactRenderer, RenderScene};
use crate::snapshot::DatasetSnapshot;
use crate::track::TrackTable;

/// Artifacts and registry echo returned by every session operation.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Rendered channel image for the current coordinate.
    pub channel_image: Artifact,
    /// Rendered brightness plot, excluding disabled particles.
    pub brightness_plot: Artifact,
    /// Total number of tracked particles.
    pub all_particles_len: usize,
    /// Disabled particle indices in ascending order.
    pub disabled_particles: Vec<usize>,
}

/// Stateful viewer over one open dataset.
#[derive(Debug)]
pub struct ViewerSession {
    descriptor: DatasetDescriptor,
    registry: ParticleRegistry,
    tracks: TrackTable,
    coordinate: ViewerCoordinate,
}

impl ViewerSession {
    /// Opens a session over a dataset snapshot.
    ///
    /// The coordinate starts at the default `(0, 0, 0, 0)`. Fails with
    /// `InvalidParticleId` if the snapshot's disabled set references a
    /// particle outside the track table.
    pub fn open(snapshot: DatasetSnapshot) -> Result<Self> {
        let registry = ParticleRegistry::with_disabled(snapshot.tracks.len(), snapshot.disabled)?;
        Ok(Self {
            descriptor: snapshot.descriptor,
            registry,
            tracks: snapshot.tracks,
            coordinate: ViewerCoordinate::default(),
        })
    }

    /// The descriptor of the open dataset.
    pub fn descriptor(&self) -> &DatasetDescriptor {
        &self.descriptor
    }

    /// The current navigation coordinate.
    pub fn coordinate(&self) -> ViewerCoordinate {
        self.coordinate
    }

    /// Index of the particle referenced by the current coordinate.
    pub fn current_particle_index(&self) -> usize {
        self.coordinate.particle
    }

    /// The particle enablement registry.
    pub fn registry(&self) -> &ParticleRegistry {
        &self.registry
    }

    /// The loaded track table.
    pub fn tracks(&self) -> &TrackTable {
        &self.tracks
    }

    /// Renders artifacts for the current coordinate without mutating
    /// anything.
    pub fn view(&self, renderer: &dyn ArtifactRenderer) -> Result<ViewState> {
        self.render(renderer)
    }

    /// Moves the session to a new coordinate and re-renders.
    ///
    /// Every axis is validated against the current descriptor and particle
    /// count before any state changes; on failure the coordinate is left
    /// untouched and the violation is reported without clamping.
    pub fn update_coordinate(
        &mut self,
        coordinate: ViewerCoordinate,
        renderer: &dyn ArtifactRenderer,
    ) -> Result<ViewState> {
        coordinate.validate(&self.descriptor, self.registry.all_particles_len())?;
        self.coordinate = coordinate;
        self.render(renderer)
    }

    /// Enables or disables the particle at the current coordinate and
    /// re-renders.
    ///
    /// Idempotent: toggling to the already-current state is a no-op that
    /// still returns fresh artifacts. Fails with `InvalidParticleId` before
    /// tracking has produced any particles.
    pub fn set_particle_enabled(
        &mut self,
        enabled: bool,
        renderer: &dyn ArtifactRenderer,
    ) -> Result<ViewState> {
        let id = self.coordinate.particle;
        if self.registry.all_particles_len() == 0 {
            return Err(Error::InvalidParticleId { id, len: 0 });
        }
        self.registry.set_enabled(id, enabled)?;
        self.render(renderer)
    }

    /// Replaces the dataset state wholesale after a pipeline stage has
    /// changed it, resetting the coordinate to the default.
    pub fn refresh(&mut self, snapshot: DatasetSnapshot) -> Result<()> {
        let registry = ParticleRegistry::with_disabled(snapshot.tracks.len(), snapshot.disabled)?;
        self.descriptor = snapshot.descriptor;
        self.registry = registry;
        self.tracks = snapshot.tracks;
        self.coordinate = ViewerCoordinate::default();
        Ok(())
    }

    fn render(&self, renderer: &dyn ArtifactRenderer) -> Result<ViewState> {
        let scene = RenderScene {
            descriptor: &self.descriptor,
            coordinate: self.coordinate,
            tracks: &self.tracks,
            registry: &self.registry,
        };
        Ok(ViewState {
            channel_image: renderer.channel_image(&scene)?,
            brightness_plot: renderer.brightness_plot(&scene)?,
            all_particles_len: self.registry.all_particles_len(),
            disabled_particles: self.registry.disabled_ids(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::track::ParticleTrack;

    /// Renderer that counts calls and embeds the disabled set in its output.
    #[derive(Default)]
    struct ProbeRenderer {
        calls: AtomicUsize,
    }

    impl ArtifactRenderer for ProbeRenderer {
        fn channel_image(&self, scene: &RenderScene<'_>) -> Result<Artifact> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let tag = format!("image:{:?}", scene.coordinate);
            Ok(Artifact::from_bytes(tag.as_bytes()))
        }

        fn brightness_plot(&self, scene: &RenderScene<'_>) -> Result<Artifact> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let tag = format!("plot:{:?}", scene.registry.disabled_ids());
            Ok(Artifact::from_bytes(tag.as_bytes()))
        }
    }

    fn snapshot(n_particles: usize) -> DatasetSnapshot {
        let mut tracks = TrackTable::new();
        for id in 0..n_particles {
            let mut t = ParticleTrack::new(id as u64);
            t.frames = vec![0, 1, 2];
            t.x = vec![10.0, 11.0, 12.0];
            t.y = vec![20.0, 21.0, 22.0];
            t.area = vec![4.0; 3];
            t.brightness = vec![1.0, 2.0, 3.0];
            tracks.push(t);
        }
        DatasetSnapshot {
            descriptor: DatasetDescriptor::new(3, 1, 10),
            tracks,
            disabled: BTreeSet::new(),
        }
    }

    #[test]
    fn test_open_defaults_to_origin() {
        let session = ViewerSession::open(snapshot(5)).unwrap();
        assert_eq!(session.coordinate(), ViewerCoordinate::default());
        assert_eq!(session.current_particle_index(), 0);
        assert_eq!(session.registry().all_particles_len(), 5);
    }

    #[test]
    fn test_update_coordinate_in_range_returns_artifacts() {
        let mut session = ViewerSession::open(snapshot(5)).unwrap();
        let renderer = ProbeRenderer::default();

        let state = session
            .update_coordinate(ViewerCoordinate::new(2, 1, 10, 4), &renderer)
            .unwrap();

        assert!(!state.channel_image.is_empty());
        assert!(!state.brightness_plot.is_empty());
        assert_eq!(state.all_particles_len, 5);
        assert_eq!(session.coordinate(), ViewerCoordinate::new(2, 1, 10, 4));
    }

    #[test]
    fn test_update_coordinate_out_of_range_leaves_state_unchanged() {
        let mut session = ViewerSession::open(snapshot(5)).unwrap();
        let renderer = ProbeRenderer::default();
        session
            .update_coordinate(ViewerCoordinate::new(1, 0, 5, 2), &renderer)
            .unwrap();

        let err = session
            .update_coordinate(ViewerCoordinate::new(3, 0, 0, 0), &renderer)
            .unwrap_err();
        assert!(matches!(err, Error::CoordinateOutOfRange { .. }));
        assert_eq!(session.coordinate(), ViewerCoordinate::new(1, 0, 5, 2));
    }

    #[test]
    fn test_toggle_round_trip_restores_disabled_set() {
        let mut session = ViewerSession::open(snapshot(3)).unwrap();
        let renderer = ProbeRenderer::default();
        session
            .update_coordinate(ViewerCoordinate::new(0, 0, 0, 1), &renderer)
            .unwrap();

        let state = session.set_particle_enabled(false, &renderer).unwrap();
        assert_eq!(state.disabled_particles, vec![1]);

        let state = session.set_particle_enabled(true, &renderer).unwrap();
        assert!(state.disabled_particles.is_empty());
    }

    #[test]
    fn test_toggle_same_state_is_noop_with_fresh_artifacts() {
        let mut session = ViewerSession::open(snapshot(3)).unwrap();
        let renderer = ProbeRenderer::default();

        let first = session.set_particle_enabled(false, &renderer).unwrap();
        let second = session.set_particle_enabled(false, &renderer).unwrap();
        assert_eq!(first.disabled_particles, second.disabled_particles);
        assert!(!second.brightness_plot.is_empty());
        // Artifacts are recomputed every time, not cached.
        assert_eq!(renderer.calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_toggle_without_particles_fails() {
        let mut session = ViewerSession::open(snapshot(0)).unwrap();
        let renderer = ProbeRenderer::default();
        let err = session.set_particle_enabled(false, &renderer).unwrap_err();
        assert!(matches!(err, Error::InvalidParticleId { len: 0, .. }));
    }

    #[test]
    fn test_refresh_replaces_state_and_resets_coordinate() {
        let mut session = ViewerSession::open(snapshot(3)).unwrap();
        let renderer = ProbeRenderer::default();
        session
            .update_coordinate(ViewerCoordinate::new(2, 0, 3, 2), &renderer)
            .unwrap();
        session.set_particle_enabled(false, &renderer).unwrap();

        session.refresh(snapshot(7)).unwrap();
        assert_eq!(session.coordinate(), ViewerCoordinate::default());
        assert_eq!(session.registry().all_particles_len(), 7);
        assert!(session.registry().disabled_ids().is_empty());
    }
}
