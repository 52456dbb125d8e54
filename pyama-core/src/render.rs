//! Artifact rendering seam.
//!
//! The viewer contract treats the channel image and the brightness plot as
//! opaque base64-encoded raster images. How they are drawn is up to the
//! renderer implementation; this module only fixes the boundary: a renderer
//! receives the full scene (descriptor, coordinate, tracks, registry) and
//! must reflect the current disabled-particle set in what it produces.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::coordinate::ViewerCoordinate;
use crate::descriptor::DatasetDescriptor;
use crate::error::Result;
use crate::registry::ParticleRegistry;
use crate::track::TrackTable;

/// An opaque base64-encoded raster image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    /// Encodes raw image bytes into the wire representation.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// The base64 payload.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded payload.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a renderer may consult when drawing the two artifacts.
pub struct RenderScene<'a> {
    /// Axis extents of the dataset.
    pub descriptor: &'a DatasetDescriptor,
    /// The coordinate being viewed.
    pub coordinate: ViewerCoordinate,
    /// Per-particle measurement series.
    pub tracks: &'a TrackTable,
    /// Current enablement state; disabled particles must not appear in the
    /// brightness plot or the current-particle overlay.
    pub registry: &'a ParticleRegistry,
}

/// Produces the channel image and brightness plot for a scene.
pub trait ArtifactRenderer: Send + Sync {
    /// Renders the channel image for the scene's coordinate.
    fn channel_image(&self, scene: &RenderScene<'_>) -> Result<Artifact>;

    /// Renders the brightness-over-time plot, excluding disabled particles.
    fn brightness_plot(&self, scene: &RenderScene<'_>) -> Result<Artifact>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_round_trips_base64() {
        let artifact = Artifact::from_bytes(b"\x89PNG\r\n");
        assert!(!artifact.is_empty());
        let decoded = STANDARD.decode(artifact.as_str()).unwrap();
        assert_eq!(decoded, b"\x89PNG\r\n");
    }
}
