//! Raster artifact renderer.
//!
//! Draws the two viewer artifacts from track data alone: the channel image
//! as a centroid-marker overlay for the current frame, and the brightness
//! plot as per-particle polylines over the frame axis. Raw microscope
//! pixels and label masks belong to the imaging collaborator; what matters
//! here is that both artifacts reflect the current coordinate and the
//! current disabled-particle set on every call.

mod draw;
mod frame;
mod plot;

use std::io::Cursor;

use image::RgbImage;

use pyama_core::{Artifact, ArtifactRenderer, Error, RenderScene, Result};

/// Renderer producing base64-encoded PNG artifacts.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    /// Side length of the square channel image, in pixels.
    pub image_size: u32,
    /// Brightness plot width in pixels.
    pub plot_width: u32,
    /// Brightness plot height in pixels.
    pub plot_height: u32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self {
            image_size: 800,
            plot_width: 640,
            plot_height: 480,
        }
    }
}

impl ArtifactRenderer for RasterRenderer {
    fn channel_image(&self, scene: &RenderScene<'_>) -> Result<Artifact> {
        let img = frame::render(scene, self.image_size);
        Ok(Artifact::from_bytes(&encode_png(&img)?))
    }

    fn brightness_plot(&self, scene: &RenderScene<'_>) -> Result<Artifact> {
        let img = plot::render(scene, self.plot_width, self.plot_height);
        Ok(Artifact::from_bytes(&encode_png(&img)?))
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
pub(crate) mod test_scenes {
    use std::collections::BTreeSet;

    use pyama_core::{
        DatasetDescriptor, DatasetSnapshot, ParticleTrack, TrackTable, ViewerSession,
    };

    /// Builds a session over a small synthetic dataset for render tests.
    pub fn session(n_particles: usize, disabled: &[usize]) -> ViewerSession {
        let mut tracks = TrackTable::new();
        for id in 0..n_particles {
            let mut t = ParticleTrack::new(id as u64);
            for frame in 0..=10 {
                t.frames.push(frame);
                t.x.push(100.0 + id as f64 * 50.0);
                t.y.push(200.0 + frame as f64 * 5.0);
                t.area.push(30.0);
                t.brightness.push((id + 1) as f64 * 100.0 + frame as f64);
            }
            tracks.push(t);
        }
        let snapshot = DatasetSnapshot {
            descriptor: DatasetDescriptor::new(2, 1, 10),
            tracks,
            disabled: disabled.iter().copied().collect::<BTreeSet<_>>(),
        };
        ViewerSession::open(snapshot).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_scenes::session;
    use super::*;

    #[test]
    fn test_artifacts_are_nonempty_even_without_particles() {
        let renderer = RasterRenderer::default();
        let session = session(0, &[]);

        let state = session.view(&renderer).unwrap();
        assert!(!state.channel_image.is_empty());
        assert!(!state.brightness_plot.is_empty());
    }

    #[test]
    fn test_disabling_a_particle_changes_the_plot() {
        let renderer = RasterRenderer::default();
        let with_all = session(3, &[]).view(&renderer).unwrap();
        let with_disabled = session(3, &[1]).view(&renderer).unwrap();

        assert_ne!(
            with_all.brightness_plot.as_str(),
            with_disabled.brightness_plot.as_str()
        );
    }
}
