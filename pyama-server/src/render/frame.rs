//! Channel image overlay.
//!
//! A square canvas with one centroid marker per particle observed at the
//! current frame: red for tracked, green for enabled, blue for the selected
//! particle while it is enabled. Disabled particles never receive the
//! selection overlay.

use image::RgbImage;

use pyama_core::RenderScene;

use super::draw;

const MARKER_HALF: i64 = 3;

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn render(scene: &RenderScene<'_>, size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, draw::BLACK);

    let (max_x, max_y) = centroid_extent(scene);
    let scale_x = f64::from(size - 1) / max_x;
    let scale_y = f64::from(size - 1) / max_y;

    let frame = scene.coordinate.frame;
    let selected = scene.coordinate.particle;

    for (i, track) in scene.tracks.iter() {
        let Some((x, y)) = track.point_at_frame(frame) else {
            continue;
        };
        let enabled = scene.registry.is_enabled(i);
        let color = if i == selected && enabled {
            draw::BLUE
        } else if enabled {
            draw::GREEN
        } else {
            draw::RED
        };
        draw::marker(
            &mut img,
            (x * scale_x) as i64,
            (y * scale_y) as i64,
            MARKER_HALF,
            color,
        );
    }

    img
}

/// Largest centroid coordinates across all tracks, used to fit the overlay
/// onto the canvas. The true image extent belongs to the imaging
/// collaborator.
fn centroid_extent(scene: &RenderScene<'_>) -> (f64, f64) {
    let mut max_x: f64 = 1.0;
    let mut max_y: f64 = 1.0;
    for (_, track) in scene.tracks.iter() {
        for (&x, &y) in track.x.iter().zip(&track.y) {
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    (max_x, max_y)
}
