//! Brightness-over-time plot.
//!
//! One polyline per enabled particle across the full frame axis, the
//! selected particle drawn last and highlighted, plus a vertical cursor at
//! the current frame. Disabled particles are left out entirely.

use image::RgbImage;

use pyama_core::{ParticleTrack, RenderScene};

use super::draw;

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn render(scene: &RenderScene<'_>, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, draw::WHITE);

    let selected = scene.coordinate.particle;
    let included: Vec<usize> = scene
        .tracks
        .iter()
        .map(|(i, _)| i)
        .filter(|&i| scene.registry.is_enabled(i))
        .collect();

    let (lo, hi) = brightness_extent(scene, &included);
    let n_frames = scene.descriptor.n_frames.max(1) as f64;
    let to_x = |frame: usize| ((frame as f64 / n_frames) * f64::from(width - 1)) as i64;
    let to_y = |v: f64| {
        let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
        ((1.0 - t) * f64::from(height - 1)) as i64
    };

    // Unselected traces first so the highlight stays on top.
    for &i in &included {
        if i == selected {
            continue;
        }
        if let Some(track) = scene.tracks.get(i) {
            polyline(&mut img, track, to_x, to_y, draw::GRAY);
        }
    }
    if included.contains(&selected) {
        if let Some(track) = scene.tracks.get(selected) {
            polyline(&mut img, track, to_x, to_y, draw::RED);
        }
    }

    // Frame cursor.
    let cx = to_x(scene.coordinate.frame);
    draw::line(&mut img, cx, 0, cx, i64::from(height - 1), draw::RED);

    img
}

fn polyline(
    img: &mut RgbImage,
    track: &ParticleTrack,
    to_x: impl Fn(usize) -> i64,
    to_y: impl Fn(f64) -> i64,
    color: image::Rgb<u8>,
) {
    for w in 0..track.len().saturating_sub(1) {
        draw::line(
            img,
            to_x(track.frames[w]),
            to_y(track.brightness[w]),
            to_x(track.frames[w + 1]),
            to_y(track.brightness[w + 1]),
            color,
        );
    }
}

/// Value range of the included brightness series.
fn brightness_extent(scene: &RenderScene<'_>, included: &[usize]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &i in included {
        if let Some(track) = scene.tracks.get(i) {
            for &v in &track.brightness {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if lo > hi {
        (0.0, 1.0)
    } else {
        (lo, hi)
    }
}
