//! Primitive drawing helpers over `RgbImage`.

use image::{Rgb, RgbImage};

/// Unselected trace color.
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
/// Selected-particle highlight and frame cursor.
pub const RED: Rgb<u8> = Rgb([220, 30, 30]);
/// Enabled-particle marker.
pub const GREEN: Rgb<u8> = Rgb([30, 200, 30]);
/// Selected-and-enabled marker.
pub const BLUE: Rgb<u8> = Rgb([40, 90, 255]);
/// Plot background.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// Channel image background.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Draws a straight line segment with Bresenham stepping, clipping to the
/// image bounds.
pub fn line(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fills an axis-aligned square centered on `(cx, cy)`, clipping to the
/// image bounds.
pub fn marker(img: &mut RgbImage, cx: i64, cy: i64, half: i64, color: Rgb<u8>) {
    for y in (cy - half)..=(cy + half) {
        for x in (cx - half)..=(cx + half) {
            put(img, x, y, color);
        }
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        img.put_pixel(x as u32, y as u32, color);
    }
}
