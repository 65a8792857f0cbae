// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview shown next to the keys.
//!
//! The mirrored frame is scaled to a fixed width, the tracked hands are
//! drawn on it, and the whole image is darkened so the keys stay readable.

use crate::gesture::{Hand, HAND_CONNECTIONS};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

const BONE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const JOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const JOINT_RADIUS: i32 = 2;

/// Builds the RGBA preview for one frame.
///
/// The result is `width` pixels wide with the frame's aspect ratio.
#[must_use]
pub fn render_preview(frame: &RgbImage, hands: &[Hand], width: u32, dim_alpha: u8) -> RgbaImage {
    let height = scaled_height(frame.width(), frame.height(), width);
    let mut scaled = imageops::resize(frame, width, height, FilterType::Triangle);

    for hand in hands {
        draw_hand(&mut scaled, hand);
    }

    darken(&scaled, dim_alpha)
}

/// Height keeping the aspect ratio of a `src_width`×`src_height` frame.
#[must_use]
pub fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    if src_width == 0 {
        return 0;
    }
    ((u64::from(src_height) * u64::from(width)) / u64::from(src_width)) as u32
}

/// Composites a black layer of `alpha` over the image.
fn darken(image: &RgbImage, alpha: u8) -> RgbaImage {
    let keep = 255 - u16::from(alpha);
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        let dim = |c: u8| ((u16::from(c) * keep + 127) / 255) as u8;
        image::Rgba([dim(r), dim(g), dim(b), 255])
    })
}

fn draw_hand(image: &mut RgbImage, hand: &Hand) {
    let (w, h) = (image.width(), image.height());
    let points: Vec<(i32, i32)> = hand
        .landmarks
        .iter()
        .map(|landmark| {
            let p = landmark.to_pixel(w, h);
            (clamp_coord(p.x, w), clamp_coord(p.y, h))
        })
        .collect();

    for &(a, b) in &HAND_CONNECTIONS {
        if let (Some(&start), Some(&end)) = (points.get(a), points.get(b)) {
            draw_line(image, start, end, BONE_COLOR);
        }
    }
    for &(x, y) in &points {
        draw_dot(image, x, y, JOINT_RADIUS, JOINT_COLOR);
    }
}

/// Keeps a tracker coordinate within one pixel of the image, so lines to
/// stray landmarks stay short. NaN maps to 0.
fn clamp_coord(value: f32, extent: u32) -> i32 {
    let max = i32::try_from(extent).unwrap_or(i32::MAX);
    (value as i32).clamp(-1, max)
}

fn put_pixel(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

// Bresenham
fn draw_line(image: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);

    loop {
        put_pixel(image, x, y, color);
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

fn draw_dot(image: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for y in -radius..=radius {
        for x in -radius..=radius {
            if x * x + y * y <= radius * radius {
                put_pixel(image, cx + x, cy + y, color);
            }
        }
    }
}
