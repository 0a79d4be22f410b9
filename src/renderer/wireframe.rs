use nalgebra as na;
use na::{Vector2, Vector3, Vector4};

use super::framebuffer::Framebuffer;

/// Draws a line between two pixel coordinates with Bresenham's algorithm.
/// Returns the number of pixels written.
pub fn draw_line(fb: &mut Framebuffer, from: Vector2<i32>, to: Vector2<i32>, color: Vector4<f32>) -> usize {
    let (mut x_0, mut y_0) = (from.x, from.y);
    let (x_1, y_1) = (to.x, to.y);
    let dx = (x_1 - x_0).abs();
    let sx = if x_0 < x_1 { 1 } else { -1 };
    let dy = (y_1 - y_0).abs();
    let sy = if y_0 < y_1 { 1 } else { -1 };
    let mut error = (if dx > dy { dx } else { -dy }) / 2;

    let mut written = 0;
    loop {
        if fb.draw_pixel(x_0, y_0, color) {
            written += 1;
        }
        if x_0 == x_1 && y_0 == y_1 {
            break;
        }
        let e2 = error;
        if e2 > -dx {
            error -= dy;
            x_0 += sx;
        }
        if e2 < dy {
            error += dx;
            y_0 += sy;
        }
    }
    return written;
}

/// Outlines a screen-space triangle, screen coordinates are rounded to the nearest pixel.
/// Depth is neither tested nor written.
pub fn draw_triangle_edges(fb: &mut Framebuffer, screen: &[Vector3<f32>; 3], color: Vector4<f32>) -> usize {
    let mut written = 0;
    for i in 0..3 {
        let from = screen[i].xy().map(|c| c.round() as i32);
        let to = screen[(i + 1) % 3].xy().map(|c| c.round() as i32);
        written += draw_line(fb, from, to, color);
    }
    return written;
}
