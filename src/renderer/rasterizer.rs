use nalgebra as na;
use na::{vector, Vector2, Vector3};

use super::framebuffer::Framebuffer;
use super::shading::{alpha_blend, pixel_shader};
use super::uniforms::Uniforms;

/// Values passed from the vertex shader to the pixel shader, interpolated across the triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Varyings {
    pub color: Vector3<f32>,          // Base color, lighting included in the Gouraud path.
    pub world_position: Vector3<f32>, // Only filled for Phong shading.
    pub world_normal: Vector3<f32>,   // Only filled for Phong shading.
}

/// Inclusive integer bounding box of a triangle on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Bounding box from the truncated screen coordinates. Not clamped to the framebuffer.
pub fn bounding_box(screen: &[Vector3<f32>; 3]) -> BoundingBox {
    let xs = [screen[0].x as i32, screen[1].x as i32, screen[2].x as i32];
    let ys = [screen[0].y as i32, screen[1].y as i32, screen[2].y as i32];
    return BoundingBox {
        min_x: xs[0].min(xs[1]).min(xs[2]),
        min_y: ys[0].min(ys[1]).min(ys[2]),
        max_x: xs[0].max(xs[1]).max(xs[2]),
        max_y: ys[0].max(ys[1]).max(ys[2]),
    };
}

/// Edge-sign test of a point against the triangle, used on top of the barycentric one so that
/// every triangle goes through the same comparisons.
pub fn is_inside_triangle(pixel: Vector2<f32>, screen: &[Vector3<f32>; 3]) -> bool {
    let (p0, p1, p2) = (screen[0].xy(), screen[1].xy(), screen[2].xy());

    let s = p0.y * p2.x - p0.x * p2.y + (p2.y - p0.y) * pixel.x + (p0.x - p2.x) * pixel.y;
    let t = p0.x * p1.y - p0.y * p1.x + (p0.y - p1.y) * pixel.x + (p1.x - p0.x) * pixel.y;

    if (s < 0.0) != (t < 0.0) {
        return false;
    }

    let area = -p1.y * p2.x + p0.y * (p2.x - p1.x) + p0.x * (p1.y - p2.y) + p1.x * p2.y;
    if area < 0.0 {
        return s <= 0.0 && s + t >= area;
    }
    return s >= 0.0 && s + t <= area;
}

/// Barycentric coordinates of `pixel` relative to the screen-space triangle.
/// Degenerate triangles give non-finite weights.
pub fn barycentric_weights(pixel: Vector2<f32>, screen: &[Vector3<f32>; 3]) -> Vector3<f32> {
    let (a, b, c) = (screen[0], screen[1], screen[2]);
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    let w0 = ((b.y - c.y) * (pixel.x - c.x) + (c.x - b.x) * (pixel.y - c.y)) / denominator;
    let w1 = ((c.y - a.y) * (pixel.x - c.x) + (a.x - c.x) * (pixel.y - c.y)) / denominator;
    return vector![w0, w1, 1.0 - w0 - w1];
}

/// Weights of a covered pixel, `None` when the pixel is outside the triangle.
pub fn vertices_weight(pixel: Vector2<f32>, screen: &[Vector3<f32>; 3]) -> Option<Vector3<f32>> {
    let w = barycentric_weights(pixel, screen);
    // NaN weights fail these comparisons, so degenerate triangles cover nothing.
    if w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0 && is_inside_triangle(pixel, screen) {
        return Some(w);
    }
    return None;
}

/// Depth buffer key of a pixel: barycentric combination of the remapped vertex depths.
pub fn interpolate_depth(screen: &[Vector3<f32>; 3], w: Vector3<f32>) -> f32 {
    return w.x * screen[0].z + w.y * screen[1].z + w.z * screen[2].z;
}

pub fn interpolate_varyings(varyings: &[Varyings; 3], w: Vector3<f32>) -> Varyings {
    return Varyings {
        color: w.x * varyings[0].color + w.y * varyings[1].color + w.z * varyings[2].color,
        world_position: w.x * varyings[0].world_position
            + w.y * varyings[1].world_position
            + w.z * varyings[2].world_position,
        world_normal: w.x * varyings[0].world_normal
            + w.y * varyings[1].world_normal
            + w.z * varyings[2].world_normal,
    };
}

/// Shades a pixel that passed coverage and depth and writes it. Returns whether it landed.
fn shade_pixel(
    fb: &mut Framebuffer,
    uniforms: &Uniforms,
    varyings: &[Varyings; 3],
    w: Vector3<f32>,
    x: i32,
    y: i32,
    camera_position: Vector3<f32>,
) -> bool {
    let pixel_varyings = interpolate_varyings(varyings, w);
    let shaded_color = pixel_shader(uniforms, &pixel_varyings, camera_position);
    if uniforms.alpha_blending {
        return fb.draw_pixel(x, y, alpha_blend(shaded_color, &uniforms.background_color));
    }
    return fb.draw_pixel(x, y, shaded_color);
}

/// Fills a screen-space triangle. Returns the number of pixels written.
pub fn rasterize_triangle(
    fb: &mut Framebuffer,
    uniforms: &Uniforms,
    screen: &[Vector3<f32>; 3],
    varyings: &[Varyings; 3],
    camera_position: Vector3<f32>,
) -> usize {
    let bbox = bounding_box(screen);
    let mut written = 0;
    for y in bbox.min_y..=bbox.max_y {
        for x in bbox.min_x..=bbox.max_x {
            let pixel = vector![x as f32, y as f32];
            let w = match vertices_weight(pixel, screen) {
                Some(w) => w,
                None => continue,
            };
            if uniforms.depth_test && !fb.depth_test(x, y, interpolate_depth(screen, w)) {
                continue;
            }
            if shade_pixel(fb, uniforms, varyings, w, x, y, camera_position) {
                written += 1;
            }
        }
    }
    return written;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> [Vector3<f32>; 3] {
        return [vector![0.0, 0.0, 0.5], vector![10.0, 0.0, 0.5], vector![0.0, 10.0, 0.5]];
    }

    fn flat(color: Vector3<f32>) -> [Varyings; 3] {
        let v = Varyings { color, ..Default::default() };
        return [v, v, v];
    }

    fn unlit_uniforms() -> Uniforms {
        let mut uniforms = Uniforms::default();
        uniforms.light.enabled = false;
        uniforms.alpha_blending = false;
        return uniforms;
    }

    #[test]
    fn bounding_box_truncates() {
        let screen = [vector![1.7, 2.2, 0.0], vector![-0.5, 8.9, 0.0], vector![6.1, 3.0, 0.0]];
        assert_eq!(
            bounding_box(&screen),
            BoundingBox { min_x: 0, min_y: 2, max_x: 6, max_y: 8 }
        );
    }

    #[test]
    fn corners_and_edges_are_covered() {
        let screen = triangle();
        assert!(vertices_weight(vector![0.0, 0.0], &screen).is_some());
        assert!(vertices_weight(vector![5.0, 0.0], &screen).is_some());
        assert!(vertices_weight(vector![5.0, 5.0], &screen).is_some());
        assert!(vertices_weight(vector![6.0, 5.0], &screen).is_none());
        assert!(vertices_weight(vector![-1.0, 2.0], &screen).is_none());
    }

    #[test]
    fn winding_does_not_matter() {
        let [a, b, c] = triangle();
        let reversed = [a, c, b];
        assert!(vertices_weight(vector![2.0, 3.0], &reversed).is_some());
        assert!(vertices_weight(vector![8.0, 8.0], &reversed).is_none());
    }

    #[test]
    fn degenerate_triangle_covers_nothing() {
        let line = [vector![0.0, 0.0, 0.5], vector![5.0, 5.0, 0.5], vector![10.0, 10.0, 0.5]];
        assert!(vertices_weight(vector![5.0, 5.0], &line).is_none());
        let mut fb = Framebuffer::new(16, 16);
        let written = rasterize_triangle(&mut fb, &unlit_uniforms(), &line, &flat(Vector3::zeros()), Vector3::zeros());
        assert_eq!(written, 0);
    }

    #[test]
    fn fills_every_covered_pixel_once() {
        let mut fb = Framebuffer::new(16, 16);
        let written = rasterize_triangle(
            &mut fb,
            &unlit_uniforms(),
            &triangle(),
            &flat(vector![1.0, 0.0, 0.0]),
            Vector3::zeros(),
        );
        let red = vector![1.0, 0.0, 0.0, 1.0];
        let mut red_pixels = 0;
        for y in 0..16 {
            for x in 0..16 {
                let is_red = fb.color(x, y).map_or(false, |c| (c - red).norm() < 1e-6);
                if is_red {
                    red_pixels += 1;
                    assert!(x + y <= 10, "({}, {}) is outside the triangle", x, y);
                }
                // Strictly interior pixels can't be lost to rounding on the edges.
                if x >= 1 && y >= 1 && x + y <= 9 {
                    assert!(is_red, "({}, {}) was not filled", x, y);
                    assert!((fb.depth(x, y).unwrap() - 0.5).abs() < 1e-6);
                }
            }
        }
        assert_eq!(written, red_pixels);
        assert_eq!(fb.color(6, 6), Some(vector![0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn depth_is_written_before_shading_next_triangle() {
        let mut fb = Framebuffer::new(16, 16);
        let uniforms = unlit_uniforms();
        let near = triangle();
        let far = near.map(|p| vector![p.x, p.y, 0.8]);
        rasterize_triangle(&mut fb, &uniforms, &near, &flat(vector![1.0, 0.0, 0.0]), Vector3::zeros());
        let written = rasterize_triangle(&mut fb, &uniforms, &far, &flat(vector![0.0, 1.0, 0.0]), Vector3::zeros());
        assert_eq!(written, 0);
        assert!((fb.color(1, 1).unwrap() - vector![1.0, 0.0, 0.0, 1.0]).norm() < 1e-6);
    }

    #[test]
    fn interpolates_varyings() {
        let varyings = [
            Varyings { color: vector![1.0, 0.0, 0.0], ..Default::default() },
            Varyings { color: vector![0.0, 1.0, 0.0], ..Default::default() },
            Varyings { color: vector![0.0, 0.0, 1.0], ..Default::default() },
        ];
        let out = interpolate_varyings(&varyings, vector![0.5, 0.25, 0.25]);
        assert_eq!(out.color, vector![0.5, 0.25, 0.25]);
    }

    proptest! {
        #[test]
        fn inside_weights_are_a_partition_of_unity(
            x in 0i32..=20,
            y in 0i32..=20,
            ax in -5.0f32..25.0, ay in -5.0f32..25.0,
            bx in -5.0f32..25.0, by in -5.0f32..25.0,
            cx in -5.0f32..25.0, cy in -5.0f32..25.0,
        ) {
            let screen = [vector![ax, ay, 0.0], vector![bx, by, 0.0], vector![cx, cy, 0.0]];
            if let Some(w) = vertices_weight(vector![x as f32, y as f32], &screen) {
                prop_assert!((w.x + w.y + w.z - 1.0).abs() < 1e-4);
                for i in 0..3 {
                    prop_assert!(w[i] >= 0.0 && w[i] <= 1.0 + 1e-4);
                }
            }
        }
    }
}
