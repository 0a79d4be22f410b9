//! Per-vertex geometry: world transform, backface test, clip test and screen mapping.

use nalgebra as na;
use na::{vector, Matrix4, Vector3, Vector4};

use super::uniforms::Viewport;
use super::Vertex;
use crate::error::{RenderError, Result};
use crate::maths;

/// Vertex position and normal with the model matrix applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldVertex {
    pub position: Vector4<f32>,
    pub normal: Vector4<f32>, // w = 0, no inverse-transpose correction.
}

pub fn to_world(model: &Matrix4<f32>, vertex: &Vertex) -> WorldVertex {
    return WorldVertex {
        position: model * maths::to_hom_point(vertex.position),
        normal: model * maths::to_hom_vector(vertex.normal),
    };
}

/// Camera position in world space: translation column of the inverse view matrix.
pub fn camera_position(view: &Matrix4<f32>) -> Result<Vector3<f32>> {
    let inverted = maths::invert(view).ok_or(RenderError::SingularViewMatrix)?;
    return Ok(vector![inverted[(0, 3)], inverted[(1, 3)], inverted[(2, 3)]]);
}

/// True when the surface at this vertex faces away from the camera (or is edge-on).
pub fn is_backface(camera_position: Vector3<f32>, world: &WorldVertex) -> bool {
    let to_camera = maths::normalize(camera_position - maths::from_hom_vector(world.position));
    let normal = maths::normalize(maths::from_hom_vector(world.normal));
    return to_camera.dot(&normal) <= 0.0;
}

/// Homogeneous clip test. Any vertex failing it drops the whole triangle.
pub fn is_outside(clip: Vector4<f32>) -> bool {
    return clip.w < 0.0
        || clip.x > clip.w
        || clip.x < -clip.w
        || clip.y > clip.w
        || clip.y < -clip.w
        || clip.z > clip.w
        || clip.z < -clip.w;
}

/// NDC to screen coordinates. y goes down on screen, z becomes the depth buffer key.
pub fn ndc_to_screen(ndc: Vector3<f32>, viewport: &Viewport) -> Vector3<f32> {
    return vector![
        ((ndc.x / 2.0) + 0.5) * viewport.width as f32,
        (1.0 - ((ndc.y / 2.0) + 0.5)) * viewport.height as f32,
        (-(1.0 / ndc.z) + 1.0) / 2.0
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        return Viewport { x: 0, y: 0, width: 100, height: 50 };
    }

    #[test]
    fn world_transform_ignores_translation_for_normals() {
        let vertex = Vertex::new(vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]);
        let world = to_world(&maths::translate(vector![0.0, 0.0, 5.0]), &vertex);
        assert_eq!(world.position, vector![1.0, 0.0, 5.0, 1.0]);
        assert_eq!(world.normal, vector![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn camera_position_from_view() {
        let view = maths::translate(vector![-0.5, -1.0, 3.0]);
        assert_eq!(camera_position(&view), Ok(vector![0.5, 1.0, -3.0]));
        assert_eq!(camera_position(&Matrix4::zeros()), Err(RenderError::SingularViewMatrix));
    }

    #[test]
    fn backface_depends_on_normal_direction() {
        let world = WorldVertex {
            position: vector![0.0, 0.0, -2.0, 1.0],
            normal: vector![0.0, 0.0, 1.0, 0.0],
        };
        assert!(!is_backface(Vector3::zeros(), &world));
        let away = WorldVertex { normal: vector![0.0, 0.0, -1.0, 0.0], ..world };
        assert!(is_backface(Vector3::zeros(), &away));
        let edge_on = WorldVertex { normal: vector![1.0, 0.0, 0.0, 0.0], ..world };
        assert!(is_backface(Vector3::zeros(), &edge_on));
    }

    #[test]
    fn clip_test() {
        assert!(!is_outside(vector![0.5, -0.5, 1.0, 1.0]));
        assert!(is_outside(vector![0.0, 0.0, 0.0, -0.1]));
        assert!(is_outside(vector![1.5, 0.0, 0.0, 1.0]));
        assert!(is_outside(vector![0.0, -1.5, 0.0, 1.0]));
        assert!(is_outside(vector![0.0, 0.0, 1.01, 1.0]));
    }

    #[test]
    fn screen_mapping_flips_y() {
        let screen = ndc_to_screen(vector![-1.0, 1.0, 0.5], &viewport());
        assert_eq!(screen, vector![0.0, 0.0, -0.5]);
        let screen = ndc_to_screen(vector![1.0, -1.0, 1.0], &viewport());
        assert_eq!(screen, vector![100.0, 50.0, 0.0]);
        let screen = ndc_to_screen(vector![0.0, 0.0, -1.0], &viewport());
        assert_eq!(screen, vector![50.0, 25.0, 1.0]);
    }

    #[test]
    fn depth_key_grows_with_ndc_depth() {
        let near = ndc_to_screen(vector![0.0, 0.0, 0.2], &viewport()).z;
        let far = ndc_to_screen(vector![0.0, 0.0, 0.9], &viewport()).z;
        assert!(near < far);
    }
}
