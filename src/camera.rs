use nalgebra as na;
use na::{Matrix4, Vector3};

use crate::maths;

/// Static first-person camera, producing the view and projection matrices for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub pitch: f32,  // Rotation around x, radians.
    pub yaw: f32,    // Rotation around y, radians.
    pub aspect: f32, // Width over height.
    pub fov_y: f32,  // Vertical field of view, radians.
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view(&self) -> Matrix4<f32> {
        return maths::rotate_x(self.pitch) * maths::rotate_y(self.yaw) * maths::translate(-self.position);
    }

    pub fn projection(&self) -> Matrix4<f32> {
        return maths::perspective(self.fov_y, self.aspect, self.near, self.far);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::vector;

    fn camera() -> Camera {
        return Camera {
            position: vector![1.0, 2.0, 3.0],
            pitch: 0.3,
            yaw: -0.7,
            aspect: 1.5,
            fov_y: maths::to_radians(60.0),
            near: 0.1,
            far: 100.0,
        };
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let view = camera().view();
        let eye = view * maths::to_hom_point(vector![1.0, 2.0, 3.0]);
        assert!(maths::from_hom_vector(eye).norm() < 1e-5);
    }

    #[test]
    fn camera_position_is_recovered_from_view() {
        let view = camera().view();
        let inverse = maths::invert(&view).unwrap();
        let position = inverse.column(3).xyz();
        assert!((position - vector![1.0, 2.0, 3.0]).norm() < 1e-5);
    }

    #[test]
    fn point_in_front_is_inside_clip_volume() {
        let mut camera = camera();
        camera.pitch = 0.0;
        camera.yaw = 0.0;
        let clip = camera.projection() * camera.view() * maths::to_hom_point(vector![1.0, 2.0, -2.0]);
        assert!(clip.w > 0.0);
        let ndc = maths::from_hom_point(clip);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
