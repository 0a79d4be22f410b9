use nalgebra as na;
use na::{vector, Matrix4, Vector3, Vector4};

/// Target rectangle of the screen mapping. Only width and height take part in the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub enabled: bool,
    pub attenuation_enabled: bool,
    pub min_full_attenuation_distance: f32, // Closer than this the light is at full strength.
    pub position: Vector4<f32>,             // World space.
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
    pub attenuation: Vector3<f32>, // Per channel attenuation strength.
}

impl Default for Light {
    fn default() -> Self {
        return Self {
            enabled: true,
            attenuation_enabled: true,
            min_full_attenuation_distance: 10.0,
            position: vector![2.0, 10.0, 4.0, 1.0],
            ambient: vector![0.0, 0.0, 0.0, 1.0],
            diffuse: vector![0.0, 0.0, 0.0, 1.0],
            specular: vector![0.0, 0.0, 0.0, 1.0],
            attenuation: vector![1.0, 1.0, 1.0],
        };
    }
}

/// Material constants used by the lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,  // ka
    pub diffuse: Vector3<f32>,  // kd
    pub specular: Vector3<f32>, // ks
}

impl Default for Material {
    fn default() -> Self {
        return Self {
            ambient: vector![1.0, 1.0, 1.0],
            diffuse: vector![1.0, 1.0, 1.0],
            specular: vector![1.0, 1.0, 1.0],
        };
    }
}

/// Per-frame state of the pipeline. Mutated between draw calls, read-only during one.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniforms {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    // Products refreshed at the start of every draw call.
    pub model_view_projection: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,

    pub wireframe: bool,
    pub rgb_interpolation: bool, // Flat red/green/blue corners instead of texture lookups.
    pub depth_test: bool,
    pub backface_culling: bool,
    pub phong: bool, // Per pixel lighting, otherwise Gouraud.
    pub alpha_blending: bool,

    pub alpha: f32,
    pub line_color: Vector4<f32>,
    pub background_color: Vector4<f32>, // Blend destination.

    pub light: Light,
    pub material: Material,
}

impl Default for Uniforms {
    fn default() -> Self {
        return Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            model_view_projection: Matrix4::identity(),
            view_projection: Matrix4::identity(),
            wireframe: false,
            rgb_interpolation: false,
            depth_test: true,
            backface_culling: true,
            phong: true,
            alpha_blending: true,
            alpha: 1.0,
            line_color: vector![1.0, 1.0, 1.0, 1.0],
            background_color: vector![0.0, 0.0, 0.0, 0.0],
            light: Light::default(),
            material: Material::default(),
        };
    }
}

impl Uniforms {
    /// Recomputes the matrix products, done once per draw call rather than per triangle.
    pub fn update_products(&mut self) {
        self.model_view_projection = self.projection * self.view * self.model;
        self.view_projection = self.projection * self.view;
    }

    /// Whether the draw call needs the camera position (and so the inverse of the view matrix).
    pub fn needs_camera_position(&self) -> bool {
        return !self.wireframe && (self.backface_culling || self.light.enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths;

    #[test]
    fn products_follow_column_vector_order() {
        let mut uniforms = Uniforms::default();
        uniforms.model = maths::translate(vector![1.0, 0.0, 0.0]);
        uniforms.view = maths::scale(2.0);
        uniforms.projection = maths::translate(vector![0.0, 0.0, -1.0]);
        uniforms.update_products();

        let p = uniforms.model_view_projection * vector![0.0, 0.0, 0.0, 1.0];
        assert_eq!(p, vector![2.0, 0.0, -1.0, 1.0]);
        let q = uniforms.view_projection * vector![1.0, 0.0, 0.0, 1.0];
        assert_eq!(q, vector![2.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn camera_position_only_needed_when_used() {
        let mut uniforms = Uniforms::default();
        assert!(uniforms.needs_camera_position());
        uniforms.wireframe = true;
        assert!(!uniforms.needs_camera_position());
        uniforms.wireframe = false;
        uniforms.backface_culling = false;
        uniforms.light.enabled = false;
        assert!(!uniforms.needs_camera_position());
    }
}
