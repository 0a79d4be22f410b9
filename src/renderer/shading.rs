//! Vertex and pixel shaders of the fixed pipeline, the lighting model and alpha blending.

use nalgebra as na;
use na::{vector, Vector3, Vector4};

use super::rasterizer::Varyings;
use super::texture::Texture;
use super::uniforms::{Light, Material, Uniforms};
use super::Vertex;
use crate::maths;

/// Corner color used when interpolating flat RGB instead of sampling textures.
pub fn debug_color(corner: usize) -> Vector3<f32> {
    match corner % 3 {
        0 => return vector![1.0, 0.0, 0.0],
        1 => return vector![0.0, 1.0, 0.0],
        _ => return vector![0.0, 0.0, 1.0],
    }
}

fn diffuse_coef(light_vec: Vector3<f32>, normal: Vector3<f32>) -> f32 {
    return light_vec.dot(&normal).max(0.0);
}

fn reflection(light_vec: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    return 2.0 * diffuse_coef(light_vec, normal) * normal - light_vec;
}

// Dotted against the camera position itself, not the direction towards it.
fn specular_coef(camera_position: Vector3<f32>, light_vec: Vector3<f32>, normal: Vector3<f32>) -> f32 {
    return reflection(light_vec, normal).dot(&camera_position).max(0.0);
}

/// Light falloff factor in [0, 1], 1 up to `min_full_attenuation_distance`.
fn attenuation_coef(to_light: Vector3<f32>, light: &Light) -> f32 {
    let distance = to_light.norm();
    if distance == 0.0 {
        return 1.0;
    }
    return maths::clamp(0.0, 1.0, light.min_full_attenuation_distance / distance);
}

/// Light contribution at a surface point. A disabled light contributes black.
pub fn shaded_color(
    camera_position: Vector3<f32>,
    light: &Light,
    material: &Material,
    position: Vector3<f32>,
    normal: Vector3<f32>,
) -> Vector3<f32> {
    if !light.enabled {
        return Vector3::zeros();
    }

    let to_light = light.position.xyz() - position;
    let light_vec = maths::normalize(to_light);
    let normal = maths::normalize(normal);

    let ambient = material.ambient.component_mul(&light.ambient.xyz());
    let diffuse = material
        .diffuse
        .component_mul(&(diffuse_coef(light_vec, normal) * light.diffuse.xyz()));
    let specular = material
        .specular
        .component_mul(&(specular_coef(camera_position, light_vec, normal) * light.specular.xyz()));

    let color = ambient + diffuse + specular;
    if light.attenuation_enabled {
        let attenuation = attenuation_coef(to_light, light) * light.attenuation;
        return attenuation.component_mul(&color);
    }
    return color;
}

/// Base color source of a draw call in the textured path.
#[derive(Debug, Clone, Copy)]
pub enum ColorSource<'a> {
    Texture(&'a Texture),
    VertexColor, // No texture bound.
}

/// Prepares the varyings of one corner of a triangle.
/// `corner` selects the debug color in RGB interpolation mode.
pub fn vertex_shader(
    uniforms: &Uniforms,
    source: ColorSource,
    vertex: &Vertex,
    corner: usize,
    world_position: Vector3<f32>,
    world_normal: Vector3<f32>,
    camera_position: Vector3<f32>,
) -> Varyings {
    let mut out = Varyings::default();
    if uniforms.wireframe {
        return out;
    }

    out.color = if uniforms.rgb_interpolation {
        debug_color(corner)
    } else {
        match source {
            ColorSource::Texture(texture) => texture.sample(vertex.uv),
            ColorSource::VertexColor => vertex.color.xyz(),
        }
    };

    if uniforms.phong {
        // Lighting deferred to the pixel shader.
        out.world_position = world_position;
        out.world_normal = world_normal;
    } else if uniforms.light.enabled {
        out.color += shaded_color(
            camera_position,
            &uniforms.light,
            &uniforms.material,
            world_position,
            world_normal,
        );
    }
    return out;
}

/// Final fragment color, alpha comes from the global uniform.
pub fn pixel_shader(uniforms: &Uniforms, input: &Varyings, camera_position: Vector3<f32>) -> Vector4<f32> {
    let mut color = input.color;
    if uniforms.phong && uniforms.light.enabled {
        color += shaded_color(
            camera_position,
            &uniforms.light,
            &uniforms.material,
            input.world_position,
            maths::normalize(input.world_normal),
        );
    }
    return vector![color.x, color.y, color.z, uniforms.alpha];
}

/// Source-over blending, both colors with straight (non-premultiplied) alpha.
pub fn alpha_blend(source: Vector4<f32>, background: &Vector4<f32>) -> Vector4<f32> {
    let alpha = source.w + background.w * (1.0 - source.w);
    let mut color = Vector3::zeros();
    if alpha != 0.0 {
        color = (source.xyz() * source.w + background.xyz() * background.w * (1.0 - source.w)) / alpha;
    }
    return vector![color.x, color.y, color.z, alpha];
}
