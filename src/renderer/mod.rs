//! Fixed-function triangle pipeline: geometry, rasterization, shading and blending on the CPU.

pub mod framebuffer;
pub mod geometry;
pub mod rasterizer;
pub mod shading;
pub mod texture;
pub mod uniforms;
pub mod wireframe;

use std::ops::{AddAssign, Range};

use log::{debug, trace, warn};
use nalgebra as na;
use na::{vector, Matrix4, Vector2, Vector3, Vector4};

use crate::error::{RenderError, Result};
use crate::maths;
use framebuffer::Framebuffer;
use rasterizer::Varyings;
use shading::ColorSource;
use texture::TextureTable;

pub use texture::{Texture, TextureId};
pub use uniforms::{Light, Material, Uniforms, Viewport};

/// Input vertex. Triangles are 3 consecutive vertices, their order defines the winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector4<f32>, // Used when no texture is bound.
    pub uv: Vector2<f32>,
}

impl Vertex {
    /// White vertex with zero UVs.
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>) -> Self {
        return Self {
            position,
            normal,
            color: vector![1.0, 1.0, 1.0, 1.0],
            uv: Vector2::zeros(),
        };
    }
}

/// What happened to the triangles of one draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub triangles: usize,
    pub backface_culled: usize,
    pub frustum_rejected: usize,
    pub drawn: usize,
    pub pixels_written: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.triangles += other.triangles;
        self.backface_culled += other.backface_culled;
        self.frustum_rejected += other.frustum_rejected;
        self.drawn += other.drawn;
        self.pixels_written += other.pixels_written;
    }
}

/// Slice of a vertex buffer drawn with its own texture, typically one shape of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRange {
    pub vertices: Range<usize>,
    pub texture: Option<TextureId>,
}

/// Owns the framebuffer, textures and uniforms and drives the pipeline.
pub struct Renderer {
    framebuffer: Framebuffer,
    viewport: Viewport,
    textures: TextureTable,
    pub uniforms: Uniforms,
}

impl Renderer {
    /// Renderer with a `width` x `height` framebuffer and a viewport covering all of it.
    pub fn new(width: i32, height: i32) -> Self {
        return Self {
            framebuffer: Framebuffer::new(width, height),
            viewport: Viewport { x: 0, y: 0, width, height },
            textures: TextureTable::default(),
            uniforms: Uniforms::default(),
        };
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        return &self.framebuffer;
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        return &mut self.framebuffer;
    }

    /// Clears color to the background color and depth to `depth`.
    pub fn clear(&mut self, depth: f32) {
        let background = self.uniforms.background_color;
        self.framebuffer.clear(background, depth);
    }

    pub fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.uniforms.projection = projection;
    }

    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.uniforms.view = view;
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.uniforms.model = model;
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = Viewport { x, y, width, height };
    }

    pub fn viewport(&self) -> Viewport {
        return self.viewport;
    }

    pub fn set_light(&mut self, light: Light) {
        self.uniforms.light = light;
    }

    pub fn set_material(&mut self, material: Material) {
        self.uniforms.material = material;
    }

    pub fn set_background(&mut self, color: Vector4<f32>) {
        self.uniforms.background_color = color;
    }

    /// Registers a texture, the renderer keeps it until `clear_textures` or drop.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        let id = self.textures.insert(texture);
        debug!("Registered texture {:?} ({} total)", id, self.textures.len());
        return id;
    }

    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Draws `vertices` as a list of triangles, sampling `texture` in the textured path.
    ///
    /// Fails before writing anything when the texture is unknown or when the camera position
    /// is needed and the view matrix can't be inverted.
    pub fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<TextureId>) -> Result<DrawStats> {
        self.uniforms.update_products();

        let source = match texture {
            Some(id) => ColorSource::Texture(self.textures.get(id)?),
            None => ColorSource::VertexColor,
        };

        // Inverting the view matrix is expensive, done once per draw call and only when used.
        let camera_position = if self.uniforms.needs_camera_position() {
            geometry::camera_position(&self.uniforms.view)?
        } else {
            Vector3::zeros()
        };

        let remainder = vertices.len() % 3;
        if remainder != 0 {
            warn!("Skipping {} trailing vertices that don't form a triangle", remainder);
        }

        let mut stats = DrawStats::default();
        for (index, triangle) in vertices.chunks_exact(3).enumerate() {
            stats.triangles += 1;
            let outcome = draw_triangle(
                &mut self.framebuffer,
                &self.uniforms,
                &self.viewport,
                source,
                triangle,
                camera_position,
            );
            match outcome {
                TriangleOutcome::Backface => {
                    trace!("Triangle {} culled as backface", index);
                    stats.backface_culled += 1;
                }
                TriangleOutcome::OutsideFrustum => {
                    trace!("Triangle {} outside of the frustum", index);
                    stats.frustum_rejected += 1;
                }
                TriangleOutcome::Drawn(pixels) => {
                    stats.drawn += 1;
                    stats.pixels_written += pixels;
                }
            }
        }

        debug!("{:?}", stats);
        return Ok(stats);
    }

    /// Draws every range of `vertices` with the texture bound to it, in order.
    ///
    /// Ranges and textures are all checked before the first triangle is drawn.
    pub fn draw_ranges(&mut self, vertices: &[Vertex], ranges: &[DrawRange]) -> Result<DrawStats> {
        for range in ranges {
            let Range { start, end } = range.vertices;
            if start > end || end > vertices.len() {
                return Err(RenderError::InvalidRange { start, end, len: vertices.len() });
            }
            if let Some(id) = range.texture {
                self.textures.get(id)?;
            }
        }

        let mut stats = DrawStats::default();
        for range in ranges {
            stats += self.draw_triangles(&vertices[range.vertices.clone()], range.texture)?;
        }
        return Ok(stats);
    }
}

enum TriangleOutcome {
    Backface,
    OutsideFrustum,
    Drawn(usize), // Pixels written.
}

fn draw_triangle(
    fb: &mut Framebuffer,
    uniforms: &Uniforms,
    viewport: &Viewport,
    source: ColorSource,
    triangle: &[Vertex],
    camera_position: Vector3<f32>,
) -> TriangleOutcome {
    let cull = uniforms.backface_culling && !uniforms.wireframe;

    let mut world = [geometry::WorldVertex {
        position: Vector4::zeros(),
        normal: Vector4::zeros(),
    }; 3];
    let mut clip = [Vector4::zeros(); 3];
    for i in 0..3 {
        world[i] = geometry::to_world(&uniforms.model, &triangle[i]);
        if cull && geometry::is_backface(camera_position, &world[i]) {
            return TriangleOutcome::Backface;
        }
        clip[i] = uniforms.view_projection * world[i].position;
    }

    if clip.iter().any(|&c| geometry::is_outside(c)) {
        return TriangleOutcome::OutsideFrustum;
    }

    let screen = clip.map(|c| geometry::ndc_to_screen(maths::from_hom_point(c), viewport));

    if uniforms.wireframe {
        return TriangleOutcome::Drawn(wireframe::draw_triangle_edges(fb, &screen, uniforms.line_color));
    }

    let mut varyings = [Varyings::default(); 3];
    for i in 0..3 {
        varyings[i] = shading::vertex_shader(
            uniforms,
            source,
            &triangle[i],
            i,
            maths::from_hom_vector(world[i].position),
            maths::from_hom_vector(world[i].normal),
            camera_position,
        );
    }
    return TriangleOutcome::Drawn(rasterizer::rasterize_triangle(
        fb,
        uniforms,
        &screen,
        &varyings,
        camera_position,
    ));
}
