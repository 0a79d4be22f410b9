use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::Path;

use image::imageops;
use nalgebra as na;
use na::{vector, Vector2, Vector3, Vector4};
use obj::raw::object::Polygon;
use obj::raw::{parse_obj, RawObj};

use tiny_rasterizer::{Texture, Vertex};

use crate::app::AppError;

/// Named slice of a mesh's vertices, one per obj group.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub vertices: Range<usize>,
}

/// Plain triangle list, every shape occupying a contiguous range of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub shapes: Vec<Shape>,
}

/// Loads a Wavefront mesh, keeping its groups apart so that each can get its own texture.
pub fn load_mesh<P: AsRef<Path>>(path: P, scale: f32) -> Result<Mesh, AppError> {
    let raw = parse_obj(BufReader::new(File::open(path)?))?;
    let mesh = mesh_from_raw(&raw, scale)?;
    log::info!("Number of shapes   - {}", mesh.shapes.len());
    log::info!("Number of vertices - {}", mesh.vertices.len());
    return Ok(mesh);
}

/// Expands every polygon into triangles (as a fan around its first corner), shape by shape in
/// file order. Missing normals and texture coordinates are zero.
pub fn mesh_from_raw(raw: &RawObj, scale: f32) -> Result<Mesh, AppError> {
    let mut groups: Vec<_> = raw.groups.iter().filter(|(_, group)| !group.polygons.is_empty()).collect();
    groups.sort_by_key(|(_, group)| group.polygons[0].start);

    let mut mesh = Mesh { vertices: Vec::new(), shapes: Vec::with_capacity(groups.len()) };
    for (name, group) in groups {
        let start = mesh.vertices.len();
        for range in &group.polygons {
            let polygons = raw
                .polygons
                .get(range.start..range.end)
                .ok_or(AppError::MeshIndex(range.end))?;
            for polygon in polygons {
                let corners = polygon_corners(raw, polygon, scale)?;
                for i in 1..corners.len().saturating_sub(1) {
                    mesh.vertices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
        }
        mesh.shapes.push(Shape { name: name.clone(), vertices: start..mesh.vertices.len() });
    }
    return Ok(mesh);
}

fn polygon_corners(raw: &RawObj, polygon: &Polygon, scale: f32) -> Result<Vec<Vertex>, AppError> {
    return match polygon {
        Polygon::P(corners) => corners.iter().map(|&p| corner(raw, p, None, None, scale)).collect(),
        Polygon::PT(corners) => corners.iter().map(|&(p, t)| corner(raw, p, Some(t), None, scale)).collect(),
        Polygon::PN(corners) => corners.iter().map(|&(p, n)| corner(raw, p, None, Some(n), scale)).collect(),
        Polygon::PTN(corners) => corners
            .iter()
            .map(|&(p, t, n)| corner(raw, p, Some(t), Some(n), scale))
            .collect(),
    };
}

fn corner(raw: &RawObj, position: usize, uv: Option<usize>, normal: Option<usize>, scale: f32) -> Result<Vertex, AppError> {
    let (x, y, z, _) = *raw.positions.get(position).ok_or(AppError::MeshIndex(position))?;
    let uv = match uv {
        Some(index) => {
            let (u, v, _) = *raw.tex_coords.get(index).ok_or(AppError::MeshIndex(index))?;
            vector![u, v]
        }
        None => Vector2::zeros(),
    };
    let normal = match normal {
        Some(index) => {
            let (nx, ny, nz) = *raw.normals.get(index).ok_or(AppError::MeshIndex(index))?;
            vector![nx, ny, nz]
        }
        None => Vector3::zeros(),
    };
    return Ok(Vertex {
        position: vector![x, y, z] * scale,
        normal,
        color: vector![1.0, 1.0, 1.0, 1.0],
        uv,
    });
}

/// Loads an image as an RGBA texture. Rows are flipped so that v = 0 is the bottom of the image.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, AppError> {
    let mut rgba = image::open(path)?.to_rgba8();
    imageops::flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    return Ok(Texture::from_rgba8(rgba.as_raw(), width as usize, height as usize)?);
}

/// Unit quad facing +z with a different color in every corner, drawn when no mesh is configured.
pub fn demo_quad() -> Mesh {
    let quad_corner = |x: f32, y: f32, color: Vector4<f32>| Vertex {
        position: vector![x, y, 0.0],
        normal: vector![0.0, 0.0, 1.0],
        color,
        uv: vector![x + 0.5, y + 0.5],
    };
    let red = vector![1.0, 0.0, 0.0, 1.0];
    let green = vector![0.0, 1.0, 0.0, 1.0];
    let blue = vector![0.0, 0.0, 1.0, 1.0];
    let white = vector![1.0, 1.0, 1.0, 1.0];
    let vertices = vec![
        quad_corner(-0.5, -0.5, red),
        quad_corner(0.5, -0.5, green),
        quad_corner(0.5, 0.5, blue),
        quad_corner(-0.5, -0.5, red),
        quad_corner(0.5, 0.5, blue),
        quad_corner(-0.5, 0.5, white),
    ];
    let shapes = vec![Shape { name: "quad".to_string(), vertices: 0..vertices.len() }];
    return Mesh { vertices, shapes };
}

/// Converts the float RGBA color buffer to RGB8, dropping alpha.
pub fn to_rgb8(colors: &[f32]) -> Vec<u8> {
    return colors
        .chunks_exact(4)
        .flat_map(|pixel| pixel[..3].iter().map(|&c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
        .collect();
}
