//! Software rasterizer replicating the classic fixed-function pipeline.
//!
//! Vertices go through a world transform, backface and clip tests, perspective divide and screen
//! mapping, then get rasterized with barycentric coverage, depth tested, shaded (Gouraud or
//! Phong, textured or flat RGB) and optionally alpha blended into an RGBA float framebuffer.

pub mod camera;
pub mod config;
pub mod error;
pub mod maths;
pub mod renderer;

pub use camera::Camera;
pub use config::Config;
pub use error::RenderError;
pub use renderer::{DrawRange, DrawStats, Light, Material, Renderer, Texture, TextureId, Uniforms, Vertex, Viewport};
