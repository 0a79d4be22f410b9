use nalgebra as na;
use na::{vector, Vector2, Vector3};

use crate::error::{RenderError, Result};
use crate::maths;

/// UVs are kept this far away from the texture edges.
pub const UV_MIN: f32 = 0.0001;
pub const UV_MAX: f32 = 0.9999;

/// Handle returned when registering a texture with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

/// RGBA texture with channels in the 0-255 range stored as floats.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    colors: Vec<f32>, // 4 floats per texel, row-major.
    width: usize,
    height: usize,
}

impl Texture {
    /// Takes ownership of `colors`, which must hold exactly `4 * width * height` floats.
    pub fn new(colors: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        // Sizes that overflow can't match any buffer, reported with expected = 0.
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(4)).unwrap_or(0);
        if expected == 0 || colors.len() != expected {
            return Err(RenderError::InvalidTextureSize {
                width,
                height,
                expected,
                actual: colors.len(),
            });
        }
        return Ok(Self { colors, width, height });
    }

    /// Builds a texture from 8 bit RGBA data.
    pub fn from_rgba8(data: &[u8], width: usize, height: usize) -> Result<Self> {
        return Self::new(data.iter().map(|&c| c as f32).collect(), width, height);
    }

    pub fn width(&self) -> usize {
        return self.width;
    }

    pub fn height(&self) -> usize {
        return self.height;
    }

    /// Nearest texel lookup. The result is in [0, 1], each channel truncated before scaling.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let u = maths::clamp(UV_MIN, UV_MAX, uv.x);
        let v = maths::clamp(UV_MIN, UV_MAX, uv.y);
        let texel_x = (u * self.width as f32).floor() as usize;
        let texel_y = (v * self.height as f32).floor() as usize;
        let index = 4 * (texel_y * self.width + texel_x);
        return vector![
            self.colors[index].trunc() / 255.0,
            self.colors[index + 1].trunc() / 255.0,
            self.colors[index + 2].trunc() / 255.0
        ];
    }
}

/// Textures owned by the renderer, addressed by `TextureId`.
#[derive(Debug, Default)]
pub struct TextureTable {
    textures: Vec<Texture>,
    first_id: usize, // Id of textures[0], grows on clear so that stale ids never alias new textures.
}

impl TextureTable {
    pub fn insert(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        return TextureId(self.first_id + self.textures.len() - 1);
    }

    pub fn get(&self, id: TextureId) -> Result<&Texture> {
        return id
            .0
            .checked_sub(self.first_id)
            .and_then(|index| self.textures.get(index))
            .ok_or(RenderError::UnknownTexture(id));
    }

    pub fn len(&self) -> usize {
        return self.textures.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.textures.is_empty();
    }

    /// Releases every texture, previously returned ids become unknown.
    pub fn clear(&mut self) {
        self.first_id += self.textures.len();
        self.textures.clear();
    }
}
