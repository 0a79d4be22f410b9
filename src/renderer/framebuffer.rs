use nalgebra as na;
use na::{vector, Vector4};

/// Color and depth storage of the renderer.
/// Colors are RGBA floats in a flat row-major array, (0, 0) is the top left pixel.
pub struct Framebuffer {
    width: i32,
    height: i32,
    color_buffer: Vec<f32>, // 4 floats per pixel.
    depth_buffer: Vec<f32>, // Reciprocal-mapped NDC depth, smaller is closer.
}

impl Framebuffer {
    /// Generates a framebuffer with transparent black colors and depth cleared to +inf.
    /// Negative sizes are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        let n_pixels = (width * height) as usize;
        return Self {
            width,
            height,
            color_buffer: vec![0.0; 4 * n_pixels],
            depth_buffer: vec![f32::INFINITY; n_pixels],
        };
    }

    pub fn width(&self) -> i32 {
        return self.width;
    }

    pub fn height(&self) -> i32 {
        return self.height;
    }

    /// Fills the color buffer with `color` and the depth buffer with `depth`.
    pub fn clear(&mut self, color: Vector4<f32>, depth: f32) {
        for pixel in self.color_buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(color.as_slice());
        }
        self.depth_buffer.fill(depth);
    }

    /// Flat RGBA float slice of size 4 * width * height, ready to be uploaded as-is.
    pub fn color_data(&self) -> &[f32] {
        return &self.color_buffer[..];
    }

    pub fn depth_data(&self) -> &[f32] {
        return &self.depth_buffer[..];
    }

    /// Color at a pixel, `None` outside the buffer.
    pub fn color(&self, x: i32, y: i32) -> Option<Vector4<f32>> {
        let index = self.pixel_index(x, y)?;
        let c = &self.color_buffer[4 * index..4 * index + 4];
        return Some(vector![c[0], c[1], c[2], c[3]]);
    }

    /// Stored depth at a pixel, `None` outside the buffer.
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        return self.pixel_index(x, y).map(|index| self.depth_buffer[index]);
    }

    fn pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        return Some((x + y * self.width) as usize);
    }

    /// Writes a color, returns whether anything was written.
    ///
    /// The x bound is `x > width` rather than `x >= width`: a pixel at x == width lands on the
    /// first pixel of the next row. On the last row that slot is past the end and is dropped.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Vector4<f32>) -> bool {
        if x < 0 || x > self.width || y < 0 || y >= self.height {
            return false;
        }
        let index = 4 * (x + y * self.width) as usize;
        if let Some(pixel) = self.color_buffer.get_mut(index..index + 4) {
            pixel.copy_from_slice(color.as_slice());
            return true;
        }
        return false;
    }

    /// Depth comparison for a fragment: passes when `z` is strictly smaller than the stored
    /// value, in which case the stored value is replaced right away.
    pub fn depth_test(&mut self, x: i32, y: i32, z: f32) -> bool {
        let index = match self.pixel_index(x, y) {
            Some(index) => index,
            None => return false,
        };
        if z < self.depth_buffer[index] {
            self.depth_buffer[index] = z;
            return true;
        }
        return false;
    }
}
