use std::path::{Path, PathBuf};
use std::time;

use nalgebra as na;
use na::{vector, Matrix4};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};
use thiserror::Error;

use tiny_rasterizer::config::ConfigError;
use tiny_rasterizer::{maths, Config, DrawRange, RenderError, Renderer, Vertex};

use crate::assets;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("mesh error: {0}")]
    Mesh(#[from] obj::ObjError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("window error: {0}")]
    Window(String),
    #[error("mesh index {0} is out of range")]
    MeshIndex(usize),
}

/// Defines execution context of the demo.
pub struct Params {
    pub config: Config,
    pub output: Option<PathBuf>, // Render offline and save the last frame here.
    pub frames: Option<u32>,     // Stop after this many frames.
    pub print_fps: bool,
}

/// Everything that stays the same from frame to frame.
struct Scene {
    renderer: Renderer,
    vertices: Vec<Vertex>,
    ranges: Vec<DrawRange>, // One per shape, each with its own texture.
    animate: bool,
    clear_depth: f32,
}

impl Scene {
    fn load(config: &Config) -> Result<Scene, AppError> {
        let mut renderer = Renderer::new(config.scene.width as i32, config.scene.height as i32);
        config.apply(&mut renderer);

        let camera = config.camera();
        renderer.set_view(camera.view());
        renderer.set_projection(camera.projection());

        let mesh = match &config.scene.mesh {
            Some(path) => assets::load_mesh(path, config.scene.scale)?,
            None => {
                log::info!("No mesh configured, drawing the demo quad");
                assets::demo_quad()
            }
        };
        if config.scene.textures.len() > mesh.shapes.len() {
            log::warn!(
                "{} textures for {} shapes, the extra ones are ignored",
                config.scene.textures.len(),
                mesh.shapes.len()
            );
        }

        let mut ranges = Vec::with_capacity(mesh.shapes.len());
        for (i, shape) in mesh.shapes.into_iter().enumerate() {
            let texture = match config.scene.textures.get(i) {
                Some(path) => Some(renderer.add_texture(assets::load_texture(path)?)),
                None => None,
            };
            log::debug!("Shape {} ({:?}) uses texture {:?}", shape.name, shape.vertices, texture);
            ranges.push(DrawRange { vertices: shape.vertices, texture });
        }

        return Ok(Scene {
            renderer,
            vertices: mesh.vertices,
            ranges,
            animate: config.scene.animate,
            clear_depth: config.render.clear_depth,
        });
    }

    /// Renders one frame at `seconds` since start and returns it as RGB8.
    fn render(&mut self, seconds: f32) -> Result<Vec<u8>, AppError> {
        self.renderer.clear(self.clear_depth);
        self.renderer.set_model(model_matrix(seconds, self.animate));
        let stats = self.renderer.draw_ranges(&self.vertices, &self.ranges)?;
        log::trace!("{:?}", stats);
        return Ok(assets::to_rgb8(self.renderer.framebuffer().color_data()));
    }
}

/// Model matrix swaying the mesh around over time. The mesh scale is baked in at load time.
pub fn model_matrix(seconds: f32, animate: bool) -> Matrix4<f32> {
    if !animate {
        return maths::identity();
    }
    let offset = vector![seconds.cos() * 0.5, seconds.sin() * 0.1, 0.0];
    return maths::translate(offset);
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape) && event.input.state.is_released() {
            return true;
        }
    }
    return false;
}

/// Renders `frames` frames at 60 fps simulated time and saves the last one.
fn run_offline(scene: &mut Scene, output: &Path, frames: u32, width: u32, height: u32) -> Result<(), AppError> {
    let mut data = Vec::new();
    for frame in 0..frames.max(1) {
        data = scene.render(frame as f32 / 60.0)?;
    }
    image::save_buffer(output, &data, width, height, image::ColorType::Rgb8)?;
    log::info!("Saved frame to {}", output.display());
    return Ok(());
}

/// Launches the window, showing rendered frames until Escape is pressed.
fn run_window(scene: &mut Scene, params: &Params, width: u32, height: u32) -> Result<(), AppError> {
    let window_options = WindowOptions {
        size: Some([width, height]),
        ..Default::default()
    };
    let window = create_window("output", window_options).map_err(|e| AppError::Window(e.to_string()))?;
    let event_channel = window.event_channel().map_err(|e| AppError::Window(e.to_string()))?;

    let time_begin = time::Instant::now();
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    let mut frames_drawn: u32 = 0;
    loop {
        let passed_time = time_begin.elapsed().as_secs_f32();
        let data = scene.render(passed_time)?;
        let image_data = ImageView::new(ImageInfo::rgb8(width, height), &data);
        window
            .set_image("image", image_data)
            .map_err(|e| AppError::Window(e.to_string()))?;

        // Draining the events that piled up since the last frame, looking for the exit event.
        let exit = event_channel.try_iter().fold(false, |exit, window_event| is_exit_event(window_event) || exit);
        frames_drawn += 1;
        if exit || params.frames.map_or(false, |limit| frames_drawn >= limit) {
            break;
        }

        if params.print_fps {
            frame_counter += 1;
            if frame_counter_time_begin.elapsed().as_secs_f32() > 1.0 {
                println!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }
    return Ok(());
}

pub fn run(params: Params) -> Result<(), AppError> {
    let mut scene = Scene::load(&params.config)?;
    let (width, height) = (params.config.scene.width, params.config.scene.height);
    return match &params.output {
        Some(output) => run_offline(&mut scene, output, params.frames.unwrap_or(1), width, height),
        None => run_window(&mut scene, &params, width, height),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_model_stays_in_place() {
        assert_eq!(model_matrix(3.0, false), maths::identity());
    }

    #[test]
    fn animated_model_starts_to_the_right() {
        let model = model_matrix(0.0, true);
        assert!((model[(0, 3)] - 0.5).abs() < 1e-6);
        assert!(model[(1, 3)].abs() < 1e-6);
    }

    #[test]
    fn offline_run_saves_frame() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("frame.png");
        let mut config = Config::default();
        config.scene.width = 32;
        config.scene.height = 24;
        config.light.enabled = false;
        let params = Params {
            config,
            output: Some(output.clone()),
            frames: Some(2),
            print_fps: false,
        };
        run(params).unwrap();

        let saved = image::open(&output).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (32, 24));
        assert!(saved.pixels().any(|p| p.0 != [0, 0, 0]));
    }

    #[test]
    fn configured_texture_is_drawn_on_its_shape() {
        let dir = tempfile::tempdir().unwrap();
        let texture = dir.path().join("green.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 255, 0, 255])).save(&texture).unwrap();
        let output = dir.path().join("frame.png");

        let mut config = Config::default();
        config.scene.width = 32;
        config.scene.height = 24;
        config.scene.animate = false;
        config.scene.textures = vec![texture.display().to_string()];
        config.light.enabled = false;
        let params = Params {
            config,
            output: Some(output.clone()),
            frames: Some(1),
            print_fps: false,
        };
        run(params).unwrap();

        let saved = image::open(&output).unwrap().to_rgb8();
        assert!(saved.pixels().any(|p| p.0 == [0, 255, 0]));
        assert!(saved.pixels().all(|p| p.0 == [0, 255, 0] || p.0 == [0, 0, 0]));
    }
}
