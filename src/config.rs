//! TOML configuration of the renderer toggles, light, camera and scene.

use std::path::Path;

use nalgebra as na;
use na::Vector4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::renderer::{Light, Renderer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub wireframe: bool,
    pub rgb_interpolation: bool,
    pub depth_test: bool,
    pub backface_culling: bool,
    pub phong: bool,
    pub alpha_blending: bool,
    pub alpha: f32,
    pub line_color: [f32; 4],
    pub background_color: [f32; 4],
    pub clear_depth: f32, // Value the depth buffer is reset to every frame.
}

impl Default for RenderConfig {
    fn default() -> Self {
        return Self {
            wireframe: false,
            rgb_interpolation: false,
            depth_test: true,
            backface_culling: true,
            phong: true,
            alpha_blending: true,
            alpha: 1.0,
            line_color: [1.0, 1.0, 1.0, 1.0],
            background_color: [0.0, 0.0, 0.0, 1.0],
            clear_depth: f32::INFINITY,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub enabled: bool,
    pub attenuation_enabled: bool,
    pub min_full_attenuation_distance: f32,
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub attenuation: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = Light::default();
        return Self {
            enabled: light.enabled,
            attenuation_enabled: light.attenuation_enabled,
            min_full_attenuation_distance: light.min_full_attenuation_distance,
            position: light.position.xyz().into(),
            ambient: light.ambient.xyz().into(),
            diffuse: light.diffuse.xyz().into(),
            specular: light.specular.xyz().into(),
            attenuation: light.attenuation.into(),
        };
    }
}

impl LightConfig {
    pub fn to_light(&self) -> Light {
        let point = |v: [f32; 3]| Vector4::new(v[0], v[1], v[2], 1.0);
        return Light {
            enabled: self.enabled,
            attenuation_enabled: self.attenuation_enabled,
            min_full_attenuation_distance: self.min_full_attenuation_distance,
            position: point(self.position),
            ambient: point(self.ambient),
            diffuse: point(self.diffuse),
            specular: point(self.specular),
            attenuation: self.attenuation.into(),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub pitch: f32, // Radians.
    pub yaw: f32,   // Radians.
    pub fov_y: f32, // Degrees.
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        return Self {
            position: [0.175, 0.474, 1.773],
            pitch: 0.0,
            yaw: 0.0,
            fov_y: 60.0,
            near: 0.01,
            far: 10.0,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub mesh: Option<String>,  // Wavefront .obj file.
    pub textures: Vec<String>, // One image per shape in file order, shapes past the end use vertex colors.
    pub scale: f32,
    pub animate: bool, // Sway the model around over time.
}

impl Default for SceneConfig {
    fn default() -> Self {
        return Self {
            width: 800,
            height: 800,
            mesh: None,
            textures: Vec::new(),
            scale: 1.0,
            animate: true,
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub light: LightConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&contents)?);
    }

    /// Loads `path`, falling back to the defaults when it can't be read or parsed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        return Self::load(path).unwrap_or_else(|e| {
            log::info!("Using default config ({}: {})", path.display(), e);
            Self::default()
        });
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        return Ok(());
    }

    /// Pushes toggles, colors and the light into the renderer uniforms.
    pub fn apply(&self, renderer: &mut Renderer) {
        let uniforms = &mut renderer.uniforms;
        uniforms.wireframe = self.render.wireframe;
        uniforms.rgb_interpolation = self.render.rgb_interpolation;
        uniforms.depth_test = self.render.depth_test;
        uniforms.backface_culling = self.render.backface_culling;
        uniforms.phong = self.render.phong;
        uniforms.alpha_blending = self.render.alpha_blending;
        uniforms.alpha = self.render.alpha;
        uniforms.line_color = self.render.line_color.into();
        uniforms.background_color = self.render.background_color.into();
        uniforms.light = self.light.to_light();
    }

    pub fn camera(&self) -> Camera {
        let c = &self.camera;
        let aspect = self.scene.width as f32 / self.scene.height as f32;
        return Camera {
            position: c.position.into(),
            pitch: c.pitch,
            yaw: c.yaw,
            aspect,
            fov_y: c.fov_y.to_radians(),
            near: c.near,
            far: c.far,
        };
    }
}
