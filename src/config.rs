//! Application configuration.
//!
//! Settings are read from a JSON file. Every section falls back to its defaults, so a file only
//! needs the keys it wants to change:
//!
//! ```json
//! { "window": { "width": 1280, "height": 720 }, "camera": { "fov": 60.0 } }
//! ```

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::camera::CameraSettings;

const APP_DIR: &str = "cubeview3d";
const CONFIG_FILE: &str = "config.json";
const RESOURCES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "CubeView3D".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub controls: CameraSettings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.0, 17.0),
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            controls: CameraSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: Vec4,
    pub cube_color: Vec3,
    pub cube_position: Vec3,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub geometry_shader: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            cube_color: Vec3::new(1.0, 0.0, 0.0),
            cube_position: Vec3::ZERO,
            vertex_shader: PathBuf::from(RESOURCES_PATH).join("shaders/vertex.vert"),
            fragment_shader: PathBuf::from(RESOURCES_PATH).join("shaders/fragment.frag"),
            geometry_shader: None,
        }
    }
}

impl Config {
    /// Where the config is looked up when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the config.
    ///
    /// An explicit path must exist. Without one, the file at [`Config::default_path`] is used if
    /// present and the defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Json { path, source })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The configured log level. Unknown names fall back to `info`.
    pub fn log_filter(&self) -> log::LevelFilter {
        if self.log_level.is_empty() {
            return log::LevelFilter::Info;
        }
        log::LevelFilter::from_str(&self.log_level).unwrap_or_else(|_| {
            log::warn!("unknown log level {:?}, using info", self.log_level);
            log::LevelFilter::Info
        })
    }
}
