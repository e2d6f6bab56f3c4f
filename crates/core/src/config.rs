//! Viewer configuration.
//!
//! The scene itself is hand-authored and carries its own literal constants;
//! configuration covers only the surrounding machinery: window size and
//! title, where texture images live on disk, and the camera projection.
//!
//! A `roomview.toml` next to the working directory overrides the defaults.
//! Missing file means defaults; a malformed file is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Window settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "roomview".to_string(),
        }
    }
}

/// Asset lookup settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory containing the surface texture images.
    pub texture_dir: PathBuf,
    /// Directory containing compiled SPIR-V shaders.
    pub shader_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets/textures"),
            shader_dir: PathBuf::from("shaders/spirv"),
        }
    }
}

/// Camera projection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("failed to parse {:?}: {}", path, e)))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.window.title, "roomview");
        assert_eq!(config.camera.fov_deg, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.assets.texture_dir, PathBuf::from("assets/textures"));
    }

    #[test]
    fn test_parse_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [window]
            width = 800
            height = 600

            [camera]
            fov_deg = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        // Untouched sections keep their defaults.
        assert_eq!(config.window.title, "roomview");
        assert_eq!(config.camera.fov_deg, 60.0);
        assert_eq!(config.camera.far, 1000.0);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.window.width, 1280);
    }
}
