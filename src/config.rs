//! Runtime configuration.
//!
//! Loaded from a TOML file, every field has a default so a partial (or missing) file is valid.
//!
//! ```toml
//! max_frame_time = 0.0166
//!
//! [window]
//! width = 1280
//! height = 720
//!
//! [graphics]
//! present_mode = "mailbox"
//!
//! [controls.keys]
//! move_up = "E"
//! move_down = "Q"
//!
//! [scene]
//! model = "smooth_vase"
//! ```

use crate::controller::KeyMappings;

use serde::Deserialize;

use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "hex.toml";

/// Error while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The file exists but could not be read.
	#[error("failed to read {}: {source}", .path.display())]
	Read { path: PathBuf, source: std::io::Error },
	/// The file is not valid configuration TOML.
	#[error("failed to parse {}: {source}", .path.display())]
	Parse { path: PathBuf, source: toml::de::Error },
}

/// Full application configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
	pub window: WindowConfig,
	pub graphics: GraphicsConfig,
	pub camera: CameraConfig,
	pub controls: ControlsConfig,
	pub scene: SceneConfig,
	/// Upper bound on the simulated time step, in seconds.
	pub max_frame_time: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
	pub width: u32,
	pub height: u32,
	pub title: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
	pub present_mode: PresentModeConfig,
	pub clear_color: [f32; 4],
}

/// Swapchain presentation mode.
///
/// Modes the surface does not support fall back to `Fifo`, which is always available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeConfig {
	Fifo,
	Mailbox,
	Immediate,
	Relaxed,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	pub fov_y_degrees: f32,
	pub near: f32,
	pub far: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
	pub move_speed: f32,
	pub look_speed: f32,
	pub sensitivity: f32,
	pub keys: KeyMappings,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
	/// `cube`, `test-cube` or the name of an `.obj` file inside `models_dir`.
	pub model: String,
	pub models_dir: PathBuf,
	/// Initial position of the viewer.
	pub spawn: [f32; 3],
}

impl Config {
	/// Load the configuration from `path`.
	///
	/// A missing file yields the default configuration.
	pub fn load(path: &Path) -> Result<Config, ConfigError> {
		if !path.exists() {
			tracing::debug!("no configuration at {}, using defaults", path.display());
			return Ok(Config::default());
		}

		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
		Config::parse(&content).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
	}

	/// Parse the configuration from TOML text.
	pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
		toml::from_str(content)
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			window: WindowConfig::default(),
			graphics: GraphicsConfig::default(),
			camera: CameraConfig::default(),
			controls: ControlsConfig::default(),
			scene: SceneConfig::default(),
			max_frame_time: 1.0 / 60.0,
		}
	}
}

impl Default for WindowConfig {
	fn default() -> Self {
		Self { width: 800, height: 600, title: "Hex".to_owned() }
	}
}

impl Default for GraphicsConfig {
	fn default() -> Self {
		Self {
			present_mode: PresentModeConfig::Fifo,
			clear_color: [0.01, 0.01, 0.01, 1.0],
		}
	}
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self { fov_y_degrees: 60.0, near: 0.1, far: 100.0 }
	}
}

impl Default for ControlsConfig {
	fn default() -> Self {
		Self {
			move_speed: 3.0,
			look_speed: 1.5,
			sensitivity: 2.0,
			keys: KeyMappings::default(),
		}
	}
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			model: "test-cube".to_owned(),
			models_dir: PathBuf::from("models"),
			spawn: [0.0, 0.0, -2.5],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use winit::event::VirtualKeyCode;

	#[test]
	fn empty_file_is_default() {
		assert_eq!(Config::parse("").unwrap(), Config::default());
	}

	#[test]
	fn missing_file_is_default() {
		let config = Config::load(Path::new("definitely/not/here/hex.toml")).unwrap();
		assert_eq!(config, Config::default());
	}

	#[test]
	fn partial_sections_keep_defaults() {
		let config = Config::parse(r#"
			max_frame_time = 0.05

			[window]
			width = 1280

			[graphics]
			present_mode = "mailbox"

			[controls.keys]
			move_up = "E"

			[scene]
			model = "smooth_vase"
		"#).unwrap();

		assert_eq!(config.max_frame_time, 0.05);
		assert_eq!(config.window.width, 1280);
		assert_eq!(config.window.height, 600);
		assert_eq!(config.graphics.present_mode, PresentModeConfig::Mailbox);
		assert_eq!(config.controls.keys.move_up, VirtualKeyCode::E);
		assert_eq!(config.controls.keys.move_down, VirtualKeyCode::LShift);
		assert_eq!(config.scene.model, "smooth_vase");
		assert_eq!(config.scene.models_dir, PathBuf::from("models"));
	}

	#[test]
	fn rejects_unknown_present_mode() {
		assert!(Config::parse("[graphics]\npresent_mode = \"vsync\"").is_err());
	}
}
