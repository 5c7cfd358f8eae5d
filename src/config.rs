use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::render::TileStyle;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub tiles: TileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory scanned for tile images
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Longest side kept for a decoded image; larger images are downscaled at load
    #[serde(default = "default_max_image_side")]
    pub max_image_side: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            log_level: default_log_level(),
            max_image_side: default_max_image_side(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Animation ticks per second
    #[serde(default = "default_fps")]
    pub fps: usize,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default)]
    pub borderless: bool,
    /// Draw the FPS counter in the corner
    #[serde(default)]
    pub show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            resizable: default_true(),
            borderless: false,
            show_fps: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileConfig {
    /// Gap between a cell's edge and its image
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    /// Background color as 0xRRGGBB
    #[serde(default)]
    pub background: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            corner_radius: default_corner_radius(),
            background: 0x00_00_00_00,
        }
    }
}

impl TileConfig {
    pub fn style(&self) -> TileStyle {
        TileStyle {
            padding: self.padding.max(0.0),
            corner_radius: self.corner_radius.max(0.0),
            background: self.background & 0x00_FF_FF_FF,
        }
    }
}

fn default_images_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("arena-channel")
        .join("images")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_image_side() -> u32 {
    1024
}

fn default_width() -> usize {
    1280
}

fn default_height() -> usize {
    800
}

fn default_fps() -> usize {
    60
}

fn default_true() -> bool {
    true
}

fn default_padding() -> f64 {
    4.0
}

fn default_corner_radius() -> f64 {
    8.0
}

impl AppConfig {
    /// Load configuration from `path` (or the default location) or return defaults
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| crate::Error::Config(format!("{}: {e}", config_path.display())))
        } else {
            Ok(Self::default())
        }
    }

    /// Directory holding config.toml and preferences.toml
    /// Always ~/.config/arena-channel on all platforms
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("arena-channel")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.window.fps, 60);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.tiles.padding, 4.0);
        assert_eq!(config.tiles.corner_radius, 8.0);
        assert_eq!(config.tiles.background, 0);
        assert_eq!(config.general.max_image_side, 1024);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [window]
            fps = 30
            show_fps = true

            [tiles]
            background = 0x202020
            "#,
        )
        .unwrap();
        assert_eq!(config.window.fps, 30);
        assert!(config.window.show_fps);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.tiles.style().background, 0x20_20_20);
        assert_eq!(config.tiles.style().padding, 4.0);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = crate::prefs::tests::scratch_dir("config-malformed");
        let path = dir.join("config.toml");
        std::fs::write(&path, "[window\nfps = 30").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(crate::Error::Config(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("arena-channel-definitely-missing.toml");
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.window.fps, 60);
    }
}
