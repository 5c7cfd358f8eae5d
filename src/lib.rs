//! Arena Channel: an endlessly scrolling grid of images, rendered in software.
//!
//! The heart is [`tiling::TilingEngine`], which maps a scroll offset to the
//! cells on screen. [`app::ArenaChannel`] ties it to loaded images, persisted
//! settings and the options overlay; the binary drives it from a window.

pub mod app;
pub mod config;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod images;
pub mod options;
pub mod prefs;
pub mod render;
pub mod settings;
pub mod tiling;
pub mod types;

pub use app::ArenaChannel;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use settings::Settings;
pub use tiling::{GridCell, TilingEngine};
