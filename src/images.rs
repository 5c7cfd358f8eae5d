//! Tile image loading.
//!
//! Every regular file in the image directory is tried in lexicographic
//! filename order. Format detection sniffs the file contents, so extensions
//! do not matter. Files that fail to decode are skipped; a missing directory
//! is the same as an empty one.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use tracing::{debug, info, warn};

/// A decoded image, ready to be sampled by the renderer.
#[derive(Clone)]
pub struct ImageAsset {
    pixels: RgbaImage,
}

impl ImageAsset {
    /// Wrap an already-decoded image. Returns None for zero-sized images.
    pub fn from_rgba(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Straight-alpha RGBA at (x, y); coordinates are clamped to the image.
    #[inline]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.pixels.width() - 1);
        let y = y.min(self.pixels.height() - 1);
        self.pixels.get_pixel(x, y).0
    }
}

/// Ordered tile sources. Index `i` never changes once loaded.
#[derive(Clone, Default)]
pub struct ImageSet {
    assets: Vec<ImageAsset>,
}

impl ImageSet {
    pub fn new(assets: Vec<ImageAsset>) -> Self {
        Self { assets }
    }

    /// Decode everything under `dir`. Images wider or taller than
    /// `max_side` are downscaled once here so per-frame sampling stays cheap.
    pub fn load_dir(dir: &Path, max_side: u32) -> Self {
        let mut files = match list_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "image directory unavailable; showing background only");
                return Self::default();
            }
        };
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut assets = Vec::with_capacity(files.len());
        for path in &files {
            match decode(path, max_side) {
                Ok(asset) => assets.push(asset),
                Err(reason) => debug!(path = %path.display(), %reason, "skipping file"),
            }
        }

        info!(
            dir = %dir.display(),
            loaded = assets.len(),
            skipped = files.len() - assets.len(),
            "loaded tile images"
        );
        Self { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageAsset> {
        self.assets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageAsset> {
        self.assets.iter()
    }
}

fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

fn decode(path: &Path, max_side: u32) -> Result<ImageAsset, String> {
    let img = ImageReader::open(path)
        .map_err(|e| format!("open: {e}"))?
        .with_guessed_format()
        .map_err(|e| format!("sniff format: {e}"))?
        .decode()
        .map_err(|e| format!("decode: {e}"))?;

    let mut rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let longest = w.max(h);
    if max_side > 0 && longest > max_side {
        let scale = max_side as f64 / longest as f64;
        let nw = ((w as f64 * scale).round() as u32).max(1);
        let nh = ((h as f64 * scale).round() as u32).max(1);
        rgba = imageops::resize(&rgba, nw, nh, FilterType::Triangle);
    }

    ImageAsset::from_rgba(rgba).ok_or_else(|| "zero-sized image".to_string())
}
