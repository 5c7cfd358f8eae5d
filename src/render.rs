// Software tile renderer.
// Visual effects provided here:
// 1) The background fill behind the grid.
// 2) Each image scaled to cover its cell (aspect-fill), cropped to a rounded rectangle.
// 3) Smooth, anti-aliased corners blended in linear light.

use crate::gamma::GammaLut;
use crate::images::{ImageAsset, ImageSet};
use crate::tiling::TilingEngine;
use crate::types::{FrameBuffer, Rect};

/// How tiles look: gap inside each cell, corner rounding, background color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    pub padding: f64,
    pub corner_radius: f64,
    pub background: u32, // 0x00RRGGBB
}

impl Default for TileStyle {
    fn default() -> Self {
        Self { padding: 4.0, corner_radius: 8.0, background: 0x00_00_00_00 }
    }
}

/// Where to draw an `image_w` x `image_h` image so it fully covers `target`.
/// Wider images fit the height and are centered horizontally; taller ones fit
/// the width and are centered vertically. The overflow is cropped by the caller.
pub fn aspect_fill(image_w: f64, image_h: f64, target: Rect) -> Rect {
    let image_aspect = image_w / image_h;
    let target_aspect = target.width / target.height;

    if image_aspect > target_aspect {
        let draw_h = target.height;
        let draw_w = draw_h * image_aspect;
        let x_offset = (target.width - draw_w) / 2.0;
        Rect::new(target.x + x_offset, target.y, draw_w, draw_h)
    } else {
        let draw_w = target.width;
        let draw_h = draw_w / image_aspect;
        let y_offset = (target.height - draw_h) / 2.0;
        Rect::new(target.x, target.y + y_offset, draw_w, draw_h)
    }
}

/// How much of the pixel centered at (px, py) lies inside the rounded rect, in [0,1].
/// Uses the signed distance to the rounded box; one pixel of soft edge.
pub fn rounded_rect_coverage(px: f64, py: f64, rect: Rect, radius: f64) -> f32 {
    let hx = rect.width / 2.0;
    let hy = rect.height / 2.0;
    let r = radius.clamp(0.0, hx.min(hy));

    // Position relative to the rect center, folded into one quadrant
    let qx = (px - (rect.x + hx)).abs() - (hx - r);
    let qy = (py - (rect.y + hy)).abs() - (hy - r);

    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    let dist = outside + inside - r;

    (0.5 - dist).clamp(0.0, 1.0) as f32
}

/// Draw one image into `cell`, inset by the padding and clipped to rounded corners.
/// Visual: a rounded photo tile; pixels outside the tile keep the background.
pub fn draw_tile(fb: &mut FrameBuffer, cell: Rect, asset: &ImageAsset, style: &TileStyle, lut: &GammaLut) {
    let inner = cell.inset(style.padding, style.padding);
    if inner.is_empty() {
        return;
    }

    let img_w = asset.width() as f64;
    let img_h = asset.height() as f64;
    let dest = aspect_fill(img_w, img_h, inner);

    // Pixel span touched by the tile, clipped to the screen
    let x0 = inner.x.floor().max(0.0) as usize;
    let y0 = inner.y.floor().max(0.0) as usize;
    let x1 = (inner.max_x().ceil().max(0.0) as usize).min(fb.width);
    let y1 = (inner.max_y().ceil().max(0.0) as usize).min(fb.height);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let sx = img_w / dest.width;
    let sy = img_h / dest.height;

    for y in y0..y1 {
        let cy = y as f64 + 0.5;
        let v = ((cy - dest.y) * sy).max(0.0) as u32;
        let row = y * fb.width;

        for x in x0..x1 {
            let cx = x as f64 + 0.5;
            let coverage = rounded_rect_coverage(cx, cy, inner, style.corner_radius);
            if coverage <= 0.0 {
                continue;
            }

            let u = ((cx - dest.x) * sx).max(0.0) as u32;
            let [r, g, b, a] = asset.rgba_at(u, v);
            let src = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
            let alpha = coverage * (a as f32 / 255.0);

            let idx = row + x;
            fb.pixels[idx] = lut.blend(fb.pixels[idx], src, alpha);
        }
    }
}

/// Compose one full frame: background, then every visible tile.
/// Visual: with no images only the background shows.
pub fn render_frame(
    fb: &mut FrameBuffer,
    engine: &TilingEngine,
    images: &ImageSet,
    style: &TileStyle,
    lut: &GammaLut,
) {
    fb.fill(style.background);
    if images.is_empty() {
        return;
    }

    for cell in engine.visible_cells(fb.width as f64, fb.height as f64) {
        if let Some(asset) = images.get(cell.image_index) {
            draw_tile(fb, cell.rect, asset, style, lut);
        }
    }
}
