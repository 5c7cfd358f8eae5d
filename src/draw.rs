// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the scrolling tile grid.
// 2) Filled and outlined rectangles and thin lines for the options overlay.
// 3) A tiny 5x7 bitmap font to render labels and the FPS counter.

use crate::config::WindowConfig;
use crate::error::Error;
use crate::options::PanelInput;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create the window from the configured size and decorations.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, cfg: &WindowConfig) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: cfg.resizable,
            borderless: cfg.borderless,
            scale_mode: ScaleMode::UpperLeft,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, cfg.width.max(1), cfg.height.max(1), options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(cfg.fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new frame.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current drawable size; follows user resizes.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Current mouse position in window pixels, None when outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    // toggles the FPS counter in the corner
    pub fn f_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::F, KeyRepeat::No)
    }

    /// Snapshot of everything the options overlay reacts to this frame.
    pub fn panel_input(&self) -> PanelInput {
        let once = |k| self.window.is_key_pressed(k, KeyRepeat::No);
        let repeat = |k| self.window.is_key_pressed(k, KeyRepeat::Yes);
        PanelInput {
            toggle: once(Key::O),
            confirm: once(Key::Enter) || once(Key::NumPadEnter),
            cancel: once(Key::Escape),
            focus_next: repeat(Key::Tab) || repeat(Key::Down),
            focus_prev: repeat(Key::Up),
            decrease: repeat(Key::Left),
            increase: repeat(Key::Right),
            mouse: self.mouse_pos(),
            mouse_down: self.left_mouse_down(),
        }
    }
}

/* ---------- Software drawing: pixels, rectangles, lines ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Fill a w x h block whose top-left corner is (x,y), clipped to the screen.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = (x.saturating_add(w).max(0) as usize).min(fb.width);
    let y1 = (y.saturating_add(h).max(0) as usize).min(fb.height);
    if x0 >= x1 {
        return;
    }
    for yy in y0..y1 {
        let row = yy * fb.width;
        fb.pixels[row + x0..row + x1].fill(color);
    }
}

/// One-pixel outline of a w x h block.
pub fn stroke_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    if w <= 0 || h <= 0 {
        return;
    }
    draw_line(fb, x, y, x + w - 1, y, color);
    draw_line(fb, x, y + h - 1, x + w - 1, y + h - 1, color);
    draw_line(fb, x, y, x, y + h - 1, color);
    draw_line(fb, x + w - 1, y, x + w - 1, y + h - 1, color);
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase maps to uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y).
/// Visual: a tiny glyph appears with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass offset by (1,1) in black, then the glyph itself
        for (offset, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Width in pixels that `draw_text_5x7` will cover for `text`.
pub fn text_width_5x7(text: &str) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * 6 - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_screen() {
        let mut fb = FrameBuffer::new(10, 10);
        fill_rect(&mut fb, -5, 8, 8, 8, 0x00_FF_FF_FF);
        assert_eq!(fb.get(0, 8), 0x00_FF_FF_FF);
        assert_eq!(fb.get(2, 9), 0x00_FF_FF_FF);
        assert_eq!(fb.get(3, 9), 0);
        assert_eq!(fb.get(0, 7), 0);
    }

    #[test]
    fn stroke_rect_leaves_inside_untouched() {
        let mut fb = FrameBuffer::new(10, 10);
        stroke_rect(&mut fb, 1, 1, 5, 5, 7);
        assert_eq!(fb.get(1, 1), 7);
        assert_eq!(fb.get(5, 5), 7);
        assert_eq!(fb.get(3, 3), 0);
    }

    #[test]
    fn every_label_character_has_a_glyph() {
        for ch in "ARENA CHANNEL OPTIONS SPEED: COLUMNS: SLOWER FASTER OK FPS: 0123456789.-/|".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
        }
        assert_eq!(glyph5x7('a'), glyph5x7('A'));
    }

    #[test]
    fn text_draws_with_shadow() {
        let mut fb = FrameBuffer::new(20, 10);
        fb.fill(0x00_80_80_80);
        draw_text_5x7(&mut fb, 0, 0, "I", 0x00_FF_FF_FF);
        // Top bar of 'I' is columns 1..=3 on row 0
        assert_eq!(fb.get(2, 0), 0x00_FF_FF_FF);
        // Shadow shows where the glyph does not cover it
        assert_eq!(fb.get(4, 1), 0);
        assert_eq!(text_width_5x7("OK"), 11);
    }
}
