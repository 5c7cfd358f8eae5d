//! Options overlay: the in-window configuration surface.
//!
//! Two sliders (scroll speed, column count) and an OK button, drawn on top of
//! the running grid so changes are visible immediately. Driven by a
//! [`PanelInput`] snapshot so it can be exercised without a window.

use crate::draw::{draw_line, draw_text_5x7, fill_rect, stroke_rect, text_width_5x7};
use crate::settings::{MAX_COLUMNS, MAX_SPEED, MIN_COLUMNS, MIN_SPEED, Settings};
use crate::types::{FrameBuffer, Rect};

const PANEL_W: f64 = 340.0;
const PANEL_H: f64 = 180.0;
const SLIDER_LEFT: f64 = 95.0;
const SLIDER_W: f64 = 190.0;
const ROW_H: f64 = 20.0;
const SPEED_ROW_Y: f64 = 45.0;
const COLUMNS_ROW_Y: f64 = 100.0;

const PANEL_BG: u32 = 0x00_2A_2A_2E;
const PANEL_BORDER: u32 = 0x00_55_55_5C;
const TEXT: u32 = 0x00_EE_EE_EE;
const SECONDARY: u32 = 0x00_99_99_A0;
const TRACK: u32 = 0x00_5A_5A_62;
const ACCENT: u32 = 0x00_3D_8B_FF;

/// Which slider has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Speed,
    Columns,
}

impl Control {
    fn other(self) -> Self {
        match self {
            Control::Speed => Control::Columns,
            Control::Columns => Control::Speed,
        }
    }
}

/// Everything the overlay reacts to in one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelInput {
    pub toggle: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub focus_next: bool,
    pub focus_prev: bool,
    pub decrease: bool,
    pub increase: bool,
    pub mouse: Option<(f32, f32)>,
    pub mouse_down: bool,
}

/// What changed while handling one frame of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelOutcome {
    pub speed_changed: bool,
    pub columns_changed: bool,
    pub dismissed: bool,
}

/// Screen-space rectangles of the overlay for a given window size.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout {
    pub panel: Rect,
    pub speed_track: Rect,
    pub columns_track: Rect,
    pub ok_button: Rect,
}

impl PanelLayout {
    /// Panel centered in a `screen_w` x `screen_h` window.
    pub fn centered(screen_w: usize, screen_h: usize) -> Self {
        let x = ((screen_w as f64 - PANEL_W) / 2.0).floor();
        let y = ((screen_h as f64 - PANEL_H) / 2.0).floor();
        Self {
            panel: Rect::new(x, y, PANEL_W, PANEL_H),
            speed_track: Rect::new(x + SLIDER_LEFT, y + SPEED_ROW_Y, SLIDER_W, ROW_H),
            columns_track: Rect::new(x + SLIDER_LEFT, y + COLUMNS_ROW_Y, SLIDER_W, ROW_H),
            ok_button: Rect::new(x + PANEL_W - 90.0, y + PANEL_H - 40.0, 75.0, 28.0),
        }
    }

    fn track(&self, control: Control) -> Rect {
        match control {
            Control::Speed => self.speed_track,
            Control::Columns => self.columns_track,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionsPanel {
    open: bool,
    focus: Control,
    drag: Option<Control>,
    mouse_was_down: bool,
}

impl Default for OptionsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsPanel {
    pub fn new() -> Self {
        Self { open: false, focus: Control::Speed, drag: None, mouse_was_down: false }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn focus(&self) -> Control {
        self.focus
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus = Control::Speed;
        self.drag = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.drag = None;
    }

    /// Apply one frame of input to `settings`.
    pub fn handle(
        &mut self,
        input: &PanelInput,
        settings: &mut Settings,
        screen: (usize, usize),
    ) -> PanelOutcome {
        let mut outcome = PanelOutcome::default();
        let pressed = input.mouse_down && !self.mouse_was_down;
        self.mouse_was_down = input.mouse_down;

        if !self.open {
            if input.toggle {
                self.open();
            }
            return outcome;
        }

        if input.toggle || input.confirm || input.cancel {
            self.close();
            outcome.dismissed = true;
            return outcome;
        }

        if input.focus_next || input.focus_prev {
            self.focus = self.focus.other();
        }

        let step = match (input.decrease, input.increase) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        if step != 0 {
            self.step_focused(step, settings, &mut outcome);
        }

        let layout = PanelLayout::centered(screen.0, screen.1);
        if !input.mouse_down {
            self.drag = None;
        }
        if let Some((mx, my)) = input.mouse {
            let (mx, my) = (mx as f64, my as f64);
            if pressed {
                if layout.ok_button.contains(mx, my) {
                    self.close();
                    outcome.dismissed = true;
                    return outcome;
                }
                for control in [Control::Speed, Control::Columns] {
                    // Generous vertical hit area around the thin track
                    if layout.track(control).inset(-6.0, -6.0).contains(mx, my) {
                        self.drag = Some(control);
                        self.focus = control;
                    }
                }
            }
            if let Some(control) = self.drag {
                let track = layout.track(control);
                let t = ((mx - track.x) / track.width).clamp(0.0, 1.0);
                self.set_from_fraction(control, t, settings, &mut outcome);
            }
        }

        outcome
    }

    fn step_focused(&self, step: i32, settings: &mut Settings, outcome: &mut PanelOutcome) {
        match self.focus {
            Control::Speed => {
                // Keyboard moves in tenths, landing on the 0.1 grid
                let tenths = (settings.speed() * 10.0).round() + step as f64;
                let before = settings.speed();
                outcome.speed_changed |= settings.set_speed(tenths / 10.0) != before;
            }
            Control::Columns => {
                let before = settings.columns();
                let target = before.saturating_add_signed(step as isize);
                outcome.columns_changed |= settings.set_columns(target) != before;
            }
        }
    }

    fn set_from_fraction(&self, control: Control, t: f64, settings: &mut Settings, outcome: &mut PanelOutcome) {
        match control {
            Control::Speed => {
                let before = settings.speed();
                let speed = MIN_SPEED * (1.0 - t) + MAX_SPEED * t;
                outcome.speed_changed |= settings.set_speed(speed) != before;
            }
            Control::Columns => {
                let before = settings.columns();
                let span = (MAX_COLUMNS - MIN_COLUMNS) as f64;
                let columns = MIN_COLUMNS + (t * span).round() as usize;
                outcome.columns_changed |= settings.set_columns(columns) != before;
            }
        }
    }

    /// Draw the overlay on top of the current frame.
    /// Visual: a dark panel with two sliders and an OK button in the window center.
    pub fn render(&self, fb: &mut FrameBuffer, settings: &Settings) {
        if !self.open {
            return;
        }
        let layout = PanelLayout::centered(fb.width, fb.height);
        let p = layout.panel;
        let (px, py) = (p.x as i32, p.y as i32);

        fill_rect(fb, px, py, p.width as i32, p.height as i32, PANEL_BG);
        stroke_rect(fb, px, py, p.width as i32, p.height as i32, PANEL_BORDER);
        draw_text_5x7(fb, px + 12, py + 12, "Arena Channel Options", TEXT);

        // Speed row
        let speed_t = (settings.speed() - MIN_SPEED) / (MAX_SPEED - MIN_SPEED);
        self.draw_label(fb, layout.speed_track, "Speed:", Control::Speed);
        draw_slider(fb, layout.speed_track, speed_t);
        let st = layout.speed_track;
        let caption_y = (st.max_y() + 4.0) as i32;
        draw_text_5x7(fb, st.x as i32, caption_y, "Slower", SECONDARY);
        let faster_x = (st.max_x() as i32) - text_width_5x7("Faster");
        draw_text_5x7(fb, faster_x, caption_y, "Faster", SECONDARY);
        draw_text_5x7(fb, st.max_x() as i32 + 10, st.y as i32 + 7, &format!("{:.1}", settings.speed()), TEXT);

        // Columns row
        let ct = layout.columns_track;
        let span = (MAX_COLUMNS - MIN_COLUMNS) as f64;
        let columns_t = (settings.columns() - MIN_COLUMNS) as f64 / span;
        self.draw_label(fb, ct, "Columns:", Control::Columns);
        draw_slider(fb, ct, columns_t);
        for n in MIN_COLUMNS..=MAX_COLUMNS {
            let tx = (ct.x + (n - MIN_COLUMNS) as f64 / span * ct.width) as i32;
            let mid = ct.y as i32 + ROW_H as i32 / 2;
            draw_line(fb, tx, mid + 5, tx, mid + 8, SECONDARY);
            let label = n.to_string();
            draw_text_5x7(fb, tx - text_width_5x7(&label) / 2, (ct.max_y() + 4.0) as i32, &label, SECONDARY);
        }

        // OK button
        let ok = layout.ok_button;
        let (ox, oy, ow, oh) = (ok.x as i32, ok.y as i32, ok.width as i32, ok.height as i32);
        fill_rect(fb, ox, oy, ow, oh, ACCENT);
        stroke_rect(fb, ox, oy, ow, oh, TEXT);
        draw_text_5x7(fb, ox + (ow - text_width_5x7("OK")) / 2, oy + (oh - 7) / 2, "OK", TEXT);
    }

    fn draw_label(&self, fb: &mut FrameBuffer, track: Rect, label: &str, control: Control) {
        let right = track.x as i32 - 10;
        let y = track.y as i32 + 7;
        let color = if self.focus == control { ACCENT } else { TEXT };
        draw_text_5x7(fb, right - text_width_5x7(label), y, label, color);
    }
}

/// Track with the filled part up to `t` in [0,1] and a knob at `t`.
fn draw_slider(fb: &mut FrameBuffer, track: Rect, t: f64) {
    let t = t.clamp(0.0, 1.0);
    let (x, w) = (track.x as i32, track.width as i32);
    let mid = track.y as i32 + ROW_H as i32 / 2;
    let knob_x = x + (t * track.width) as i32;

    fill_rect(fb, x, mid - 2, w, 4, TRACK);
    fill_rect(fb, x, mid - 2, knob_x - x, 4, ACCENT);
    fill_rect(fb, knob_x - 4, mid - 7, 9, 14, TEXT);
}
