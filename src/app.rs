// The screensaver view: owns the engine, the images, the settings and the options overlay.
// main.rs only moves input in and pixels out; everything visible is decided here.

use tracing::debug;

use crate::gamma::GammaLut;
use crate::images::ImageSet;
use crate::options::{OptionsPanel, PanelInput};
use crate::prefs::PreferenceStore;
use crate::render::{TileStyle, render_frame};
use crate::settings::Settings;
use crate::tiling::TilingEngine;
use crate::types::FrameBuffer;

pub struct ArenaChannel {
    engine: TilingEngine,
    images: ImageSet,
    settings: Settings,
    prefs: PreferenceStore,
    panel: OptionsPanel,
    style: TileStyle,
    lut: GammaLut,
}

impl ArenaChannel {
    /// Settings are read from `prefs` once, here.
    pub fn new(images: ImageSet, prefs: PreferenceStore, style: TileStyle) -> Self {
        let settings = Settings::load(&prefs);
        debug!(speed = settings.speed(), columns = settings.columns(), "loaded settings");
        Self {
            engine: TilingEngine::new(settings, images.len()),
            images,
            settings,
            prefs,
            panel: OptionsPanel::new(),
            style,
            lut: GammaLut::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &TilingEngine {
        &self.engine
    }

    pub fn options_open(&self) -> bool {
        self.panel.is_open()
    }

    /// Feed one frame of input. Returns false once the user asks to quit
    /// (Esc while the options overlay is closed).
    pub fn handle_input(&mut self, input: &PanelInput, screen: (usize, usize)) -> bool {
        if input.cancel && !self.panel.is_open() {
            return false;
        }

        let outcome = self.panel.handle(input, &mut self.settings, screen);
        if outcome.speed_changed {
            self.engine.set_settings(self.settings);
            self.settings.persist_speed(&mut self.prefs);
            debug!(speed = self.settings.speed(), "speed changed");
        }
        if outcome.columns_changed {
            self.engine.set_settings(self.settings);
            self.settings.persist_columns(&mut self.prefs);
            debug!(columns = self.settings.columns(), "columns changed");
        }
        true
    }

    /// Advance the scroll by one tick for a window `viewport_width` pixels wide.
    pub fn animate_one_frame(&mut self, viewport_width: usize) {
        self.engine.advance_tick(viewport_width as f64);
    }

    /// Render the grid and, when open, the options overlay.
    pub fn draw(&self, fb: &mut FrameBuffer) {
        render_frame(fb, &self.engine, &self.images, &self.style, &self.lut);
        self.panel.render(fb, &self.settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageAsset;
    use crate::prefs::tests::scratch_dir;
    use image::{Rgba, RgbaImage};

    const SCREEN: (usize, usize) = (800, 600);

    fn images(n: usize) -> ImageSet {
        ImageSet::new(
            (0..n)
                .map(|i| ImageAsset::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([i as u8 * 40, 0, 0, 255]))).unwrap())
                .collect(),
        )
    }

    fn press(f: impl FnOnce(&mut PanelInput)) -> PanelInput {
        let mut input = PanelInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn esc_quits_only_when_options_are_closed() {
        let dir = scratch_dir("app-esc");
        let mut app = ArenaChannel::new(images(3), PreferenceStore::open(dir.join("p.toml")), TileStyle::default());

        assert!(app.handle_input(&press(|i| i.toggle = true), SCREEN));
        assert!(app.options_open());
        assert!(app.handle_input(&press(|i| i.cancel = true), SCREEN));
        assert!(!app.options_open());
        assert!(!app.handle_input(&press(|i| i.cancel = true), SCREEN));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn slider_changes_reach_engine_and_disk() {
        let dir = scratch_dir("app-persist");
        let path = dir.join("preferences.toml");
        let mut app = ArenaChannel::new(images(6), PreferenceStore::open(&path), TileStyle::default());

        app.handle_input(&press(|i| i.toggle = true), SCREEN);
        app.handle_input(&press(|i| i.increase = true), SCREEN);
        app.handle_input(&press(|i| i.focus_next = true), SCREEN);
        app.handle_input(&press(|i| i.increase = true), SCREEN);
        app.handle_input(&press(|i| i.increase = true), SCREEN);

        assert_eq!(app.engine().settings().speed(), 0.6);
        assert_eq!(app.engine().settings().columns(), 6);

        let reloaded = Settings::load(&PreferenceStore::open(&path));
        assert_eq!(reloaded.speed(), 0.6);
        assert_eq!(reloaded.columns(), 6);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn starts_from_persisted_settings() {
        let dir = scratch_dir("app-load");
        let path = dir.join("preferences.toml");
        std::fs::write(&path, "scroll_speed = 1.5\ncolumns = 5\n").unwrap();

        let mut app = ArenaChannel::new(images(2), PreferenceStore::open(&path), TileStyle::default());
        assert_eq!(app.settings().columns(), 5);
        app.animate_one_frame(800);
        assert_eq!(app.engine().scroll_offset(), 1.5);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn draw_without_images_is_background() {
        let dir = scratch_dir("app-empty");
        let style = TileStyle { background: 0x00_01_02_03, ..TileStyle::default() };
        let mut app = ArenaChannel::new(ImageSet::default(), PreferenceStore::open(dir.join("p.toml")), style);
        let mut fb = FrameBuffer::new(320, 240);
        for _ in 0..10 {
            app.animate_one_frame(fb.width);
            app.draw(&mut fb);
        }
        assert!(fb.pixels.iter().all(|&p| p == 0x00_01_02_03));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
