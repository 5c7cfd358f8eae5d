// What you SEE:
// • A grid of your images, rounded and cropped to squares, drifting slowly upward forever.
// • O opens the options overlay (speed + columns sliders, OK to close). Changes save instantly.
// • F toggles an FPS counter. ESC closes the overlay, or quits when it is already closed.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_channel::draw::{Drawer, draw_text_5x7};
use arena_channel::images::ImageSet;
use arena_channel::prefs::PreferenceStore;
use arena_channel::types::FrameBuffer;
use arena_channel::{AppConfig, ArenaChannel, Result};

#[derive(Parser)]
#[command(name = "arena-channel")]
#[command(version, about = "A scrolling image-grid screensaver")]
struct Cli {
    /// Path to config.toml (default: ~/.config/arena-channel/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of images to tile
    #[arg(short, long)]
    images: Option<PathBuf>,

    /// Path to the preferences file holding speed and columns
    #[arg(short, long)]
    preferences: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Animation ticks per second
    #[arg(long)]
    fps: Option<usize>,

    /// Show the FPS counter from the start
    #[arg(long)]
    show_fps: bool,
}

impl Cli {
    /// Command-line flags win over config.toml.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.images {
            config.general.images_dir = dir.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(fps) = self.fps {
            config.window.fps = fps;
        }
        if self.show_fps {
            config.window.show_fps = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Initialize logging; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    /* --- Settings + images (one-time, blocking) ---
       Visual: nothing yet; an empty or missing folder just means a plain background. */
    let prefs = PreferenceStore::open(cli.preferences.clone().unwrap_or_else(PreferenceStore::default_path));
    let images = ImageSet::load_dir(&config.general.images_dir, config.general.max_image_side);
    let mut app = ArenaChannel::new(images, prefs, config.tiles.style());

    /* --- Window + reusable screen buffer --- */
    let mut drawer = Drawer::new("Arena Channel", &config.window)?;
    let (w, h) = drawer.size();
    let mut screen = FrameBuffer::new(w, h);
    info!(width = w, height = h, fps = config.window.fps, "window open");

    /* --- HUD / FPS --- */
    let mut show_fps = config.window.show_fps;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() {
        let now = Instant::now();

        /* 1) Follow window resizes so tiles always span the full width. */
        let (w, h) = drawer.size();
        screen.resize(w, h);

        /* 2) Inputs */
        if drawer.f_pressed_once() { show_fps = !show_fps; }
        if !app.handle_input(&drawer.panel_input(), (w, h)) {
            break;
        }

        /* 3) Tick, then draw grid + overlay. */
        app.animate_one_frame(w);
        app.draw(&mut screen);
        if show_fps {
            draw_text_5x7(&mut screen, 8, 8, &hud_fps_text, 0x00_FF_FF_FF);
        }

        /* 4) Present (this is when the on-screen image updates). */
        drawer.present(&screen)?;

        /* 5) FPS counter (logged + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("{:.1} fps, scroll offset {:.1}", fps, app.engine().scroll_offset());
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("bye");
    Ok(())
}
