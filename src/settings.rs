//! User-adjustable scroll settings: speed and column count.
//!
//! Slider changes go through the clamping setters. Loading from the
//! preference store is stricter: a stored value of the wrong type or outside
//! the valid range is treated as absent and the default is used instead.

use tracing::warn;

use crate::prefs::PreferenceStore;

pub const SPEED_KEY: &str = "scroll_speed";
pub const COLUMNS_KEY: &str = "columns";

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 2.0;
pub const DEFAULT_SPEED: f64 = 0.5;

pub const MIN_COLUMNS: usize = 4;
pub const MAX_COLUMNS: usize = 8;
pub const DEFAULT_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    speed: f64,
    columns: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl Settings {
    /// Build from raw values, clamping both into range.
    pub fn new(speed: f64, columns: usize) -> Self {
        let mut settings = Self::default();
        settings.set_speed(speed);
        settings.set_columns(columns);
        settings
    }

    /// Scroll distance per tick, in pixels.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Clamp into [MIN_SPEED, MAX_SPEED]. NaN keeps the current value.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        if !speed.is_nan() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
        self.speed
    }

    pub fn set_columns(&mut self, columns: usize) -> usize {
        self.columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        self.columns
    }

    /// Read both entries from the store, substituting defaults for anything
    /// absent, wrong-typed or out of range.
    pub fn load(store: &PreferenceStore) -> Self {
        let speed = match store.get(SPEED_KEY) {
            None => DEFAULT_SPEED,
            Some(value) => stored_speed(value).unwrap_or_else(|| {
                warn!(key = SPEED_KEY, %value, "ignoring stored speed");
                DEFAULT_SPEED
            }),
        };

        let columns = match store.get(COLUMNS_KEY) {
            None => DEFAULT_COLUMNS,
            Some(value) => stored_columns(value).unwrap_or_else(|| {
                warn!(key = COLUMNS_KEY, %value, "ignoring stored column count");
                DEFAULT_COLUMNS
            }),
        };

        Self { speed, columns }
    }

    /// Write the speed entry and flush. Failures are logged, not surfaced.
    pub fn persist_speed(&self, store: &mut PreferenceStore) {
        store.set(SPEED_KEY, self.speed);
        sync(store);
    }

    /// Write the columns entry and flush. Failures are logged, not surfaced.
    pub fn persist_columns(&self, store: &mut PreferenceStore) {
        store.set(COLUMNS_KEY, self.columns as i64);
        sync(store);
    }
}

fn sync(store: &PreferenceStore) {
    if let Err(e) = store.synchronize() {
        warn!(path = %store.path().display(), error = %e, "failed to save preferences");
    }
}

// Integers count as numbers for speed; columns must be an integer.
fn stored_speed(value: &toml::Value) -> Option<f64> {
    let speed = match value {
        toml::Value::Float(f) => *f,
        toml::Value::Integer(i) => *i as f64,
        _ => return None,
    };
    (MIN_SPEED..=MAX_SPEED).contains(&speed).then_some(speed)
}

fn stored_columns(value: &toml::Value) -> Option<usize> {
    let columns = value.as_integer()?;
    let columns = usize::try_from(columns).ok()?;
    (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns).then_some(columns)
}
