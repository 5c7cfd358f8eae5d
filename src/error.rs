// Crate-wide error type.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the framebuffer to the window failed

    #[error("Configuration error: {0}")]
    Config(String), // config.toml exists but could not be parsed

    #[error("Preferences error: {0}")]
    Preferences(String), // Serializing the preference table failed

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
