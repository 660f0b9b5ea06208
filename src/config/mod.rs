//! Configuration management for catfilter.
//!
//! Settings are read from `config.toml` in the platform configuration
//! directory (or a path given on the command line). A missing file means
//! defaults; nothing is ever written back.

mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use settings::Settings;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration file exists but could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`Settings`].
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The settings parsed but hold invalid values.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default location of the configuration file.
///
/// - Linux: `~/.config/catfilter/config.toml`
/// - macOS: `~/Library/Application Support/catfilter/config.toml`
/// - Windows: `C:\Users\<User>\AppData\Roaming\catfilter\config.toml`
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("catfilter").join("config.toml"))
}
