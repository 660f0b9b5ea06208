//! Application settings configuration.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{config_path, ConfigError, Result};
use crate::ui::theme::DEFAULT_PALETTE;

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column to filter on when none is given on the command line.
    pub default_column: Option<String>,
    /// Event poll interval in milliseconds.
    pub tick_rate_ms: u64,
    /// Dropdown rows shown before the list scrolls.
    pub max_dropdown_items: usize,
    /// Matching records shown in the preview table.
    pub preview_rows: usize,
    /// Colour tokens assigned to category values in order.
    pub palette: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_column: None,
            tick_rate_ms: 100,
            max_dropdown_items: 8,
            preview_rows: 200,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path()?)
    }

    /// Load settings from a specific file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(settings)
    }

    /// Parse and validate settings from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` when the tick rate or the
    /// dropdown height is zero, or the palette is empty.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }

        if self.max_dropdown_items == 0 {
            return Err(ConfigError::ValidationError(
                "max_dropdown_items must be greater than zero".to_string(),
            ));
        }

        if self.palette.is_empty() {
            return Err(ConfigError::ValidationError(
                "palette must contain at least one colour".to_string(),
            ));
        }

        Ok(())
    }
}
