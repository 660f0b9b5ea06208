//! Centralized error types for catfilter.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dataset::DatasetError;

/// The main application error type.
///
/// This enum aggregates all error types that can occur in catfilter,
/// providing user-friendly error messages while preserving the underlying
/// error context for debugging.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Dataset loading or query errors.
    #[error("{0}")]
    Dataset(#[from] DatasetError),

    /// A command-line filter could not be parsed.
    #[error("invalid filter '{0}'")]
    InvalidFilter(String),
}

impl AppError {
    /// Get a user-friendly message for display.
    ///
    /// This returns a message suitable for showing to users,
    /// without technical jargon.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Dataset(e) => match e {
                DatasetError::Read { path, .. } => {
                    format!("Could not read '{}'.", path.display())
                }
                DatasetError::Parse(_) => "The dataset is not valid JSON.".to_string(),
                DatasetError::NotAnArray | DatasetError::InvalidRecord(_) => {
                    "The dataset must be a JSON array of objects.".to_string()
                }
                DatasetError::UnknownColumn(column) => {
                    format!("Column '{}' does not exist in the dataset.", column)
                }
            },
            AppError::InvalidFilter(raw) => format!("Could not understand filter '{}'.", raw),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix or remove the config file, or pass --config with another path.")
            }
            AppError::Dataset(DatasetError::UnknownColumn(_)) => {
                Some("Pass --column with one of the dataset's field names.")
            }
            AppError::InvalidFilter(_) => {
                Some("Use --text COLUMN=TEXT or --range COLUMN=MIN..MAX.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
