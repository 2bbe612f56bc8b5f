//! Application configuration.
//!
//! Loaded from an optional JSON file; every field has a default, so `{}` is
//! a valid config. Command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use textcover_core::DEFAULT_TEXT;
use textcover_text::DEFAULT_TEXT_SIZE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("text_size must be a positive number, got {0}")]
    InvalidTextSize(f32),
}

/// Runtime configuration for the widget application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON preference file (default: `textcover_prefs.json`).
    pub prefs_path: PathBuf,
    /// Directory the PNG host writes `widget_<id>.png` into (default: `textcover_out`).
    pub output_dir: PathBuf,
    /// Text size in pixels (default: 200).
    pub text_size: f32,
    /// Text shown by widgets that have no saved settings.
    pub default_text: String,
    /// Extra font directories loaded on startup.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefs_path: PathBuf::from("textcover_prefs.json"),
            output_dir: PathBuf::from("textcover_out"),
            text_size: DEFAULT_TEXT_SIZE,
            default_text: DEFAULT_TEXT.to_owned(),
            font_dirs: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Config rooted in a scratch directory.
    pub fn for_testing(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            prefs_path: dir.join("prefs.json"),
            output_dir: dir.join("out"),
            ..Self::default()
        }
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.text_size.is_finite() || self.text_size <= 0.0 {
            return Err(ConfigError::InvalidTextSize(self.text_size));
        }
        Ok(())
    }
}
