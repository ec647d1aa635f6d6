// src/config.rs

//! Configuration for font sessions.
//!
//! `FontConfig` can be deserialized from a JSON file. Every field has a
//! default, so a partial (or empty) file is valid.

use crate::error::FontError;
use anyhow::Context;
use log::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "FONTMATCH_CONFIG";

/// Process-wide configuration, read once from `FONTMATCH_CONFIG`.
pub static CONFIG: Lazy<FontConfig> = Lazy::new(FontConfig::from_env);

/// Settings applied when a `FontSession` is built from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font files or directories, registered in this order. Order is priority.
    pub font_paths: Vec<PathBuf>,
    /// Size in points used by `measure_default` / `render_default`.
    pub default_font_size: f32,
    /// Extra horizontal space in points inserted between characters.
    pub character_spacing: f32,
    /// Identifier tried first for every character before the ordered scan.
    pub preferred_font: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            font_paths: Vec::new(),
            default_font_size: 12.0,
            character_spacing: 0.0,
            preferred_font: None,
        }
    }
}

impl FontConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid font configuration JSON")
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))
            .and_then(|json| Self::from_json_str(&json))
            .map_err(|source| FontError::Config {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Reads the file named by `FONTMATCH_CONFIG`, falling back to defaults
    /// when the variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(&path).unwrap_or_else(|e| {
                warn!("{}; using default font configuration", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
