//! Compressor configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! quality_step = 5
//!
//! [fallback_display]
//! width = 1080
//! height = 1920
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{DecodeHints, FilterType, DEFAULT_SCRATCH_BUFFER_BYTES};
use crate::display::DisplayBounds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for [`Compressor`](crate::compress::Compressor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Display bounds used when the display cannot be queried.
    pub fallback_display: DisplayBounds,
    /// First quality tried by the size-targeted search.
    pub initial_quality: u8,
    /// Quality decrement between attempts.
    pub quality_step: u8,
    /// Lowest quality the search will encode at.
    pub min_quality: u8,
    /// Ask the encoder for image-specific Huffman tables.
    pub optimize_huffman: bool,
    /// Read buffer size for full decodes.
    pub scratch_buffer_bytes: usize,
    /// Filter used when a decode is subsampled.
    pub filter: FilterType,
    /// Create an empty file when probing a missing path.
    pub create_missing_placeholder: bool,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            fallback_display: DisplayBounds::default(),
            initial_quality: 100,
            quality_step: 10,
            min_quality: 1,
            optimize_huffman: true,
            scratch_buffer_bytes: DEFAULT_SCRATCH_BUFFER_BYTES,
            filter: FilterType::default(),
            create_missing_placeholder: false,
        }
    }
}

impl CompressorConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("initial_quality", self.initial_quality),
            ("min_quality", self.min_quality),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 1 and 100, got {value}"
                )));
            }
        }
        if self.min_quality > self.initial_quality {
            return Err(ConfigError::Invalid(format!(
                "min_quality ({}) exceeds initial_quality ({})",
                self.min_quality, self.initial_quality
            )));
        }
        if self.quality_step == 0 {
            return Err(ConfigError::Invalid("quality_step must be positive".to_string()));
        }
        if self.fallback_display.width == 0 || self.fallback_display.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "fallback_display must be positive, got {}x{}",
                self.fallback_display.width, self.fallback_display.height
            )));
        }
        Ok(())
    }

    pub fn decode_hints(&self) -> DecodeHints {
        DecodeHints {
            scratch_buffer_bytes: self.scratch_buffer_bytes,
            filter: self.filter,
        }
    }
}
