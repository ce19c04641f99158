//! jpegfit core - size-targeted JPEG re-encoding
//!
//! This crate re-encodes a source image as JPEG, either at a fixed quality or
//! at falling quality until the output fits a size budget. Decoding is capped
//! near the display resolution and EXIF rotation is baked into the pixels.

pub mod compress;
pub mod config;
pub mod decode;
pub mod display;
pub mod encode;
pub mod probe;

#[cfg(test)]
mod test_helpers;

use std::path::PathBuf;

pub use compress::{CompressError, CompressionOutcome, Compressor};
pub use config::{CompressorConfig, ConfigError};
pub use decode::{DecodeError, ImageLoader, PixelBuffer, Rotation};
pub use display::{DisplayBounds, DisplayMetrics, FixedDisplay, HeadlessDisplay};
pub use encode::{EncodeError, Encoder, MozJpegEncoder};
pub use probe::{SizeProbe, SizeReading};

/// What a compression request aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionTarget {
    /// A single encode at this quality (1 to 100).
    Quality(u8),
    /// Re-encode until the output is at most this many kilobytes.
    MaxSizeKb(u64),
}

/// Parameters for one compression call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompressionRequest {
    /// Image to read
    pub source: PathBuf,
    /// JPEG file to write
    pub output: PathBuf,
    pub target: CompressionTarget,
}

impl CompressionRequest {
    pub fn with_quality(source: impl Into<PathBuf>, output: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            target: CompressionTarget::Quality(quality),
        }
    }

    pub fn with_max_size_kb(
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        max_size_kb: u64,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            target: CompressionTarget::MaxSizeKb(max_size_kb),
        }
    }
}
