//! Baseline JPEG encoding with the `image` crate.
//!
//! The `image` encoder always uses the standard Huffman tables, so the
//! `optimize_huffman` flag is accepted and ignored. Use it where a pure-Rust
//! build matters more than output size.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;
use tracing::debug;

use super::{live_pixels, validate_input, write_output, Encoder};
use crate::decode::PixelBuffer;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality outside 1-100
    #[error("Invalid quality {0}: must be between 1 and 100")]
    InvalidQuality(u8),

    /// The pixel buffer was recycled before encoding
    #[error("Pixel buffer has already been released")]
    BufferReleased,

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the output file failed
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode RGB pixel data to baseline JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Errors
///
/// Returns an error for empty dimensions, a pixel length that doesn't
/// match them, or a quality outside 1-100.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_input(pixels, width, height, quality)?;

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// [`Encoder`] over [`encode_jpeg`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineJpegEncoder;

impl Encoder for BaselineJpegEncoder {
    fn encode(
        &self,
        buffer: &PixelBuffer,
        output: &Path,
        quality: u8,
        optimize_huffman: bool,
    ) -> Result<(), EncodeError> {
        if optimize_huffman {
            debug!("baseline encoder uses standard Huffman tables");
        }
        let bytes = encode_jpeg(live_pixels(buffer)?, buffer.width(), buffer.height(), quality)?;
        write_output(output, &bytes)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
