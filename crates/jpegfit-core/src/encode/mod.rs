//! Image encoding pipeline for jpegfit.
//!
//! This module provides:
//! - The [`Encoder`] seam used by the compression driver
//! - [`MozJpegEncoder`], a libjpeg-compatible encoder with Huffman table optimization
//! - [`BaselineJpegEncoder`], a pure-Rust encoder over the `image` crate
//!
//! Encoders build the whole JPEG stream in memory, write it to a temporary
//! file beside the output and rename it into place, so a failed attempt
//! leaves an existing file untouched.
//!
//! # Examples
//!
//! ```ignore
//! use jpegfit_core::encode::encode_jpeg_optimized;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg_optimized(&pixels, 100, 100, 90, true).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;
mod optimized;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::decode::PixelBuffer;

pub use jpeg::{encode_jpeg, BaselineJpegEncoder, EncodeError};
pub use optimized::{encode_jpeg_optimized, MozJpegEncoder};

/// Compresses a pixel buffer into a JPEG file.
pub trait Encoder {
    /// Encode `buffer` at `quality` (1-100) and write it to `output`.
    ///
    /// On error the previous contents of `output`, if any, are unchanged.
    fn encode(
        &self,
        buffer: &PixelBuffer,
        output: &Path,
        quality: u8,
        optimize_huffman: bool,
    ) -> Result<(), EncodeError>;
}

/// Check dimensions, pixel length and quality before encoding.
pub(crate) fn validate_input(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    if !(1..=100).contains(&quality) {
        return Err(EncodeError::InvalidQuality(quality));
    }
    Ok(())
}

/// Borrow live pixels, refusing a recycled buffer.
pub(crate) fn live_pixels(buffer: &PixelBuffer) -> Result<&[u8], EncodeError> {
    buffer.pixels().ok_or(EncodeError::BufferReleased)
}

/// Write a finished stream to `output`, replacing it atomically.
pub(crate) fn write_output(output: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let io_err = |source| EncodeError::Io {
        path: output.to_path_buf(),
        source,
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(bytes).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(output).map_err(|e| io_err(e.error))?;
    Ok(())
}
