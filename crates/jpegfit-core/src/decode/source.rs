//! File decoding backends.
//!
//! A [`Decoder`] answers two questions: how large is the image stored in a
//! file (header only, no pixel allocation), and what are its pixels at a
//! given subsampling ratio.
//!
//! JPEG sources are scaled inside libjpeg; other formats are decoded at full
//! size by the `image` crate and resized afterwards.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use super::jpeg::decode_jpeg_scaled;
use super::resize::downsample;
use super::{DecodeError, FilterType, PixelBuffer};

/// Default read buffer for full decodes (5 MiB).
pub const DEFAULT_SCRATCH_BUFFER_BYTES: usize = 5 * 1024 * 1024;

/// Hints that keep full decodes memory-bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeHints {
    /// Size of the read buffer wrapped around the source file.
    pub scratch_buffer_bytes: usize,
    /// Filter used when the decode is subsampled.
    pub filter: FilterType,
}

impl Default for DecodeHints {
    fn default() -> Self {
        Self {
            scratch_buffer_bytes: DEFAULT_SCRATCH_BUFFER_BYTES,
            filter: FilterType::default(),
        }
    }
}

/// Decodes image files into RGB pixel buffers.
pub trait Decoder {
    /// Read intrinsic `(width, height)` without decoding pixel data.
    fn decode_bounds(&self, path: &Path) -> Result<(u32, u32), DecodeError>;

    /// Decode the file, dividing each dimension by `ratio`.
    fn decode_scaled(
        &self,
        path: &Path,
        ratio: u32,
        hints: &DecodeHints,
    ) -> Result<PixelBuffer, DecodeError>;
}

/// [`Decoder`] backed by the `image` crate, with mozjpeg for scaled JPEG decodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    fn open(
        path: &Path,
        capacity: usize,
    ) -> Result<ImageReader<impl BufRead + Seek>, DecodeError> {
        let file = File::open(path).map_err(|e| DecodeError::from_io(e, path))?;
        let reader = ImageReader::new(BufReader::with_capacity(capacity, file))
            .with_guessed_format()
            .map_err(|e| DecodeError::IoError(e.to_string()))?;

        if reader.format().is_none() {
            return Err(DecodeError::InvalidFormat);
        }
        Ok(reader)
    }
}

impl Decoder for ImageCrateDecoder {
    fn decode_bounds(&self, path: &Path) -> Result<(u32, u32), DecodeError> {
        // Header reads need only a small buffer
        Self::open(path, 8 * 1024)?
            .into_dimensions()
            .map_err(DecodeError::from_image)
    }

    fn decode_scaled(
        &self,
        path: &Path,
        ratio: u32,
        hints: &DecodeHints,
    ) -> Result<PixelBuffer, DecodeError> {
        let reader = Self::open(path, hints.scratch_buffer_bytes.max(8 * 1024))?;

        let rgb = if reader.format() == Some(ImageFormat::Jpeg) {
            decode_jpeg_scaled(reader.into_inner(), ratio, hints.filter)?
        } else {
            let img = reader.decode().map_err(DecodeError::from_image)?;
            downsample(img.into_rgb8(), ratio, hints.filter)
        };
        Ok(PixelBuffer::from_rgb_image(rgb))
    }
}
