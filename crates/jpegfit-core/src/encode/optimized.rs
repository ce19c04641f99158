//! JPEG encoding through mozjpeg.
//!
//! mozjpeg speaks the libjpeg API, including `optimize_coding`, which builds
//! per-image Huffman tables instead of the standard ones. Its default profile
//! is progressive, and progressive scans always get optimized tables, so
//! turning optimization off also switches to the baseline profile.

use std::path::Path;

use mozjpeg::{ColorSpace, Compress};
use tracing::debug;

use super::{live_pixels, validate_input, write_output, EncodeError, Encoder};
use crate::decode::PixelBuffer;

/// Encode RGB pixel data with mozjpeg.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100)
/// * `optimize_huffman` - Compute image-specific Huffman tables
pub fn encode_jpeg_optimized(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    optimize_huffman: bool,
) -> Result<Vec<u8>, EncodeError> {
    validate_input(pixels, width, height, quality)?;

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    if !optimize_huffman {
        // Resets every parameter, so it must come first
        comp.set_fastest_defaults();
    }
    comp.set_size(width as usize, height as usize);
    comp.set_quality(f32::from(quality));
    comp.set_optimize_coding(optimize_huffman);

    // Rough guess: a tenth of the raw size
    let capacity = (pixels.len() / 10).max(4096);
    let mut writer = comp
        .start_compress(Vec::with_capacity(capacity))
        .map_err(|e| EncodeError::EncodingFailed(format!("mozjpeg: failed to start compress: {e}")))?;

    writer
        .write_scanlines(pixels)
        .map_err(|e| EncodeError::EncodingFailed(format!("mozjpeg: failed to write scanlines: {e}")))?;

    writer
        .finish()
        .map_err(|e| EncodeError::EncodingFailed(format!("mozjpeg: failed to finish: {e}")))
}

/// [`Encoder`] over [`encode_jpeg_optimized`]. The default encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MozJpegEncoder;

impl Encoder for MozJpegEncoder {
    fn encode(
        &self,
        buffer: &PixelBuffer,
        output: &Path,
        quality: u8,
        optimize_huffman: bool,
    ) -> Result<(), EncodeError> {
        let bytes = encode_jpeg_optimized(
            live_pixels(buffer)?,
            buffer.width(),
            buffer.height(),
            quality,
            optimize_huffman,
        )?;
        debug!(
            output = %output.display(),
            quality,
            optimize_huffman,
            bytes = bytes.len(),
            "encoded jpeg"
        );
        write_output(output, &bytes)
    }
}
