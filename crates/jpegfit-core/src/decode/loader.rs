//! Two-phase, display-bounded image loading.

use std::path::Path;

use tracing::debug;

use super::orientation::{resolve_rotation, ExifMetadataReader, MetadataReader};
use super::planner::subsample_ratio;
use super::source::{DecodeHints, Decoder, ImageCrateDecoder};
use super::{DecodeError, PixelBuffer, Rotation};
use crate::display::DisplayBounds;

/// Loads an upright, subsampled pixel buffer from a file.
///
/// 1. Read intrinsic dimensions from the header.
/// 2. Decode with the subsampling ratio those dimensions call for.
/// 3. Rotate the pixels according to the orientation tag.
pub struct ImageLoader {
    decoder: Box<dyn Decoder>,
    metadata: Box<dyn MetadataReader>,
    hints: DecodeHints,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(ImageCrateDecoder, ExifMetadataReader, DecodeHints::default())
    }
}

impl ImageLoader {
    pub fn new(
        decoder: impl Decoder + 'static,
        metadata: impl MetadataReader + 'static,
        hints: DecodeHints,
    ) -> Self {
        Self {
            decoder: Box::new(decoder),
            metadata: Box::new(metadata),
            hints,
        }
    }

    pub fn set_decoder(&mut self, decoder: impl Decoder + 'static) {
        self.decoder = Box::new(decoder);
    }

    pub fn set_metadata_reader(&mut self, metadata: impl MetadataReader + 'static) {
        self.metadata = Box::new(metadata);
    }

    pub fn hints(&self) -> &DecodeHints {
        &self.hints
    }

    /// Load `path` with its dominant axis capped near `bounds`.
    ///
    /// # Errors
    ///
    /// Any decode failure. Orientation read failures are not errors.
    pub fn load(&self, path: &Path, bounds: DisplayBounds) -> Result<PixelBuffer, DecodeError> {
        let (width, height) = self.decoder.decode_bounds(path)?;
        let ratio = subsample_ratio(width, height, bounds);
        debug!(
            path = %path.display(),
            width,
            height,
            bounds_width = bounds.width,
            bounds_height = bounds.height,
            ratio,
            "planned decode"
        );

        let buffer = self.decoder.decode_scaled(path, ratio, &self.hints)?;

        let rotation = resolve_rotation(self.metadata.as_ref(), path);
        if rotation == Rotation::None {
            return Ok(buffer);
        }
        debug!(degrees = rotation.degrees(), "rotating decoded buffer upright");
        rotate_buffer(buffer, rotation)
    }
}

/// Replace `buffer` with a rotated copy; the original is dropped.
fn rotate_buffer(buffer: PixelBuffer, rotation: Rotation) -> Result<PixelBuffer, DecodeError> {
    let img = buffer.into_rgb_image().ok_or_else(|| {
        DecodeError::CorruptedFile("decoded buffer does not match its dimensions".to_string())
    })?;
    Ok(PixelBuffer::from_rgb_image(rotation.apply(&img)))
}
