//! Core types for image decoding.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The source file does not exist.
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoder refused to allocate the image.
    #[error("Image exceeds decoder limits: {0}")]
    LimitsExceeded(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),

    /// EXIF parsing error.
    #[error("EXIF error: {0}")]
    ExifError(String),
}

impl DecodeError {
    /// Map an I/O error on `path`, keeping "not found" distinct.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DecodeError::NotFound(path.to_path_buf())
        } else {
            DecodeError::IoError(err.to_string())
        }
    }

    /// Map an `image` crate error onto the decode categories.
    pub(crate) fn from_image(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(e) => DecodeError::LimitsExceeded(e.to_string()),
            image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
            image::ImageError::IoError(e) => DecodeError::IoError(e.to_string()),
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}

/// Filter type used when a decode is subsampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// The pixel rotation that makes an image with this tag upright.
    ///
    /// Only the three pure rotations are corrected. Mirrored variants
    /// (flips, transpose, transverse) map to [`Rotation::None`].
    pub fn rotation(self) -> Rotation {
        match self {
            Orientation::Rotate90CW => Rotation::Cw90,
            Orientation::Rotate180 => Rotation::Cw180,
            Orientation::Rotate270CW => Rotation::Cw270,
            _ => Rotation::None,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Clockwise rotation applied to decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Rotation angle in degrees: one of 0, 90, 180, 270.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// Rotate an RGB image, returning a new image.
    pub fn apply(self, img: &image::RgbImage) -> image::RgbImage {
        match self {
            Rotation::None => img.clone(),
            Rotation::Cw90 => image::imageops::rotate90(img),
            Rotation::Cw180 => image::imageops::rotate180(img),
            Rotation::Cw270 => image::imageops::rotate270(img),
        }
    }
}

/// A decoded RGB pixel buffer with an explicit release lifecycle.
///
/// The buffer is owned by whoever decoded it. [`PixelBuffer::recycle`] frees
/// the pixel memory early; after that the pixels are no longer readable.
/// Dropping the buffer releases it as well.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pixels: Vec<u8>,
    recycled: bool,
}

impl PixelBuffer {
    /// Create a new PixelBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            recycled: false,
        }
    }

    /// Create a PixelBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel data, or `None` once the buffer has been recycled.
    pub fn pixels(&self) -> Option<&[u8]> {
        if self.recycled {
            None
        } else {
            Some(&self.pixels)
        }
    }

    /// Copy into an image::RgbImage. `None` if recycled.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        let pixels = self.pixels()?;
        image::RgbImage::from_raw(self.width, self.height, pixels.to_vec())
    }

    /// Consume the buffer into an image::RgbImage without copying.
    pub fn into_rgb_image(self) -> Option<image::RgbImage> {
        if self.recycled {
            return None;
        }
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Get the size of the live pixel data in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_recycled(&self) -> bool {
        self.recycled
    }

    /// Release the pixel memory. Safe to call more than once.
    pub fn recycle(&mut self) {
        self.pixels = Vec::new();
        self.recycled = true;
    }
}
