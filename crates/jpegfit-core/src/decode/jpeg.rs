//! JPEG decoding with DCT-domain scaling.
//!
//! libjpeg can scale by 1/2, 1/4 or 1/8 while decoding, so only the reduced
//! bitmap is ever allocated. Whatever is left of the integer ratio is
//! finished with an ordinary resize.

use std::io::BufRead;
use std::panic::{self, AssertUnwindSafe};

use mozjpeg::Decompress;
use tracing::debug;

use super::resize::{resize_to, subsampled_dimensions};
use super::{DecodeError, FilterType};

/// libjpeg expresses scaling as `numerator / 8`.
const DCT_SCALE_DENOMINATOR: u32 = 8;

/// Largest power-of-two divisor (1, 2, 4 or 8) not exceeding `ratio`.
pub fn dct_divisor(ratio: u32) -> u32 {
    let limit = ratio.clamp(1, DCT_SCALE_DENOMINATOR);
    let mut divisor = 1;
    while divisor * 2 <= limit {
        divisor *= 2;
    }
    divisor
}

/// Decode a JPEG stream at `floor(dim / ratio)` per axis.
///
/// # Errors
///
/// Returns [`DecodeError::CorruptedFile`] when libjpeg rejects the stream.
pub fn decode_jpeg_scaled<R: BufRead>(
    reader: R,
    ratio: u32,
    filter: FilterType,
) -> Result<image::RgbImage, DecodeError> {
    let divisor = dct_divisor(ratio);

    // libjpeg reports fatal errors by unwinding
    let decoded = panic::catch_unwind(AssertUnwindSafe(move || -> std::io::Result<_> {
        let mut decompress = Decompress::with_markers(&[]).from_reader(reader)?;
        let intrinsic = (decompress.width(), decompress.height());
        decompress.scale((DCT_SCALE_DENOMINATOR / divisor) as u8);

        let mut started = decompress.rgb()?;
        let scaled = (started.width(), started.height());
        let pixels: Vec<u8> = started.read_scanlines()?;
        started.finish()?;
        Ok((intrinsic, scaled, pixels))
    }))
    .map_err(|_| DecodeError::CorruptedFile("libjpeg aborted the decode".to_string()))?
    .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let ((width, height), (scaled_width, scaled_height), pixels) = decoded;
    let image = image::RgbImage::from_raw(
        to_u32(scaled_width)?,
        to_u32(scaled_height)?,
        pixels,
    )
    .ok_or_else(|| {
        DecodeError::CorruptedFile("scanlines do not match the output size".to_string())
    })?;

    let target = subsampled_dimensions(to_u32(width)?, to_u32(height)?, ratio);
    debug!(
        ratio,
        divisor,
        scaled_width,
        scaled_height,
        target_width = target.0,
        target_height = target.1,
        "DCT-scaled decode"
    );
    Ok(resize_to(image, target, filter))
}

fn to_u32(dim: usize) -> Result<u32, DecodeError> {
    u32::try_from(dim).map_err(|_| DecodeError::CorruptedFile(format!("dimension {dim} overflows")))
}
