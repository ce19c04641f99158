//! Subsampling ratio planning.
//!
//! Before a full decode we pick an integer divisor so the decoded buffer
//! stays near the display resolution. Only the dominant axis is compared
//! against the matching display bound, and the divisor is floored, so the
//! result may still be somewhat larger than the display.

use crate::display::DisplayBounds;

/// Compute the subsampling divisor for an image of `width` x `height`.
///
/// * Landscape (`width > height`) compares `width` to `bounds.width`.
/// * Portrait (`height > width`) compares `height` to `bounds.height`.
/// * Square images and images within bounds decode at full size.
///
/// The result is always at least 1.
pub fn subsample_ratio(width: u32, height: u32, bounds: DisplayBounds) -> u32 {
    let ratio = if width > height && width > bounds.width {
        width.checked_div(bounds.width).unwrap_or(1)
    } else if height > width && height > bounds.height {
        height.checked_div(bounds.height).unwrap_or(1)
    } else {
        1
    };
    ratio.max(1)
}
