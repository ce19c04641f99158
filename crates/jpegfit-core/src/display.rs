//! Display bounds used to cap decode resolution.
//!
//! A [`DisplayMetrics`] source reports the usable screen size, if it knows
//! one. [`DisplayBounds::resolve`] turns that report into concrete bounds,
//! falling back per axis to configured defaults when the query is
//! unavailable or reports a non-positive size.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default fallback width when no display can be queried.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 960;
/// Default fallback height when no display can be queried.
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 1280;

/// Usable display resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
        }
    }
}

impl DisplayBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Query `metrics` and fill any missing or non-positive axis from `fallback`.
    pub fn resolve(metrics: &dyn DisplayMetrics, fallback: DisplayBounds) -> DisplayBounds {
        let Some((width, height)) = metrics.query_bounds() else {
            debug!(
                fallback_width = fallback.width,
                fallback_height = fallback.height,
                "display bounds unavailable, using fallback"
            );
            return fallback;
        };

        let resolved = DisplayBounds {
            width: positive_axis(width).unwrap_or(fallback.width),
            height: positive_axis(height).unwrap_or(fallback.height),
        };
        if i64::from(resolved.width) != width || i64::from(resolved.height) != height {
            debug!(
                queried_width = width,
                queried_height = height,
                width = resolved.width,
                height = resolved.height,
                "display query returned unusable axis, substituted fallback"
            );
        }
        resolved
    }
}

fn positive_axis(value: i64) -> Option<u32> {
    if value <= 0 {
        return None;
    }
    u32::try_from(value).ok()
}

/// Source of the current display resolution.
pub trait DisplayMetrics {
    /// Report `(width, height)`, or `None` when it cannot be determined.
    ///
    /// Values are signed because platform queries can report zero or
    /// negative sizes for detached or virtual displays.
    fn query_bounds(&self) -> Option<(i64, i64)>;
}

/// A display with a known, fixed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDisplay {
    pub width: i64,
    pub height: i64,
}

impl FixedDisplay {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

impl DisplayMetrics for FixedDisplay {
    fn query_bounds(&self) -> Option<(i64, i64)> {
        Some((self.width, self.height))
    }
}

/// No display attached; every query is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay;

impl DisplayMetrics for HeadlessDisplay {
    fn query_bounds(&self) -> Option<(i64, i64)> {
        None
    }
}
