//! Image decoding pipeline for jpegfit.
//!
//! This module provides functionality for:
//! - Planning an integer subsampling ratio from intrinsic size and display bounds
//! - Decoding files through a pluggable [`Decoder`]
//! - Reading EXIF orientation and rotating pixels upright
//! - Composing the above in [`ImageLoader`]
//!
//! # Memory Strategy
//!
//! Decoding is two-phase: a header-only probe yields the intrinsic size, then
//! the full decode runs at the planned ratio so a large photo never lands in
//! memory at full resolution when the display cannot show it. For JPEG the
//! ratio is applied in the DCT domain (1/2, 1/4, 1/8) before any bitmap is
//! allocated.
//!
//! # Examples
//!
//! ```ignore
//! use jpegfit_core::decode::ImageLoader;
//! use jpegfit_core::display::DisplayBounds;
//!
//! let loader = ImageLoader::default();
//! let buffer = loader.load("photo.jpg".as_ref(), DisplayBounds::default()).unwrap();
//! println!("Loaded {}x{} image", buffer.width(), buffer.height());
//! ```

mod jpeg;
mod loader;
mod orientation;
mod planner;
mod resize;
mod source;
mod types;

pub use jpeg::{dct_divisor, decode_jpeg_scaled};
pub use loader::ImageLoader;
pub use orientation::{resolve_rotation, rotation_degrees, ExifMetadataReader, MetadataReader};
pub use planner::subsample_ratio;
pub use resize::{downsample, resize_to, subsampled_dimensions};
pub use source::{DecodeHints, Decoder, ImageCrateDecoder, DEFAULT_SCRATCH_BUFFER_BYTES};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer, Rotation};
