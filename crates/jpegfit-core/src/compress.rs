//! Compression driver.
//!
//! [`Compressor`] loads a source image once, then either encodes it at a
//! fixed quality ([`Compressor::compress`]) or searches downward from the
//! initial quality until the output fits a size budget
//! ([`Compressor::compress_to_target_size`]).
//!
//! # Quality search
//!
//! The search starts from the *source* file's size. While the last measured
//! size is over the target it encodes at the current quality, re-reads the
//! output size and steps the quality down. It never encodes below
//! `min_quality`. If the source is already within the target nothing is
//! encoded and no output is written.
//!
//! The pixel buffer is released on every exit path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, CompressorConfig};
use crate::decode::{DecodeError, Decoder, ImageLoader, MetadataReader, PixelBuffer};
use crate::display::{DisplayBounds, DisplayMetrics, HeadlessDisplay};
use crate::encode::{EncodeError, Encoder, MozJpegEncoder};
use crate::probe::{FileStat, LocalFileStat, ProbeError, SizeProbe, SizeReading};
use crate::{CompressionRequest, CompressionTarget};

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode output image: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to measure file size: {0}")]
    Probe(#[from] ProbeError),

    #[error("Encoder reported success but {} does not exist", .0.display())]
    OutputMissing(PathBuf),
}

/// How a size-targeted compression ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The output fits the target.
    Compressed {
        quality: u8,
        size_kb: u64,
        attempts: u32,
    },
    /// The source already fit; nothing was encoded or written.
    AlreadyWithinTarget { size_kb: u64 },
    /// Even the lowest allowed quality was over the target. The output
    /// holds the last (smallest) attempt.
    TargetUnreachable {
        last_quality: u8,
        size_kb: u64,
        attempts: u32,
    },
}

impl CompressionOutcome {
    /// True only when a fitting output was written.
    ///
    /// [`AlreadyWithinTarget`](Self::AlreadyWithinTarget) reports `false`,
    /// matching callers that treat "no compression happened" as failure.
    pub fn succeeded(&self) -> bool {
        matches!(self, CompressionOutcome::Compressed { .. })
    }
}

/// Re-encodes images to a fixed quality or a size budget.
///
/// All collaborators are injected; [`Compressor::new`] wires the real ones:
/// the `image` decoder, EXIF reader, mozjpeg encoder, local file system and
/// a headless display.
pub struct Compressor {
    config: CompressorConfig,
    loader: ImageLoader,
    encoder: Box<dyn Encoder>,
    probe: SizeProbe,
    display: Box<dyn DisplayMetrics>,
}

impl Compressor {
    pub fn new(config: CompressorConfig) -> Result<Self, CompressError> {
        config.validate()?;
        let loader = ImageLoader::new(
            crate::decode::ImageCrateDecoder,
            crate::decode::ExifMetadataReader,
            config.decode_hints(),
        );
        let probe = SizeProbe::new(LocalFileStat, config.create_missing_placeholder);
        Ok(Self {
            config,
            loader,
            encoder: Box::new(MozJpegEncoder),
            probe,
            display: Box::new(HeadlessDisplay),
        })
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.loader.set_decoder(decoder);
        self
    }

    pub fn with_metadata_reader(mut self, metadata: impl MetadataReader + 'static) -> Self {
        self.loader.set_metadata_reader(metadata);
        self
    }

    pub fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn with_file_stat(mut self, stat: impl FileStat + 'static) -> Self {
        self.probe = SizeProbe::new(stat, self.config.create_missing_placeholder);
        self
    }

    pub fn with_display(mut self, display: impl DisplayMetrics + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Current display bounds, with configured fallbacks applied.
    pub fn display_bounds(&self) -> DisplayBounds {
        DisplayBounds::resolve(self.display.as_ref(), self.config.fallback_display)
    }

    /// Run a [`CompressionRequest`].
    ///
    /// A fixed-quality request that succeeds reports
    /// [`CompressionOutcome::Compressed`] with the written size and one attempt.
    pub fn execute(&self, request: &CompressionRequest) -> Result<CompressionOutcome, CompressError> {
        match request.target {
            CompressionTarget::Quality(quality) => {
                self.compress(&request.source, &request.output, quality)?;
                let size_kb = match self.probe.measure(&request.output)? {
                    SizeReading::Bytes(bytes) => bytes / 1024,
                    SizeReading::NotFound => {
                        return Err(CompressError::OutputMissing(request.output.clone()))
                    }
                };
                Ok(CompressionOutcome::Compressed {
                    quality,
                    size_kb,
                    attempts: 1,
                })
            }
            CompressionTarget::MaxSizeKb(target_kb) => {
                self.compress_to_target_size(&request.source, &request.output, target_kb)
            }
        }
    }

    /// Encode `source` once at `quality` and write it to `output`.
    ///
    /// # Errors
    ///
    /// A decode failure (nothing is written) or an encode failure (an
    /// existing `output` is left as it was).
    pub fn compress(&self, source: &Path, output: &Path, quality: u8) -> Result<(), CompressError> {
        let mut buffer = self.loader.load(source, self.display_bounds())?;

        let result = self
            .encoder
            .encode(&buffer, output, quality, self.config.optimize_huffman);
        release(&mut buffer);

        match result {
            Ok(()) => {
                info!(source = %source.display(), output = %output.display(), quality, "compressed");
                Ok(())
            }
            Err(e) => {
                warn!(output = %output.display(), quality, error = %e, "encode failed");
                Err(e.into())
            }
        }
    }

    /// Re-encode `source` at falling quality until `output` is at most
    /// `target_kb` kilobytes.
    ///
    /// # Errors
    ///
    /// A decode failure, an encode failure (the search stops there and the
    /// last good write stays on disk), or a failed size probe.
    pub fn compress_to_target_size(
        &self,
        source: &Path,
        output: &Path,
        target_kb: u64,
    ) -> Result<CompressionOutcome, CompressError> {
        let mut buffer = self.loader.load(source, self.display_bounds())?;
        let result = self.search_quality(&buffer, source, output, target_kb);
        release(&mut buffer);

        if let Ok(outcome) = &result {
            info!(
                source = %source.display(),
                output = %output.display(),
                target_kb,
                ?outcome,
                "size-targeted compression finished"
            );
        }
        result
    }

    fn search_quality(
        &self,
        buffer: &PixelBuffer,
        source: &Path,
        output: &Path,
        target_kb: u64,
    ) -> Result<CompressionOutcome, CompressError> {
        let mut size_kb = self.probe.measure_kb(source)?;
        if size_kb <= target_kb {
            return Ok(CompressionOutcome::AlreadyWithinTarget { size_kb });
        }

        let min_quality = i32::from(self.config.min_quality);
        let step = i32::from(self.config.quality_step);
        let mut quality = i32::from(self.config.initial_quality);
        let mut last_quality = self.config.initial_quality;
        let mut attempts = 0u32;

        while size_kb > target_kb {
            let Some(q) = u8::try_from(quality).ok().filter(|_| quality >= min_quality) else {
                return Ok(CompressionOutcome::TargetUnreachable {
                    last_quality,
                    size_kb,
                    attempts,
                });
            };

            attempts += 1;
            if let Err(e) = self
                .encoder
                .encode(buffer, output, q, self.config.optimize_huffman)
            {
                warn!(quality = q, attempts, error = %e, "encode failed, stopping search");
                return Err(e.into());
            }

            size_kb = match self.probe.measure(output)? {
                SizeReading::Bytes(bytes) => bytes / 1024,
                SizeReading::NotFound => return Err(CompressError::OutputMissing(output.to_path_buf())),
            };
            debug!(quality = q, size_kb, target_kb, attempts, "encode attempt");

            last_quality = q;
            quality -= step;
        }

        Ok(CompressionOutcome::Compressed {
            quality: last_quality,
            size_kb,
            attempts,
        })
    }
}

/// Release the buffer unless something already did.
fn release(buffer: &mut PixelBuffer) {
    if !buffer.is_recycled() {
        buffer.recycle();
    }
}
