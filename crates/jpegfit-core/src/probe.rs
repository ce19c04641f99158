//! File size probing.
//!
//! Sizes are re-read from storage on every call; nothing is cached.

use std::path::Path;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to stat {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// File-system primitives needed for size probing.
pub trait FileStat {
    fn exists(&self, path: &Path) -> bool;
    fn size_bytes(&self, path: &Path) -> std::io::Result<u64>;
    fn create_empty(&self, path: &Path) -> std::io::Result<()>;
}

/// [`FileStat`] over `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStat;

impl FileStat for LocalFileStat {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn size_bytes(&self, path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn create_empty(&self, path: &Path) -> std::io::Result<()> {
        std::fs::File::create(path).map(|_| ())
    }
}

/// Result of a size probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeReading {
    NotFound,
    Bytes(u64),
}

impl SizeReading {
    /// Whole kilobytes (1024 bytes, rounded down). `None` if not found.
    pub fn kilobytes(self) -> Option<u64> {
        match self {
            SizeReading::NotFound => None,
            SizeReading::Bytes(bytes) => Some(bytes / 1024),
        }
    }
}

/// Measures file sizes through a [`FileStat`].
pub struct SizeProbe {
    stat: Box<dyn FileStat>,
    create_missing_placeholder: bool,
}

impl Default for SizeProbe {
    fn default() -> Self {
        Self::new(LocalFileStat, false)
    }
}

impl SizeProbe {
    /// With `create_missing_placeholder`, probing a missing file also
    /// creates it empty. The reading is still [`SizeReading::NotFound`].
    pub fn new(stat: impl FileStat + 'static, create_missing_placeholder: bool) -> Self {
        Self {
            stat: Box::new(stat),
            create_missing_placeholder,
        }
    }

    pub fn measure(&self, path: &Path) -> Result<SizeReading, ProbeError> {
        if !self.stat.exists(path) {
            if self.create_missing_placeholder {
                warn!(path = %path.display(), "creating empty placeholder for missing file");
                self.stat.create_empty(path).map_err(|source| io_error(path, source))?;
            }
            return Ok(SizeReading::NotFound);
        }

        self.stat
            .size_bytes(path)
            .map(SizeReading::Bytes)
            .map_err(|source| io_error(path, source))
    }

    /// Size in whole kilobytes; a missing file reads as 0.
    pub fn measure_kb(&self, path: &Path) -> Result<u64, ProbeError> {
        Ok(self.measure(path)?.kilobytes().unwrap_or(0))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ProbeError {
    ProbeError::Io {
        path: path.display().to_string(),
        source,
    }
}
