//! Fixture generation shared by integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Deterministic xorshift generator so fixtures are reproducible.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u8(&mut self) -> u8 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 24) as u8
    }
}

/// Smooth gradient with per-pixel noise, loosely photo-like.
pub fn textured_pixels(width: u32, height: u32, seed: u64) -> Vec<u8> {
    let mut rng = Rng::new(seed);
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let base = [
                (x * 200 / width.max(1)) as i32,
                (y * 200 / height.max(1)) as i32,
                ((x + y) * 100 / (width + height).max(1)) as i32 + 60,
            ];
            for channel in base {
                let noise = i32::from(rng.next_u8() % 81) - 40;
                pixels.push((channel + noise).clamp(0, 255) as u8);
            }
        }
    }
    pixels
}

pub fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(128);
        }
    }
    pixels
}

pub fn jpeg_bytes(pixels: &[u8], width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Insert an EXIF APP1 segment carrying `orientation` right after SOI.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    let [hi, lo] = orientation.to_be_bytes();
    let app1: [u8; 36] = [
        0xFF, 0xE1, 0x00, 0x22, // APP1, length 34
        b'E', b'x', b'i', b'f', 0x00, 0x00, // Exif header
        b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // TIFF header, IFD0 at 8
        0x00, 0x01, // one entry
        0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, hi, lo, 0x00, 0x00, // Orientation SHORT
        0x00, 0x00, 0x00, 0x00, // no next IFD
    ];

    let mut out = Vec::with_capacity(jpeg.len() + app1.len());
    out.extend_from_slice(&jpeg[0..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Stream a large JPEG to disk band by band, never holding the full bitmap.
pub fn write_large_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    const BAND_ROWS: u32 = 64;

    let path = dir.join(name);
    let file = std::io::BufWriter::new(std::fs::File::create(&path).unwrap());

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_fastest_defaults();
    comp.set_size(width as usize, height as usize);
    comp.set_quality(50.0);
    let mut writer = comp.start_compress(file).unwrap();

    let band = gradient_pixels(width, BAND_ROWS);
    let row_bytes = width as usize * 3;
    let mut written = 0;
    while written < height {
        let rows = BAND_ROWS.min(height - written);
        writer
            .write_scanlines(&band[..rows as usize * row_bytes])
            .unwrap();
        written += rows;
    }
    writer.finish().unwrap().flush().unwrap();
    path
}

pub fn size_kb(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len() / 1024
}

/// Install a test subscriber once; honours RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
