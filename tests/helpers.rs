// Shared test helpers for fixture artifacts and QR images.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use tempfile::TempDir;

/// Directory holding the fixture scoring artifacts.
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models")
}

/// Copies every fixture artifact into a fresh temporary directory so a test
/// can break one of them.
#[allow(dead_code)] // Used by other test files
pub fn copy_fixtures() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for entry in std::fs::read_dir(fixture_dir()).expect("Fixture dir should exist") {
        let entry = entry.expect("Readable dir entry");
        std::fs::copy(entry.path(), dir.path().join(entry.file_name()))
            .expect("Failed to copy fixture");
    }
    dir
}

/// Overwrites one artifact in `dir`.
#[allow(dead_code)] // Used by other test files
pub fn write_artifact(dir: &Path, file: &str, contents: &str) {
    std::fs::write(dir.join(file), contents).expect("Failed to write artifact");
}

/// Renders `payload` as a QR code PNG with a quiet zone.
#[allow(dead_code)] // Used by other test files
pub fn qr_png(payload: &str) -> Vec<u8> {
    const MODULE_PX: u32 = 8;
    const QUIET_ZONE: u32 = 4;

    let code = QrCode::new(payload.as_bytes()).expect("Payload should fit in a QR code");
    let modules = code.width() as u32;
    let side = (modules + 2 * QUIET_ZONE) * MODULE_PX;
    let mut image = GrayImage::from_pixel(side, side, Luma([255]));
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let x0 = (i as u32 % modules + QUIET_ZONE) * MODULE_PX;
        let y0 = (i as u32 / modules + QUIET_ZONE) * MODULE_PX;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                image.put_pixel(x0 + dx, y0 + dy, Luma([0]));
            }
        }
    }
    encode_png(image)
}

/// A white PNG with nothing on it.
#[allow(dead_code)] // Used by other test files
pub fn blank_png() -> Vec<u8> {
    encode_png(GrayImage::from_pixel(160, 160, Luma([255])))
}

fn encode_png(image: GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}
