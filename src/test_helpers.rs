//! Shared test utilities for the inline-gal test suite.
//!
//! Provides real-JPEG fixture builders (tiny images generated in memory via
//! the `image` crate) and HTML shells for splice tests. Tests that need a
//! source directory write generated JPEGs into a `tempfile::TempDir`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_jpeg(tmp.path(), "a.jpg", 64, 64);
//! let html_path = tmp.path().join("index.html");
//! std::fs::write(&html_path, page_html()).unwrap();
//! ```

use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use std::path::{Path, PathBuf};

// =========================================================================
// JPEG fixtures
// =========================================================================

/// Encode a gradient RGB image of the given dimensions as JPEG bytes.
///
/// The gradient keeps the encoder honest: a solid color compresses to
/// almost nothing and would make size assertions meaningless.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 255) / width.max(1)) as u8,
            ((y * 255) / height.max(1)) as u8,
            128,
        ])
    });
    let mut buffer = std::io::Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .write_image(
            img.as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    buffer.into_inner()
}

/// Write a generated JPEG into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}

// =========================================================================
// HTML fixtures
// =========================================================================

/// A minimal HTML page with a `<head>` section and no marker block.
pub fn page_html() -> String {
    concat!(
        "<!DOCTYPE html>\n",
        "<html>\n",
        "  <head>\n",
        "    <meta charset=\"utf-8\">\n",
        "    <title>Gallery</title>\n",
        "  </head>\n",
        "  <body>\n",
        "    <div id=\"app\"></div>\n",
        "  </body>\n",
        "</html>\n",
    )
    .to_string()
}

/// An HTML fragment with no `</head>` anchor at all.
pub fn headless_html() -> String {
    "<html><body>no head here</body></html>".to_string()
}
