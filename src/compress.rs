//! JPEG recompression with a startup-resolved strategy.
//!
//! The batch never probes for capabilities per file. A [`CompressionStrategy`]
//! is resolved once from config and threaded through every call:
//!
//! | Strategy | Resampling | Meaning |
//! |----------|------------|---------|
//! | `HighQuality` | Lanczos3 | best quality, slowest |
//! | `Fast` | Triangle | faster, slightly softer |
//! | `Passthrough` | none | original bytes, untouched |
//!
//! Recompression scales images wider than the configured bound down to it
//! (aspect ratio preserved, never enlarging) and re-encodes as RGB JPEG at
//! the configured quality. A file that fails to decode or encode is not an
//! error: the original bytes are kept and the failure travels back as a
//! fallback note for reporting.

use crate::config::{BackendChoice, ToolConfig};
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, RgbImage};
use std::io::Cursor;
use thiserror::Error;

/// How the batch recompresses each file. Resolved once, never re-probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionStrategy {
    /// Lanczos3 resampling.
    HighQuality,
    /// Triangle resampling.
    Fast,
    /// No recompression at all.
    Passthrough,
}

impl CompressionStrategy {
    /// Resolve the strategy from the configured choice.
    ///
    /// The JPEG codec is compiled into the binary, so `auto` always lands
    /// on the high-quality path; `fast` and `none` are explicit opt-ins.
    pub fn resolve(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto | BackendChoice::High => Self::HighQuality,
            BackendChoice::Fast => Self::Fast,
            BackendChoice::None => Self::Passthrough,
        }
    }

    /// Human-readable name for the startup banner.
    pub fn label(self) -> &'static str {
        match self {
            Self::HighQuality => "high quality (Lanczos3)",
            Self::Fast => "fast (triangle)",
            Self::Passthrough => "passthrough (no recompression)",
        }
    }

    fn filter(self) -> Option<FilterType> {
        match self {
            Self::HighQuality => Some(FilterType::Lanczos3),
            Self::Fast => Some(FilterType::Triangle),
            Self::Passthrough => None,
        }
    }
}

/// Resize bound and encode quality for the batch.
#[derive(Debug, Clone, Copy)]
pub struct CompressParams {
    /// Images wider than this are scaled down to it.
    pub max_width: u32,
    /// JPEG re-encode quality (1-100).
    pub quality: u8,
}

impl CompressParams {
    /// Build params from tool config values.
    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            max_width: config.images.max_width,
            quality: config.images.quality,
        }
    }
}

impl Default for CompressParams {
    fn default() -> Self {
        Self::from_config(&ToolConfig::default())
    }
}

/// Result of compressing one file. Never a failure: the worst case is the
/// original bytes with a note about why recompression was skipped.
#[derive(Debug)]
pub struct CompressOutcome {
    /// Bytes to embed (recompressed, or the unmodified original).
    pub bytes: Vec<u8>,
    /// Set when recompression failed and the original bytes were kept.
    pub fallback: Option<String>,
}

#[derive(Error, Debug)]
enum CompressError {
    #[error("decode failed: {0}")]
    Decode(image::ImageError),
    #[error("encode failed: {0}")]
    Encode(image::ImageError),
}

/// Compress a single file's bytes under the given strategy.
///
/// Passthrough returns the input unchanged. The other strategies decode,
/// scale down to the width bound if needed, and re-encode; on any failure
/// the original bytes are returned with a fallback note.
pub fn compress(
    strategy: CompressionStrategy,
    params: CompressParams,
    original: Vec<u8>,
) -> CompressOutcome {
    let Some(filter) = strategy.filter() else {
        return CompressOutcome {
            bytes: original,
            fallback: None,
        };
    };
    match recompress(&original, params, filter) {
        Ok(bytes) => CompressOutcome {
            bytes,
            fallback: None,
        },
        Err(e) => CompressOutcome {
            bytes: original,
            fallback: Some(e.to_string()),
        },
    }
}

fn recompress(
    bytes: &[u8],
    params: CompressParams,
    filter: FilterType,
) -> Result<Vec<u8>, CompressError> {
    let decoded = image::load_from_memory(bytes).map_err(CompressError::Decode)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let (target_w, target_h) = fit_width(width, height, params.max_width);

    let rgb = if (target_w, target_h) != (width, height) {
        image::imageops::resize(&rgb, target_w, target_h, filter)
    } else {
        rgb
    };

    encode_jpeg(&rgb, params.quality)
}

/// Calculate target dimensions for the width bound, preserving aspect ratio.
///
/// Images at or below the bound keep their dimensions. The bound applies to
/// width only: a tall image whose width already fits is left alone.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let ratio = height as f64 / width as f64;
    let new_height = ((max_width as f64 * ratio).round() as u32).max(1);
    (max_width, new_height)
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, CompressError> {
    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(CompressError::Encode)?;
    Ok(buffer.into_inner())
}
