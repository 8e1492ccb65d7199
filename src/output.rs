//! CLI output formatting for the embed pipeline.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every image is its mapping key — the identity it will have inside the
//! generated script block — with the source filename and byte sizes shown as
//! indented context lines. This makes the output readable as an inventory of
//! what ends up in the page while still letting users trace entries back to
//! files.
//!
//! # Output Format
//!
//! ## Embed
//!
//! ```text
//! Found 3 JPEG images
//! 001/003 atrium
//!     Source: atrium.jpg (245.32 KB)
//!     Embedded: 89.17 KB (63.7% smaller)
//! 002/003 broken
//!     Source: broken.jpg (12.40 KB)
//!     Read failed: No such file or directory (skipped)
//! 003/003 facade
//!     Source: facade.jpeg (180.01 KB)
//!     Compression failed: decode failed: invalid JPEG
//!     Embedded: 180.01 KB
//!
//! Embedded 2 images (359.04 KB of data URIs)
//! Skipped 1 image
//! ```
//!
//! ## Check
//!
//! ```text
//! Images
//! 001 atrium
//!     Source: atrium.jpg (245.32 KB)
//! 002 facade
//!     Source: facade.jpeg (180.01 KB)
//!
//! Total: 2 images, 425.33 KB
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::compress::CompressionStrategy;
use crate::embed::{EmbedEvent, EmbedReport};
use crate::scan::SourceImage;
use crate::splice::SpliceOutcome;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a byte count as kilobytes with two decimals.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Format the size reduction from `original` to `compressed` as a percentage.
///
/// Returns `None` when there is no reduction to report (grew, stayed equal,
/// or the original was empty).
pub fn format_reduction(original: u64, compressed: u64) -> Option<String> {
    if original == 0 || compressed >= original {
        return None;
    }
    let percent = (1.0 - compressed as f64 / original as f64) * 100.0;
    Some(format!("{percent:.1}%"))
}

// ============================================================================
// Embed progress output
// ============================================================================

/// Format a single embed progress event as display lines.
///
/// Each image leads with its batch position and mapping key; source file,
/// sizes, and failure notes follow as indented context.
pub fn format_embed_event(event: &EmbedEvent) -> Vec<String> {
    match event {
        EmbedEvent::Scanned { total } => {
            vec![format!("Found {total} JPEG images")]
        }
        EmbedEvent::ImageEmbedded {
            index,
            total,
            key,
            filename,
            original_bytes,
            embedded_bytes,
            fallback,
        } => {
            let mut lines = vec![
                position_header(*index, *total, key),
                format!("    Source: {} ({})", filename, format_kb(*original_bytes)),
            ];
            if let Some(note) = fallback {
                lines.push(format!("    Compression failed: {note}"));
            }
            let embedded = format_kb(*embedded_bytes as u64);
            match format_reduction(*original_bytes, *embedded_bytes as u64) {
                Some(reduction) => {
                    lines.push(format!("    Embedded: {embedded} ({reduction} smaller)"))
                }
                None => lines.push(format!("    Embedded: {embedded}")),
            }
            lines
        }
        EmbedEvent::ReadFailed {
            index,
            total,
            key,
            filename,
            error,
        } => {
            vec![
                position_header(*index, *total, key),
                format!("    Source: {filename}"),
                format!("    Read failed: {error} (skipped)"),
            ]
        }
        EmbedEvent::EmptyOutput {
            index,
            total,
            key,
            filename,
        } => {
            vec![
                position_header(*index, *total, key),
                format!("    Source: {filename}"),
                "    Compressed to zero bytes (skipped)".to_string(),
            ]
        }
        EmbedEvent::KeyShadowed { key, shadowed, .. } => {
            vec![format!("    Replaces {shadowed} (same key \"{key}\")")]
        }
    }
}

fn position_header(index: usize, total: usize, key: &str) -> String {
    format!("{}/{} {}", format_index(index), format_index(total), key)
}

/// Format the end-of-batch summary.
pub fn format_embed_summary(report: &EmbedReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Embedded {} images ({} of data URIs)",
        report.embedded,
        format_kb(report.data_bytes as u64)
    )];
    if report.skipped > 0 {
        lines.push(format!("Skipped {} images", report.skipped));
    }
    if report.shadowed > 0 {
        lines.push(format!(
            "{} images replaced by a later file with the same key",
            report.shadowed
        ));
    }
    if report.fallbacks > 0 {
        lines.push(format!(
            "{} images embedded with original bytes (compression failed)",
            report.fallbacks
        ));
    }
    lines
}

/// One line describing how the HTML file was updated.
pub fn format_splice_outcome(outcome: SpliceOutcome, html_path: &Path) -> String {
    match outcome {
        SpliceOutcome::Replaced => {
            format!("Replaced image data block in {}", html_path.display())
        }
        SpliceOutcome::Inserted => {
            format!("Inserted image data block into {}", html_path.display())
        }
    }
}

/// One line naming the active compression strategy.
pub fn format_strategy_banner(strategy: CompressionStrategy) -> String {
    format!("Compression: {}", strategy.label())
}

/// Print progress for one embed event to stdout.
pub fn print_embed_event(event: &EmbedEvent) {
    for line in format_embed_event(event) {
        println!("{}", line);
    }
}

/// Print the end-of-batch summary to stdout.
pub fn print_embed_summary(report: &EmbedReport) {
    for line in format_embed_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format check output: the images a run would embed, with sizes.
pub fn format_check_output(images: &[SourceImage]) -> Vec<String> {
    let mut lines = vec!["Images".to_string()];

    for (i, image) in images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), image.key));
        lines.push(format!(
            "    Source: {} ({})",
            image.filename,
            format_kb(image.bytes)
        ));
    }

    let total_bytes: u64 = images.iter().map(|img| img.bytes).sum();
    lines.push(String::new());
    lines.push(format!(
        "Total: {} images, {}",
        images.len(),
        format_kb(total_bytes)
    ));

    lines
}

/// Print check output to stdout.
pub fn print_check_output(images: &[SourceImage]) {
    for line in format_check_output(images) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_single_digit() {
        assert_eq!(format_index(1), "001");
    }

    #[test]
    fn format_index_triple_digit() {
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn format_kb_two_decimals() {
        assert_eq!(format_kb(251_208), "245.32 KB");
    }

    #[test]
    fn format_kb_zero() {
        assert_eq!(format_kb(0), "0.00 KB");
    }

    #[test]
    fn reduction_one_decimal() {
        assert_eq!(format_reduction(1000, 363).as_deref(), Some("63.7%"));
    }

    #[test]
    fn reduction_none_when_grown() {
        assert_eq!(format_reduction(1000, 1200), None);
    }

    #[test]
    fn reduction_none_when_equal() {
        assert_eq!(format_reduction(1000, 1000), None);
    }

    #[test]
    fn reduction_none_for_empty_original() {
        assert_eq!(format_reduction(0, 0), None);
    }

    // =========================================================================
    // Embed event formatting tests
    // =========================================================================

    #[test]
    fn format_scanned_event() {
        let lines = format_embed_event(&EmbedEvent::Scanned { total: 3 });
        assert_eq!(lines, vec!["Found 3 JPEG images"]);
    }

    #[test]
    fn format_embedded_image() {
        let event = EmbedEvent::ImageEmbedded {
            index: 1,
            total: 3,
            key: "atrium".to_string(),
            filename: "atrium.jpg".to_string(),
            original_bytes: 251_208,
            embedded_bytes: 91_310,
            fallback: None,
        };
        let lines = format_embed_event(&event);
        assert_eq!(lines[0], "001/003 atrium");
        assert_eq!(lines[1], "    Source: atrium.jpg (245.32 KB)");
        assert_eq!(lines[2], "    Embedded: 89.17 KB (63.7% smaller)");
    }

    #[test]
    fn format_embedded_with_fallback() {
        let event = EmbedEvent::ImageEmbedded {
            index: 2,
            total: 3,
            key: "facade".to_string(),
            filename: "facade.jpeg".to_string(),
            original_bytes: 1024,
            embedded_bytes: 1024,
            fallback: Some("decode failed: bad header".to_string()),
        };
        let lines = format_embed_event(&event);
        assert_eq!(lines[0], "002/003 facade");
        assert_eq!(lines[2], "    Compression failed: decode failed: bad header");
        // Same bytes in and out: no reduction suffix
        assert_eq!(lines[3], "    Embedded: 1.00 KB");
    }

    #[test]
    fn format_read_failed() {
        let event = EmbedEvent::ReadFailed {
            index: 3,
            total: 3,
            key: "gone".to_string(),
            filename: "gone.jpg".to_string(),
            error: "No such file or directory".to_string(),
        };
        let lines = format_embed_event(&event);
        assert_eq!(lines[0], "003/003 gone");
        assert_eq!(lines[2], "    Read failed: No such file or directory (skipped)");
    }

    #[test]
    fn format_empty_output() {
        let event = EmbedEvent::EmptyOutput {
            index: 1,
            total: 1,
            key: "hollow".to_string(),
            filename: "hollow.jpg".to_string(),
        };
        let lines = format_embed_event(&event);
        assert_eq!(lines[2], "    Compressed to zero bytes (skipped)");
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn summary_clean_run_is_one_line() {
        let report = EmbedReport {
            embedded: 3,
            skipped: 0,
            shadowed: 0,
            fallbacks: 0,
            data_bytes: 367_800,
        };
        let lines = format_embed_summary(&report);
        assert_eq!(lines, vec!["Embedded 3 images (359.18 KB of data URIs)"]);
    }

    #[test]
    fn summary_reports_skips_and_fallbacks() {
        let report = EmbedReport {
            embedded: 2,
            skipped: 1,
            shadowed: 0,
            fallbacks: 1,
            data_bytes: 2048,
        };
        let lines = format_embed_summary(&report);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Skipped 1 images");
        assert_eq!(
            lines[2],
            "1 images embedded with original bytes (compression failed)"
        );
    }

    #[test]
    fn summary_reports_shadowed_entries() {
        let report = EmbedReport {
            embedded: 1,
            skipped: 0,
            shadowed: 1,
            fallbacks: 0,
            data_bytes: 2048,
        };
        let lines = format_embed_summary(&report);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1 images replaced by a later file with the same key");
    }

    #[test]
    fn format_key_shadowed() {
        let event = EmbedEvent::KeyShadowed {
            key: "a".to_string(),
            filename: "a.jpg".to_string(),
            shadowed: "a.jpeg".to_string(),
        };
        let lines = format_embed_event(&event);
        assert_eq!(lines, vec!["    Replaces a.jpeg (same key \"a\")"]);
    }

    #[test]
    fn splice_outcome_lines() {
        let path = PathBuf::from("index.html");
        assert_eq!(
            format_splice_outcome(SpliceOutcome::Replaced, &path),
            "Replaced image data block in index.html"
        );
        assert_eq!(
            format_splice_outcome(SpliceOutcome::Inserted, &path),
            "Inserted image data block into index.html"
        );
    }

    #[test]
    fn strategy_banner_names_strategy() {
        assert_eq!(
            format_strategy_banner(CompressionStrategy::Passthrough),
            "Compression: passthrough (no recompression)"
        );
    }

    // =========================================================================
    // Check output tests
    // =========================================================================

    #[test]
    fn check_output_lists_images_with_sizes() {
        let images = vec![
            SourceImage {
                path: PathBuf::from("images/atrium.jpg"),
                filename: "atrium.jpg".to_string(),
                key: "atrium".to_string(),
                bytes: 251_208,
            },
            SourceImage {
                path: PathBuf::from("images/facade.jpeg"),
                filename: "facade.jpeg".to_string(),
                key: "facade".to_string(),
                bytes: 184_330,
            },
        ];
        let lines = format_check_output(&images);
        assert_eq!(lines[0], "Images");
        assert_eq!(lines[1], "001 atrium");
        assert_eq!(lines[2], "    Source: atrium.jpg (245.32 KB)");
        assert_eq!(lines[3], "002 facade");
        assert_eq!(lines[4], "    Source: facade.jpeg (180.01 KB)");
        assert_eq!(lines[6], "Total: 2 images, 425.33 KB");
    }

    #[test]
    fn check_output_empty_directory() {
        let lines = format_check_output(&[]);
        assert_eq!(lines[0], "Images");
        assert_eq!(lines[2], "Total: 0 images, 0.00 KB");
    }
}
