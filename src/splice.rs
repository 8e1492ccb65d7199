//! Marker-based HTML block surgery.
//!
//! The embedder owns exactly one inline `<script>` block in the target HTML
//! file: the block whose body opens with [`MARKER`]. This module finds and
//! replaces that block as plain text. It is blind surgery, not HTML parsing —
//! no DOM, no entity handling, no awareness of comments or CDATA.
//!
//! ## Anchor Contract
//!
//! | Anchor | Definition |
//! |--------|------------|
//! | start  | the `<script>` whose body opens (after whitespace) with [`MARKER`] |
//! | end    | the first `</script>` after the marker |
//! | fallback | insert immediately before the first `</head>` |
//!
//! A present marker with a broken enclosure (not at the start of a script
//! body, or no `</script>` after it) is corrupt input and a hard error:
//! replacing a half-found region would destroy unrelated markup. A page
//! with neither a marker block nor a `</head>` tag cannot be spliced at
//! all; the caller must leave the file untouched and fail.
//!
//! Replacing the whole region with a freshly rendered block makes the
//! operation idempotent: a second run finds the block it wrote and replaces
//! it with identical text.

use std::collections::BTreeMap;
use thiserror::Error;

/// First line of the managed script block; the signature the splicer
/// searches for. Changing it orphans blocks written by older versions.
pub const MARKER: &str = "// inline-gal image data (generated)";

const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";
const HEAD_CLOSE: &str = "</head>";

#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("marker found but no enclosing <script> tag before it")]
    MissingBlockStart,
    #[error("marker block is never closed (no </script> after the marker)")]
    UnterminatedBlock,
    #[error("no </head> tag to insert the script block before")]
    MissingHeadAnchor,
}

/// How the block ended up in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// An existing marker block was replaced in place.
    Replaced,
    /// No marker block existed; a new one was inserted before `</head>`.
    Inserted,
}

/// Render the mapping as the inline script block the splicer manages.
///
/// `BTreeMap` keeps key order stable, so the same mapping always renders
/// to the same text.
pub fn render_block(images: &BTreeMap<String, String>) -> String {
    let json = serde_json::to_string_pretty(images).expect("string map must serialize");
    format!("<script>\n{MARKER}\nconst galleryImages = {json};\n</script>")
}

/// Replace the managed block in `html`, or insert `block` before `</head>`.
///
/// Returns the rewritten page and which path was taken. The input string is
/// untouched; on error the caller has nothing to write back.
pub fn splice_block(html: &str, block: &str) -> Result<(String, SpliceOutcome), SpliceError> {
    match find_marked_region(html)? {
        Some((start, end)) => {
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..start]);
            out.push_str(block);
            out.push_str(&html[end..]);
            Ok((out, SpliceOutcome::Replaced))
        }
        None => {
            let out = insert_before_head(html, block)?;
            Ok((out, SpliceOutcome::Inserted))
        }
    }
}

/// Locate the managed region as a byte range `[start, end)`, if present.
fn find_marked_region(html: &str) -> Result<Option<(usize, usize)>, SpliceError> {
    let Some(marker_at) = html.find(MARKER) else {
        return Ok(None);
    };
    let start = html[..marker_at]
        .rfind(SCRIPT_OPEN)
        .ok_or(SpliceError::MissingBlockStart)?;
    let close_rel = html[marker_at..]
        .find(SCRIPT_CLOSE)
        .ok_or(SpliceError::UnterminatedBlock)?;
    let end = marker_at + close_rel + SCRIPT_CLOSE.len();
    Ok(Some((start, end)))
}

fn insert_before_head(html: &str, block: &str) -> Result<String, SpliceError> {
    let head_at = html.find(HEAD_CLOSE).ok_or(SpliceError::MissingHeadAnchor)?;
    let mut out = String::with_capacity(html.len() + block.len() + 1);
    out.push_str(&html[..head_at]);
    out.push_str(block);
    out.push('\n');
    out.push_str(&html[head_at..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{headless_html, page_html};

    fn sample_mapping() -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "data:image/jpeg;base64,AAAA".to_string());
        map.insert("b".to_string(), "data:image/jpeg;base64,BBBB".to_string());
        map
    }

    // =========================================================================
    // render_block tests
    // =========================================================================

    #[test]
    fn block_opens_with_marker_line() {
        let block = render_block(&sample_mapping());
        assert!(block.starts_with(&format!("<script>\n{MARKER}\n")));
        assert!(block.ends_with("</script>"));
    }

    #[test]
    fn block_assigns_mapping_to_const() {
        let block = render_block(&sample_mapping());
        assert!(block.contains("const galleryImages = {"));
        assert!(block.contains("\"a\": \"data:image/jpeg;base64,AAAA\""));
        assert!(block.contains("\"b\": \"data:image/jpeg;base64,BBBB\""));
    }

    #[test]
    fn empty_mapping_renders_empty_object() {
        let block = render_block(&BTreeMap::new());
        assert!(block.contains("const galleryImages = {};"));
    }

    // =========================================================================
    // Insert path tests
    // =========================================================================

    #[test]
    fn fresh_page_takes_insert_path() {
        let block = render_block(&sample_mapping());
        let (out, outcome) = splice_block(&page_html(), &block).unwrap();

        assert_eq!(outcome, SpliceOutcome::Inserted);
        assert!(out.contains(MARKER));
        // Block lands before the head close
        let marker_at = out.find(MARKER).unwrap();
        let head_at = out.find("</head>").unwrap();
        assert!(marker_at < head_at);
    }

    #[test]
    fn insert_preserves_rest_of_page() {
        let block = render_block(&sample_mapping());
        let (out, _) = splice_block(&page_html(), &block).unwrap();

        assert!(out.contains("<title>Gallery</title>"));
        assert!(out.contains("<div id=\"app\"></div>"));
    }

    #[test]
    fn no_head_and_no_marker_is_error() {
        let block = render_block(&sample_mapping());
        let result = splice_block(&headless_html(), &block);
        assert!(matches!(result, Err(SpliceError::MissingHeadAnchor)));
    }

    // =========================================================================
    // Replace path tests
    // =========================================================================

    #[test]
    fn second_splice_takes_replace_path() {
        let first = render_block(&sample_mapping());
        let (page, _) = splice_block(&page_html(), &first).unwrap();

        let mut updated = sample_mapping();
        updated.insert("c".to_string(), "data:image/jpeg;base64,CCCC".to_string());
        let second = render_block(&updated);
        let (out, outcome) = splice_block(&page, &second).unwrap();

        assert_eq!(outcome, SpliceOutcome::Replaced);
        assert!(out.contains("CCCC"));
    }

    #[test]
    fn replace_does_not_duplicate_blocks() {
        let block = render_block(&sample_mapping());
        let (page, _) = splice_block(&page_html(), &block).unwrap();
        let (out, _) = splice_block(&page, &block).unwrap();

        assert_eq!(out.matches(MARKER).count(), 1);
        assert_eq!(out.matches("const galleryImages").count(), 1);
    }

    #[test]
    fn replace_drops_stale_entries() {
        let (page, _) = splice_block(&page_html(), &render_block(&sample_mapping())).unwrap();

        let mut only_a = BTreeMap::new();
        only_a.insert("a".to_string(), "data:image/jpeg;base64,AAAA".to_string());
        let (out, _) = splice_block(&page, &render_block(&only_a)).unwrap();

        assert!(out.contains("AAAA"));
        assert!(!out.contains("BBBB"));
    }

    #[test]
    fn splice_is_idempotent() {
        let block = render_block(&sample_mapping());
        let (once, _) = splice_block(&page_html(), &block).unwrap();
        let (twice, _) = splice_block(&once, &block).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn replace_works_without_head_anchor() {
        // The fallback anchor is only needed for insertion
        let page = format!("<html><body>{}</body></html>", render_block(&sample_mapping()));
        let mut only_a = BTreeMap::new();
        only_a.insert("a".to_string(), "data:x".to_string());

        let (out, outcome) = splice_block(&page, &render_block(&only_a)).unwrap();
        assert_eq!(outcome, SpliceOutcome::Replaced);
        assert!(!out.contains("BBBB"));
    }

    #[test]
    fn unrelated_script_blocks_untouched() {
        let page = format!(
            "<html><head><script>var before = 1;</script>{}<script>var after = 2;</script></head></html>",
            render_block(&sample_mapping())
        );
        let mut only_a = BTreeMap::new();
        only_a.insert("a".to_string(), "data:x".to_string());

        let (out, outcome) = splice_block(&page, &render_block(&only_a)).unwrap();
        assert_eq!(outcome, SpliceOutcome::Replaced);
        assert!(out.contains("var before = 1;"));
        assert!(out.contains("var after = 2;"));
        assert!(!out.contains("BBBB"));
    }

    // =========================================================================
    // Corrupt region tests
    // =========================================================================

    #[test]
    fn marker_without_script_close_is_error() {
        let page = format!("<html><head><script>\n{MARKER}\nconst x = 1;</head></html>");
        let result = splice_block(&page, "ignored");
        assert!(matches!(result, Err(SpliceError::UnterminatedBlock)));
    }

    #[test]
    fn marker_without_script_open_is_error() {
        let page = format!("<html><head>{MARKER}</script></head></html>");
        let result = splice_block(&page, "ignored");
        assert!(matches!(result, Err(SpliceError::MissingBlockStart)));
    }
}
