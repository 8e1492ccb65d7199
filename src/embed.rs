//! Sequential embedding pipeline: read, compress, encode, splice.
//!
//! ```text
//! images/*.jpg  →  compress  →  base64 data URI  →  mapping  →  index.html
//! ```
//!
//! Images are processed strictly in filename order, one at a time. Per-image
//! failures (unreadable file, empty compression output) skip that image and
//! keep going; the HTML is only touched after the whole batch finishes, and
//! only written back when the splice succeeds. A failed run therefore never
//! leaves a half-updated page behind.
//!
//! Progress is reported through [`EmbedEvent`] values handed to a caller
//! callback. The pipeline itself never prints; formatting lives in
//! [`crate::output`].

use crate::compress::{self, CompressParams, CompressionStrategy};
use crate::scan::{self, ScanError, SourceImage};
use crate::splice::{self, SpliceError, SpliceOutcome};
use base64::{Engine as _, engine::general_purpose};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// MIME prefix for every embedded image. Output is always JPEG regardless
/// of how the source was encoded.
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("HTML update failed: {0}")]
    Splice(#[from] SpliceError),
}

/// Progress events emitted while the batch runs, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedEvent {
    /// The source directory has been scanned; `total` images follow.
    Scanned { total: usize },
    /// One image made it into the mapping.
    ImageEmbedded {
        index: usize,
        total: usize,
        key: String,
        filename: String,
        original_bytes: u64,
        embedded_bytes: usize,
        /// Set when compression failed and the original bytes were kept.
        fallback: Option<String>,
    },
    /// The source file could not be read; image skipped.
    ReadFailed {
        index: usize,
        total: usize,
        key: String,
        filename: String,
        error: String,
    },
    /// Compression produced an empty buffer; image skipped.
    EmptyOutput {
        index: usize,
        total: usize,
        key: String,
        filename: String,
    },
    /// Two source files share a stem; the later one replaced the earlier
    /// entry in the mapping.
    KeyShadowed {
        key: String,
        /// The file that now owns the key.
        filename: String,
        /// The earlier file whose entry was replaced.
        shadowed: String,
    },
}

/// Counters accumulated over one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Images that made it into the mapping. Always equals the mapping size.
    pub embedded: usize,
    /// Images dropped by a per-image failure.
    pub skipped: usize,
    /// Mapping entries replaced by a later file with the same stem.
    pub shadowed: usize,
    /// Images embedded with their original bytes after compression failed.
    pub fallbacks: usize,
    /// Total size of all data URI strings, in bytes.
    pub data_bytes: usize,
}

/// Result of a full [`run`]: batch counters plus how the HTML was updated.
#[derive(Debug)]
pub struct EmbedRun {
    pub report: EmbedReport,
    pub splice: SpliceOutcome,
}

/// Encode a compressed buffer as a `data:image/jpeg;base64,` URI.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let encoded = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + encoded);
    uri.push_str(DATA_URI_PREFIX);
    general_purpose::STANDARD.encode_string(bytes, &mut uri);
    uri
}

/// Compress and encode a batch of images into a key → data URI mapping.
///
/// The slice is processed front to back; [`crate::scan::scan`] already
/// sorted it by filename, so the mapping and the event stream share that
/// order. Per-image failures emit an event and move on.
///
/// Files sharing a stem (`a.jpg` + `a.jpeg`) collapse to one mapping entry:
/// the later file wins and the replaced one is reported as shadowed, so the
/// embedded count always equals the mapping size.
pub fn embed_images(
    images: &[SourceImage],
    strategy: CompressionStrategy,
    params: CompressParams,
    on_event: &mut dyn FnMut(EmbedEvent),
) -> (BTreeMap<String, String>, EmbedReport) {
    let mut mapping = BTreeMap::new();
    // Which filename produced each key, for reporting shadowed duplicates
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    let mut report = EmbedReport::default();
    let total = images.len();

    for (i, image) in images.iter().enumerate() {
        let index = i + 1;

        let original = match fs::read(&image.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                report.skipped += 1;
                on_event(EmbedEvent::ReadFailed {
                    index,
                    total,
                    key: image.key.clone(),
                    filename: image.filename.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        };

        let outcome = compress::compress(strategy, params, original);
        if outcome.bytes.is_empty() {
            report.skipped += 1;
            on_event(EmbedEvent::EmptyOutput {
                index,
                total,
                key: image.key.clone(),
                filename: image.filename.clone(),
            });
            continue;
        }

        if outcome.fallback.is_some() {
            report.fallbacks += 1;
        }
        let embedded_bytes = outcome.bytes.len();
        let uri = to_data_uri(&outcome.bytes);
        report.data_bytes += uri.len();
        match mapping.insert(image.key.clone(), uri) {
            None => report.embedded += 1,
            Some(previous) => {
                // Same stem as an earlier file: one mapping entry, counted once
                report.data_bytes -= previous.len();
                report.shadowed += 1;
            }
        }
        let previous_owner = owners.insert(image.key.clone(), image.filename.clone());

        on_event(EmbedEvent::ImageEmbedded {
            index,
            total,
            key: image.key.clone(),
            filename: image.filename.clone(),
            original_bytes: image.bytes,
            embedded_bytes,
            fallback: outcome.fallback,
        });
        if let Some(shadowed) = previous_owner {
            on_event(EmbedEvent::KeyShadowed {
                key: image.key.clone(),
                filename: image.filename.clone(),
                shadowed,
            });
        }
    }

    (mapping, report)
}

/// Run the whole pipeline: scan, embed, splice, write back.
///
/// The HTML file is rewritten in place, and only after a successful splice.
/// When the page offers no anchor (no managed block, no `</head>`) the file
/// is left byte-for-byte untouched and the error propagates.
pub fn run(
    source: &Path,
    html_path: &Path,
    strategy: CompressionStrategy,
    params: CompressParams,
    on_event: &mut dyn FnMut(EmbedEvent),
) -> Result<EmbedRun, EmbedError> {
    let images = scan::scan(source)?;
    on_event(EmbedEvent::Scanned {
        total: images.len(),
    });

    let (mapping, report) = embed_images(&images, strategy, params, on_event);

    let block = splice::render_block(&mapping);
    let html = fs::read_to_string(html_path)?;
    let (updated, outcome) = splice::splice_block(&html, &block)?;
    fs::write(html_path, updated)?;

    Ok(EmbedRun {
        report,
        splice: outcome,
    })
}
