//! # Inline Gal
//!
//! Embed a directory of JPEGs into a single-file HTML gallery. Every image
//! is compressed, base64-encoded, and written into one inline `<script>`
//! block as a `data:` URI, so the finished page works from a `file://` URL
//! or a bare static host with zero extra requests.
//!
//! # Architecture: One Sequential Pass
//!
//! ```text
//! images/*.jpg  →  scan  →  compress  →  encode  →  splice  →  index.html
//! ```
//!
//! The pipeline is a single ordered batch: scan the source directory, then
//! for each image (in filename order) read, compress, and encode it; only
//! after the whole batch finishes is the HTML touched. Per-image failures
//! skip that image and keep going. Structural failures (no place to put the
//! script block) abort before the file is written, so the page is never left
//! half-updated.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source directory, collects JPEG files sorted by filename |
//! | [`compress`] | Resize + JPEG re-encode with a strategy resolved once at startup |
//! | [`embed`] | The batch driver — read, compress, encode, splice, write back |
//! | [`splice`] | Marker-based replace-or-insert of the script block in the HTML |
//! | [`bundler`] | Build tool descriptor for the WASM/3D front-end the gallery ships with |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting — progress, summaries, check listings |
//!
//! # Design Decisions
//!
//! ## One Strategy, Resolved Once
//!
//! Compression capability is picked a single time at startup and carried
//! through the whole batch as a [`compress::CompressionStrategy`] value:
//! high quality, fast, or passthrough. The per-image code never probes or
//! branches on availability — it is handed a strategy and applies it. A run
//! with no usable codec still produces a complete mapping from the original
//! bytes.
//!
//! ## Degrade, Don't Fail
//!
//! A JPEG that cannot be decoded or re-encoded is embedded as-is rather
//! than dropped. A gallery with one oversized image beats a build that dies
//! on the last file of a batch. The degradation is visible — the progress
//! output names every image that fell back — just not fatal. Only an image
//! that compresses to zero bytes is excluded, since an empty data URI would
//! render as a broken tile.
//!
//! ## Blind Text Surgery
//!
//! The HTML update is substring work, not parsing: find the `<script>`
//! block carrying a fixed marker comment and replace it wholesale, or
//! insert a new block before `</head>`. See [`splice`] for the exact anchor
//! contract. The page is otherwise preserved byte for byte, and re-running
//! the tool replaces the block it wrote — output is idempotent.
//!
//! ## `BTreeMap` for Stable Output
//!
//! The key → data URI mapping lives in a `BTreeMap`, so the serialized
//! block lists keys in sorted order on every run. Combined with wholesale
//! block replacement this makes repeat runs byte-identical, which keeps the
//! generated HTML diff-friendly under version control.
//!
//! ## The Bundler Descriptor
//!
//! The gallery's front-end (3D rendering plus a WebAssembly vision model)
//! needs a non-trivial build setup: WASM imports, top-level await,
//! cross-origin isolation headers, and chunk splitting for the heavy
//! libraries. [`bundler`] captures that setup as a typed, serializable
//! descriptor instead of a config file nobody validates. It shares no code
//! with the embed pipeline.

pub mod bundler;
pub mod compress;
pub mod config;
pub mod embed;
pub mod output;
pub mod scan;
pub mod splice;

#[cfg(test)]
pub(crate) mod test_helpers;
