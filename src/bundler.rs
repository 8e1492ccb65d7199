//! Build configuration descriptor for the gallery front-end.
//!
//! The gallery ships a WebAssembly vision model and a 3D renderer, and its
//! build tool needs a specific setup: WASM and top-level-await support,
//! cross-origin isolation headers for the dev server, and chunk splitting
//! that keeps the heavy libraries out of the app bundle. This module holds
//! that setup as data.
//!
//! Nothing here executes a build. [`BundlerConfig`] serializes to the JSON
//! the external tool consumes, and the three dynamic pieces a declarative
//! object cannot express are exposed as functions:
//!
//! - [`resolve_base`]: deployment base path from the environment
//! - [`chunk_for`]: module id → output chunk name
//! - [`is_suppressed_warning`]: which build diagnostics to drop
//!
//! ## Base path resolution
//!
//! Priority order, first hit wins:
//!
//! 1. `GITHUB_REPOSITORY` (`owner/name` slug) → `/name/` — CI deploys serve
//!    from a repo-named subpath
//! 2. `VITE_BASE` → used verbatim
//! 3. `/`
//!
//! A slug without a usable name part (no `/`, or nothing after it) does not
//! count as a hit; resolution falls through to the next source. Empty
//! environment values are treated as unset.

use serde::Serialize;
use std::collections::BTreeMap;

/// Repository slug variable set by CI, `owner/name` form.
pub const REPO_SLUG_ENV: &str = "GITHUB_REPOSITORY";

/// Explicit base path override for local or non-CI deploys.
pub const BASE_OVERRIDE_ENV: &str = "VITE_BASE";

/// Resolve the deployment base path from explicit values.
///
/// Pure core of [`base_from_env`]; tests feed it directly.
pub fn resolve_base(repo_slug: Option<&str>, override_base: Option<&str>) -> String {
    if let Some(slug) = repo_slug {
        if let Some(name) = slug.split('/').nth(1) {
            if !name.is_empty() {
                return format!("/{name}/");
            }
        }
    }
    match override_base {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => "/".to_string(),
    }
}

/// Resolve the deployment base path from the process environment.
pub fn base_from_env() -> String {
    let repo = std::env::var(REPO_SLUG_ENV).ok();
    let override_base = std::env::var(BASE_OVERRIDE_ENV).ok();
    resolve_base(repo.as_deref(), override_base.as_deref())
}

/// Route a module id to a named output chunk.
///
/// Contains-matching on the id path, first rule wins. Returns `None` for
/// first-party code, which stays in the entry chunk.
pub fn chunk_for(module_id: &str) -> Option<&'static str> {
    if module_id.contains("node_modules/three") {
        return Some("three");
    }
    if module_id.contains("node_modules/@mediapipe") {
        return Some("mediapipe");
    }
    if module_id.contains("node_modules") {
        return Some("vendor");
    }
    None
}

/// Whether a build diagnostic should be dropped instead of shown.
///
/// Source-map warnings are noise here: maps are disabled in the build, but
/// upstream packages still trigger the diagnostics.
pub fn is_suppressed_warning(code: Option<&str>, message: &str) -> bool {
    code == Some("SOURCEMAP_ERROR") || message.contains("source map")
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub base: String,
    pub plugins: Vec<String>,
    pub server: ServerConfig,
    pub resolve: ResolveConfig,
    pub build: BuildConfig,
    pub optimize_deps: OptimizeDeps,
    pub assets_include: Vec<String>,
    pub public_dir: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub port: u16,
    pub open: bool,
    pub headers: CrossOriginHeaders,
    pub fs: FsConfig,
}

/// Cross-origin isolation headers. Required for `SharedArrayBuffer`, which
/// the vision runtime uses for its worker threads.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CrossOriginHeaders {
    #[serde(rename = "Cross-Origin-Opener-Policy")]
    pub opener_policy: String,
    #[serde(rename = "Cross-Origin-Embedder-Policy")]
    pub embedder_policy: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FsConfig {
    pub allow: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConfig {
    pub alias: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub target: String,
    pub sourcemap: bool,
    pub rollup_options: RollupOptions,
    pub copy_public_dir: bool,
    pub assets_dir: String,
    pub commonjs_options: CommonJsOptions,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    pub output: OutputOptions,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub format: String,
    pub entry_file_names: String,
    pub chunk_file_names: String,
    pub asset_file_names: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeDeps {
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommonJsOptions {
    pub include: Vec<String>,
}

impl BundlerConfig {
    /// Build the full descriptor for a given deployment base path.
    pub fn with_base(base: impl Into<String>) -> Self {
        let mut alias = BTreeMap::new();
        alias.insert(
            "@mediapipe/tasks-vision".to_string(),
            "node_modules/@mediapipe/tasks-vision".to_string(),
        );

        BundlerConfig {
            base: base.into(),
            plugins: vec!["wasm".to_string(), "top-level-await".to_string()],
            server: ServerConfig {
                port: 3000,
                open: true,
                headers: CrossOriginHeaders {
                    opener_policy: "same-origin".to_string(),
                    embedder_policy: "require-corp".to_string(),
                },
                fs: FsConfig {
                    // Dev server may read the WASM assets from node_modules
                    allow: vec!["..".to_string()],
                },
            },
            resolve: ResolveConfig { alias },
            build: BuildConfig {
                target: "esnext".to_string(),
                sourcemap: false,
                rollup_options: RollupOptions {
                    output: OutputOptions {
                        format: "es".to_string(),
                        entry_file_names: "assets/[name]-[hash].js".to_string(),
                        chunk_file_names: "assets/[name]-[hash].js".to_string(),
                        asset_file_names: "assets/[name]-[hash].[ext]".to_string(),
                    },
                },
                copy_public_dir: false,
                assets_dir: "assets".to_string(),
                commonjs_options: CommonJsOptions {
                    include: vec!["node_modules".to_string()],
                },
            },
            optimize_deps: OptimizeDeps {
                exclude: vec!["@mediapipe/tasks-vision".to_string()],
            },
            assets_include: vec!["**/*.wasm".to_string()],
            public_dir: false,
        }
    }

    /// Descriptor with the base path taken from the process environment.
    pub fn from_env() -> Self {
        Self::with_base(base_from_env())
    }
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self::with_base("/")
    }
}
