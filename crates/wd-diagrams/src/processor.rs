//! Render-or-cache decision for `WaveDrom` blocks.
//!
//! This module provides [`DiagramProcessor`], which turns one diagram
//! description into the markdown that replaces it, and
//! [`WavedromPreprocessor`], which applies it to every `wavedrom` block of
//! a document.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use wd_cache::SvgStore;
use wd_renderer::{FencedBlockScanner, Preprocessor};

use crate::cli::{CliRenderer, DiagramRenderer, RenderError};
use crate::consts::{EXTENSION_NAME, INSTALL_HINT, NAMESPACE};
use crate::output::{fallback, image_reference};
use crate::plugin::WavedromConfig;

/// Renders diagram descriptions through a [`DiagramRenderer`], caching
/// results in an [`SvgStore`].
///
/// Rendering failures never propagate: they are logged, recorded in
/// [`warnings`](Self::warnings), and the block degrades to a `json` code
/// block showing the original description.
///
/// The per-diagram lock table and the warning list grow for the lifetime of
/// the processor. Long-lived hosts should build a fresh processor per site
/// build rather than keep one across rebuilds.
///
/// # Example
///
/// ```ignore
/// let processor = DiagramProcessor::new(&config);
/// let markdown = processor.render_or_cached(r#"{"signal":[]}"#);
/// ```
pub struct DiagramProcessor {
    store: SvgStore,
    renderer: Box<dyn DiagramRenderer>,
    warnings: Mutex<Vec<String>>,
}

impl DiagramProcessor {
    /// Create a processor running `wavedrom-cli` as configured.
    #[must_use]
    pub fn new(config: &WavedromConfig) -> Self {
        let renderer = CliRenderer::new(config.cli.clone()).timeout(config.timeout);
        Self::with_renderer(
            SvgStore::new(&config.content_path, NAMESPACE),
            Box::new(renderer),
        )
    }

    /// Create a processor with a custom renderer.
    #[must_use]
    pub fn with_renderer(store: SvgStore, renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            store,
            renderer,
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Store holding rendered images.
    #[must_use]
    pub fn store(&self) -> &SvgStore {
        &self.store
    }

    /// Warnings recorded so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// Return the markdown replacing one diagram block.
    ///
    /// If an image for `description` already exists it is referenced
    /// without running the renderer. Otherwise the renderer is run once; on
    /// success the new image is referenced, on any failure the description
    /// is returned as a fenced `json` block.
    pub fn render_or_cached(&self, description: &str) -> String {
        let hash = SvgStore::hash(description);

        self.store.with_lock(&hash, || {
            let filename = self.store.filename(&hash);
            if self.store.contains(&hash) {
                tracing::debug!(file = %filename, "wavedrom: cache hit");
                return image_reference(&self.store.site_path(&hash));
            }

            match self.render(description, &hash) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "wavedrom: rendered {filename}");
                    image_reference(&self.store.site_path(&hash))
                }
                Err(err) => {
                    self.warn(&err);
                    fallback(description)
                }
            }
        })
    }

    /// Render `description` into the store entry for `hash`.
    ///
    /// The description is written to a temporary `.json` file that is
    /// removed on every path; removal errors are ignored. The renderer
    /// writes into a staging file that is renamed onto the entry only after
    /// a successful, non-empty render.
    fn render(&self, description: &str, hash: &str) -> Result<PathBuf, RenderError> {
        let mut input = tempfile::Builder::new()
            .prefix("wavedrom_")
            .suffix(".json")
            .tempfile()?;
        input.write_all(description.as_bytes())?;
        input.flush()?;
        let input = input.into_temp_path();

        let staging = self.store.staging_file()?;
        self.renderer.render(&input, &staging)?;

        if fs::metadata(&staging)?.len() == 0 {
            return Err(RenderError::EmptyOutput);
        }
        Ok(self.store.publish(staging, hash)?)
    }

    fn warn(&self, err: &RenderError) {
        let message = match err {
            RenderError::NotInstalled { command } => {
                format!("wavedrom: {command} not found. Install with: {INSTALL_HINT}")
            }
            RenderError::Failed { stderr, .. } => format!("wavedrom: CLI failed: {stderr}"),
            RenderError::Timeout { seconds } => format!("wavedrom: timed out after {seconds}s"),
            RenderError::EmptyOutput | RenderError::Io(_) => format!("wavedrom: {err}"),
        };
        tracing::warn!("{message}");
        self.warnings.lock().unwrap().push(message);
    }
}

/// Markdown preprocessor replacing `wavedrom` fenced blocks.
///
/// Shares one [`DiagramProcessor`] across all pipelines built from the same
/// registration, so per-diagram locking spans every document.
pub struct WavedromPreprocessor {
    scanner: FencedBlockScanner,
    processor: Arc<DiagramProcessor>,
}

impl WavedromPreprocessor {
    /// Create a preprocessor rendering through `processor`.
    #[must_use]
    pub fn new(processor: Arc<DiagramProcessor>) -> Self {
        Self {
            scanner: FencedBlockScanner::new(EXTENSION_NAME),
            processor,
        }
    }
}

impl Preprocessor for WavedromPreprocessor {
    fn name(&self) -> &str {
        EXTENSION_NAME
    }

    fn run(&self, text: &str) -> String {
        self.scanner
            .replace_all(text, |description| self.processor.render_or_cached(description))
    }
}
