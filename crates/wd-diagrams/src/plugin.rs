//! Integration with the host build.
//!
//! [`initialized`] runs once when the host has loaded its settings: it
//! captures the diagram configuration, prepares the image directory and
//! enables the `wavedrom` markdown extension. [`register`] installs the
//! factory that the host's preprocessor registry uses to build the extension.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wd_cache::SvgStore;
use wd_config::Config;
use wd_renderer::PreprocessorRegistry;

use crate::consts::{EXTENSION_NAME, NAMESPACE};
use crate::processor::{DiagramProcessor, WavedromPreprocessor};

/// Diagram configuration captured from the host settings.
///
/// Built once by [`initialized`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavedromConfig {
    /// Content root directory.
    pub content_path: PathBuf,
    /// Renderer executable name or path.
    pub cli: String,
    /// Hard timeout for a single render.
    pub timeout: Duration,
}

impl WavedromConfig {
    /// Capture the diagram configuration from host settings.
    #[must_use]
    pub fn from_settings(settings: &Config) -> Self {
        Self {
            content_path: settings.content_path().to_path_buf(),
            cli: settings.wavedrom.cli.clone(),
            timeout: Duration::from_secs(settings.wavedrom.timeout),
        }
    }

    /// Directory holding rendered images (`<content>/images/wavedrom`).
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        SvgStore::new(&self.content_path, NAMESPACE).dir().to_path_buf()
    }
}

/// Host integration error.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Image directory could not be created.
    #[error("failed to create image directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Initialize the `WaveDrom` extension from host settings.
///
/// Creates `<content>/images/wavedrom` (with parents) and appends the
/// `wavedrom` extension to `markdown.extensions` unless it is already
/// listed. Safe to call repeatedly, e.g. on every rebuild of a watching
/// server.
///
/// # Errors
///
/// Returns [`PluginError::CreateDir`] if the image directory cannot be
/// created; no diagram could be rendered without it.
pub fn initialized(settings: &mut Config) -> Result<WavedromConfig, PluginError> {
    let config = WavedromConfig::from_settings(settings);

    let store = SvgStore::new(&config.content_path, NAMESPACE);
    store.ensure_dir().map_err(|source| PluginError::CreateDir {
        path: store.dir().to_path_buf(),
        source,
    })?;

    let extensions = &mut settings.markdown.extensions;
    if !extensions.iter().any(|name| name == EXTENSION_NAME) {
        extensions.push(EXTENSION_NAME.to_owned());
    }

    Ok(config)
}

/// Register the `wavedrom` extension factory.
///
/// Every preprocessor built from the registry shares `processor`.
pub fn register(registry: &mut PreprocessorRegistry, processor: Arc<DiagramProcessor>) {
    registry.register(EXTENSION_NAME, move || {
        Box::new(WavedromPreprocessor::new(Arc::clone(&processor)))
    });
}
