//! `WaveDrom` diagram rendering for markdown documents.
//!
//! This crate replaces ` ```wavedrom ` fenced blocks with images rendered by
//! the external `wavedrom-cli` tool:
//! - [`initialized`] captures settings, prepares the image directory and
//!   enables the extension in the host settings
//! - [`register`] installs the extension factory into a preprocessor registry
//! - [`DiagramProcessor`] decides between cached image, fresh render and
//!   fallback code block for each diagram
//! - [`CliRenderer`] runs the renderer with a hard timeout
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `plugin`: host integration (`initialized`, `register`, [`WavedromConfig`])
//! - `processor`: render-or-cache decision and [`WavedromPreprocessor`]
//! - `cli`: [`DiagramRenderer`] trait and the `wavedrom-cli` implementation
//! - `output`: image reference and fallback block markdown
//!
//! Rendered images are stored as `<content>/images/wavedrom/wavedrom_<md5>.svg`
//! and referenced as `![WaveDrom timing diagram]({static}/images/wavedrom/...)`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wd_config::Config;
//! use wd_diagrams::{DiagramProcessor, initialized, register};
//! use wd_renderer::PreprocessorRegistry;
//!
//! let mut settings = Config::load(None, None)?;
//! let config = initialized(&mut settings)?;
//!
//! let mut registry = PreprocessorRegistry::new();
//! register(&mut registry, Arc::new(DiagramProcessor::new(&config)));
//!
//! let pipeline = registry.build(&settings.markdown.extensions)?;
//! let markdown = pipeline.run("```wavedrom\n{\"signal\":[]}\n```\n");
//! ```

mod cli;
mod consts;
mod output;
mod plugin;
mod processor;

pub use cli::{CliRenderer, DiagramRenderer, RenderError};
pub use consts::{EXTENSION_NAME, NAMESPACE};
pub use plugin::{PluginError, WavedromConfig, initialized, register};
pub use processor::{DiagramProcessor, WavedromPreprocessor};
