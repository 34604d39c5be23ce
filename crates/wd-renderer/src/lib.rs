//! Markdown preprocessing for `WaveDrom` documents.
//!
//! This crate provides the text-level plumbing that runs before a markdown
//! document is parsed:
//!
//! - [`FencedBlockScanner`]: finds fenced code blocks with a given info tag
//!   and replaces each block through a callback
//! - [`Preprocessor`]: trait for document-level text rewriting
//! - [`PreprocessorRegistry`] / [`Pipeline`]: named extensions assembled into
//!   an ordered pipeline from the host settings
//!
//! # Example
//!
//! ```
//! use wd_renderer::FencedBlockScanner;
//!
//! let scanner = FencedBlockScanner::new("wavedrom");
//! let doc = "Intro\n\n~~~wavedrom\n{ signal: [] }\n~~~\n";
//! let out = scanner.replace_all(doc, |body| format!("![diagram]({})", body.len()));
//! assert_eq!(out, "Intro\n\n![diagram](14)\n");
//! ```

mod fence;
mod pipeline;
mod scanner;

pub use pipeline::{Pipeline, PipelineError, Preprocessor, PreprocessorRegistry};
pub use scanner::FencedBlockScanner;
