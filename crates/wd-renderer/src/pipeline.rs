//! Preprocessor trait and pipeline assembly.
//!
//! Preprocessors rewrite the raw markdown text of a document before it is
//! parsed. Extensions are registered by name; the host settings list the
//! names to enable, and [`PreprocessorRegistry::build`] turns that list into
//! a [`Pipeline`].
//!
//! # Example
//!
//! ```
//! use wd_renderer::{Preprocessor, PreprocessorRegistry};
//!
//! struct Shout;
//!
//! impl Preprocessor for Shout {
//!     fn name(&self) -> &str {
//!         "shout"
//!     }
//!
//!     fn run(&self, text: &str) -> String {
//!         text.to_uppercase()
//!     }
//! }
//!
//! let mut registry = PreprocessorRegistry::new();
//! registry.register("shout", || Box::new(Shout));
//!
//! let pipeline = registry.build(&["shout".to_owned()]).unwrap();
//! assert_eq!(pipeline.run("hello"), "HELLO");
//! ```

use std::collections::HashMap;

/// A text-level markdown preprocessor.
///
/// Implementations receive the full text of one document and return the
/// rewritten text. `run` is called once per document.
pub trait Preprocessor: Send + Sync {
    /// Extension name this preprocessor was registered under.
    fn name(&self) -> &str;

    /// Rewrite one document.
    fn run(&self, text: &str) -> String;
}

/// Constructor for a registered preprocessor.
type Factory = Box<dyn Fn() -> Box<dyn Preprocessor> + Send + Sync>;

/// Error building a pipeline from extension names.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Extension name has no registered factory.
    #[error("unknown markdown extension '{0}'")]
    UnknownExtension(String),
}

/// Name-to-factory table for preprocessor extensions.
///
/// Factories are closures, so an extension can capture its configuration
/// when it is registered instead of reading process-wide state later.
#[derive(Default)]
pub struct PreprocessorRegistry {
    factories: HashMap<String, Factory>,
}

impl PreprocessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Preprocessor> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Check whether `name` has a registered factory.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a pipeline running the named extensions in list order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownExtension`] for the first name without
    /// a registered factory.
    pub fn build(&self, names: &[String]) -> Result<Pipeline, PipelineError> {
        let preprocessors = names
            .iter()
            .map(|name| {
                self.factories
                    .get(name)
                    .map(|factory| factory())
                    .ok_or_else(|| PipelineError::UnknownExtension(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pipeline { preprocessors })
    }
}

/// Ordered list of preprocessors applied to each document.
#[derive(Default)]
pub struct Pipeline {
    preprocessors: Vec<Box<dyn Preprocessor>>,
}

impl Pipeline {
    /// Create an empty pipeline (documents pass through unchanged).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preprocessor.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessors.push(preprocessor);
        self
    }

    /// Names of the preprocessors, in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.preprocessors.iter().map(|p| p.name()).collect()
    }

    /// Number of preprocessors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.preprocessors.len()
    }

    /// Whether the pipeline has no preprocessors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preprocessors.is_empty()
    }

    /// Run every preprocessor over `text`, feeding each the previous output.
    #[must_use]
    pub fn run(&self, text: &str) -> String {
        self.preprocessors
            .iter()
            .fold(text.to_owned(), |doc, preprocessor| preprocessor.run(&doc))
    }
}
