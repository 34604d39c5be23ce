//! `wd render` command implementation.

use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use rayon::prelude::*;
use wd_diagrams::DiagramProcessor;
use wd_renderer::{Pipeline, PreprocessorRegistry};

use super::SettingsArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to process (default: read one document from stdin).
    files: Vec<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Write processed files into this directory instead of stdout.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (show render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// A processed document.
#[derive(Debug, PartialEq, Eq)]
struct Document {
    /// Source file, `None` for stdin.
    source: Option<PathBuf>,
    /// Processed markdown.
    text: String,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings fail to load, the image directory cannot
    /// be created, an input cannot be read, or an output cannot be written.
    /// Diagram rendering failures are not errors.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if let Some(dir) = &self.output_dir {
            check_unique_names(&self.files)?;
            std::fs::create_dir_all(dir).map_err(|source| CliError::File {
                path: dir.clone(),
                source,
            })?;
        }

        let mut settings = self.settings.load()?;
        let config = wd_diagrams::initialized(&mut settings)?;
        tracing::debug!(
            content = %config.content_path.display(),
            cli = %config.cli,
            "wavedrom extension initialized"
        );

        let processor = Arc::new(DiagramProcessor::new(&config));
        let mut registry = PreprocessorRegistry::new();
        wd_diagrams::register(&mut registry, Arc::clone(&processor));
        let pipeline = registry.build(&settings.markdown.extensions)?;

        let documents = if self.files.is_empty() {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            vec![Document {
                source: None,
                text: pipeline.run(&text),
            }]
        } else {
            process_files(&pipeline, &self.files)?
        };

        for document in &documents {
            write_document(document, self.output_dir.as_deref())?;
        }

        let warnings = processor.warnings();
        if !warnings.is_empty() {
            output.warning(&format!(
                "{} diagram(s) could not be rendered and were kept as code blocks",
                warnings.len()
            ));
        }
        if let Some(dir) = &self.output_dir {
            output.done(&format!(
                "Processed {} document(s) into {}",
                documents.len(),
                dir.display()
            ));
        }

        Ok(())
    }
}

/// Read and process files in parallel, keeping input order.
fn process_files(pipeline: &Pipeline, files: &[PathBuf]) -> Result<Vec<Document>, CliError> {
    files
        .par_iter()
        .map(|path| {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::File {
                path: path.clone(),
                source,
            })?;
            Ok(Document {
                source: Some(path.clone()),
                text: pipeline.run(&text),
            })
        })
        .collect()
}

/// Reject inputs that would overwrite each other in one output directory.
fn check_unique_names(files: &[PathBuf]) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for path in files {
        let name = path.file_name().ok_or_else(|| {
            CliError::Validation(format!("{} is not a file path", path.display()))
        })?;
        if !seen.insert(name) {
            return Err(CliError::Validation(format!(
                "duplicate output file name: {}",
                Path::new(name).display()
            )));
        }
    }
    Ok(())
}

/// Output path of `source` inside `dir`.
fn output_path(dir: &Path, source: Option<&Path>) -> PathBuf {
    let name = source
        .and_then(Path::file_name)
        .map_or_else(|| PathBuf::from("stdin.md"), PathBuf::from);
    dir.join(name)
}

fn write_document(document: &Document, output_dir: Option<&Path>) -> Result<(), CliError> {
    if let Some(dir) = output_dir {
        let path = output_path(dir, document.source.as_deref());
        std::fs::write(&path, &document.text).map_err(|source| CliError::File { path, source })?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(document.text.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}
