//! External renderer invocation.
//!
//! [`CliRenderer`] runs `wavedrom-cli -i <input> -s <output>` with a hard
//! timeout. Standard output and error are drained on reader threads while
//! the child is polled, so a chatty renderer never blocks on a full pipe.
//! The timeout also covers those pipes: a background process that inherits
//! them cannot hold a run open after the renderer exits.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_TIMEOUT, POLL_INTERVAL};

/// Renders one diagram description file into an SVG file.
pub trait DiagramRenderer: Send + Sync {
    /// Render `input` (diagram description) into `output` (SVG).
    ///
    /// `output` already exists as an empty file and must be overwritten.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Renderer failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Renderer executable was not found.
    #[error("{command} not found")]
    NotInstalled {
        /// Command that failed to start.
        command: String,
    },
    /// Renderer exited with a non-zero status.
    #[error("renderer failed ({status}): {stderr}")]
    Failed {
        /// Exit status as reported by the OS (e.g. `exit status: 1`).
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// Renderer did not finish in time and was killed.
    #[error("renderer timed out after {seconds}s")]
    Timeout {
        /// Timeout that was exceeded, in whole seconds rounded up.
        seconds: u64,
    },
    /// Renderer reported success without writing an image.
    #[error("renderer produced no output")]
    EmptyOutput,
    /// I/O error around the renderer run.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// [`DiagramRenderer`] backed by the `wavedrom-cli` executable.
#[derive(Debug, Clone)]
pub struct CliRenderer {
    command: String,
    timeout: Duration,
}

impl CliRenderer {
    /// Create a renderer running `command` with the default 30 second timeout.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the hard timeout for a single run.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command that is executed.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    fn spawn(&self, input: &Path, output: &Path) -> Result<Child, RenderError> {
        Command::new(&self.command)
            .arg("-i")
            .arg(input)
            .arg("-s")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    RenderError::NotInstalled {
                        command: self.command.clone(),
                    }
                } else {
                    RenderError::Io(e)
                }
            })
    }
}

impl DiagramRenderer for CliRenderer {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let mut child = self.spawn(input, output)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = self.collect(&stdout, deadline)?;
        let stderr = self.collect(&stderr, deadline)?;
        if !stdout.trim().is_empty() {
            tracing::debug!(command = %self.command, "renderer output: {}", stdout.trim());
        }

        if status.success() {
            Ok(())
        } else {
            Err(RenderError::Failed {
                status: status.to_string(),
                stderr: stderr.trim().to_owned(),
            })
        }
    }
}

impl CliRenderer {
    fn timed_out(&self) -> RenderError {
        RenderError::Timeout {
            seconds: self.timeout.as_secs() + u64::from(self.timeout.subsec_nanos() > 0),
        }
    }

    /// Wait for a drained pipe until `deadline`.
    ///
    /// The pipe stays open while any process holding it is alive, so this is
    /// bounded by the same deadline as the renderer itself.
    fn collect(
        &self,
        pipe: &Receiver<String>,
        deadline: Instant,
    ) -> Result<String, RenderError> {
        match pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(text) => Ok(text),
            Err(RecvTimeoutError::Timeout) => Err(self.timed_out()),
            Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
        }
    }
}

/// Read a child pipe to the end on a detached thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}
