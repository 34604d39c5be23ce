//! Status messages on stderr. Stdout is reserved for processed documents.

use std::fmt::Display;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    /// Print one `name: value` settings line with a dimmed, aligned label.
    pub(crate) fn setting(&self, name: &str, value: impl Display) {
        let label = format!("{name:>9}:");
        self.line(&format!("{} {value}", self.label.apply_to(label)));
    }

    /// Print a completion message (green).
    pub(crate) fn done(&self, msg: &str) {
        self.line(&self.done.apply_to(msg).to_string());
    }

    /// Print a warning (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    /// Print a fatal error (bold red).
    pub(crate) fn error(&self, err: &dyn Display) {
        self.line(&format!("{} {err}", self.fail.apply_to("Error:")));
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
