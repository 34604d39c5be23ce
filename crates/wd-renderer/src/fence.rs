//! Code fence markers.
//!
//! Code fences can use backticks or tildes (three or more). The closing
//! fence must use the same character and be at least as long as the
//! opening fence.

/// An opening fence: its character and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    /// Character used for the fence (backtick or tilde).
    ch: char,
    /// Length of the opening fence (minimum length for closing).
    len: usize,
}

impl Fence {
    /// Parse a fence marker made only of fence characters.
    ///
    /// Returns `None` for mixed characters, other characters, or fewer
    /// than three characters.
    pub(crate) fn parse(marker: &str) -> Option<Self> {
        let ch = marker.chars().next()?;
        if ch != '`' && ch != '~' {
            return None;
        }

        let len = marker.chars().take_while(|&c| c == ch).count();
        if len >= 3 && len == marker.len() {
            Some(Self { ch, len })
        } else {
            None
        }
    }

    /// Check if a line closes this fence.
    ///
    /// The closing line must:
    /// - Start at column zero with the same character as opening
    /// - Be at least as long as opening
    /// - Contain only spaces or tabs after the fence characters
    pub(crate) fn is_closed_by(&self, line: &str) -> bool {
        let count = line.chars().take_while(|&c| c == self.ch).count();
        if count < self.len {
            return false;
        }

        line[count..].chars().all(|c| c == ' ' || c == '\t')
    }
}
