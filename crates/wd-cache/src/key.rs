//! Diagram cache key computation.
//!
//! Provides [`DiagramKey`] for computing content-based hashes used as cache keys.

use md5::{Digest, Md5};

/// Diagram source for cache key computation.
///
/// The key covers the exact diagram description text. Identical text always
/// maps to the same hash, which makes the store content-addressed.
#[derive(Debug, Clone, Copy)]
pub struct DiagramKey<'a> {
    /// Diagram description (already trimmed by the scanner).
    pub source: &'a str,
}

impl<'a> DiagramKey<'a> {
    /// Create a key for the given diagram description.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Compute a content hash for this diagram key.
    ///
    /// # Hash Format
    ///
    /// Hex-encoded MD5 of the UTF-8 bytes of `source` (32 characters).
    #[must_use]
    pub fn compute_hash(&self) -> String {
        hex::encode(Md5::digest(self.source.as_bytes()))
    }
}
