//! Content-addressed store for rendered `WaveDrom` diagrams.
//!
//! Rendered images live next to the site content and are named after the
//! MD5 digest of the diagram text. The file name *is* the cache key:
//!
//! - [`DiagramKey`]: computes the digest of a diagram description
//! - [`SvgStore`]: maps digests to paths, checks for entries, stages and
//!   atomically publishes new renders, and serializes work per key
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use wd_cache::SvgStore;
//!
//! let store = SvgStore::new(Path::new("content"), "wavedrom");
//! let hash = SvgStore::hash(r#"{"signal":[]}"#);
//! assert_eq!(
//!     store.path(&hash),
//!     Path::new("content/images/wavedrom").join(format!("wavedrom_{hash}.svg"))
//! );
//! ```

mod key;
mod lock;
mod store;

pub use key::DiagramKey;
pub use store::SvgStore;
