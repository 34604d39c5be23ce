//! File-based SVG store.
//!
//! [`SvgStore`] keeps rendered diagrams as plain files under the content
//! root. The filename is the cache key, so there is no separate index:
//!
//! ```text
//! {content}/
//! +-- images/
//!     +-- wavedrom/                              # namespace directory
//!         +-- wavedrom_<md5>.svg                 # one entry per diagram text
//!         +-- .wavedrom_XXXXXX.svg               # in-flight render (staging)
//! ```
//!
//! Entries are published by renaming a fully written staging file onto the
//! final path. A reader therefore sees either no entry or a complete one.
//! Entries are never invalidated or removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::key::DiagramKey;
use crate::lock::KeyLocks;

/// Subdirectory of the content root that holds all generated images.
const IMAGES_DIR: &str = "images";

/// Extension of stored entries.
const SVG_EXTENSION: &str = "svg";

/// Content-addressed store for rendered SVG files.
#[derive(Debug)]
pub struct SvgStore {
    namespace: String,
    dir: PathBuf,
    locks: KeyLocks,
}

impl SvgStore {
    /// Create a store for `namespace` under `content_root`.
    ///
    /// The store directory is `<content_root>/images/<namespace>`. Nothing is
    /// created on disk until [`ensure_dir`](Self::ensure_dir) is called.
    #[must_use]
    pub fn new(content_root: &Path, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let dir = content_root.join(IMAGES_DIR).join(&namespace);
        Self {
            namespace,
            dir,
            locks: KeyLocks::default(),
        }
    }

    /// Create the store directory and any missing parents.
    ///
    /// Succeeds when the directory already exists.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        tracing::debug!(dir = %self.dir.display(), "diagram image directory ready");
        Ok(())
    }

    /// Store directory (`<content_root>/images/<namespace>`).
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Namespace used as directory name and filename prefix.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Filename of the entry for `hash`: `<namespace>_<hash>.svg`.
    #[must_use]
    pub fn filename(&self, hash: &str) -> String {
        format!("{}_{hash}.{SVG_EXTENSION}", self.namespace)
    }

    /// Full path of the entry for `hash`.
    #[must_use]
    pub fn path(&self, hash: &str) -> PathBuf {
        self.dir.join(self.filename(hash))
    }

    /// Site-relative path of the entry, e.g. `images/wavedrom/wavedrom_<hash>.svg`.
    #[must_use]
    pub fn site_path(&self, hash: &str) -> String {
        format!("{IMAGES_DIR}/{}/{}", self.namespace, self.filename(hash))
    }

    /// Compute the hash of a diagram description.
    #[must_use]
    pub fn hash(source: &str) -> String {
        DiagramKey::new(source).compute_hash()
    }

    /// Check whether an entry for `hash` exists.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.path(hash).exists()
    }

    /// Create an empty, uniquely named staging file inside the store directory.
    ///
    /// The file is removed when the returned [`TempPath`] is dropped unless it
    /// is handed to [`publish`](Self::publish). Staging next to the final
    /// entry keeps the publishing rename on a single filesystem.
    pub fn staging_file(&self) -> io::Result<TempPath> {
        let file = tempfile::Builder::new()
            .prefix(&format!(".{}_", self.namespace))
            .suffix(&format!(".{SVG_EXTENSION}"))
            .tempfile_in(&self.dir)?;
        Ok(file.into_temp_path())
    }

    /// Atomically move a staging file onto the entry for `hash`.
    ///
    /// An existing entry is replaced, so concurrent publishers of the same
    /// key end with one complete file.
    pub fn publish(&self, staging: TempPath, hash: &str) -> io::Result<PathBuf> {
        let target = self.path(hash);
        staging.persist(&target)?;
        Ok(target)
    }

    /// Run `f` while holding the in-process lock for `hash`.
    pub fn with_lock<R>(&self, hash: &str, f: impl FnOnce() -> R) -> R {
        self.locks.with_lock(hash, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HASH: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_store_layout() {
        let store = SvgStore::new(Path::new("/site/content"), "wavedrom");

        assert_eq!(store.dir(), Path::new("/site/content/images/wavedrom"));
        assert_eq!(store.namespace(), "wavedrom");
        assert_eq!(store.filename(HASH), format!("wavedrom_{HASH}.svg"));
        assert_eq!(
            store.path(HASH),
            PathBuf::from(format!("/site/content/images/wavedrom/wavedrom_{HASH}.svg"))
        );
        assert_eq!(
            store.site_path(HASH),
            format!("images/wavedrom/wavedrom_{HASH}.svg")
        );
    }

    #[test]
    fn test_hash_is_md5_of_source() {
        assert_eq!(SvgStore::hash("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = SvgStore::new(&tmp.path().join("deeply/nested/content"), "wavedrom");

        assert!(!store.dir().exists());
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_contains_after_publish() {
        let tmp = TempDir::new().unwrap();
        let store = SvgStore::new(tmp.path(), "wavedrom");
        store.ensure_dir().unwrap();

        assert!(!store.contains(HASH));

        let staging = store.staging_file().unwrap();
        fs::write(&staging, "<svg/>").unwrap();
        let published = store.publish(staging, HASH).unwrap();

        assert!(store.contains(HASH));
        assert_eq!(published, store.path(HASH));
        assert_eq!(fs::read_to_string(published).unwrap(), "<svg/>");
    }

    #[test]
    fn test_publish_replaces_existing_entry() {
        let tmp = TempDir::new().unwrap();
        let store = SvgStore::new(tmp.path(), "wavedrom");
        store.ensure_dir().unwrap();
        fs::write(store.path(HASH), "<svg>old</svg>").unwrap();

        let staging = store.staging_file().unwrap();
        fs::write(&staging, "<svg>new</svg>").unwrap();
        store.publish(staging, HASH).unwrap();

        assert_eq!(fs::read_to_string(store.path(HASH)).unwrap(), "<svg>new</svg>");
    }

    #[test]
    fn test_dropped_staging_file_is_removed() {
        let tmp = TempDir::new().unwrap();
        let store = SvgStore::new(tmp.path(), "wavedrom");
        store.ensure_dir().unwrap();

        let staging = store.staging_file().unwrap();
        let staging_path = staging.to_path_buf();
        assert!(staging_path.exists());
        assert!(staging_path.starts_with(store.dir()));

        drop(staging);
        assert!(!staging_path.exists());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_staging_file_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let store = SvgStore::new(&tmp.path().join("missing"), "wavedrom");
        assert!(store.staging_file().is_err());
    }
}
