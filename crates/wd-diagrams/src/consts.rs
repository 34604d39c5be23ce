//! Internal constants for diagram rendering.

use std::time::Duration;

/// Namespace used as image subdirectory and filename prefix.
pub const NAMESPACE: &str = "wavedrom";

/// Fence tag and extension name.
pub const EXTENSION_NAME: &str = "wavedrom";

/// Alt text of generated image references.
pub(crate) const ALT_TEXT: &str = "WaveDrom timing diagram";

/// Info tag of the fallback code block.
pub(crate) const FALLBACK_LANGUAGE: &str = "json";

/// Install instructions shown when the renderer is missing.
pub(crate) const INSTALL_HINT: &str = "npm install -g wavedrom-cli";

/// Default timeout for a single renderer run (30 seconds).
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between renderer exit checks.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(25);
