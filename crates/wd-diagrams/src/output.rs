//! Markdown substituted for diagram blocks.

use crate::consts::{ALT_TEXT, FALLBACK_LANGUAGE};

/// Image directive pointing at a rendered file.
///
/// `site_path` is relative to the content root, e.g.
/// `images/wavedrom/wavedrom_<hash>.svg`. The `{static}` prefix is resolved
/// by the site generator.
pub(crate) fn image_reference(site_path: &str) -> String {
    format!("![{ALT_TEXT}]({{static}}/{site_path})")
}

/// Fenced `json` block reproducing the unrendered description.
///
/// The fence is one backtick longer than the longest backtick run in the
/// description (at least three), so the block cannot close early.
pub(crate) fn fallback(description: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(description).max(2) + 1);
    format!("{fence}{FALLBACK_LANGUAGE}\n{description}\n{fence}")
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_reference() {
        assert_eq!(
            image_reference("images/wavedrom/wavedrom_abc.svg"),
            "![WaveDrom timing diagram]({static}/images/wavedrom/wavedrom_abc.svg)"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(
            fallback(r#"{"signal":[]}"#),
            "```json\n{\"signal\":[]}\n```"
        );
    }

    #[test]
    fn test_fallback_keeps_multiline_text() {
        assert_eq!(
            fallback("{ signal: [\n  { wave: \"01\" }\n]}"),
            "```json\n{ signal: [\n  { wave: \"01\" }\n]}\n```"
        );
    }

    #[test]
    fn test_fallback_short_backtick_runs_use_default_fence() {
        assert_eq!(fallback("{ a: \"``\" }"), "```json\n{ a: \"``\" }\n```");
    }

    #[test]
    fn test_fallback_lengthens_fence_for_backtick_runs() {
        assert_eq!(
            fallback("{ a: 1 }\n```\n"),
            "````json\n{ a: 1 }\n```\n\n````"
        );
    }
}
