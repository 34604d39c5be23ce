//! Fenced block scanner.
//!
//! Finds fenced code blocks carrying a specific info tag and replaces each
//! whole block (fence lines included) with the output of a handler. All other
//! text is copied through byte for byte.

use regex::Regex;

use crate::fence::Fence;

/// Scanner for fenced code blocks tagged with a single info word.
///
/// An opening fence starts at column zero with three or more backticks or
/// tildes, followed by optional spaces/tabs, the tag (case-sensitive),
/// optional spaces/tabs and a line break. The block ends at the first
/// following line that consists of the same fence character, repeated at
/// least as often, plus optional trailing spaces/tabs. Openings without a
/// closing line are left untouched.
///
/// # Example
///
/// ```
/// use wd_renderer::FencedBlockScanner;
///
/// let scanner = FencedBlockScanner::new("wavedrom");
/// let output = scanner.replace_all("a\n```wavedrom\n{ x }\n```\nb\n", |body| {
///     format!("<{body}>")
/// });
/// assert_eq!(output, "a\n<{ x }>\nb\n");
/// ```
#[derive(Debug, Clone)]
pub struct FencedBlockScanner {
    opening: Regex,
}

impl FencedBlockScanner {
    /// Create a scanner for blocks tagged `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let pattern = format!(r"(?m)^(`{{3,}}|~{{3,}})[ \t]*{}[ \t]*\r?\n", regex::escape(tag));
        Self {
            opening: Regex::new(&pattern).expect("fence pattern with escaped tag is valid"),
        }
    }

    /// Replace every tagged block in `text` with `handler(body)`.
    ///
    /// `body` is the text between the fence lines with surrounding
    /// whitespace trimmed. The replacement covers both fence lines but not
    /// the line break after the closing fence.
    pub fn replace_all<F>(&self, text: &str, mut handler: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut output = String::with_capacity(text.len());
        let mut copied = 0;
        let mut search = 0;

        while let Some(caps) = self.opening.captures_at(text, search) {
            let (Some(open), Some(marker)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let Some(fence) = Fence::parse(marker.as_str()) else {
                search = open.end();
                continue;
            };

            let body_start = open.end();
            let Some((close_start, close_end)) = find_closing(text, body_start, fence) else {
                // Unclosed: keep the opening line as plain text
                search = body_start;
                continue;
            };

            output.push_str(&text[copied..open.start()]);
            output.push_str(&handler(text[body_start..close_start].trim()));
            copied = close_end;
            search = close_end;
        }

        output.push_str(&text[copied..]);
        output
    }
}

/// Find the closing fence line at or after `from`.
///
/// Returns the byte range of the closing line, excluding its line break.
fn find_closing(text: &str, from: usize, fence: Fence) -> Option<(usize, usize)> {
    let mut line_start = from;
    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = text[line_start..line_end].trim_end_matches('\r');

        if fence.is_closed_by(line) {
            return Some((line_start, line_start + line.len()));
        }
        line_start = line_end + 1;
    }
    None
}
