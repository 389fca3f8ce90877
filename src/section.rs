//! Section and snippet representation for parsed documentation pages.
//!
//! A section is an anchor-addressable region of the page, introduced by a heading. Its `row` is
//! the document row of that heading and doubles as the scroll anchor: the distance between the
//! anchor and the viewport top decides which section is active.

use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Named, orderable content region with a stable anchor id.
pub struct Section {
    /// Anchor id, unique within the page (the `#<id>` fragment target).
    pub id: String,
    /// Heading text without markup or explicit anchor suffix.
    pub title: String,
    /// Heading depth (1 for `#`).
    pub level: usize,
    /// Position among sibling sections, in document order.
    pub order_index: usize,
    /// Document row of the heading.
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Fenced code block that can be copied to the clipboard.
pub struct Snippet {
    /// Info string language, if any (`bash` in "```bash").
    pub language: Option<String>,
    /// Code between the fences, without the trailing newline.
    pub text: String,
    /// First document row of the block (the opening fence).
    pub row_start: usize,
    /// Last document row of the block (the closing fence, or the last row if unclosed).
    pub row_end: usize,
}

impl Snippet {
    #[must_use]
    /// Whether `row` falls within the fenced block.
    pub fn contains_row(&self, row: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row)
    }
}

/// Split an explicit `{#id}` anchor off the end of a heading title.
///
/// Returns the bare title and the anchor id when one is present.
#[must_use]
pub fn split_explicit_anchor(title: &str) -> (&str, Option<&str>) {
    let trimmed = title.trim_end();
    if let Some(body) = trimmed.strip_suffix('}') {
        if let Some(open) = body.rfind("{#") {
            let id = body[open + 2..].trim();
            if !id.is_empty() && !id.contains(char::is_whitespace) {
                return (body[..open].trim_end(), Some(id));
            }
        }
    }
    (trimmed, None)
}

/// GitHub-style slug: lowercase, alphanumerics kept, spaces and hyphens become hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        } else if c == ' ' || c == '-' {
            slug.push('-');
        }
    }
    slug
}

/// Hands out unique anchor ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Default)]
pub struct AnchorIds {
    taken: HashSet<String>,
}

impl AnchorIds {
    /// Reserve `base` (or the next free suffixed variant of it).
    pub fn claim(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let mut candidate = base.to_string();
        let mut suffix = 0;
        while self.taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
