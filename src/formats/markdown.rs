//! Markdown format implementation using tree-sitter-md.
//!
//! Sections come from ATX-style headings (# syntax) and snippets from fenced code blocks.

use crate::formats::Format;

/// Tree-sitter queries for ATX headings and fenced code blocks.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading [(atx_h1_marker) (atx_h2_marker) (atx_h3_marker) (atx_h4_marker) (atx_h5_marker) (atx_h6_marker)] @marker (inline)? @title)"
    }

    fn snippet_query(&self) -> &'static str {
        "(fenced_code_block (info_string (language) @language)? (code_fence_content)? @content) @block"
    }
}
