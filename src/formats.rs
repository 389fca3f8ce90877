//! Format trait and implementations for different page sources.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing the
//! tree-sitter grammar and the queries that locate headings (section anchors) and fenced code
//! blocks (copyable snippets).

pub mod markdown;

/// Grammar and queries needed to turn a source file into sections and snippets.
pub trait Format {
    /// Tree-sitter grammar for the block structure of the document.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing each heading's depth marker as `@marker` and its text as `@title`.
    fn heading_query(&self) -> &str;
    /// Query capturing fenced blocks as `@block`, with optional `@language` and `@content`.
    fn snippet_query(&self) -> &str;
}
