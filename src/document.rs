//! Loading a documentation page and extracting its anchors and snippets.
//!
//! The page is kept as its raw source rows, which are rendered as-is. Headings become
//! [`Section`]s keyed by anchor id and fenced code blocks become copyable [`Snippet`]s.

use crate::formats::Format;
use crate::section::{slugify, split_explicit_anchor, AnchorIds, Section, Snippet};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Failures while loading or parsing a page.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The page could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The grammar is incompatible with the linked tree-sitter runtime.
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    /// A format query failed to compile.
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser produced no tree.
    #[error("parser returned no tree")]
    Parse,
}

#[derive(Debug, Serialize)]
/// A parsed page: source rows plus the anchors and snippets found in them.
pub struct Document {
    /// Source file the page was loaded from, if any.
    pub path: Option<PathBuf>,
    /// Page content split into display rows.
    #[serde(skip)]
    pub rows: Vec<String>,
    /// Headings in document order.
    pub sections: Vec<Section>,
    /// Fenced code blocks in document order.
    pub snippets: Vec<Snippet>,
}

impl Document {
    /// Read and parse the page at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the format's grammar fails to load.
    pub fn load(path: &Path, format: &impl Format) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::parse(&source, format)?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Parse page content already in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar fails to load or a query does not compile.
    pub fn parse(source: &str, format: &impl Format) -> Result<Self, DocumentError> {
        let language = format.language();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser.parse(source, None).ok_or(DocumentError::Parse)?;
        let root = tree.root_node();
        let bytes = source.as_bytes();

        let sections = extract_sections(&language, format.heading_query(), root, bytes)?;
        let snippets = extract_snippets(&language, format.snippet_query(), root, bytes)?;
        tracing::debug!(
            sections = sections.len(),
            snippets = snippets.len(),
            "parsed document"
        );

        Ok(Self {
            path: None,
            rows: source.lines().map(str::to_string).collect(),
            sections,
            snippets,
        })
    }

    #[must_use]
    /// Number of display rows in the page.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    /// Looks up a section by anchor id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    /// Sections shallow enough to appear in the navigation bar.
    pub fn nav_sections(&self, max_level: usize) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|s| s.level <= max_level)
            .cloned()
            .collect()
    }

    #[must_use]
    /// Index of the snippet whose fences enclose `row`.
    pub fn snippet_at(&self, row: usize) -> Option<usize> {
        self.snippets.iter().position(|s| s.contains_row(row))
    }
}

fn node_text<'a>(node: Node<'_>, bytes: &'a [u8]) -> &'a str {
    node.utf8_text(bytes).unwrap_or_default()
}

fn marker_level(kind: &str) -> usize {
    kind.strip_prefix("atx_h")
        .and_then(|rest| rest.strip_suffix("_marker"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

fn extract_sections(
    language: &tree_sitter::Language,
    query_src: &str,
    root: Node<'_>,
    bytes: &[u8],
) -> Result<Vec<Section>, DocumentError> {
    let query = Query::new(language, query_src)?;
    let marker_ix = query.capture_index_for_name("marker");
    let title_ix = query.capture_index_for_name("title");

    let mut ids = AnchorIds::default();
    let mut sections = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, bytes);

    while let Some(m) = matches.next() {
        let mut level = 1;
        let mut row = None;
        let mut raw_title = "";
        for capture in m.captures {
            if Some(capture.index) == marker_ix {
                level = marker_level(capture.node.kind());
                row = Some(capture.node.start_position().row);
            } else if Some(capture.index) == title_ix {
                raw_title = node_text(capture.node, bytes);
            }
        }
        let Some(row) = row else { continue };

        let (title, explicit) = split_explicit_anchor(raw_title.trim());
        let id = ids.claim(&explicit.map_or_else(|| slugify(title), str::to_string));
        sections.push(Section {
            id,
            title: title.to_string(),
            level,
            order_index: sections.len(),
            row,
        });
    }

    Ok(sections)
}

fn extract_snippets(
    language: &tree_sitter::Language,
    query_src: &str,
    root: Node<'_>,
    bytes: &[u8],
) -> Result<Vec<Snippet>, DocumentError> {
    let query = Query::new(language, query_src)?;
    let block_ix = query.capture_index_for_name("block");
    let language_ix = query.capture_index_for_name("language");
    let content_ix = query.capture_index_for_name("content");

    let mut snippets: Vec<Snippet> = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, bytes);

    while let Some(m) = matches.next() {
        let mut block = None;
        let mut lang = None;
        let mut text = String::new();
        for capture in m.captures {
            if Some(capture.index) == block_ix {
                block = Some(capture.node);
            } else if Some(capture.index) == language_ix {
                lang = Some(node_text(capture.node, bytes).to_string());
            } else if Some(capture.index) == content_ix {
                text = node_text(capture.node, bytes).trim_end().to_string();
            }
        }
        let Some(block) = block else { continue };

        let row_start = block.start_position().row;
        // A block node ends at column 0 of the row after its closing fence.
        let end = block.end_position();
        let row_end = if end.column == 0 && end.row > row_start {
            end.row - 1
        } else {
            end.row
        };

        if snippets.last().is_some_and(|s| s.row_start == row_start) {
            continue;
        }
        snippets.push(Snippet {
            language: lang,
            text,
            row_start,
            row_end,
        });
    }

    Ok(snippets)
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
