//! Syntax highlighting for snippet rows.
//!
//! Snippets are highlighted once when the page loads; the result maps document rows to styled
//! lines so the renderer can swap them in while scrolling.

use crate::document::Document;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::collections::HashMap;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Styled replacement lines keyed by document row.
pub type Highlights = HashMap<usize, Line<'static>>;

fn convert(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(ratatui::style::Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(ratatui::style::Modifier::ITALIC);
    }
    out
}

/// Highlights the content rows of every snippet whose language syntect recognises.
///
/// Snippets without a language, or with an unknown one, are left to the plain renderer, as is
/// everything when `theme` is not a bundled theme.
#[must_use]
pub fn highlight_snippets(document: &Document, theme: &str) -> Highlights {
    let syntaxes = SyntaxSet::load_defaults_newlines();
    let themes = ThemeSet::load_defaults();
    let mut highlights = Highlights::new();

    let Some(theme) = themes.themes.get(theme) else {
        tracing::warn!(theme, "unknown highlight theme");
        return highlights;
    };

    for snippet in &document.snippets {
        let Some(syntax) = snippet
            .language
            .as_deref()
            .and_then(|lang| syntaxes.find_syntax_by_token(lang))
        else {
            continue;
        };
        let mut highlighter = HighlightLines::new(syntax, theme);
        let last_content = snippet.row_end.saturating_sub(1);
        for row in (snippet.row_start + 1)..=last_content {
            let Some(text) = document.rows.get(row) else {
                break;
            };
            let line = format!("{text}\n");
            match highlighter.highlight_line(&line, &syntaxes) {
                Ok(ranges) => {
                    let spans: Vec<Span<'static>> = ranges
                        .into_iter()
                        .map(|(style, piece)| {
                            Span::styled(piece.trim_end_matches('\n').to_string(), convert(style))
                        })
                        .collect();
                    highlights.insert(row, Line::from(spans));
                }
                Err(e) => {
                    tracing::debug!(error = %e, row, "highlighting stopped");
                    break;
                }
            }
        }
    }

    highlights
}
