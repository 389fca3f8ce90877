//! The UI renders the application state into something visible and scrollable.
//!
//! The frame is a navigation header, the page itself (optionally beside a navigation panel) and
//! a help bar. The header highlights the active section and tightens its chrome once the page has
//! been scrolled; snippets carry a copy marker that lights up while their copy indicator is armed.

use crate::app_state::AppState;
use crate::highlight::Highlights;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::time::Instant;

const NAV_PANEL_WIDTH: u16 = 28;

/// Renders the page, sizing the viewport to the space available.
pub fn draw(f: &mut Frame, app: &mut AppState, highlights: &Highlights) {
    let now = Instant::now();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let page_area = if app.nav_open {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(NAV_PANEL_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        draw_nav_panel(f, app, columns[0]);
        columns[1]
    } else {
        chunks[1]
    };

    let block = Block::default().borders(Borders::LEFT | Borders::RIGHT);
    let inner = block.inner(page_area);
    f.render_widget(block, page_area);
    app.set_viewport_height(usize::from(inner.height));
    draw_page(f, app, highlights, inner, now);

    draw_help(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let active = app.tracker.current_id();
    let mut spans = Vec::new();
    for (i, section) in app.tracker.sections().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if section.id == active {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", section.title), style));
    }

    let title = app
        .document
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map_or_else(|| "docscroll".to_string(), |n| n.to_string_lossy().into_owned());

    // Compact chrome once scrolled
    let block = if app.tracker.scrolled() {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            ))
    } else {
        Block::default().borders(Borders::BOTTOM).title(title)
    };

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_nav_panel(f: &mut Frame, app: &AppState, area: Rect) {
    let active = app.tracker.current_id();
    let items: Vec<ListItem> = app
        .tracker
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let indent = "  ".repeat(section.level.saturating_sub(1));
            let label = format!("{}{indent}{}", nav_key(i), section.title);
            let style = if section.id == active {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Sections"));
    f.render_widget(list, area);
}

fn nav_key(index: usize) -> String {
    if index < 9 {
        format!("{} ", index + 1)
    } else {
        "  ".to_string()
    }
}

fn draw_page(f: &mut Frame, app: &AppState, highlights: &Highlights, area: Rect, now: Instant) {
    let doc = &app.document;
    let active_row = doc
        .section(app.tracker.current_id())
        .map(|s| s.row);

    let lines: Vec<Line> = (app.scroll..doc.height())
        .take(usize::from(area.height))
        .map(|row| {
            let text = doc.rows[row].as_str();

            if let Some(section) = doc.sections.iter().find(|s| s.row == row) {
                let mut style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
                if Some(row) == active_row {
                    style = style.fg(Color::Green);
                }
                return Line::from(vec![
                    Span::styled("#".repeat(section.level), style.add_modifier(Modifier::DIM)),
                    Span::raw(" "),
                    Span::styled(section.title.clone(), style),
                ]);
            }

            if let Some(index) = doc.snippet_at(row) {
                return snippet_line(app, highlights, index, row, text, now);
            }

            Line::raw(text.to_string())
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn snippet_line(
    app: &AppState,
    highlights: &Highlights,
    index: usize,
    row: usize,
    text: &str,
    now: Instant,
) -> Line<'static> {
    let snippet = &app.document.snippets[index];
    let selected = app.selected_snippet == Some(index);

    if row == snippet.row_start {
        let marker = if app.is_copied(index, now) {
            Span::styled(
                " ✓ copied ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else if selected {
            Span::styled(" [c] copy ", Style::default().add_modifier(Modifier::REVERSED))
        } else {
            Span::styled(" [c] copy ", Style::default().fg(Color::DarkGray))
        };
        return Line::from(vec![
            Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            marker,
        ]);
    }

    let gutter = if selected {
        Span::styled("▌", Style::default().fg(Color::Green))
    } else {
        Span::styled("│", Style::default().fg(Color::DarkGray))
    };

    match highlights.get(&row) {
        Some(line) => {
            let mut spans = vec![gutter];
            spans.extend(line.spans.iter().cloned());
            Line::from(spans)
        }
        None => Line::from(vec![
            gutter,
            Span::styled(text.to_string(), Style::default().fg(Color::Yellow)),
        ]),
    }
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let help_text = app.message.clone().unwrap_or_else(|| {
        "↑/↓ PgUp/PgDn: Scroll | Tab/S-Tab: Next/Prev section | 1-9: Jump | [/]: Snippet | c: Copy | m: Menu | q: Quit"
            .to_string()
    });
    let position = format!(" {}/{} ", app.scroll + 1, app.max_scroll() + 1);

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(position));
    f.render_widget(help, area);
}
