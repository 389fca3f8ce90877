use super::AppState;
use crate::clipboard::{ClipboardBackend, ClipboardError};
use crate::config::Config;
use crate::document::Document;
use crate::formats::markdown::MarkdownFormat;
use crate::tracker::AnchorSource;
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingClipboard {
    writes: Vec<String>,
}

impl ClipboardBackend for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

struct NoClipboard;

impl ClipboardBackend for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::ClipboardUnavailable("denied".to_string()))
    }
}

/// Headings on rows 0, 10 and 20, a snippet on rows 21-23, 40 rows in total.
fn page() -> String {
    let mut rows = vec!["# Home".to_string()];
    rows.extend((1..10).map(|i| format!("home line {i}")));
    rows.push("## Features".to_string());
    rows.extend((11..20).map(|i| format!("features line {i}")));
    rows.push("## Install".to_string());
    rows.push("```sh".to_string());
    rows.push("pip install debugbuddy-cli".to_string());
    rows.push("```".to_string());
    rows.extend((24..40).map(|i| format!("install line {i}")));
    rows.join("\n") + "\n"
}

fn app() -> AppState {
    let doc = Document::parse(&page(), &MarkdownFormat).unwrap();
    let mut app = AppState::new(doc, &Config::default()).unwrap();
    app.set_viewport_height(5);
    app
}

#[test]
fn test_starts_on_first_section() {
    let app = app();
    assert_eq!(app.tracker.current_id(), "home");
    assert!(!app.tracker.scrolled());
    assert_eq!(app.max_scroll(), 35);
}

#[test]
fn test_scroll_is_evaluated_on_flush() {
    let mut app = app();

    app.scroll_to(9);
    assert_eq!(app.tracker.current_id(), "home", "evaluated before flush");
    assert!(app.flush_scroll());
    assert_eq!(app.tracker.current_id(), "features");

    // Features is 4 rows down, outside the 3-row band
    app.scroll_to(6);
    app.flush_scroll();
    assert_eq!(app.tracker.current_id(), "home");
}

#[test]
fn test_viewport_measures_anchor_distance() {
    let mut app = app();
    app.scroll_to(12);
    let viewport = app.viewport();

    assert_eq!(viewport.anchor_top("home"), Some(-12));
    assert_eq!(viewport.anchor_top("features"), Some(-2));
    assert_eq!(viewport.anchor_top("install"), Some(8));
    assert_eq!(viewport.anchor_top("pricing"), None);
}

#[test]
fn test_scrolled_flag() {
    let mut app = app();
    app.scroll_by(1);
    app.flush_scroll();
    assert!(!app.tracker.scrolled());

    app.scroll_by(1);
    app.flush_scroll();
    assert!(app.tracker.scrolled());

    app.scroll_by(-5);
    app.flush_scroll();
    assert_eq!(app.scroll, 0);
    assert!(!app.tracker.scrolled());
}

#[test]
fn test_scroll_is_clamped() {
    let mut app = app();
    app.scroll_to(1000);
    assert_eq!(app.scroll, 35);

    app.set_viewport_height(10);
    assert_eq!(app.scroll, 30);
    app.flush_scroll();
    assert_eq!(app.tracker.current_id(), "install");
}

#[test]
fn test_fragment_links() {
    let mut app = app();

    assert!(app.jump_to_section("#install"));
    app.flush_scroll();
    assert_eq!(app.scroll, 20);
    assert_eq!(app.tracker.current_id(), "install");

    assert!(!app.jump_to_section("pricing"));
    assert_eq!(app.scroll, 20);
}

#[test]
fn test_nav_links() {
    let mut app = app();

    assert!(app.next_nav());
    app.flush_scroll();
    assert_eq!(app.tracker.current_id(), "features");

    assert!(app.jump_to_nav(2));
    app.flush_scroll();
    assert_eq!(app.tracker.current_id(), "install");
    assert!(!app.next_nav());

    // Partway into a section, going back lands on its own heading first
    app.scroll_to(22);
    app.flush_scroll();
    assert!(app.prev_nav());
    assert_eq!(app.scroll, 20);
    app.flush_scroll();
    assert!(app.prev_nav());
    assert_eq!(app.scroll, 10);

    assert!(!app.jump_to_nav(7));
}

#[test]
fn test_copy_visible_snippet() {
    let mut app = app();
    let mut backend = RecordingClipboard::default();
    let t0 = Instant::now();

    app.copy_selected(&mut backend, t0).unwrap();
    assert!(backend.writes.is_empty(), "no snippet on screen at the top");

    app.jump_to_section("install");
    app.copy_selected(&mut backend, t0).unwrap();
    assert_eq!(backend.writes, vec!["pip install debugbuddy-cli"]);
    assert_eq!(app.selected_snippet, Some(0));
    assert!(app.is_copied(0, t0 + Duration::from_millis(1999)));
    assert_eq!(app.next_deadline(), Some(t0 + Duration::from_secs(2)));

    assert!(!app.tick(t0 + Duration::from_millis(1999)));
    assert!(app.tick(t0 + Duration::from_secs(2)));
    assert!(!app.is_copied(0, t0 + Duration::from_secs(2)));
    assert_eq!(app.message, None);
}

#[test]
fn test_failed_copy_stays_dark() {
    let mut app = app();
    let t0 = Instant::now();
    app.jump_to_section("install");

    assert!(app.copy_selected(&mut NoClipboard, t0).is_err());
    assert!(!app.is_copied(0, t0));
    assert_eq!(app.next_deadline(), None);
    assert_eq!(app.message.as_deref(), Some("Copy failed"));
}

#[test]
fn test_snippet_selection_scrolls_into_view() {
    let mut app = app();

    app.select_next_snippet();
    assert_eq!(app.selected_snippet, Some(0));
    assert!(app.visible_snippets().contains(&0));
    assert!(app.scroll <= 21 && app.scroll + app.viewport_height > 23);

    // Only one snippet on the page
    app.select_next_snippet();
    app.select_prev_snippet();
    assert_eq!(app.selected_snippet, Some(0));
}

#[test]
fn test_shutdown_cancels_timers() {
    let mut app = app();
    app.jump_to_section("install");
    app.copy_selected(&mut RecordingClipboard::default(), Instant::now())
        .unwrap();
    assert!(app.next_deadline().is_some());

    app.shutdown();
    assert_eq!(app.next_deadline(), None);
}

#[test]
fn test_no_navigable_headings() {
    let doc = Document::parse("### Deep only\n", &MarkdownFormat).unwrap();
    assert!(AppState::new(doc, &Config::default()).is_err());
}
