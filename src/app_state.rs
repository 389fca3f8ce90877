//! The core state bridging the parsed page, the viewport and the interactive widgets.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the reader
//! scrolls. Scrolling only moves `scroll` and records the new offset with the tracker; the active
//! section is evaluated once per frame in [`AppState::flush_scroll`], measuring every anchor
//! against the viewport top. Each snippet carries its own copy timer, so copying one snippet never
//! disturbs the indicator of another.

use crate::clipboard::{ClipboardBackend, ClipboardError, TimedClipboardAction};
use crate::config::Config;
use crate::document::Document;
use crate::section::Section;
use crate::tracker::{AnchorSource, SectionTracker, TrackerError};
use std::time::Instant;

/// Measures heading anchors against a viewport scrolled to `scroll`.
pub struct Viewport<'a> {
    /// Sections whose anchors can be measured.
    pub sections: &'a [Section],
    /// First visible document row.
    pub scroll: usize,
}

impl AnchorSource for Viewport<'_> {
    fn anchor_top(&self, id: &str) -> Option<i64> {
        let section = self.sections.iter().find(|s| s.id == id)?;
        let row = i64::try_from(section.row).ok()?;
        let scroll = i64::try_from(self.scroll).ok()?;
        Some(row - scroll)
    }
}

/// Bridges the page, the viewport and the copy widgets, maintaining session state.
pub struct AppState {
    /// The parsed page.
    pub document: Document,
    /// Active section tracking over the navigation sections.
    pub tracker: SectionTracker,
    /// One copy action per snippet, parallel to `document.snippets`.
    pub copy_actions: Vec<TimedClipboardAction>,
    /// First visible document row.
    pub scroll: usize,
    /// Number of document rows the page area can show.
    pub viewport_height: usize,
    /// Snippet targeted by the copy key.
    pub selected_snippet: Option<usize>,
    /// Whether the navigation side panel is shown.
    pub nav_open: bool,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
}

impl AppState {
    /// Initialises state for `document`, tracking headings up to the configured nav depth.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NoSections`] if no heading is shallow enough to navigate to.
    pub fn new(document: Document, cfg: &Config) -> Result<Self, TrackerError> {
        let tracker = SectionTracker::new(document.nav_sections(cfg.nav_depth), cfg.tracker())?;
        let copy_actions = document
            .snippets
            .iter()
            .map(|s| TimedClipboardAction::with_hold(s.text.clone(), cfg.copied_hold()))
            .collect();

        let mut app = Self {
            document,
            tracker,
            copy_actions,
            scroll: 0,
            viewport_height: 1,
            selected_snippet: None,
            nav_open: false,
            message: None,
        };
        app.tracker.on_scroll(0);
        app.flush_scroll();
        Ok(app)
    }

    #[must_use]
    /// Anchor measurements for the current scroll position.
    pub fn viewport(&self) -> Viewport<'_> {
        Viewport {
            sections: &self.document.sections,
            scroll: self.scroll,
        }
    }

    #[must_use]
    /// Largest scroll that still fills the viewport.
    pub fn max_scroll(&self) -> usize {
        self.document.height().saturating_sub(self.viewport_height)
    }

    /// Resizes the viewport, keeping the scroll position in range.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        if self.scroll > self.max_scroll() {
            self.scroll_to(self.max_scroll());
        }
    }

    /// Scrolls so `row` is the first visible row (clamped to the page).
    pub fn scroll_to(&mut self, row: usize) {
        let row = row.min(self.max_scroll());
        if row != self.scroll {
            self.scroll = row;
            self.tracker.on_scroll(i64::try_from(row).unwrap_or(i64::MAX));
        }
    }

    /// Scrolls by `delta` rows, negative towards the top.
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_to(self.scroll.saturating_add_signed(delta));
    }

    /// Scrolls down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_to(self.scroll.saturating_add(self.viewport_height));
    }

    /// Scrolls up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_to(self.scroll.saturating_sub(self.viewport_height));
    }

    /// Evaluates any scroll recorded since the last frame. Returns whether the active id changed.
    pub fn flush_scroll(&mut self) -> bool {
        let viewport = Viewport {
            sections: &self.document.sections,
            scroll: self.scroll,
        };
        self.tracker.flush(&viewport)
    }

    /// Follows a `#<id>` link: scrolls the section's heading to the top of the viewport.
    ///
    /// Returns `false` (and leaves the viewport alone) for an unknown id.
    pub fn jump_to_section(&mut self, id: &str) -> bool {
        let id = id.strip_prefix('#').unwrap_or(id);
        match self.document.section(id) {
            Some(section) => {
                let row = section.row;
                self.scroll_to(row);
                true
            }
            None => {
                tracing::debug!(id, "no such anchor");
                false
            }
        }
    }

    /// Jumps to the `index`th navigation link.
    pub fn jump_to_nav(&mut self, index: usize) -> bool {
        match self.tracker.sections().get(index) {
            Some(section) => {
                let id = section.id.clone();
                self.jump_to_section(&id)
            }
            None => false,
        }
    }

    /// Jumps to the navigation link after the active one.
    pub fn next_nav(&mut self) -> bool {
        self.jump_to_nav(self.tracker.current_index() + 1)
    }

    /// Jumps to the navigation link before the active one, or to the top of the active section.
    pub fn prev_nav(&mut self) -> bool {
        let current = self.tracker.current_index();
        let current_row = self.tracker.sections()[current].row;
        if self.scroll > current_row {
            return self.jump_to_nav(current);
        }
        match current.checked_sub(1) {
            Some(prev) => self.jump_to_nav(prev),
            None => false,
        }
    }

    /// Shows or hides the navigation panel.
    pub fn toggle_nav(&mut self) {
        self.nav_open = !self.nav_open;
    }

    #[must_use]
    /// Indices of snippets with at least one row on screen.
    pub fn visible_snippets(&self) -> Vec<usize> {
        let bottom = self.scroll + self.viewport_height;
        self.document
            .snippets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.row_end >= self.scroll && s.row_start < bottom)
            .map(|(i, _)| i)
            .collect()
    }

    fn reveal_snippet(&mut self, index: usize) {
        let snippet = &self.document.snippets[index];
        let (start, end) = (snippet.row_start, snippet.row_end);
        if start < self.scroll {
            self.scroll_to(start);
        } else if end >= self.scroll + self.viewport_height {
            let fit = (end + 1).saturating_sub(self.viewport_height);
            self.scroll_to(fit.min(start));
        }
    }

    /// Selects the next snippet in page order, scrolling it into view.
    pub fn select_next_snippet(&mut self) {
        let next = match self.selected_snippet {
            Some(i) if i + 1 < self.document.snippets.len() => i + 1,
            Some(i) => i,
            None => match self.first_snippet_from_scroll() {
                Some(i) => i,
                None => return,
            },
        };
        self.selected_snippet = Some(next);
        self.reveal_snippet(next);
    }

    /// Selects the previous snippet in page order, scrolling it into view.
    pub fn select_prev_snippet(&mut self) {
        let prev = match self.selected_snippet {
            Some(i) => i.saturating_sub(1),
            None => match self.first_snippet_from_scroll() {
                Some(i) => i,
                None => return,
            },
        };
        self.selected_snippet = Some(prev);
        self.reveal_snippet(prev);
    }

    fn first_snippet_from_scroll(&self) -> Option<usize> {
        self.document
            .snippets
            .iter()
            .position(|s| s.row_end >= self.scroll)
            .or_else(|| self.document.snippets.len().checked_sub(1))
    }

    /// Copies the selected snippet, or the first one on screen when none is selected.
    ///
    /// # Errors
    ///
    /// Returns the clipboard failure; the snippet's indicator stays dark in that case.
    pub fn copy_selected(
        &mut self,
        backend: &mut impl ClipboardBackend,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        let target = self
            .selected_snippet
            .filter(|i| self.visible_snippets().contains(i))
            .or_else(|| self.visible_snippets().first().copied());
        let Some(index) = target else {
            self.message = Some("No snippet on screen".to_string());
            return Ok(());
        };
        self.selected_snippet = Some(index);

        match self.copy_actions[index].copy(backend, now) {
            Ok(()) => {
                self.message = Some("Copied to clipboard".to_string());
                Ok(())
            }
            Err(e) => {
                self.message = Some("Copy failed".to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    /// Whether snippet `index` shows as copied at `now`.
    pub fn is_copied(&self, index: usize, now: Instant) -> bool {
        self.copy_actions
            .get(index)
            .is_some_and(|a| a.is_recently_copied(now))
    }

    /// Expires copy indicators whose hold has passed. Returns whether any went dark.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for action in &mut self.copy_actions {
            changed |= action.tick(now);
        }
        if changed && self.copy_actions.iter().all(|a| a.deadline().is_none()) {
            self.message = None;
        }
        changed
    }

    #[must_use]
    /// Earliest pending indicator reset.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.copy_actions.iter().filter_map(TimedClipboardAction::deadline).min()
    }

    /// Cancels every pending indicator reset; called when the viewer closes.
    pub fn shutdown(&mut self) {
        for action in &mut self.copy_actions {
            action.cancel();
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
