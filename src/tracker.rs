//! Scroll-synchronised active section tracking.
//!
//! The navigation bar highlights whichever section the reader has most recently scrolled to. We
//! decide this by scanning the sections from the bottom of the page upwards and picking the first
//! one whose anchor has risen to within `threshold` of the viewport top. Scanning in reverse means
//! that when several anchors are above the threshold at once, the lowest one on the page wins.
//!
//! Scroll notifications can arrive far faster than frames are drawn, so the tracker separates
//! recording a scroll ([`SectionTracker::on_scroll`]) from evaluating it
//! ([`SectionTracker::flush`]); the event loop flushes once per frame.

use crate::section::Section;
use thiserror::Error;

/// Failures while configuring a tracker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// A tracker needs at least one section to have an active id.
    #[error("no sections to track")]
    NoSections,
    /// The requested default id is not among the tracked sections.
    #[error("unknown section id: {0}")]
    UnknownSection(String),
}

/// Reports where a section's anchor currently sits relative to the viewport top.
///
/// Positive values are below the top edge, negative values have scrolled past it. `None` means
/// the anchor cannot be measured (missing or not laid out), which counts as a non-match.
pub trait AnchorSource {
    /// Current distance from the viewport top to the anchor of section `id`.
    fn anchor_top(&self, id: &str) -> Option<i64>;
}

impl<F> AnchorSource for F
where
    F: Fn(&str) -> Option<i64>,
{
    fn anchor_top(&self, id: &str) -> Option<i64> {
        self(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Distances used when evaluating scroll position, in the host's units.
pub struct TrackerConfig {
    /// An anchor at or above this distance from the viewport top has "arrived".
    pub threshold: i64,
    /// Scroll offsets strictly greater than this set the `scrolled` flag.
    pub scrolled_offset: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            scrolled_offset: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Single source of truth for navigation highlighting.
pub struct ActiveSectionState {
    /// Id of the active section; always the default or a tracked id.
    pub current_id: String,
    /// Whether the page has scrolled past the chrome offset.
    pub scrolled: bool,
}

/// Maintains [`ActiveSectionState`] as a function of scroll position.
pub struct SectionTracker {
    sections: Vec<Section>,
    config: TrackerConfig,
    state: ActiveSectionState,
    pending: Option<i64>,
}

impl SectionTracker {
    /// Create a tracker over `sections`, defaulting to the first section by order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NoSections`] when `sections` is empty.
    pub fn new(mut sections: Vec<Section>, config: TrackerConfig) -> Result<Self, TrackerError> {
        sections.sort_by_key(|s| s.order_index);
        let first = sections.first().ok_or(TrackerError::NoSections)?;
        let state = ActiveSectionState {
            current_id: first.id.clone(),
            scrolled: false,
        };
        Ok(Self {
            sections,
            config,
            state,
            pending: None,
        })
    }

    /// Designate a different default active section.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnknownSection`] if `id` is not tracked.
    pub fn with_default(mut self, id: &str) -> Result<Self, TrackerError> {
        if !self.contains(id) {
            return Err(TrackerError::UnknownSection(id.to_string()));
        }
        self.state.current_id = id.to_string();
        Ok(self)
    }

    #[must_use]
    /// Tracked sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Whether `id` names a tracked section.
    pub fn contains(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id)
    }

    #[must_use]
    /// Current state snapshot.
    pub fn state(&self) -> &ActiveSectionState {
        &self.state
    }

    #[must_use]
    /// Id of the active section.
    pub fn current_id(&self) -> &str {
        &self.state.current_id
    }

    #[must_use]
    /// Position of the active section among the tracked sections.
    pub fn current_index(&self) -> usize {
        self.sections
            .iter()
            .position(|s| s.id == self.state.current_id)
            .unwrap_or(0)
    }

    #[must_use]
    /// Whether the page is scrolled past the chrome offset.
    pub fn scrolled(&self) -> bool {
        self.state.scrolled
    }

    /// Record a scroll notification without evaluating it.
    ///
    /// Only the latest offset matters, so bursts of notifications collapse into one evaluation.
    pub fn on_scroll(&mut self, offset: i64) {
        self.pending = Some(offset);
    }

    #[must_use]
    /// Whether a recorded scroll is waiting for [`flush`](Self::flush).
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Evaluate the latest recorded scroll, if any. Returns whether the active id changed.
    pub fn flush(&mut self, anchors: &impl AnchorSource) -> bool {
        match self.pending.take() {
            Some(offset) => self.evaluate(offset, anchors),
            None => false,
        }
    }

    /// Re-evaluate the active section at `offset`. Returns whether the active id changed.
    pub fn evaluate(&mut self, offset: i64, anchors: &impl AnchorSource) -> bool {
        self.state.scrolled = offset > self.config.scrolled_offset;

        let arrived = self.sections.iter().rev().find(|section| {
            anchors
                .anchor_top(&section.id)
                .is_some_and(|top| top <= self.config.threshold)
        });

        match arrived {
            Some(section) if section.id != self.state.current_id => {
                tracing::trace!(from = %self.state.current_id, to = %section.id, "active section");
                self.state.current_id.clone_from(&section.id);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
