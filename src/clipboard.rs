//! Copy-to-clipboard with a transient "copied" indicator.
//!
//! Each copyable snippet owns a [`TimedClipboardAction`]. A successful copy arms the indicator for
//! a fixed hold period; copying again while armed restarts the period instead of stacking, so the
//! indicator stays lit continuously. Time is passed in explicitly so the event loop can schedule
//! its wake-up around [`TimedClipboardAction::deadline`].

use std::time::{Duration, Instant};
use thiserror::Error;

/// How long the indicator stays lit after a successful copy.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(2000);

/// Failures while copying.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The host has no usable clipboard (headless session, permission denied, ...).
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    /// There is nothing to copy.
    #[error("nothing to copy")]
    EmptyText,
}

/// Destination for copied text.
pub trait ClipboardBackend {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::ClipboardUnavailable`] if the write cannot be performed.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard via `arboard`, opened afresh for each write.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::ClipboardUnavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::ClipboardUnavailable(e.to_string()))
    }
}

#[derive(Clone, Debug)]
/// A literal text value and the timer behind its "copied" indicator.
pub struct TimedClipboardAction {
    text: String,
    hold: Duration,
    armed_at: Option<Instant>,
}

impl TimedClipboardAction {
    #[must_use]
    /// Action copying `text`, lit for [`DEFAULT_HOLD`] after each success.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_hold(text, DEFAULT_HOLD)
    }

    #[must_use]
    /// Action copying `text`, lit for `hold` after each success.
    pub fn with_hold(text: impl Into<String>, hold: Duration) -> Self {
        Self {
            text: text.into(),
            hold,
            armed_at: None,
        }
    }

    #[must_use]
    /// The text this action copies.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Copy the text and (re)start the indicator at `now`.
    ///
    /// On failure the indicator is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::EmptyText`] for an empty action, or whatever the backend reports.
    pub fn copy(
        &mut self,
        backend: &mut impl ClipboardBackend,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        if self.text.is_empty() {
            return Err(ClipboardError::EmptyText);
        }
        if let Err(e) = backend.write_text(&self.text) {
            tracing::warn!(error = %e, "copy to clipboard failed");
            return Err(e);
        }
        tracing::debug!(bytes = self.text.len(), "copied to clipboard");
        self.armed_at = Some(now);
        Ok(())
    }

    #[must_use]
    /// Whether the indicator is lit at `now`.
    pub fn is_recently_copied(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now < deadline)
    }

    #[must_use]
    /// When the indicator is due to go dark, if it is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed_at.map(|at| at + self.hold)
    }

    /// Disarm the indicator once its hold period has passed. Returns whether it went dark.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.armed_at = None;
            true
        } else {
            false
        }
    }

    /// Drop any pending reset, leaving the indicator dark.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }
}

#[cfg(test)]
#[path = "tests/clipboard.rs"]
mod tests;
