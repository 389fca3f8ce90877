//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a docscroll.toml, and if present we load settings from there.
//! This provides the tracking distances, the copy indicator hold time and display preferences.

use crate::tracker::TrackerConfig;
use facet::Facet;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "docscroll.toml";

/// Failures while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid TOML for [`Config`].
    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from docscroll.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 3)]
    /// Rows below the viewport top within which a heading counts as arrived.
    pub threshold: i64,
    #[facet(default = 1)]
    /// Rows of scroll after which the header switches to its compact chrome.
    pub scrolled_offset: i64,
    #[facet(default = 2000)]
    /// How long a snippet shows as copied, in milliseconds.
    pub copied_ms: u64,
    #[facet(default = 2)]
    /// Deepest heading level listed in the navigation and tracked.
    pub nav_depth: usize,
    #[facet(default = 16)]
    /// Minimum interval between frames, in milliseconds.
    pub frame_ms: u64,
    #[facet(default = "base16-ocean.dark".to_string())]
    /// Syntect theme used for snippet highlighting.
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 3,
            scrolled_offset: 1,
            copied_ms: 2000,
            nav_depth: 2,
            frame_ms: 16,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from docscroll.toml if present, else the defaults.
    ///
    /// A file that fails to parse is reported in the log and ignored.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring {CONFIG_FILE}");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    #[must_use]
    /// Tracker distances in rows.
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            threshold: self.threshold,
            scrolled_offset: self.scrolled_offset,
        }
    }

    #[must_use]
    /// Hold period for the copied indicator.
    pub fn copied_hold(&self) -> Duration {
        Duration::from_millis(self.copied_ms)
    }

    #[must_use]
    /// Minimum interval between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
