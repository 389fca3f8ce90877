//! docscroll: a scroll-synchronised terminal pager for single-page markdown docs.
//!
//! The page's headings are anchors; as the reader scrolls, the [`tracker`] keeps the navigation
//! bar pointed at the section most recently scrolled to. Fenced code blocks become snippets with a
//! [`clipboard`] action whose "copied" indicator lights up for a short hold after each copy.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod formats;
pub mod highlight;
pub mod section;
pub mod tracker;
pub mod ui;
