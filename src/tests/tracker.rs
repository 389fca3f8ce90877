use super::{AnchorSource, SectionTracker, TrackerConfig, TrackerError};
use crate::section::Section;
use std::collections::HashMap;

fn section(id: &str, order_index: usize) -> Section {
    Section {
        id: id.to_string(),
        title: id.to_string(),
        level: 2,
        order_index,
        row: order_index * 10,
    }
}

fn page() -> Vec<Section> {
    vec![
        section("home", 0),
        section("features", 1),
        section("installation", 2),
    ]
}

fn tops(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
    pairs.iter().map(|(id, top)| ((*id).to_string(), *top)).collect()
}

fn anchors(map: &HashMap<String, i64>) -> impl AnchorSource + '_ {
    move |id: &str| map.get(id).copied()
}

#[test]
fn test_features_becomes_active_once_risen() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let map = tops(&[("home", -500), ("features", 50), ("installation", 800)]);

    assert!(tracker.evaluate(600, &anchors(&map)));
    assert_eq!(tracker.current_id(), "features");
}

#[test]
fn test_lowest_qualifying_section_wins() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    // Both home and features are within the band; features is lower on the page
    let map = tops(&[("home", -40), ("features", 90), ("installation", 400)]);

    tracker.evaluate(40, &anchors(&map));
    assert_eq!(tracker.current_id(), "features");
}

#[test]
fn test_threshold_boundary_is_inclusive() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let map = tops(&[("home", -300), ("features", 100), ("installation", 101)]);

    tracker.evaluate(300, &anchors(&map));
    assert_eq!(tracker.current_id(), "features");
}

#[test]
fn test_no_match_keeps_current() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let map = tops(&[("home", -500), ("features", 50), ("installation", 800)]);
    tracker.evaluate(600, &anchors(&map));

    let below = tops(&[("home", 200), ("features", 300), ("installation", 400)]);
    assert!(!tracker.evaluate(0, &anchors(&below)));
    assert_eq!(tracker.current_id(), "features");
}

#[test]
fn test_initial_default_is_first_section() {
    let sections = vec![section("installation", 2), section("home", 0)];
    let tracker = SectionTracker::new(sections, TrackerConfig::default()).unwrap();

    assert_eq!(tracker.current_id(), "home");
    assert_eq!(tracker.sections()[0].id, "home");
}

#[test]
fn test_missing_anchor_is_a_non_match() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    // installation has no measurable anchor
    let map = tops(&[("home", -500), ("features", -20)]);

    tracker.evaluate(700, &anchors(&map));
    assert_eq!(tracker.current_id(), "features");
}

#[test]
fn test_current_id_stays_within_configured_set() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let ids = ["home", "features", "installation"];

    // Sweep the page from top to bottom and back, anchors 400 px apart
    let offsets: Vec<i64> = (0..=1200).step_by(37).chain((0..=1200).rev().step_by(53)).collect();
    for offset in offsets {
        let measure = |id: &str| {
            let index = ids.iter().position(|known| *known == id)?;
            Some(i64::try_from(index).unwrap() * 400 - offset)
        };
        tracker.evaluate(offset, &measure);
        assert!(ids.contains(&tracker.current_id()), "offset {offset}");
    }
}

#[test]
fn test_scrolled_flag_follows_offset() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let none = |_: &str| -> Option<i64> { None };

    tracker.evaluate(20, &none);
    assert!(!tracker.scrolled());
    tracker.evaluate(21, &none);
    assert!(tracker.scrolled());
    tracker.evaluate(0, &none);
    assert!(!tracker.scrolled());
}

#[test]
fn test_scroll_bursts_collapse_into_one_flush() {
    let mut tracker = SectionTracker::new(page(), TrackerConfig::default()).unwrap();
    let map = tops(&[("home", -900), ("features", -500), ("installation", 0)]);

    assert!(!tracker.is_dirty());
    for offset in [100, 400, 900] {
        tracker.on_scroll(offset);
    }
    assert!(tracker.is_dirty());
    // Nothing is evaluated until the frame flushes
    assert_eq!(tracker.current_id(), "home");

    assert!(tracker.flush(&anchors(&map)));
    assert_eq!(tracker.current_id(), "installation");
    assert!(tracker.scrolled());
    assert!(!tracker.is_dirty());
    assert!(!tracker.flush(&anchors(&map)));
}

#[test]
fn test_empty_section_list_is_rejected() {
    let result = SectionTracker::new(Vec::new(), TrackerConfig::default());
    assert_eq!(result.err(), Some(TrackerError::NoSections));
}

#[test]
fn test_designated_default() {
    let tracker = SectionTracker::new(page(), TrackerConfig::default())
        .unwrap()
        .with_default("installation")
        .unwrap();
    assert_eq!(tracker.current_id(), "installation");
    assert_eq!(tracker.current_index(), 2);

    let unknown = SectionTracker::new(page(), TrackerConfig::default())
        .unwrap()
        .with_default("pricing");
    assert_eq!(
        unknown.err(),
        Some(TrackerError::UnknownSection("pricing".to_string()))
    );
}
