use super::{Config, ConfigError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_empty_file_gives_defaults() {
    let cfg = Config::from_toml("").unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.copied_hold(), Duration::from_millis(2000));
}

#[test]
fn test_partial_file_overrides_only_given_keys() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "threshold = 5\nnav_depth = 3").unwrap();

    let cfg = Config::load_from(file.path()).unwrap();
    assert_eq!(cfg.threshold, 5);
    assert_eq!(cfg.nav_depth, 3);
    assert_eq!(cfg.copied_ms, 2000);
    assert_eq!(cfg.tracker().threshold, 5);
    assert_eq!(cfg.tracker().scrolled_offset, 1);
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let err = Config::from_toml("threshold = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(&dir.path().join("docscroll.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_frame_interval_never_zero() {
    let cfg = Config {
        frame_ms: 0,
        ..Config::default()
    };
    assert_eq!(cfg.frame_interval(), Duration::from_millis(1));
}
