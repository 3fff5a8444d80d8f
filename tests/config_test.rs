//! Integration tests for Settings loading with layered precedence.
//!
//! These tests pass the global layer explicitly (temp directories only), so
//! the user's real config never leaks in.

use std::fs;

use tempfile::TempDir;

use bintree::application::ApplicationError;
use bintree::config::Settings;

#[test]
fn given_global_and_explicit_config_when_load_then_explicit_wins() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("global.toml");
    let explicit = temp.path().join("explicit.toml");
    fs::write(&global, "display_limit = 5\ninteractive_limit = 3\n").unwrap();
    fs::write(&explicit, "display_limit = 8\n").unwrap();

    // Act
    let settings = Settings::load_layers(Some(&global), Some(&explicit)).unwrap();

    // Assert
    assert_eq!(settings.display_limit, 8, "explicit file overrides global");
    assert_eq!(settings.interactive_limit, 3, "global overrides defaults");
    assert!(settings.timings, "untouched keys keep defaults");
}

#[test]
fn given_missing_global_when_load_then_defaults_apply() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::load_layers(Some(&temp.path().join("none.toml")), None).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load_layers(None, Some(&temp.path().join("none.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_nested_random_range_when_load_then_parsed() {
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("range.toml");
    fs::write(&explicit, "[random]\nmin = -5\nmax = 5\n").unwrap();

    let settings = Settings::load_layers(None, Some(&explicit)).unwrap();

    assert_eq!(settings.random.min, -5);
    assert_eq!(settings.random.max, 5);
}

#[test]
fn given_inverted_range_in_file_when_load_then_rejected() {
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("inverted.toml");
    fs::write(&explicit, "[random]\nmin = 10\nmax = 1\n").unwrap();

    let result = Settings::load_layers(None, Some(&explicit));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_template_written_when_loaded_then_equals_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bintree.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load_layers(None, Some(&path)).unwrap();

    assert_eq!(settings, Settings::default());
}
