//! Integration Tests: Configuration Flow
//!
//! Configuration files loaded from disk and fed into the facade.

use std::fs;

use locale_lend_core::commands::ranking::{rank_nearby, NearbyQuery};
use locale_lend_core::models::{RatingPolicy, SortKey, UnlocatedPolicy};
use locale_lend_core::{Error, GeoPoint, LendConfig, LocaleLend, LocaleLendBuilder};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper to write a config file into a temp dir
fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("locale-lend.json");
    fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

/// Test: a partial file fills the rest from defaults
#[test]
fn test_load_partial_file() {
    let (_dir, path) = write_config(
        r#"{
            "defaultLocation": { "type": "Point", "coordinates": [78.4867, 17.3850] },
            "searchRadiusMeters": 1500,
            "defaultSortKey": "popular"
        }"#,
    );

    let config = LendConfig::load(&path).unwrap();
    assert_eq!(config.default_location, GeoPoint::new(78.4867, 17.3850).unwrap());
    assert_eq!(config.search_radius_meters, 1500.0);
    assert_eq!(config.default_sort_key, SortKey::Popular);
    assert_eq!(config.page_size, 12);
    assert_eq!(config.rating_policy, RatingPolicy::Clamp);
    assert_eq!(config.unlocated_policy, UnlocatedPolicy::ZeroDistance);
    assert_eq!(config.otp_ttl_seconds, 300);
}

/// Test: the loaded file drives the nearby listing
#[test]
fn test_loaded_config_reaches_listing() {
    let (_dir, path) = write_config(
        r#"{ "defaultLocation": { "type": "Point", "coordinates": [78.4867, 17.3850] }, "searchRadiusMeters": 1500 }"#,
    );
    let lend = LocaleLend::new(LendConfig::load(&path).unwrap()).unwrap();

    let nearby = rank_nearby(&lend, &[], &NearbyQuery::default()).unwrap();
    assert_eq!(nearby.center, GeoPoint::new(78.4867, 17.3850).unwrap());
    assert_eq!(nearby.radius, 1500.0);
    assert!(nearby.items.is_empty());
}

/// Test: a config round-trips through its own JSON
#[test]
fn test_saved_config_reloads() {
    let config = LendConfig::production();
    let (_dir, path) = write_config(&serde_json::to_string_pretty(&config).unwrap());
    assert_eq!(LendConfig::load(&path).unwrap(), config);
}

/// Test: invalid files are reported as errors
#[test]
fn test_invalid_files() {
    let (_dir, path) = write_config(r#"{ "pageSize": 0 }"#);
    assert!(matches!(LendConfig::load(&path), Err(Error::Config(_))));

    let (_dir, path) = write_config("not json");
    assert!(matches!(LendConfig::load(&path), Err(Error::Serialization(_))));

    let (_dir, path) = write_config(r#"{ "ratingPolicy": "ignore" }"#);
    assert!(matches!(LendConfig::load(&path), Err(Error::Serialization(_))));
}

/// Test: builder values go through the same validation
#[test]
fn test_builder_validation() {
    let result = LocaleLendBuilder::new().search_radius(f64::NAN).build();
    assert!(matches!(result, Err(Error::Config(_))));

    let lend = LocaleLendBuilder::from_config(LendConfig::development()).build().unwrap();
    assert!(lend.config().debug);
}
