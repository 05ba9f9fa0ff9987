#![allow(clippy::float_cmp)]

use super::*;

/// # Safety
/// Env-mutating tests share process state; each test uses its own keys.
unsafe fn clear_env() {
    unsafe {
        std::env::remove_var("VOWEL_PLACEMENT_TOLERANCE");
        std::env::remove_var("VOWEL_ADD_OFFSET");
        std::env::remove_var("VOWEL_CLICK_THRESHOLD");
        std::env::remove_var("VOWEL_MIN_ITEM_SIZE");
        std::env::remove_var("VOWEL_POINTS_PER_ITEM");
    }
}

#[test]
fn default_tolerance_is_not_zero() {
    let cfg = EngineConfig::default();
    assert!(cfg.placement_tolerance > 0.0);
    assert_eq!(cfg.placement_tolerance, DEFAULT_PLACEMENT_TOLERANCE);
    assert_eq!(cfg.points_per_item, 1);
}

#[test]
fn from_env_reads_overrides_and_ignores_garbage() {
    unsafe {
        clear_env();
        std::env::set_var("VOWEL_PLACEMENT_TOLERANCE", "12.5");
        std::env::set_var("VOWEL_ADD_OFFSET", "not-a-number");
        std::env::set_var("VOWEL_MIN_ITEM_SIZE", "-3");
        std::env::set_var("VOWEL_POINTS_PER_ITEM", "2");
    }

    let cfg = EngineConfig::from_env();
    assert_eq!(cfg.placement_tolerance, 12.5);
    assert_eq!(cfg.add_offset, ADD_ITEM_OFFSET);
    assert_eq!(cfg.min_item_size, MIN_ITEM_SIZE);
    assert_eq!(cfg.points_per_item, 2);
    assert_eq!(cfg.click_threshold, CLICK_THRESHOLD_PX);

    unsafe { clear_env() };
}

#[test]
fn deserializes_partial_json_with_defaults() {
    let cfg: EngineConfig = serde_json::from_str(r#"{"placement_tolerance": 3.0}"#).unwrap();
    assert_eq!(cfg.placement_tolerance, 3.0);
    assert_eq!(cfg.add_offset, ADD_ITEM_OFFSET);
}
