//! Engine configuration with explicit defaults and environment overrides.

use serde::{Deserialize, Serialize};

use crate::consts::{
    ADD_ITEM_OFFSET, CLICK_THRESHOLD_PX, DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, DEFAULT_PLACEMENT_TOLERANCE,
    DEFAULT_POINTS_PER_ITEM, HANDLE_RADIUS_PX, MIN_ITEM_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-axis distance within which a placed item counts as correct.
    pub placement_tolerance: f64,
    /// Offset from the last added item for newly added items.
    pub add_offset: f64,
    /// Pointer travel below which a press is a click rather than a drag.
    pub click_threshold: f64,
    /// Hit slop around resize handles.
    pub handle_radius: f64,
    /// Smallest width/height an item may be resized to.
    pub min_item_size: f64,
    pub default_item_width: f64,
    pub default_item_height: f64,
    /// Points per correctly arranged item for sections without a budget.
    pub points_per_item: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placement_tolerance: DEFAULT_PLACEMENT_TOLERANCE,
            add_offset: ADD_ITEM_OFFSET,
            click_threshold: CLICK_THRESHOLD_PX,
            handle_radius: HANDLE_RADIUS_PX,
            min_item_size: MIN_ITEM_SIZE,
            default_item_width: DEFAULT_ITEM_WIDTH,
            default_item_height: DEFAULT_ITEM_HEIGHT,
            points_per_item: DEFAULT_POINTS_PER_ITEM,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `VOWEL_PLACEMENT_TOLERANCE`: default 10
    /// - `VOWEL_ADD_OFFSET`: default 20
    /// - `VOWEL_CLICK_THRESHOLD`: default 4
    /// - `VOWEL_MIN_ITEM_SIZE`: default 1
    /// - `VOWEL_POINTS_PER_ITEM`: default 1
    ///
    /// Values that fail to parse, or are not strictly positive, are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            placement_tolerance: env_parse_positive("VOWEL_PLACEMENT_TOLERANCE", defaults.placement_tolerance),
            add_offset: env_parse_positive("VOWEL_ADD_OFFSET", defaults.add_offset),
            click_threshold: env_parse_positive("VOWEL_CLICK_THRESHOLD", defaults.click_threshold),
            min_item_size: env_parse_positive("VOWEL_MIN_ITEM_SIZE", defaults.min_item_size),
            points_per_item: env_parse_u32("VOWEL_POINTS_PER_ITEM", defaults.points_per_item),
            ..defaults
        }
    }
}

fn env_parse_positive(key: &str, default: f64) -> f64 {
    match std::env::var(key).map(|v| v.trim().parse::<f64>()) {
        Ok(Ok(v)) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn env_parse_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key).map(|v| v.trim().parse::<u32>()) {
        Ok(Ok(v)) if v > 0 => v,
        _ => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
