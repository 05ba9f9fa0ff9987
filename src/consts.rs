//! Shared numeric constants for the engine.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an item may be resized to, in canvas units.
pub const MIN_ITEM_SIZE: f64 = 1.0;

/// Width given to new items that arrive without a position.
pub const DEFAULT_ITEM_WIDTH: f64 = 120.0;

/// Height given to new items that arrive without a position.
pub const DEFAULT_ITEM_HEIGHT: f64 = 80.0;

/// Committed coordinates snap to a grid of this many steps per canvas unit.
pub const GRID_STEPS_PER_UNIT: f64 = 100.0;

/// Offset applied on both axes from the last added item when placing a new one.
pub const ADD_ITEM_OFFSET: f64 = 20.0;

// ── Interaction ─────────────────────────────────────────────────

/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_THRESHOLD_PX: f64 = 4.0;

/// Hit slop around resize handles, in canvas units.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Scoring ─────────────────────────────────────────────────────

/// Per-axis distance within which a placed item counts as correct.
pub const DEFAULT_PLACEMENT_TOLERANCE: f64 = 10.0;

/// Points awarded per correctly arranged item when a section has no explicit budget.
pub const DEFAULT_POINTS_PER_ITEM: u32 = 1;
