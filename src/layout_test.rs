#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use super::*;
use crate::item::Content;

// =============================================================
// Helpers
// =============================================================

fn make_item_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> Item {
    Item::new(id, Content::Text(id.to_uppercase()))
        .with_position(Rect::new(x, y, w, h))
        .with_resizable(true)
}

fn loaded_store() -> LayoutStore {
    let mut store = LayoutStore::default();
    store
        .load_items(vec![
            make_item_at("a", 0.0, 0.0, 100.0, 80.0),
            make_item_at("b", 200.0, 50.0, 60.0, 60.0),
        ])
        .unwrap();
    store
}

// =============================================================
// load_items
// =============================================================

#[test]
fn load_items_populates_in_order() {
    let store = loaded_store();
    assert_eq!(store.len(), 2);
    let ids: Vec<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn load_items_cascades_missing_positions() {
    let mut store = LayoutStore::default();
    let snap = store
        .load_items(vec![
            make_item_at("a", 10.0, 10.0, 50.0, 50.0),
            Item::new("b", Content::Empty),
        ])
        .unwrap();
    let b = snap.position("b").unwrap();
    assert_eq!((b.x, b.y), (30.0, 30.0));
    assert_eq!((b.width, b.height), (120.0, 80.0));
}

#[test]
fn load_items_duplicate_leaves_store_untouched() {
    let mut store = loaded_store();
    let err = store
        .load_items(vec![make_item_at("x", 0.0, 0.0, 1.0, 1.0), make_item_at("x", 0.0, 0.0, 1.0, 1.0)])
        .unwrap_err();
    assert_eq!(err, LayoutError::DuplicateId("x".into()));
    assert_eq!(store.len(), 2);
    assert!(store.contains("a"));
}

// =============================================================
// apply_drag
// =============================================================

#[test]
fn apply_drag_moves_item() {
    let mut store = loaded_store();
    let snap = store.apply_drag("a", Delta::new(5.0, 7.0)).unwrap();
    assert_eq!(snap.position("a"), Some(Rect::new(5.0, 7.0, 100.0, 80.0)));
    assert_eq!(snap.position("b"), Some(Rect::new(200.0, 50.0, 60.0, 60.0)));
}

#[test]
fn apply_drag_inverse_round_trip() {
    let mut store = loaded_store();
    let before = store.snapshot();
    let d = Delta::new(-42.5, 13.0);
    store.apply_drag("b", d).unwrap();
    let after = store.apply_drag("b", d.inverse()).unwrap();
    assert_eq!(after, before);
}

#[test]
fn apply_drag_inverse_round_trip_fractional() {
    let mut store = LayoutStore::default();
    store.load_items(vec![make_item_at("a", 0.1, 0.3, 100.0, 80.0)]).unwrap();
    let before = store.snapshot();
    let d = Delta::new(0.2, 0.1);
    store.apply_drag("a", d).unwrap();
    let after = store.apply_drag("a", d.inverse()).unwrap();
    assert_eq!(after, before);
}

#[test]
fn apply_drag_inverse_round_trip_seeded() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut store = LayoutStore::default();
    store
        .load_items(vec![make_item_at(
            "a",
            rng.random_range(-1000.0..1000.0),
            rng.random_range(-1000.0..1000.0),
            100.0,
            80.0,
        )])
        .unwrap();
    for _ in 0..500 {
        let before = store.snapshot();
        let d = Delta::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));
        store.apply_drag("a", d).unwrap();
        let after = store.apply_drag("a", d.inverse()).unwrap();
        assert_eq!(after, before, "delta {d:?}");
        // Wander so the next round starts elsewhere.
        store.apply_drag("a", Delta::new(rng.random_range(-3.0..3.0), 0.7)).unwrap();
    }
}

#[test]
fn load_items_snaps_positions_to_grid() {
    let mut store = LayoutStore::default();
    let snap = store.load_items(vec![make_item_at("a", 0.123, 9.996, 50.004, 40.0)]).unwrap();
    assert_eq!(snap.position("a"), Some(Rect::new(0.12, 10.0, 50.0, 40.0)));
}

#[test]
fn apply_drag_missing_item() {
    let mut store = loaded_store();
    let err = store.apply_drag("zzz", Delta::new(1.0, 1.0)).unwrap_err();
    assert_eq!(err, LayoutError::ItemNotFound("zzz".into()));
}

// =============================================================
// apply_resize
// =============================================================

#[test]
fn apply_resize_updates_size() {
    let mut store = loaded_store();
    let snap = store.apply_resize("a", 150.0, 90.0, ResizeAnchor::Se).unwrap();
    assert_eq!(snap.position("a"), Some(Rect::new(0.0, 0.0, 150.0, 90.0)));
}

#[test]
fn apply_resize_degenerate_keeps_prior_state() {
    let mut store = loaded_store();
    let before = store.snapshot();
    let err = store.apply_resize("a", 0.0, 90.0, ResizeAnchor::Se).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidGeometry { .. }));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn apply_resize_missing_item() {
    let mut store = loaded_store();
    assert!(matches!(
        store.apply_resize("nope", 10.0, 10.0, ResizeAnchor::E),
        Err(LayoutError::ItemNotFound(_))
    ));
}

// =============================================================
// add_item / remove_item
// =============================================================

#[test]
fn add_item_cascades_from_last_added() {
    let mut store = loaded_store();
    let snap = store.add_item(make_item_at("c", 999.0, 999.0, 40.0, 30.0)).unwrap();
    let c = snap.position("c").unwrap();
    assert_eq!(c, Rect::new(220.0, 70.0, 40.0, 30.0));
    let b = snap.position("b").unwrap();
    assert_ne!(c.origin(), b.origin());
}

#[test]
fn add_item_into_empty_store_starts_at_origin() {
    let mut store = LayoutStore::default();
    let snap = store.add_item(Item::new("first", Content::Empty)).unwrap();
    assert_eq!(snap.position("first"), Some(Rect::new(0.0, 0.0, 120.0, 80.0)));
}

#[test]
fn add_item_duplicate_id() {
    let mut store = loaded_store();
    let err = store.add_item(make_item_at("a", 0.0, 0.0, 1.0, 1.0)).unwrap_err();
    assert_eq!(err, LayoutError::DuplicateId("a".into()));
    assert_eq!(store.len(), 2);
}

#[test]
fn remove_item_is_idempotent() {
    let mut store = loaded_store();
    let first = store.remove_item("a");
    let second = store.remove_item("a");
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert!(!store.contains("a"));
}

// =============================================================
// update_style
// =============================================================

#[test]
fn update_style_merges() {
    let mut store = loaded_store();
    let item = store
        .update_style("a", &json!({"background": "#ffeecc", "border_width": 3}))
        .unwrap();
    assert_eq!(item.style.background(), Some("#ffeecc"));
    assert_eq!(store.get("a").unwrap().style.border_width(), 3.0);
    assert_eq!(store.snapshot().get("a").unwrap().style.background(), Some("#ffeecc"));
}

#[test]
fn update_style_rejects_non_object() {
    let mut store = loaded_store();
    assert_eq!(
        store.update_style("a", &json!(42)).unwrap_err(),
        LayoutError::InvalidStyle("a".into())
    );
    assert!(matches!(store.update_style("q", &json!({})), Err(LayoutError::ItemNotFound(_))));
}

// =============================================================
// snapshot / restore
// =============================================================

#[test]
fn restore_round_trips_snapshot() {
    let mut store = loaded_store();
    let saved = store.snapshot();
    store.apply_drag("a", Delta::new(50.0, 50.0)).unwrap();
    store.apply_resize("b", 10.0, 10.0, ResizeAnchor::Se).unwrap();
    store.restore(&saved).unwrap();
    assert_eq!(store.snapshot(), saved);
}

#[test]
fn restore_drops_items_missing_from_snapshot() {
    let mut store = loaded_store();
    let saved = store.snapshot();
    store.add_item(Item::new("c", Content::Empty)).unwrap();
    store.restore(&saved).unwrap();
    assert_eq!(store.len(), 2);
    assert!(!store.contains("c"));
}

#[test]
fn restore_after_remove_needs_rehydration() {
    let mut store = loaded_store();
    let saved = store.snapshot();
    store.remove_item("b");
    let before = store.snapshot();
    assert_eq!(store.restore(&saved).unwrap_err(), LayoutError::ItemNotFound("b".into()));
    assert_eq!(store.snapshot(), before);

    store
        .load_items(vec![
            make_item_at("a", 0.0, 0.0, 100.0, 80.0),
            make_item_at("b", 1.0, 1.0, 60.0, 60.0),
        ])
        .unwrap();
    store.restore(&saved).unwrap();
    assert_eq!(store.snapshot(), saved);
}

#[test]
fn restore_is_all_or_nothing() {
    let mut store = loaded_store();
    let before = store.snapshot();
    let bad = LayoutSnapshot {
        placements: vec![
            Placement { id: "a".into(), position: Rect::new(1.0, 1.0, 10.0, 10.0), style: Style::new() },
            Placement { id: "b".into(), position: Rect::new(1.0, 1.0, 0.0, 10.0), style: Style::new() },
        ],
    };
    assert!(matches!(store.restore(&bad), Err(LayoutError::InvalidGeometry { .. })));
    assert_eq!(store.snapshot(), before);

    let unknown = LayoutSnapshot {
        placements: vec![Placement { id: "ghost".into(), position: Rect::new(0.0, 0.0, 1.0, 1.0), style: Style::new() }],
    };
    assert_eq!(store.restore(&unknown).unwrap_err(), LayoutError::ItemNotFound("ghost".into()));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn snapshot_serde_omits_empty_style() {
    let store = loaded_store();
    let value = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(
        value["placements"][0],
        json!({"id": "a", "position": {"x": 0.0, "y": 0.0, "width": 100.0, "height": 80.0}})
    );
    let back: LayoutSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(back, store.snapshot());
}

#[test]
fn spawn_rect_offsets_from_previous() {
    let prev = make_item_at("p", 5.0, 6.0, 10.0, 10.0);
    assert_eq!(spawn_rect(Some(&prev), 30.0, 20.0, 20.0), Rect::new(25.0, 26.0, 30.0, 20.0));
    assert_eq!(spawn_rect(None, 30.0, 20.0, 20.0), Rect::new(0.0, 0.0, 30.0, 20.0));
}
