#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn make_item(id: &str) -> Item {
    Item::new(id, Content::Text("iː".into()))
        .with_position(Rect::new(0.0, 0.0, 100.0, 80.0))
        .with_resizable(true)
}

// =============================================================
// Content / Item serde
// =============================================================

#[test]
fn content_serde_tagged() {
    let json = serde_json::to_value(Content::Audio("sheep.mp3".into())).unwrap();
    assert_eq!(json, json!({"type": "audio", "value": "sheep.mp3"}));
    let back: Content = serde_json::from_value(json!({"type": "image", "value": "lips.png"})).unwrap();
    assert_eq!(back, Content::Image("lips.png".into()));
}

#[test]
fn item_deserializes_with_defaults() {
    let item: Item = serde_json::from_value(json!({"id": "a"})).unwrap();
    assert_eq!(item.id, "a");
    assert_eq!(item.content, Content::Empty);
    assert!(item.position.is_none());
    assert!(item.style.is_empty());
    assert!(!item.resizable);
    assert!(item.correct_position.is_none());
}

#[test]
fn item_deserializes_full_record() {
    let item: Item = serde_json::from_value(json!({
        "id": "ipa-i",
        "content": {"type": "text", "value": "iː"},
        "position": {"x": 10.0, "y": 20.0, "width": 60.0, "height": 40.0},
        "style": {"background": "#fff"},
        "resizable": true,
        "correct_position": {"x": 200.0, "y": 40.0}
    }))
    .unwrap();
    assert_eq!(item.position, Some(Rect::new(10.0, 20.0, 60.0, 40.0)));
    assert_eq!(item.style.background(), Some("#fff"));
    assert_eq!(item.correct_position, Some(Point::new(200.0, 40.0)));
}

// =============================================================
// Style
// =============================================================

#[test]
fn style_accessors_default_when_absent() {
    let style = Style::new();
    assert!(style.background().is_none());
    assert!(style.border_color().is_none());
    assert_eq!(style.border_width(), 0.0);
}

#[test]
fn style_merge_sets_and_deletes_keys() {
    let style = Style::from_value(json!({"background": "red", "border_color": "blue"})).unwrap();
    let merged = style
        .merged(&json!({"background": null, "border_width": 2.0}))
        .unwrap();
    assert!(merged.background().is_none());
    assert_eq!(merged.border_color(), Some("blue"));
    assert_eq!(merged.border_width(), 2.0);
    // Input item is untouched.
    assert_eq!(style.background(), Some("red"));
}

#[test]
fn style_merge_rejects_non_object() {
    assert!(Style::new().merged(&json!("red")).is_none());
    assert!(Style::from_value(json!([1, 2])).is_none());
}

// =============================================================
// move_item
// =============================================================

#[test]
fn move_item_returns_shifted_copy() {
    let item = make_item("a");
    let moved = move_item(&item, Delta::new(15.0, -5.0)).unwrap();
    assert_eq!(moved.position, Some(Rect::new(15.0, -5.0, 100.0, 80.0)));
    assert_eq!(item.position, Some(Rect::new(0.0, 0.0, 100.0, 80.0)));
}

#[test]
fn move_item_round_trip() {
    let item = make_item("a");
    let d = Delta::new(33.0, 7.5);
    let back = move_item(&move_item(&item, d).unwrap(), d.inverse()).unwrap();
    assert_eq!(back, item);
}

#[test]
fn move_item_without_position_fails() {
    let item = Item::new("a", Content::Empty);
    let err = move_item(&item, Delta::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidGeometry { .. }));
}

#[test]
fn move_item_degenerate_size_fails() {
    let item = Item::new("a", Content::Empty).with_position(Rect::new(0.0, 0.0, 0.0, 10.0));
    assert!(matches!(move_item(&item, Delta::new(1.0, 1.0)), Err(LayoutError::InvalidGeometry { .. })));
}

#[test]
fn move_item_non_finite_delta_fails() {
    let item = make_item("a");
    assert!(move_item(&item, Delta::new(f64::NAN, 0.0)).is_err());
}

// =============================================================
// resize_item
// =============================================================

#[test]
fn resize_item_from_se() {
    let item = make_item("a");
    let resized = resize_item(&item, 150.0, 90.0, ResizeAnchor::Se, 1.0).unwrap();
    assert_eq!(resized.position, Some(Rect::new(0.0, 0.0, 150.0, 90.0)));
}

#[test]
fn resize_item_from_nw_moves_origin() {
    let item = make_item("a");
    let resized = resize_item(&item, 60.0, 50.0, ResizeAnchor::Nw, 1.0).unwrap();
    assert_eq!(resized.position, Some(Rect::new(40.0, 30.0, 60.0, 50.0)));
}

#[test]
fn resize_item_rejects_zero_and_negative() {
    let item = make_item("a");
    for (w, h) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 10.0), (10.0, -0.1)] {
        let err = resize_item(&item, w, h, ResizeAnchor::Se, 1.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGeometry { .. }), "{w}x{h}");
    }
}

#[test]
fn resize_item_rejects_below_minimum() {
    let item = make_item("a");
    assert!(resize_item(&item, 4.0, 50.0, ResizeAnchor::E, 5.0).is_err());
    assert!(resize_item(&item, 5.0, 50.0, ResizeAnchor::E, 5.0).is_ok());
}

#[test]
fn resize_item_rejects_non_resizable() {
    let item = make_item("a").with_resizable(false);
    let err = resize_item(&item, 150.0, 90.0, ResizeAnchor::Se, 1.0).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidGeometry { .. }));
}
