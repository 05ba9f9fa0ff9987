//! Item model: the placeable/orderable unit and its pure transformations.
//!
//! Items arrive from the host's data layer (JSON) and are treated as values:
//! `move_item` and `resize_item` never mutate their input and always return a
//! fresh `Item`, so callers can keep the previous value for undo or for
//! rolling back a rejected change.
//!
//! `content` and `style` are opaque to the engine. Content is a handle the
//! renderer resolves (IPA text, an image URL, an audio clip); style is an
//! open-ended attribute bag the engine only merges and passes through.

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LayoutError;
use crate::geometry::{Delta, Point, Rect, ResizeAnchor};

/// Identifier of an item, unique within its owning layout or section.
pub type ItemId = String;

/// Renderable payload reference. Never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Content {
    /// Literal text, e.g. an IPA symbol or an example word.
    Text(String),
    /// Reference to an image asset.
    Image(String),
    /// Reference to an audio clip.
    Audio(String),
    /// Generic placeholder with no payload.
    #[default]
    Empty,
}

/// Opaque cosmetic attributes (background, border, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(Map<String, Value>);

impl Style {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a style from a JSON value. Returns `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Background color, if set.
    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.0.get("background").and_then(Value::as_str)
    }

    /// Border color, if set.
    #[must_use]
    pub fn border_color(&self) -> Option<&str> {
        self.0.get("border_color").and_then(Value::as_str)
    }

    /// Border width in canvas units. Defaults to `0.0` when absent.
    #[must_use]
    pub fn border_width(&self) -> f64 {
        self.0
            .get("border_width")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Return a copy with `patch` merged in. `null` values delete keys.
    ///
    /// Returns `None` if `patch` is not a JSON object.
    #[must_use]
    pub fn merged(&self, patch: &Value) -> Option<Self> {
        let incoming = patch.as_object()?;
        let mut next = self.0.clone();
        for (k, v) in incoming {
            if v.is_null() {
                next.remove(k);
            } else {
                next.insert(k.clone(), v.clone());
            }
        }
        Some(Self(next))
    }
}

/// A placeable or orderable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub content: Content,
    /// Canvas-local bounds. Absent for ordering-only items.
    #[serde(default)]
    pub position: Option<Rect>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub resizable: bool,
    /// Ground-truth top-left corner for placement quizzes.
    #[serde(default)]
    pub correct_position: Option<Point>,
}

impl Item {
    /// An ordering-only item with no geometry.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, content: Content) -> Self {
        Self {
            id: id.into(),
            content,
            position: None,
            style: Style::new(),
            resizable: false,
            correct_position: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, rect: Rect) -> Self {
        self.position = Some(rect);
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn with_correct_position(mut self, pt: Point) -> Self {
        self.correct_position = Some(pt);
        self
    }

    fn require_position(&self) -> Result<Rect, LayoutError> {
        self.position.ok_or_else(|| LayoutError::InvalidGeometry {
            id: self.id.clone(),
            reason: "item has no position".into(),
        })
    }
}

/// Shift an item by `delta`.
///
/// # Errors
///
/// Returns `InvalidGeometry` if the item has no position or the shifted
/// rectangle is degenerate (non-positive size or non-finite coordinates).
pub fn move_item(item: &Item, delta: Delta) -> Result<Item, LayoutError> {
    let next = item.require_position()?.translated(delta);
    if let Some(reason) = next.defect(0.0) {
        return Err(LayoutError::InvalidGeometry { id: item.id.clone(), reason });
    }
    Ok(Item { position: Some(next), ..item.clone() })
}

/// Resize an item to `width` x `height` by dragging the `anchor` handle.
///
/// # Errors
///
/// Returns `InvalidGeometry` if the item is not resizable, has no position,
/// or either dimension falls below `min_size` (always at least strictly
/// positive).
pub fn resize_item(
    item: &Item,
    width: f64,
    height: f64,
    anchor: ResizeAnchor,
    min_size: f64,
) -> Result<Item, LayoutError> {
    if !item.resizable {
        return Err(LayoutError::InvalidGeometry { id: item.id.clone(), reason: "item is not resizable".into() });
    }
    let next = item.require_position()?.resized(width, height, anchor);
    if let Some(reason) = next.defect(min_size) {
        return Err(LayoutError::InvalidGeometry { id: item.id.clone(), reason });
    }
    Ok(Item { position: Some(next), ..item.clone() })
}
