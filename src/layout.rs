//! Geometry & layout store: the source of truth for where every item sits.
//!
//! DESIGN
//! ======
//! Every public mutation is a single atomic transition. The new item (or the
//! whole new item list) is computed first from immutable values; only when
//! that succeeds is it written back. A rejected call therefore leaves the
//! store exactly as it was. Items are kept in insertion order so "the last
//! added item" is always the tail of the list.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::geometry::{Delta, Rect, ResizeAnchor};
use crate::item::{Item, ItemId, Style, move_item, resize_item};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Saved geometry of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: ItemId,
    pub position: Rect,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

/// Mapping from item id to position (and style), in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub placements: Vec<Placement>,
}

impl LayoutSnapshot {
    /// Look up the saved placement of an item.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// Saved position of an item.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Rect> {
        self.get(id).map(|p| p.position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Rect for a new item of `width` x `height` cascaded from `last`.
///
/// The new item starts `offset` units right of and below the last item so it
/// never lands exactly on top of it. With no previous item (or one without
/// geometry) it starts at the canvas origin.
#[must_use]
pub fn spawn_rect(last: Option<&Item>, width: f64, height: f64, offset: f64) -> Rect {
    match last.and_then(|item| item.position) {
        Some(prev) => Rect::new(prev.x + offset, prev.y + offset, width, height),
        None => Rect::new(0.0, 0.0, width, height),
    }
}

// =============================================================================
// STORE
// =============================================================================

/// In-memory store of the free-placement canvas.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    items: Vec<Item>,
    config: EngineConfig,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LayoutStore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { items: Vec::new(), config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace all items with a collection from the data source.
    ///
    /// Items without a position are cascaded from the previous item. Supplied
    /// positions are snapped to the coordinate grid.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if two items share an id, `InvalidGeometry` if a
    /// supplied position is degenerate. The store is unchanged on error.
    pub fn load_items(&mut self, items: Vec<Item>) -> Result<LayoutSnapshot, LayoutError> {
        let mut seen = HashSet::new();
        let mut next: Vec<Item> = Vec::with_capacity(items.len());
        for mut item in items {
            if !seen.insert(item.id.clone()) {
                return Err(LayoutError::DuplicateId(item.id));
            }
            let rect = match item.position {
                Some(rect) => rect.snapped(),
                None => self.cascade_from(next.last(), None),
            };
            if let Some(reason) = rect.defect(0.0) {
                return Err(LayoutError::InvalidGeometry { id: item.id, reason });
            }
            item.position = Some(rect);
            next.push(item);
        }
        debug!(count = next.len(), "layout items loaded");
        self.items = next;
        Ok(self.snapshot())
    }

    /// Move an item by `delta`.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if `id` is absent, `InvalidGeometry` if the result is degenerate.
    pub fn apply_drag(&mut self, id: &str, delta: Delta) -> Result<LayoutSnapshot, LayoutError> {
        let idx = self.index_of(id)?;
        let moved = move_item(&self.items[idx], delta)?;
        self.items[idx] = moved;
        debug!(%id, dx = delta.dx, dy = delta.dy, "item moved");
        Ok(self.snapshot())
    }

    /// Resize an item to `width` x `height` by dragging `anchor`.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if `id` is absent, `InvalidGeometry` if the item is not
    /// resizable or the new size is below the configured minimum.
    pub fn apply_resize(
        &mut self,
        id: &str,
        width: f64,
        height: f64,
        anchor: ResizeAnchor,
    ) -> Result<LayoutSnapshot, LayoutError> {
        let idx = self.index_of(id)?;
        let resized = resize_item(&self.items[idx], width, height, anchor, self.config.min_item_size)?;
        self.items[idx] = resized;
        debug!(%id, width, height, ?anchor, "item resized");
        Ok(self.snapshot())
    }

    /// Insert a new item, cascaded from the last added item.
    ///
    /// The item keeps its own size when it has one; its origin is always
    /// derived from the previous item.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if an item with the same id already exists.
    pub fn add_item(&mut self, mut item: Item) -> Result<LayoutSnapshot, LayoutError> {
        if self.contains(&item.id) {
            return Err(LayoutError::DuplicateId(item.id));
        }
        let rect = self.cascade_from(self.items.last(), item.position).snapped();
        if let Some(reason) = rect.defect(0.0) {
            return Err(LayoutError::InvalidGeometry { id: item.id, reason });
        }
        item.position = Some(rect);
        debug!(id = %item.id, x = rect.x, y = rect.y, "item added");
        self.items.push(item);
        Ok(self.snapshot())
    }

    /// Remove an item. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, id: &str) -> LayoutSnapshot {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            debug!(%id, "item removed");
        }
        self.snapshot()
    }

    /// Merge a JSON object into an item's style. `null` values delete keys.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if `id` is absent, `InvalidStyle` if `patch` is not an object.
    pub fn update_style(&mut self, id: &str, patch: &serde_json::Value) -> Result<Item, LayoutError> {
        let idx = self.index_of(id)?;
        let style = self.items[idx]
            .style
            .merged(patch)
            .ok_or_else(|| LayoutError::InvalidStyle(id.to_string()))?;
        self.items[idx].style = style;
        Ok(self.items[idx].clone())
    }

    /// Full save of the current geometry.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        let placements = self
            .items
            .iter()
            .filter_map(|item| {
                item.position.map(|position| Placement {
                    id: item.id.clone(),
                    position,
                    style: item.style.clone(),
                })
            })
            .collect();
        LayoutSnapshot { placements }
    }

    /// Replace the store's geometry with `snapshot`, all or nothing.
    ///
    /// Items are reordered to match the snapshot; items not named in the
    /// snapshot are dropped so the store matches it exactly.
    ///
    /// Restore re-positions items the store already holds and never creates
    /// items. A snapshot taken before `remove_item`, or one naming items that
    /// a data-source reload no longer carries, fails with `ItemNotFound`;
    /// rehydrate those items with `load_items` before restoring.
    ///
    /// # Errors
    ///
    /// `DuplicateId` for a repeated id, `ItemNotFound` for an id the store
    /// does not know, `InvalidGeometry` for a degenerate rect. The store is
    /// unchanged on error.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        let mut next = Vec::with_capacity(snapshot.placements.len());
        for placement in &snapshot.placements {
            if !seen.insert(placement.id.as_str()) {
                return Err(LayoutError::DuplicateId(placement.id.clone()));
            }
            let idx = self.index_of(&placement.id)?;
            let position = placement.position.snapped();
            if let Some(reason) = position.defect(0.0) {
                return Err(LayoutError::InvalidGeometry { id: placement.id.clone(), reason });
            }
            next.push(Item {
                position: Some(position),
                style: placement.style.clone(),
                ..self.items[idx].clone()
            });
        }
        let dropped = self.items.len() - next.len();
        debug!(count = next.len(), dropped, "layout restored");
        self.items = next;
        Ok(())
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize, LayoutError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| LayoutError::ItemNotFound(id.to_string()))
    }

    fn cascade_from(&self, last: Option<&Item>, own: Option<Rect>) -> Rect {
        let (width, height) = match own {
            Some(rect) => (rect.width, rect.height),
            None => (self.config.default_item_width, self.config.default_item_height),
        };
        spawn_rect(last, width, height, self.config.add_offset)
    }
}
