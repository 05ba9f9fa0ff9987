#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{Point, ResizeAnchor};
use crate::item::{Item, ItemId};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Find the topmost item under `pt`.
///
/// Later items in `items` are drawn above earlier ones. For each item the
/// resize handles (only on resizable items) take priority over the body, so
/// a handle overhanging the box edge is still grabbable.
#[must_use]
pub fn hit_test(pt: Point, items: &[Item], handle_radius: f64) -> Option<Hit> {
    topmost(pt, items, Some(handle_radius))
}

/// Find the topmost item whose body contains `pt`, ignoring resize handles.
#[must_use]
pub fn hit_body(pt: Point, items: &[Item]) -> Option<Hit> {
    topmost(pt, items, None)
}

fn topmost(pt: Point, items: &[Item], handle_radius: Option<f64>) -> Option<Hit> {
    items.iter().rev().find_map(|item| {
        let rect = item.position?;
        if let Some(radius) = handle_radius.filter(|_| item.resizable) {
            let handle = ResizeAnchor::ALL
                .into_iter()
                .find(|anchor| anchor.handle_point(&rect).distance(pt) <= radius);
            if let Some(anchor) = handle {
                return Some(Hit { item_id: item.id.clone(), part: HitPart::ResizeHandle(anchor) });
            }
        }
        rect.contains(pt)
            .then(|| Hit { item_id: item.id.clone(), part: HitPart::Body })
    })
}
