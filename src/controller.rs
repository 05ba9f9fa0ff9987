//! Interaction controller: turns raw pointer gestures into layout mutations.
//!
//! A gesture runs from pointer-down to pointer-up (or cancel). While it is
//! live the controller only tracks the origin and the accumulated delta; the
//! layout store is touched once, at pointer-up, and exactly one
//! `PositionsChanged` action is emitted for the whole gesture. Cancelling
//! discards the buffered delta, so the store never sees a partial gesture.
//!
//! In view mode (`editable == false`) drags and resizes are ignored and a
//! press/release pair is reported as a plain click.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::factory;
use crate::geometry::{Delta, Point, Rect, ResizeAnchor};
use crate::hit::{HitPart, hit_body, hit_test};
use crate::item::{Item, ItemId};
use crate::layout::{LayoutSnapshot, LayoutStore};

/// Notifications returned from the controller for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Geometry changed; carries the full layout for persistence.
    PositionsChanged(LayoutSnapshot),
    /// The item collection or an item's style changed.
    ItemsChanged(Vec<Item>),
    /// A press/release without meaningful movement landed on an item.
    ItemClicked { id: ItemId },
    /// The selection was cleared by clicking empty canvas or removing the item.
    SelectionCleared,
    /// The preview changed and the host should redraw.
    RenderNeeded,
}

/// The gesture currently being tracked.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No pointer is down.
    #[default]
    Idle,
    /// Pointer is down on an item but has not yet moved past the click threshold.
    Pressing {
        id: ItemId,
        /// Pointer position at pointer-down.
        origin: Point,
    },
    /// The user is moving an item.
    Dragging {
        id: ItemId,
        /// Pointer position at pointer-down.
        origin: Point,
        /// Pointer offset from the item's top-left corner at pointer-down.
        grab_offset: Delta,
        /// Item bounds at pointer-down.
        start: Rect,
        /// Buffered movement, committed at pointer-up.
        delta: Delta,
    },
    /// The user is dragging one of an item's resize handles.
    Resizing {
        id: ItemId,
        anchor: ResizeAnchor,
        origin: Point,
        start: Rect,
        delta: Delta,
    },
}

pub struct Controller {
    store: LayoutStore,
    gesture: Gesture,
    editable: bool,
    selected: Option<ItemId>,
}

impl Controller {
    /// A controller in edit mode over an empty layout.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(LayoutStore::new(config))
    }

    #[must_use]
    pub fn with_store(store: LayoutStore) -> Self {
        Self { store, gesture: Gesture::Idle, editable: true, selected: None }
    }

    // --- Data inputs ---

    /// Hydrate items from the data source.
    ///
    /// # Errors
    ///
    /// Propagates `LayoutStore::load_items` errors; state is unchanged on error.
    pub fn load_items(&mut self, items: Vec<Item>) -> Result<LayoutSnapshot, LayoutError> {
        self.abort_gesture();
        self.selected = None;
        self.store.load_items(items)
    }

    /// Restore a saved layout.
    ///
    /// # Errors
    ///
    /// Propagates `LayoutStore::restore` errors; state is unchanged on error.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> Result<(), LayoutError> {
        self.store.restore(snapshot)?;
        self.abort_gesture();
        if let Some(id) = &self.selected {
            if !self.store.contains(id) {
                self.selected = None;
            }
        }
        Ok(())
    }

    // --- Mode ---

    /// Switch between edit mode and view mode. Leaving edit mode cancels any live gesture.
    pub fn set_editable(&mut self, editable: bool) -> Vec<Action> {
        self.editable = editable;
        if editable {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.abort_gesture() {
            actions.push(Action::RenderNeeded);
        }
        if self.selected.take().is_some() {
            actions.push(Action::SelectionCleared);
        }
        actions
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    // --- Pointer events ---

    /// Start a gesture at `pt`.
    ///
    /// A gesture still live from an earlier press is discarded first. In view
    /// mode resize handles are not hit targets, so only item bodies respond.
    pub fn pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.abort_gesture() {
            actions.push(Action::RenderNeeded);
        }
        let hit = if self.editable {
            hit_test(pt, self.store.items(), self.store.config().handle_radius)
        } else {
            hit_body(pt, self.store.items())
        };
        let Some(hit) = hit else {
            if self.selected.take().is_some() {
                actions.push(Action::SelectionCleared);
            }
            return actions;
        };

        self.gesture = match hit.part {
            HitPart::ResizeHandle(anchor) if self.editable => {
                let Some(start) = self.position_of(&hit.item_id) else {
                    return actions;
                };
                Gesture::Resizing { id: hit.item_id, anchor, origin: pt, start, delta: Delta::default() }
            }
            _ => Gesture::Pressing { id: hit.item_id, origin: pt },
        };
        actions
    }

    /// Track pointer movement. Never touches the layout store.
    pub fn pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let threshold = self.store.config().click_threshold;
        match &mut self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Pressing { id, origin } => {
                let (id, origin) = (id.clone(), *origin);
                let moved = pt.delta_from(origin);
                if !self.editable || moved.magnitude() <= threshold {
                    return Vec::new();
                }
                let Some(start) = self.position_of(&id) else {
                    self.gesture = Gesture::Idle;
                    return Vec::new();
                };
                let grab_offset = origin.delta_from(start.origin());
                debug!(%id, "drag started");
                self.gesture = Gesture::Dragging { id, origin, grab_offset, start, delta: moved };
                vec![Action::RenderNeeded]
            }
            Gesture::Dragging { origin, delta, .. } | Gesture::Resizing { origin, delta, .. } => {
                *delta = pt.delta_from(*origin);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Finish the gesture at `pt`, committing it to the layout store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the committed geometry is rejected. The
    /// gesture is discarded and the store keeps its pre-gesture state.
    pub fn pointer_up(&mut self, pt: Point) -> Result<Vec<Action>, LayoutError> {
        let threshold = self.store.config().click_threshold;
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(Vec::new()),
            Gesture::Pressing { id, origin } => {
                let delta = pt.delta_from(origin);
                if delta.magnitude() <= threshold {
                    Ok(self.click(id))
                } else if self.editable {
                    self.commit_drag(&id, delta)
                } else {
                    Ok(Vec::new())
                }
            }
            Gesture::Dragging { id, origin, .. } => self.commit_drag(&id, pt.delta_from(origin)),
            Gesture::Resizing { id, anchor, origin, start, delta: previewed } => {
                let delta = pt.delta_from(origin);
                if delta.magnitude() <= threshold {
                    // Clear any preview drawn while the handle was held.
                    let shown = previewed != Delta::default();
                    return Ok(if shown { vec![Action::RenderNeeded] } else { Vec::new() });
                }
                let (width, height) = anchor.dragged_size(&start, delta);
                let snapshot = self.store.apply_resize(&id, width, height, anchor).inspect_err(|e| {
                    warn!(error = %e, %id, "resize rejected");
                })?;
                debug!(%id, width, height, "resize committed");
                Ok(vec![Action::PositionsChanged(snapshot), Action::RenderNeeded])
            }
        }
    }

    /// Abort the live gesture (e.g. pointer-cancel). The store is left untouched.
    pub fn pointer_cancel(&mut self) -> Vec<Action> {
        if self.abort_gesture() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Item operations ---

    /// Add a new item of type `tag`. Ignored in view mode.
    ///
    /// # Errors
    ///
    /// Propagates `LayoutStore::add_item` errors.
    pub fn add_item(&mut self, tag: &str) -> Result<Vec<Action>, LayoutError> {
        if !self.editable {
            debug!(%tag, "add ignored in view mode");
            return Ok(Vec::new());
        }
        let item = factory::new_item(tag, self.store.items(), self.store.config());
        let snapshot = self.store.add_item(item)?;
        Ok(vec![self.items_changed(), Action::PositionsChanged(snapshot), Action::RenderNeeded])
    }

    /// Remove an item. Absent ids and view mode are no-ops.
    pub fn remove_item(&mut self, id: &str) -> Vec<Action> {
        if !self.editable || !self.store.contains(id) {
            return Vec::new();
        }
        if self.gesture_target() == Some(id) {
            self.abort_gesture();
        }
        let snapshot = self.store.remove_item(id);
        let mut actions = vec![self.items_changed(), Action::PositionsChanged(snapshot)];
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            actions.push(Action::SelectionCleared);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Merge a style patch into an item. Ignored in view mode.
    ///
    /// # Errors
    ///
    /// Propagates `LayoutStore::update_style` errors.
    pub fn update_style(&mut self, id: &str, patch: &serde_json::Value) -> Result<Vec<Action>, LayoutError> {
        if !self.editable {
            return Ok(Vec::new());
        }
        self.store.update_style(id, patch)?;
        Ok(vec![self.items_changed(), Action::RenderNeeded])
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Uncommitted bounds of the item under a live drag or resize.
    #[must_use]
    pub fn preview(&self) -> Option<(&str, Rect)> {
        match &self.gesture {
            Gesture::Dragging { id, origin, grab_offset, start, delta } => {
                let pointer = Point::new(origin.x + delta.dx, origin.y + delta.dy);
                let rect = Rect::new(pointer.x - grab_offset.dx, pointer.y - grab_offset.dy, start.width, start.height);
                Some((id.as_str(), rect))
            }
            Gesture::Resizing { id, anchor, start, delta, .. } => {
                let (width, height) = anchor.dragged_size(start, *delta);
                Some((id.as_str(), start.resized(width, height, *anchor)))
            }
            Gesture::Idle | Gesture::Pressing { .. } => None,
        }
    }

    // --- Internals ---

    fn commit_drag(&mut self, id: &str, delta: Delta) -> Result<Vec<Action>, LayoutError> {
        let snapshot = self.store.apply_drag(id, delta).inspect_err(|e| {
            warn!(error = %e, %id, "drag rejected");
        })?;
        debug!(%id, dx = delta.dx, dy = delta.dy, "drag committed");
        Ok(vec![Action::PositionsChanged(snapshot), Action::RenderNeeded])
    }

    fn click(&mut self, id: ItemId) -> Vec<Action> {
        if self.editable {
            self.selected = Some(id.clone());
        }
        vec![Action::ItemClicked { id }]
    }

    fn items_changed(&self) -> Action {
        Action::ItemsChanged(self.store.items().to_vec())
    }

    fn position_of(&self, id: &str) -> Option<Rect> {
        self.store.get(id).and_then(|item| item.position)
    }

    fn gesture_target(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Pressing { id, .. } | Gesture::Dragging { id, .. } | Gesture::Resizing { id, .. } => {
                Some(id.as_str())
            }
        }
    }

    /// Drop the live gesture. Returns whether one was in progress.
    fn abort_gesture(&mut self) -> bool {
        let was_active = !matches!(self.gesture, Gesture::Idle);
        if was_active {
            debug!("gesture aborted");
        }
        self.gesture = Gesture::Idle;
        was_active
    }
}
