//! Builds new items for the "add item" affordance.
//!
//! This is the only entry point that accepts a free-form type tag. Unknown
//! tags fail closed: they produce a generic placeholder instead of an error,
//! since adding an item is never critical to the lesson.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::item::{Content, Item, Style};
use crate::layout::spawn_rect;

/// Kinds of item the canvas knows how to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    Image,
    Audio,
    Box,
    Placeholder,
}

impl ItemKind {
    /// Parse a type tag. Unrecognized tags map to `Placeholder`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            "audio" => Self::Audio,
            "box" => Self::Box,
            _ => Self::Placeholder,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Box => "box",
            Self::Placeholder => "item",
        }
    }

    fn content(self) -> Content {
        match self {
            Self::Text => Content::Text("New text".into()),
            Self::Image => Content::Image(String::new()),
            Self::Audio => Content::Audio(String::new()),
            Self::Box | Self::Placeholder => Content::Empty,
        }
    }

    fn size(self, config: &EngineConfig) -> (f64, f64) {
        match self {
            Self::Image => (160.0, 120.0),
            Self::Audio => (64.0, 64.0),
            Self::Text | Self::Box | Self::Placeholder => (config.default_item_width, config.default_item_height),
        }
    }

    fn style(self) -> Style {
        let value = match self {
            Self::Box => json!({"background": "#ffffff", "border_color": "#1f1a17", "border_width": 1}),
            Self::Placeholder => json!({"placeholder": true}),
            Self::Text | Self::Image | Self::Audio => json!({}),
        };
        Style::from_value(value).unwrap_or_default()
    }
}

/// Create a new item of type `tag`, placed off the most recently added item.
#[must_use]
pub fn new_item(tag: &str, existing: &[Item], config: &EngineConfig) -> Item {
    let kind = ItemKind::parse(tag);
    if kind == ItemKind::Placeholder {
        warn!(%tag, "unknown item type; creating placeholder");
    }
    let (width, height) = kind.size(config);
    let id = format!("{}-{}", kind.tag(), Uuid::new_v4());
    Item {
        id,
        content: kind.content(),
        position: Some(spawn_rect(existing.last(), width, height, config.add_offset)),
        style: kind.style(),
        resizable: kind != ItemKind::Audio,
        correct_position: None,
    }
}
