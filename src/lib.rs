//! Interactive layout and assessment engine for the vowel pronunciation lessons.
//!
//! The host application fetches lesson and quiz content, renders it, and wires
//! pointer events into this crate. The crate owns everything with real state:
//! where every item sits on the free-placement canvas, how a drag or resize
//! gesture turns into a committed layout change, and how a learner's
//! arrangement of a quiz section is checked and scored.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`item`] | Item model and pure move/resize transformations |
//! | [`geometry`] | Points, rectangles and resize anchors |
//! | [`layout`] | Geometry & layout store plus [`layout::LayoutSnapshot`] |
//! | [`factory`] | Builds new items for the "add item" affordance |
//! | [`hit`] | Hit-testing pointer positions against items and handles |
//! | [`controller`] | Gesture state machine driving the layout store |
//! | [`validate`] | Sequence and placement validators |
//! | [`quiz`] | Sections and the per-session quiz aggregator |
//! | [`config`] | Tunable engine parameters |
//! | [`error`] | Error enums and stable error codes |
//! | [`consts`] | Shared numeric defaults |

pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod hit;
pub mod item;
pub mod layout;
pub mod quiz;
pub mod validate;
