#![deny(clippy::unwrap_used, clippy::expect_used)]

//! # ufotree
//!
//! ufotree is the editor core for low-level UFO font source editing: it
//! converts parsed designspace (XML) and property-list documents into a
//! flat, display-oriented tree of (name, textual value, type tag) rows
//! that any generic tree widget can render, and re-types an edited tree
//! back into a typed document ready for serialization.
//!
//! The set direction is a typed walk. The get direction is the interesting
//! one: after editing, every value is text, so each node is re-typed
//! through a [`Collector`] — container types are re-synthesized from the
//! tree structure, and textual literals are re-evaluated with a safe
//! fallback to plain strings. See the [`convertors`] module for the two
//! format pairs.
//!
//! Alongside the convertors, the crate carries a small query layer over
//! nested values ([`query`]) and an auto-vivifying ordered map ([`AttrMap`])
//! for ad-hoc nested data such as lib plists.
//!
//! Windowing, menus, file dialogs, and undo belong to the embedding editor;
//! this crate exposes and consumes only data.

mod attrmap;
mod collector;
pub mod convertors;
mod error;
mod literal;
mod node;
pub mod query;
mod value;
pub mod xml;

pub use crate::{
    attrmap::AttrMap,
    collector::{Collector, Exported},
    error::UfoTreeError,
    node::{EditNode, NodeKind, LIST_ITEM},
    value::{Dict, Value, ValueKind},
};
