//! Convertors between typed documents and the edit tree.
//!
//! Each format module exposes a symmetric pair: `build_edit_tree` walks a
//! parsed document into an [`crate::EditNode`] tree for display and
//! editing, and `build_document` walks an edited tree back into a typed
//! document ready for serialization.

pub mod designspace;
pub mod plist;
