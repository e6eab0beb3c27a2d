//! Retained node tree: node model, identity-addressed store and the tree editor.

pub(crate) mod editor;
pub(crate) mod node;
pub(crate) mod store;

pub use editor::EditError;
