//! Per-frame box layout.
//!
//! Geometry is not stored on nodes; each pass produces a fresh [`LayoutTree`] that the raster
//! stage and diagnostics read.

pub(crate) mod solver;

pub use solver::{
    COLUMN_CHILD_HEIGHT, LayoutEntry, LayoutTree, MAX_LAYOUT_DEPTH, ROW_CHILD_WIDTH, solve,
};
