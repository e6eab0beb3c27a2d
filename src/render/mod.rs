//! Software rasterization and frame output.

pub(crate) mod backend;
pub(crate) mod raster;
pub(crate) mod sink;
