//! Canopy is the scene-graph core of an embeddable UI rendering engine.
//!
//! A host feeds it compact binary patches describing edits to a retained node tree, then asks
//! for frames. Each frame runs a box layout over the tree and rasterizes it into an RGB8 buffer
//! that is handed to a [`FrameSink`].
//!
//! - Encode edits with [`PatchBuilder`] (or any producer of the wire format)
//! - Apply them with [`Engine::apply_patches`]
//! - Produce frames with [`Engine::begin_frame`]
//!
//! ```
//! use canopy::{Engine, EngineConfig, InMemorySink, NodeId, NodeKind, PatchBuilder, Rect};
//!
//! let mut engine = Engine::with_sink(EngineConfig::default(), InMemorySink::new())?;
//! let mut patch = PatchBuilder::new();
//! patch
//!     .create_node(1, NodeKind::Column)
//!     .create_node(2, NodeKind::Text)
//!     .append_child(1, 2)
//!     .set_size(2, 200, 40);
//! assert!(engine.apply_patches(&patch.build()).is_clean());
//!
//! engine.begin_frame(0);
//! assert_eq!(engine.last_layout().rect_of(NodeId(2)), Some(Rect::new(0, 0, 200, 40)));
//! assert_eq!(engine.sink().frames().len(), 1);
//! # Ok::<(), canopy::CanopyError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod config;
pub(crate) mod layout;
pub(crate) mod patch;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::core::{NodeId, Rect, Rgb8, Surface};
pub use crate::foundation::error::{CanopyError, CanopyResult};

pub use crate::config::{DEFAULT_OUT_DIR, EngineConfig, NativeSurface, OutputConfig, OutputKind};
pub use crate::layout::{
    COLUMN_CHILD_HEIGHT, LayoutEntry, LayoutTree, MAX_LAYOUT_DEPTH, ROW_CHILD_WIDTH,
};
pub use crate::patch::DecodeError;
pub use crate::patch::builder::PatchBuilder;
pub use crate::patch::decode::{DecodedPatch, PatchDecoder, decode_patch};
pub use crate::patch::ops::{HEADER_LEN, PATCH_VERSION, PatchOp, opcode, prop};
pub use crate::render::backend::{DeviceType, create_sink};
pub use crate::render::raster::{
    BACKGROUND, CONTAINER_OUTLINE, FrameRgb8, LEAF_FILL, LEAF_INSET, OUTLINE_WIDTH,
};
pub use crate::render::sink::{
    FrameSink, InMemorySink, NullSink, PngFileSink, PpmFileSink, SinkConfig,
};
pub use crate::scene::EditError;
pub use crate::scene::node::{Align, Node, NodeKind, NodeProps, Padding};
pub use crate::scene::store::{NodeKey, SceneStore};
pub use crate::session::diagnostics::{
    DecodeStatus, EngineStats, FrameOutcome, FrameReport, PatchReport,
};
pub use crate::session::engine::Engine;
pub use crate::session::input::{INPUT_QUEUE_CAPACITY, InputEvent, InputQueue};
