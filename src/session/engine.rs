use crate::config::EngineConfig;
use crate::foundation::core::{NodeId, Surface};
use crate::foundation::error::CanopyResult;
use crate::layout::{LayoutTree, solve};
use crate::patch::decode::PatchDecoder;
use crate::patch::ops::HEADER_LEN;
use crate::render::backend::{DeviceType, create_sink};
use crate::render::raster::{BACKGROUND, FrameRgb8, paint};
use crate::render::sink::{FrameSink, SinkConfig};
use crate::scene::editor::apply_op;
use crate::scene::node::Node;
use crate::scene::store::SceneStore;
use crate::session::diagnostics::{
    DecodeStatus, EngineStats, FrameOutcome, FrameReport, PatchReport,
};
use crate::session::input::{InputEvent, InputQueue};

/// One embedded rendering engine instance.
///
/// Owns the node tree, the last applied patch and the output sink. Every mutating call takes
/// `&mut self`; hosts that call from several threads must serialize access themselves.
pub struct Engine<S: FrameSink = Box<dyn FrameSink>> {
    config: EngineConfig,
    surface: Surface,
    device: DeviceType,
    store: SceneStore,
    sink: S,
    next_frame: u64,
    last_patch: Option<Vec<u8>>,
    last_layout: LayoutTree,
    input: InputQueue,
    stats: EngineStats,
    closed: bool,
}

impl Engine {
    /// Validate `config` and create an engine writing to the sink it selects.
    pub fn create(config: EngineConfig) -> CanopyResult<Self> {
        config.validate()?;
        let sink = create_sink(&config.output)?;
        Self::with_sink(config, sink)
    }
}

impl<S: FrameSink> Engine<S> {
    /// Create an engine that hands frames to `sink`. `config.output` is ignored.
    pub fn with_sink(config: EngineConfig, mut sink: S) -> CanopyResult<Self> {
        config.validate()?;
        let surface = config.surface()?;
        let device = config.device()?;
        sink.begin(SinkConfig {
            width: surface.width,
            height: surface.height,
            device,
        })?;
        tracing::debug!(
            width = surface.width,
            height = surface.height,
            ?device,
            surface_handle = config.native_surface.0,
            "engine created"
        );
        Ok(Self {
            config,
            surface,
            device,
            store: SceneStore::new(),
            sink,
            next_frame: 0,
            last_patch: None,
            last_layout: LayoutTree::default(),
            input: InputQueue::default(),
            stats: EngineStats::default(),
            closed: false,
        })
    }

    /// Release every node and finish the sink.
    pub fn destroy(mut self) -> CanopyResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> CanopyResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let released = self.store.release_all();
        self.last_patch = None;
        self.last_layout = LayoutTree::default();
        tracing::debug!(released, frames = self.next_frame, "engine destroyed");
        self.sink.end()
    }

    /// Decode `bytes` and apply every complete record in order.
    ///
    /// Never fails at this boundary: an unsupported header is a no-op, and a truncated or
    /// malformed record ends the patch with everything before it applied. The report says which.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn apply_patches(&mut self, bytes: &[u8]) -> PatchReport {
        if bytes.len() >= HEADER_LEN {
            self.retain_patch(bytes);
        }

        let mut decoder = match PatchDecoder::new(bytes) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(error = %e, "patch ignored");
                let report = PatchReport::ignored(e);
                self.stats.record_patch(&report);
                return report;
            }
        };

        let mut status = DecodeStatus::Complete;
        let mut records_applied = 0usize;
        let mut records_rejected = 0usize;
        let mut first_rejection = None;
        for item in decoder.by_ref() {
            match item {
                Ok(op) => match apply_op(&mut self.store, &op) {
                    Ok(()) => records_applied += 1,
                    Err(e) => {
                        tracing::debug!(record = op.name(), error = %e, "record rejected");
                        records_rejected += 1;
                        if first_rejection.is_none() {
                            first_rejection = Some(e);
                        }
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "patch truncated");
                    status = DecodeStatus::Truncated(e);
                }
            }
        }

        let report = PatchReport {
            status,
            records_applied,
            records_rejected,
            bytes_consumed: decoder.position(),
            first_rejection,
        };
        self.stats.record_patch(&report);
        report
    }

    fn retain_patch(&mut self, bytes: &[u8]) {
        let mut copy = self.last_patch.take().unwrap_or_default();
        copy.clear();
        if copy.try_reserve_exact(bytes.len()).is_err() {
            tracing::warn!(len = bytes.len(), "could not retain patch copy");
            return;
        }
        copy.extend_from_slice(bytes);
        self.last_patch = Some(copy);
    }

    /// Lay out and paint one frame, then hand it to the sink.
    ///
    /// The frame index advances for every rendered frame, including ones the sink rejects.
    /// A frame whose pixel buffer cannot be allocated is skipped and consumes no index.
    #[tracing::instrument(skip(self))]
    pub fn begin_frame(&mut self, timestamp_nanos: u64) -> FrameReport {
        let Some(mut frame) = FrameRgb8::try_new(self.surface, BACKGROUND) else {
            tracing::warn!(
                width = self.surface.width,
                height = self.surface.height,
                "frame skipped: pixel buffer allocation failed"
            );
            let report = FrameReport {
                index: None,
                outcome: FrameOutcome::Skipped,
                nodes_painted: 0,
                timestamp_nanos,
            };
            self.stats.record_frame(&report);
            return report;
        };

        self.last_layout = solve(&self.store, self.surface.bounds());
        let nodes_painted = paint(&mut frame, &self.last_layout);

        let index = self.next_frame;
        self.next_frame += 1;
        let outcome = match self.sink.push_frame(index, &frame) {
            Ok(()) => FrameOutcome::Presented,
            Err(e) => {
                tracing::warn!(index, error = %e, "sink rejected frame");
                FrameOutcome::SinkFailed(e.to_string())
            }
        };

        let report = FrameReport {
            index: Some(index),
            outcome,
            nodes_painted,
            timestamp_nanos,
        };
        self.stats.record_frame(&report);
        report
    }

    /// Queue a pointer event.
    pub fn pointer_event(&mut self, action: i32, x: f32, y: f32, buttons: i32) {
        tracing::trace!(action, x, y, buttons, "pointer event");
        self.push_input(InputEvent::Pointer {
            action,
            x,
            y,
            buttons,
        });
    }

    /// Queue a key event.
    pub fn key_event(&mut self, keycode: i32, down: bool, mods: i32) {
        tracing::trace!(keycode, down, mods, "key event");
        self.push_input(InputEvent::Key {
            keycode,
            down,
            mods,
        });
    }

    fn push_input(&mut self, event: InputEvent) {
        if self.input.push(event) {
            self.stats.input_dropped += 1;
        }
    }

    /// Queued, undispatched input.
    pub fn input(&self) -> &InputQueue {
        &self.input
    }

    /// Take every queued input event, oldest first.
    pub fn drain_input(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.input.drain()
    }

    /// Raw bytes of the most recent patch of at least six bytes.
    pub fn last_patch(&self) -> Option<&[u8]> {
        self.last_patch.as_deref()
    }

    /// Geometry from the most recent frame.
    pub fn last_layout(&self) -> &LayoutTree {
        &self.last_layout
    }

    /// Look up a live node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    /// The node tree.
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Index the next rendered frame will get.
    pub fn next_frame_index(&self) -> u64 {
        self.next_frame
    }

    /// Cumulative counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Validated surface size.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Validated device type.
    pub fn device(&self) -> DeviceType {
        self.device
    }

    /// Configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: FrameSink> Drop for Engine<S> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "sink failed to finish");
        }
    }
}

impl<S: FrameSink> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("surface", &self.surface)
            .field("device", &self.device)
            .field("nodes", &self.store.len())
            .field("next_frame", &self.next_frame)
            .finish_non_exhaustive()
    }
}
