use crate::foundation::error::{CanopyError, CanopyResult};
use crate::patch::DecodeError;
use crate::scene::EditError;

/// How decoding of one patch ended.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DecodeStatus {
    /// Every byte was consumed by complete records.
    Complete,
    /// The header was rejected; nothing was applied.
    Ignored(DecodeError),
    /// Decoding stopped early; records before the cut were applied.
    Truncated(DecodeError),
}

impl DecodeStatus {
    /// The decode error, if decoding did not complete.
    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Self::Complete => None,
            Self::Ignored(e) | Self::Truncated(e) => Some(e),
        }
    }
}

/// Outcome of [`crate::Engine::apply_patches`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PatchReport {
    /// Decode outcome.
    pub status: DecodeStatus,
    /// Records that mutated the tree.
    pub records_applied: usize,
    /// Records decoded but rejected by the editor.
    pub records_rejected: usize,
    /// Header plus complete-record bytes.
    pub bytes_consumed: usize,
    /// First editor rejection, if any.
    pub first_rejection: Option<EditError>,
}

impl PatchReport {
    pub(crate) fn ignored(err: DecodeError) -> Self {
        Self {
            status: DecodeStatus::Ignored(err),
            records_applied: 0,
            records_rejected: 0,
            bytes_consumed: 0,
            first_rejection: None,
        }
    }

    /// Return `true` when the whole patch decoded and every record applied.
    pub fn is_clean(&self) -> bool {
        self.status == DecodeStatus::Complete && self.records_rejected == 0
    }

    /// Turn any decode failure or rejected record into an error, for hosts that want strict
    /// handling. Records applied before the failure stay applied either way.
    pub fn into_result(self) -> CanopyResult<Self> {
        if let Some(e) = self.status.error() {
            return Err(CanopyError::Decode(e.clone()));
        }
        if let Some(e) = &self.first_rejection {
            return Err(CanopyError::Edit(e.clone()));
        }
        Ok(self)
    }
}

/// What happened to one frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FrameOutcome {
    /// Handed to the sink.
    Presented,
    /// Rendered, but the sink returned an error. The frame index was still consumed.
    SinkFailed(String),
    /// The pixel buffer could not be allocated. No frame index was consumed.
    Skipped,
}

/// Outcome of [`crate::Engine::begin_frame`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameReport {
    /// Index assigned to the frame; `None` when skipped.
    pub index: Option<u64>,
    /// Result at the sink boundary.
    pub outcome: FrameOutcome,
    /// Nodes laid out and painted.
    pub nodes_painted: usize,
    /// Host timestamp passed to `begin_frame`.
    pub timestamp_nanos: u64,
}

/// Cumulative counters for one engine instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EngineStats {
    /// Patches whose header was accepted.
    pub patches_accepted: u64,
    /// Patches rejected at the header.
    pub patches_ignored: u64,
    /// Accepted patches that stopped before their end.
    pub patches_truncated: u64,
    /// Records applied across all patches.
    pub records_applied: u64,
    /// Records rejected across all patches.
    pub records_rejected: u64,
    /// Frames handed to the sink successfully.
    pub frames_presented: u64,
    /// Frames whose sink push failed.
    pub sink_failures: u64,
    /// Frames skipped for lack of memory.
    pub frames_skipped: u64,
    /// Input events dropped because the intake queue was full.
    pub input_dropped: u64,
}

impl EngineStats {
    pub(crate) fn record_patch(&mut self, report: &PatchReport) {
        match report.status {
            DecodeStatus::Ignored(_) => self.patches_ignored += 1,
            DecodeStatus::Truncated(_) => {
                self.patches_accepted += 1;
                self.patches_truncated += 1;
            }
            DecodeStatus::Complete => self.patches_accepted += 1,
        }
        self.records_applied += report.records_applied as u64;
        self.records_rejected += report.records_rejected as u64;
    }

    pub(crate) fn record_frame(&mut self, report: &FrameReport) {
        match report.outcome {
            FrameOutcome::Presented => self.frames_presented += 1,
            FrameOutcome::SinkFailed(_) => self.sink_failures += 1,
            FrameOutcome::Skipped => self.frames_skipped += 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/diagnostics.rs"]
mod tests;
