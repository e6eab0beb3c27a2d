use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};

use crate::foundation::error::{CanopyError, CanopyResult};
use crate::render::backend::DeviceType;
use crate::render::raster::FrameRgb8;

/// Configuration handed to a [`FrameSink`] when an engine starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Device type the host asked for.
    pub device: DeviceType,
}

/// Consumer of finished frames.
///
/// `push_frame` is called with strictly increasing frame indices between one `begin` and one
/// `end`.
pub trait FrameSink: Send {
    /// Called once before any frame is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CanopyResult<()>;
    /// Consume one frame.
    fn push_frame(&mut self, idx: u64, frame: &FrameRgb8) -> CanopyResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> CanopyResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> CanopyResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRgb8) -> CanopyResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> CanopyResult<()> {
        (**self).end()
    }
}

fn check_size(cfg: Option<&SinkConfig>, frame: &FrameRgb8) -> CanopyResult<()> {
    let cfg = cfg.ok_or_else(|| CanopyError::output("sink not started"))?;
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(CanopyError::output(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> CanopyResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

/// Writes each frame as a binary PPM (`P6`) named `frame_<index>.ppm`.
#[derive(Debug)]
pub struct PpmFileSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
}

impl PpmFileSink {
    /// Write frames into `dir`, creating it on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
        }
    }

    /// Path a given frame index is written to.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx}.ppm"))
    }
}

impl FrameSink for PpmFileSink {
    fn begin(&mut self, cfg: SinkConfig) -> CanopyResult<()> {
        ensure_dir(&self.dir)?;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRgb8) -> CanopyResult<()> {
        check_size(self.cfg.as_ref(), frame)?;
        let path = self.frame_path(idx);
        let file = File::create(&path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        PnmEncoder::new(BufWriter::new(file))
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(
                &frame.data,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgb8,
            )
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    fn end(&mut self) -> CanopyResult<()> {
        Ok(())
    }
}

/// Writes each frame as `frame_<index>.png`.
#[derive(Debug)]
pub struct PngFileSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
}

impl PngFileSink {
    /// Write frames into `dir`, creating it on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
        }
    }

    /// Path a given frame index is written to.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx}.png"))
    }
}

impl FrameSink for PngFileSink {
    fn begin(&mut self, cfg: SinkConfig) -> CanopyResult<()> {
        ensure_dir(&self.dir)?;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRgb8) -> CanopyResult<()> {
        check_size(self.cfg.as_ref(), frame)?;
        let path = self.frame_path(idx);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    fn end(&mut self) -> CanopyResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and embedding hosts that read pixels directly.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRgb8)>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, FrameRgb8)] {
        &self.frames
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<&FrameRgb8> {
        self.frames.last().map(|(_, f)| f)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CanopyResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRgb8) -> CanopyResult<()> {
        check_size(self.cfg.as_ref(), frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CanopyResult<()> {
        Ok(())
    }
}

/// Discards frames, counting them.
#[derive(Debug, Default)]
pub struct NullSink {
    pushed: u64,
}

impl NullSink {
    /// Create a sink that drops everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }
}

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> CanopyResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, _frame: &FrameRgb8) -> CanopyResult<()> {
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> CanopyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
