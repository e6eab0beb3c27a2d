use crate::config::{OutputConfig, OutputKind};
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::render::sink::{FrameSink, InMemorySink, NullSink, PngFileSink, PpmFileSink};

/// Graphics device the host surface belongs to.
///
/// Every device type currently renders through the software rasterizer; the value is validated
/// and forwarded to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DeviceType {
    /// Apple Metal.
    Metal,
    /// OpenGL ES.
    Gles,
    /// Direct3D 11.
    D3d11,
    /// Desktop OpenGL.
    Gl,
}

impl DeviceType {
    /// Map a host device code (`0..=3`).
    pub fn from_code(code: i32) -> CanopyResult<Self> {
        Ok(match code {
            0 => Self::Metal,
            1 => Self::Gles,
            2 => Self::D3d11,
            3 => Self::Gl,
            other => {
                return Err(CanopyError::validation(format!(
                    "unknown device type {other} (expected 0..=3)"
                )));
            }
        })
    }

    /// Host device code.
    pub fn code(self) -> i32 {
        match self {
            Self::Metal => 0,
            Self::Gles => 1,
            Self::D3d11 => 2,
            Self::Gl => 3,
        }
    }
}

/// Create the frame sink selected by `output`.
pub fn create_sink(output: &OutputConfig) -> CanopyResult<Box<dyn FrameSink>> {
    Ok(match output.kind {
        OutputKind::Ppm => Box::new(PpmFileSink::new(&output.dir)),
        OutputKind::Png => Box::new(PngFileSink::new(&output.dir)),
        OutputKind::Memory => Box::new(InMemorySink::new()),
        OutputKind::Null => Box::new(NullSink::new()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
