//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs the values it changes:
//!
//! ```json
//! { "width": 320, "height": 240, "output": { "kind": "png", "dir": "out" } }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Surface;
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::render::backend::DeviceType;

/// Default output directory for file sinks.
pub const DEFAULT_OUT_DIR: &str = "build-native/out";

/// Opaque host window/surface handle. Carried, never dereferenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeSurface(pub u64);

/// Which sink receives finished frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Binary PPM files.
    #[default]
    Ppm,
    /// PNG files.
    Png,
    /// Frames kept in memory.
    Memory,
    /// Frames dropped.
    Null,
}

/// Output sink selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Sink kind.
    pub kind: OutputKind,
    /// Directory file sinks write into.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: OutputKind::Ppm,
            dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Parameters for [`crate::Engine::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Surface width in pixels.
    pub width: i32,
    /// Surface height in pixels.
    pub height: i32,
    /// Host device code, see [`DeviceType`].
    pub device_type: i32,
    /// Host surface handle.
    pub native_surface: NativeSurface,
    /// Where frames go.
    pub output: OutputConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            device_type: DeviceType::Gl.code(),
            native_surface: NativeSurface::default(),
            output: OutputConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validated surface dimensions.
    pub fn surface(&self) -> CanopyResult<Surface> {
        let w = u32::try_from(self.width)
            .map_err(|_| CanopyError::validation("surface width must be > 0"))?;
        let h = u32::try_from(self.height)
            .map_err(|_| CanopyError::validation("surface height must be > 0"))?;
        Surface::new(w, h)
    }

    /// Validated device type.
    pub fn device(&self) -> CanopyResult<DeviceType> {
        DeviceType::from_code(self.device_type)
    }

    /// Check every field.
    pub fn validate(&self) -> CanopyResult<()> {
        self.surface()?;
        self.device()?;
        if self.output.dir.as_os_str().is_empty()
            && matches!(self.output.kind, OutputKind::Ppm | OutputKind::Png)
        {
            return Err(CanopyError::validation(
                "file output requires a non-empty directory",
            ));
        }
        Ok(())
    }

    /// Load and validate a JSON config file.
    pub fn from_json_path(path: impl AsRef<Path>) -> CanopyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            CanopyError::validation(format!("invalid config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
