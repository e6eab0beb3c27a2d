use crate::patch::DecodeError;
use crate::scene::EditError;

/// Convenience result alias used throughout the crate.
pub type CanopyResult<T> = Result<T, CanopyError>;

/// Top-level error type.
///
/// The patch boundary never surfaces these on its own; they appear when a host opts into strict
/// handling (see [`crate::PatchReport::into_result`]) or at configuration and output boundaries.
#[derive(thiserror::Error, Debug)]
pub enum CanopyError {
    /// Invalid configuration or API input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A patch could not be fully decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A decoded record was rejected by the tree editor.
    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    /// A frame could not be handed to its output sink.
    #[error("output error: {0}")]
    Output(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanopyError {
    /// Build a [`CanopyError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanopyError::Output`].
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
