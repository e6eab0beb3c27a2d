//! The engine instance: patch intake, frame driving, diagnostics and input intake.

pub(crate) mod diagnostics;
pub(crate) mod engine;
pub(crate) mod input;
