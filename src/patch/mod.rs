//! Binary patch wire format: record definitions, decoder and encoder.

pub(crate) mod builder;
pub(crate) mod decode;
pub(crate) mod ops;

pub use decode::DecodeError;
