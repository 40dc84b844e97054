//! Error taxonomy for model construction and source emission.
//!
//! This crate never swallows a failure internally: every fallible entry
//! point returns one of these two enums, or in the case of
//! [`crate::harness`], a list of which property failed for which model.

use thiserror::Error;

/// A parsed set of Williams/Rocksoft parameters that cannot describe a
/// usable CRC. Malformed parameter lines are a concern of the out-of-scope
/// textual parser, not this crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("width must be at least 1 bit")]
    ZeroWidth,

    #[error("width {width} exceeds the 2W=128-bit ceiling this kernel supports")]
    WidthTooWide { width: u32 },

    #[error("polynomial must be odd: the x^0 coefficient is implicitly 1")]
    EvenPolynomial,

    #[error("check value does not fit within the declared width")]
    CheckOutOfRange,
}

/// Failures from the code emitter. `write_model` never touches a
/// filesystem itself (the caller supplies a `Write`); only
/// `emit_to_new_file` opens a path, and unlinking a partially-written file
/// on failure is the caller's responsibility once it observes an `Err`
/// here.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("output `{path}` already exists; refusing to overwrite")]
    NameCollision { path: String },

    #[error("I/O failure while emitting source: {0}")]
    Io(#[from] std::io::Error),
}
