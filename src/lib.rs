//! rangepack: a deterministic variable-bit-rate quantization codec for
//! 4-component vectors, with two-level (clip + segment) range reduction and
//! three interchangeable numeric back-ends (f64, f32, fixed-point).

pub mod config;
pub mod error;
pub mod bitrate;
pub mod types;
pub mod fxp;
pub mod bridge;
pub mod pack;
pub mod backend;
pub mod codec;
pub mod snapshot;
pub mod verify;

#[cfg(test)]
pub mod tests;

pub use codec::{decode, encode, EncodedClip, EncodedSegment, SegmentSpan};
pub use config::{CodecConfig, CoercionVariant};
pub use error::{CodecError, Result};
