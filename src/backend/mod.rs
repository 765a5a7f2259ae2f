//! Numeric back-ends.
//!
//! The quantization pipeline is one generic algorithm parameterized over a
//! small capability set; the three back-ends (f64, f32, fixed-point) are
//! drop-in substitutes for each other, which is what keeps the
//! cross-representation agreement property checkable in one place.

pub mod fixed;
pub mod float;

use std::io::Cursor;

use crate::config::CoercionVariant;
use crate::error::{CodecError, Result};
use crate::pack::PackedVector;
use crate::types::Vector4;

pub use fixed::FixedBackend;
pub use float::{F32Backend, F64Backend, FloatBackend};

/// Which of the two nested range-reduction stages an operation serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeLevel {
    /// Coarse range spanning the whole sample sequence.
    Clip,
    /// Finer range spanning one contiguous segment, nested inside the clip.
    Segment,
}

/// Capability set of one numeric representation.
///
/// All operations are pure; no implementation retains state across calls.
/// Raw sample values handed to [`Backend::import`] must be finite and lie in
/// the signed unit domain [-1, 1].
pub trait Backend {
    /// A 4-component vector in this representation.
    type Sample: Copy + Default + PartialEq + core::fmt::Debug;

    const NAME: &'static str;
    /// Stable on-wire back-end tag.
    const ID: u8;

    fn import(raw: &Vector4<f64>) -> Self::Sample;
    fn export(sample: &Self::Sample, coercion: CoercionVariant) -> Vector4<f64>;

    /// Componentwise min/max over a non-empty sample sequence.
    fn compute_range(samples: &[Self::Sample]) -> Result<(Self::Sample, Self::Sample)>;

    /// Map samples into the unit interval relative to (min, max).
    fn normalize(
        samples: &[Self::Sample],
        min: &Self::Sample,
        max: &Self::Sample,
        level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()>;

    /// Quantize a segment range down to its reduced 8-bit representation
    /// while keeping the original range fully contained.
    fn fixup_range(min: &mut Self::Sample, max: &mut Self::Sample);

    fn quantize(
        normalized: &[Self::Sample],
        num_bits: u8,
        segment_active: bool,
        out: &mut [PackedVector],
    ) -> Result<()>;

    /// Full-precision pass-through for the raw sentinel bit rate.
    fn quantize_raw(normalized: &[Self::Sample], out: &mut [PackedVector]) -> Result<()>;

    fn dequantize(
        packed: &[PackedVector],
        num_bits: u8,
        segment_active: bool,
        out: &mut [Self::Sample],
    ) -> Result<()>;

    fn dequantize_raw(packed: &[PackedVector], out: &mut [Self::Sample]) -> Result<()>;

    /// Map normalized values back out of the unit interval.
    fn denormalize(
        normalized: &[Self::Sample],
        min: &Self::Sample,
        max: &Self::Sample,
        level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()>;

    fn write_sample(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()>;
    fn read_sample(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample>;

    /// Write one reduced range endpoint at 8 bits per component. Callers
    /// must only pass endpoints produced by [`Backend::fixup_range`].
    fn write_range_endpoint(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()>;
    fn read_range_endpoint(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample>;
}

pub(crate) fn check_out_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(CodecError::OutputLengthMismatch { expected, found });
    }
    Ok(())
}
