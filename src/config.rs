//! Configuration constants and call-time codec options.

use serde::{Deserialize, Serialize};

/// Fractional bits of a clip-level fixed-point value (Q0.32).
pub const CLIP_FRAC_BITS: u8 = 32;

/// Fractional bits of a segment-normalized fixed-point value (Q0.24).
pub const SEGMENT_FRAC_BITS: u8 = 24;

/// Fractional bits of a stored segment range endpoint (Q0.8).
pub const RANGE_FRAC_BITS: u8 = 8;

/// Range extents below this are treated as zero by the float back-ends.
pub const RANGE_EPSILON: f64 = 1e-9;

/// How fixed-point lanes are coerced into floating-point values.
///
/// `Canonical` is the numerically verified integer-to-float division path.
/// `ExponentSplice` writes the lanes straight into an IEEE-754 mantissa and
/// subtracts the hidden bit; it must agree with `Canonical` within
/// representation tolerance and is never a second source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CoercionVariant {
    #[default]
    Canonical = 0,
    ExponentSplice = 1,
}

impl CoercionVariant {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CoercionVariant::Canonical),
            1 => Some(CoercionVariant::ExponentSplice),
            _ => None,
        }
    }
}

/// Call-time pipeline options.
///
/// These were compile-time globals in earlier iterations of the codec; they
/// are plain data now so behavior is testable without rebuilding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Enable the second (segment) range-reduction level.
    pub segment_range_reduction: bool,
    /// Fixed-point to float conversion flavor used on the decode side.
    pub coercion: CoercionVariant,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            segment_range_reduction: true,
            coercion: CoercionVariant::Canonical,
        }
    }
}
