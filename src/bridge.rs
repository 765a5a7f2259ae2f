//! Representation bridge: value-semantic conversions between the f64, f32
//! and fixed-point renditions of a vector.
//!
//! Signed values span [-1, 1] and are remapped to the unsigned unit interval
//! with `u = (v + 1) / 2` before any fixed-point bit manipulation, and
//! remapped back on the way out.
//!
//! `CoercionVariant::ExponentSplice` is the one surviving bit-level fast
//! path: it splices the lane into an IEEE-754 double mantissa instead of
//! performing an integer-to-float conversion. It applies only to Q0.32 lanes
//! and must agree with the canonical path within f32 tolerance (asserted in
//! tests); any other width silently takes the canonical path.

use crate::config::CoercionVariant;
use crate::fxp::FpVector4;
use crate::types::{Signedness, Vector4};

/// Quantize one unit-interval scalar to an unsigned Q0.`num_bits` lane.
pub fn scalar_to_fp(input: f64, num_bits: u8, signedness: Signedness) -> u64 {
    let input = match signedness {
        Signedness::Signed => input * 0.5 + 0.5,
        Signedness::Unsigned => input,
    };
    debug_assert!((0.0..=1.0).contains(&input), "input outside unit interval");

    // Q0.f cannot represent 1.0; round, then saturate to the top lane value.
    let scale = (1u64 << num_bits) as f64;
    let max_lane = (1u64 << num_bits) - 1;
    let rounded = (input * scale).round();
    if rounded >= max_lane as f64 {
        max_lane
    } else {
        rounded as u64
    }
}

/// Widen one unsigned Q0.`num_bits` lane back to f64.
pub fn scalar_from_fp_f64(lane: u64, num_bits: u8, signedness: Signedness) -> f64 {
    debug_assert!(lane <= (1u64 << num_bits) - 1, "lane exceeds width");

    let scale = (1u64 << num_bits) as f64;
    let value = lane as f64 / scale;
    match signedness {
        Signedness::Signed => value * 2.0 - 1.0,
        Signedness::Unsigned => value,
    }
}

/// Narrow one unsigned Q0.`num_bits` lane to f32.
pub fn scalar_from_fp_f32(
    lane: u64,
    num_bits: u8,
    signedness: Signedness,
    variant: CoercionVariant,
) -> f32 {
    debug_assert!(lane <= (1u64 << num_bits) - 1, "lane exceeds width");

    let value = match (variant, num_bits) {
        (CoercionVariant::ExponentSplice, 32) => {
            // Splice the lane into the mantissa of a double in [1, 2) and
            // drop the hidden bit. Exact: a Q0.32 lane fits the 52-bit
            // mantissa with room to spare.
            let bits = (0x3ffu64 << 52) | (lane << (52 - 32));
            (f64::from_bits(bits) - 1.0) as f32
        }
        _ => (lane as f64 / (1u64 << num_bits) as f64) as f32,
    };
    match signedness {
        Signedness::Signed => value * 2.0 - 1.0,
        Signedness::Unsigned => value,
    }
}

pub fn fp_from_f64(v: &Vector4<f64>, num_bits: u8, signedness: Signedness) -> FpVector4 {
    FpVector4::new(
        scalar_to_fp(v.x(), num_bits, signedness),
        scalar_to_fp(v.y(), num_bits, signedness),
        scalar_to_fp(v.z(), num_bits, signedness),
        scalar_to_fp(v.w(), num_bits, signedness),
    )
}

pub fn fp_from_f32(v: &Vector4<f32>, num_bits: u8, signedness: Signedness) -> FpVector4 {
    let widened = Vector4::new(
        v.x() as f64,
        v.y() as f64,
        v.z() as f64,
        v.w() as f64,
    );
    fp_from_f64(&widened, num_bits, signedness)
}

pub fn f64_from_fp(v: &FpVector4, num_bits: u8, signedness: Signedness) -> Vector4<f64> {
    Vector4::new(
        scalar_from_fp_f64(v.x(), num_bits, signedness),
        scalar_from_fp_f64(v.y(), num_bits, signedness),
        scalar_from_fp_f64(v.z(), num_bits, signedness),
        scalar_from_fp_f64(v.w(), num_bits, signedness),
    )
}

pub fn f32_from_fp(
    v: &FpVector4,
    num_bits: u8,
    signedness: Signedness,
    variant: CoercionVariant,
) -> Vector4<f32> {
    Vector4::new(
        scalar_from_fp_f32(v.x(), num_bits, signedness, variant),
        scalar_from_fp_f32(v.y(), num_bits, signedness, variant),
        scalar_from_fp_f32(v.z(), num_bits, signedness, variant),
        scalar_from_fp_f32(v.w(), num_bits, signedness, variant),
    )
}
