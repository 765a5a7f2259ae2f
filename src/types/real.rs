//! Scalar abstraction shared by the two floating-point back-ends.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// The capability set the float pipeline needs from its scalar type.
///
/// Implemented for `f64` and `f32` only; the fixed-point back-end has its own
/// lane type and does not go through this trait.
pub trait Real:
    Copy
    + Debug
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    /// Range extents below this collapse to zero during normalization.
    const RANGE_EPSILON: Self;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn as_f32(self) -> f32;

    /// Round half away from zero (symmetric rounding).
    fn round_half_away(self) -> Self;

    fn mul_add(self, a: Self, b: Self) -> Self;
}

impl Real for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const RANGE_EPSILON: Self = 1e-9;

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn as_f32(self) -> f32 {
        self as f32
    }

    fn round_half_away(self) -> Self {
        self.round()
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
}

impl Real for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const RANGE_EPSILON: Self = 1e-9;

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn as_f32(self) -> f32 {
        self
    }

    fn round_half_away(self) -> Self {
        self.round()
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
}
