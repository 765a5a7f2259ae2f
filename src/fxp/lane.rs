//! 4-lane unsigned fixed-point value.
//!
//! Lanes are raw u64 integers carrying Q0.f values; the fractional-bit
//! position (0.32, 0.24, 0.8) is implicit and tracked by the call site.
//! Stored lanes fit 32 bits, so shifted intermediates stay within u64 and
//! plain u64 arithmetic cannot overflow except where noted.

/// Four u64 lanes with an implicit binary-point position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FpVector4 {
    pub data: [u64; 4],
}

impl FpVector4 {
    pub const ZERO: FpVector4 = FpVector4 { data: [0; 4] };

    pub fn new(x: u64, y: u64, z: u64, w: u64) -> Self {
        Self { data: [x, y, z, w] }
    }

    pub fn splat(v: u64) -> Self {
        Self { data: [v; 4] }
    }

    pub fn x(&self) -> u64 {
        self.data[0]
    }

    pub fn y(&self) -> u64 {
        self.data[1]
    }

    pub fn z(&self) -> u64 {
        self.data[2]
    }

    pub fn w(&self) -> u64 {
        self.data[3]
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        Self {
            data: [
                f(self.data[0], other.data[0]),
                f(self.data[1], other.data[1]),
                f(self.data[2], other.data[2]),
                f(self.data[3], other.data[3]),
            ],
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise division; divisor lanes must be non-zero.
    pub fn div(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn min(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a.min(b))
    }

    pub fn max(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a.max(b))
    }

    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn shift_left(&self, shift: u8) -> Self {
        Self {
            data: [
                self.data[0] << shift,
                self.data[1] << shift,
                self.data[2] << shift,
                self.data[3] << shift,
            ],
        }
    }

    pub fn shift_right(&self, shift: u8) -> Self {
        Self {
            data: [
                self.data[0] >> shift,
                self.data[1] >> shift,
                self.data[2] >> shift,
                self.data[3] >> shift,
            ],
        }
    }

    /// All-ones lane mask where `self == other`, zero elsewhere.
    pub fn equal_mask(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| if a == b { u64::MAX } else { 0 })
    }

    /// Lane select: `if_true` where the mask lane is non-zero.
    pub fn blend(mask: &Self, if_true: &Self, if_false: &Self) -> Self {
        Self {
            data: [
                if mask.data[0] != 0 { if_true.data[0] } else { if_false.data[0] },
                if mask.data[1] != 0 { if_true.data[1] } else { if_false.data[1] },
                if mask.data[2] != 0 { if_true.data[2] } else { if_false.data[2] },
                if mask.data[3] != 0 { if_true.data[3] } else { if_false.data[3] },
            ],
        }
    }

    /// Change the fractional-bit width of every lane.
    ///
    /// Narrowing adds a half-step rounding bias before the shift and clamps
    /// to the destination maximum; widening is an exact left shift. The
    /// asymmetry is a contract: decoders reproduce bit-identical lanes only
    /// because the lossy rounding happens on the narrowing side alone.
    pub fn convert(&self, from_bits: u8, to_bits: u8) -> Self {
        if from_bits > to_bits {
            let truncated = from_bits - to_bits;
            let bias = Self::splat(1u64 << (truncated - 1));
            let max = Self::splat((1u64 << to_bits) - 1);
            self.add(&bias).shift_right(truncated).min(&max)
        } else if from_bits < to_bits {
            self.shift_left(to_bits - from_bits)
        } else {
            *self
        }
    }
}
