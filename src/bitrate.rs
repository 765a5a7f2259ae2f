//! Bit-rate identifiers and their per-component bit widths.
//!
//! The codec itself never hard-codes widths; it resolves an opaque bit-rate
//! id through a [`BitRateTable`]. Tables must be monotonically non-decreasing
//! in the identifier. Identifier 0 and the highest identifier are reserved
//! sentinels (constant-value and raw full-precision storage) and are excluded
//! from the quantization sweep.

use crate::error::{CodecError, Result};

/// Maps a bit-rate identifier to a per-component bit width.
pub trait BitRateTable {
    /// Number of identifiers in the table.
    fn len(&self) -> u8;

    /// Per-component width for `bit_rate`, in 1..=32 for non-sentinel ids.
    fn num_bits(&self, bit_rate: u8) -> Result<u8>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest identifier (the raw sentinel). An empty table has no valid
    /// identifiers; this saturates to 0 rather than underflowing.
    fn highest(&self) -> u8 {
        self.len().saturating_sub(1)
    }

    fn is_sentinel(&self, bit_rate: u8) -> bool {
        bit_rate == 0 || bit_rate == self.highest()
    }

    /// Identifiers participating in the quantization sweep.
    fn sweep(&self) -> core::ops::Range<u8> {
        1..self.highest()
    }
}

/// The standard 19-entry table: id 0 is the constant sentinel, ids 1..=17
/// map to 3..=19 bits, id 18 is the raw sentinel (32 bits).
pub const STANDARD_NUM_BITS: [u8; 19] = [
    0, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 32,
];

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBitRateTable;

impl BitRateTable for StandardBitRateTable {
    fn len(&self) -> u8 {
        STANDARD_NUM_BITS.len() as u8
    }

    fn num_bits(&self, bit_rate: u8) -> Result<u8> {
        STANDARD_NUM_BITS
            .get(bit_rate as usize)
            .copied()
            .ok_or(CodecError::InvalidBitRate(bit_rate))
    }
}
