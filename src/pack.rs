//! Fixed-width bit-field packing.
//!
//! A packed vector holds four equal-width fields, most-significant field
//! first (x, y, z, w), laid out contiguously with no padding between fields.
//! The wire bytes are the big-endian rendition of that 4xN-bit integer in
//! exactly `ceil(4N / 8)` bytes. This layout is the persisted format and is
//! fixed: decoders reconstruct field boundaries purely from the width.

use crate::error::{CodecError, Result};

pub const MAX_FIELD_BITS: u8 = 32;
pub const NUM_FIELDS: usize = 4;

/// Four equal-width bit fields packed into a single integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PackedVector {
    bits: u128,
}

/// Largest value a field of `num_bits` can carry.
pub fn field_max(num_bits: u8) -> u32 {
    if num_bits >= 32 {
        u32::MAX
    } else {
        (1u32 << num_bits) - 1
    }
}

/// Wire size of one packed vector at the given width.
pub fn byte_len(num_bits: u8) -> usize {
    (NUM_FIELDS * num_bits as usize + 7) / 8
}

fn check_width(num_bits: u8) -> Result<()> {
    if num_bits == 0 || num_bits > MAX_FIELD_BITS {
        return Err(CodecError::InvalidBitWidth(num_bits));
    }
    Ok(())
}

impl PackedVector {
    /// Pack four fields; each must fit in `num_bits`.
    pub fn pack(fields: [u32; 4], num_bits: u8) -> Result<Self> {
        check_width(num_bits)?;
        let max = field_max(num_bits);
        let mut bits: u128 = 0;
        for field in fields {
            if field > max {
                return Err(CodecError::FieldOverflow { field, num_bits });
            }
            bits = (bits << num_bits) | u128::from(field);
        }
        Ok(Self { bits })
    }

    /// Unpack the four fields at the given width.
    pub fn unpack(&self, num_bits: u8) -> Result<[u32; 4]> {
        check_width(num_bits)?;
        let total = NUM_FIELDS as u32 * num_bits as u32;
        if total < 128 && (self.bits >> total) != 0 {
            return Err(CodecError::CorruptPacked { num_bits });
        }
        let mask = u128::from(field_max(num_bits));
        let n = num_bits as u32;
        Ok([
            ((self.bits >> (3 * n)) & mask) as u32,
            ((self.bits >> (2 * n)) & mask) as u32,
            ((self.bits >> n) & mask) as u32,
            (self.bits & mask) as u32,
        ])
    }

    pub fn to_bytes(&self, num_bits: u8, out: &mut Vec<u8>) -> Result<()> {
        check_width(num_bits)?;
        let len = byte_len(num_bits);
        let be = self.bits.to_be_bytes();
        out.extend_from_slice(&be[16 - len..]);
        Ok(())
    }

    pub fn from_bytes(data: &[u8], num_bits: u8) -> Result<Self> {
        check_width(num_bits)?;
        let len = byte_len(num_bits);
        if data.len() != len {
            return Err(CodecError::InvalidPayloadLength {
                expected: len,
                found: data.len(),
            });
        }
        let mut be = [0u8; 16];
        be[16 - len..].copy_from_slice(data);
        let bits = u128::from_be_bytes(be);
        let total = NUM_FIELDS as u32 * num_bits as u32;
        if total < 128 && (bits >> total) != 0 {
            return Err(CodecError::CorruptPacked { num_bits });
        }
        Ok(Self { bits })
    }

    pub fn raw_bits(&self) -> u128 {
        self.bits
    }
}
