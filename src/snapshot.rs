//! Binary snapshot format for encoded clips.
//!
//! Format:
//! [4 bytes] Magic (`RPAK`)
//! [u32] Format Version (1)
//! [u8]  Back-end ID
//! [u8]  Flags (bit 0: raw sentinel payload)
//! [u8]  Bit rate identifier
//! [u8]  Per-component bit width
//! [u64] Sample count
//! Clip min sample (back-end encoding, 32 bytes)
//! Clip max sample
//! [u32] Segment count
//! For each segment:
//!   [u64] Span start
//!   [u64] Span end
//!   [u8]  Range present
//!   If present: segment min, segment max (reduced form, 4 bytes each)
//!   [u32] Packed vector count (must equal the span length)
//!   Packed payload, `count * ceil(4 * width / 8)` bytes
//!
//! Deserialization is strict: unknown magic, version, back-end, flag bits,
//! span bookkeeping mismatches and trailing bytes are all hard errors.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::backend::Backend;
use crate::codec::{EncodedClip, EncodedSegment, SegmentSpan};
use crate::error::{CodecError, Result};
use crate::pack::{byte_len, PackedVector};

pub const MAGIC: [u8; 4] = *b"RPAK";
pub const FORMAT_V1: u32 = 1;

const FLAG_RAW: u8 = 0b0000_0001;

/// Every counted element occupies at least one byte, so any count larger
/// than the remaining input is corrupt.
fn check_count(count: usize, rdr: &Cursor<&[u8]>, total: usize) -> Result<()> {
    let remaining = total.saturating_sub(rdr.position() as usize);
    if count > remaining {
        return Err(CodecError::InvalidPayloadLength {
            expected: count,
            found: remaining,
        });
    }
    Ok(())
}

/// Serializes an encoded clip to its binary snapshot form.
pub fn serialize<B: Backend>(clip: &EncodedClip<B>) -> Result<Vec<u8>> {
    let mut wtr = Vec::new();

    // 1. Header
    wtr.extend_from_slice(&MAGIC);
    wtr.write_u32::<LittleEndian>(FORMAT_V1)?;
    wtr.write_u8(B::ID)?;
    wtr.write_u8(if clip.raw { FLAG_RAW } else { 0 })?;
    wtr.write_u8(clip.bit_rate)?;
    wtr.write_u8(clip.num_bits)?;
    wtr.write_u64::<LittleEndian>(clip.num_samples as u64)?;

    // 2. Clip range
    B::write_sample(&clip.clip_min, &mut wtr)?;
    B::write_sample(&clip.clip_max, &mut wtr)?;

    // 3. Segments
    let packed_bits = clip.packed_bits();
    wtr.write_u32::<LittleEndian>(clip.segments.len() as u32)?;
    for segment in &clip.segments {
        wtr.write_u64::<LittleEndian>(segment.span.start as u64)?;
        wtr.write_u64::<LittleEndian>(segment.span.end as u64)?;

        match &segment.range {
            Some((min, max)) => {
                // Fixed-up endpoints carry 8 significant bits per component.
                wtr.write_u8(1)?;
                B::write_range_endpoint(min, &mut wtr)?;
                B::write_range_endpoint(max, &mut wtr)?;
            }
            None => wtr.write_u8(0)?,
        }

        if segment.packed.len() != segment.span.len() {
            return Err(CodecError::OutputLengthMismatch {
                expected: segment.span.len(),
                found: segment.packed.len(),
            });
        }
        wtr.write_u32::<LittleEndian>(segment.packed.len() as u32)?;
        for packed in &segment.packed {
            packed.to_bytes(packed_bits, &mut wtr)?;
        }
    }

    Ok(wtr)
}

/// Deserializes and strictly validates an encoded clip.
pub fn deserialize<B: Backend>(data: &[u8]) -> Result<EncodedClip<B>> {
    let mut rdr = Cursor::new(data);

    // 1. Header check
    let mut magic = [0u8; 4];
    rdr.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = rdr.read_u32::<LittleEndian>()?;
    if version != FORMAT_V1 {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let backend_id = rdr.read_u8()?;
    if backend_id != B::ID {
        return Err(CodecError::BackendMismatch {
            expected: B::ID,
            found: backend_id,
        });
    }
    let flags = rdr.read_u8()?;
    if flags & !FLAG_RAW != 0 {
        return Err(CodecError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("unknown snapshot flags: {flags:#04x}"),
        )));
    }
    let raw = flags & FLAG_RAW != 0;
    let bit_rate = rdr.read_u8()?;
    let num_bits = rdr.read_u8()?;
    let num_samples = rdr.read_u64::<LittleEndian>()? as usize;

    // 2. Clip range
    let clip_min = B::read_sample(&mut rdr)?;
    let clip_max = B::read_sample(&mut rdr)?;

    // 3. Segments
    let packed_bits = if raw { 32 } else { num_bits };
    let payload_len = byte_len(packed_bits);
    let segment_count = rdr.read_u32::<LittleEndian>()? as usize;
    // A declared count cannot exceed the bytes left to carry it; checked
    // before reserving so a corrupt header cannot demand a huge allocation.
    check_count(segment_count, &rdr, data.len())?;
    let mut segments = Vec::with_capacity(segment_count);
    let mut cursor = 0usize;
    for _ in 0..segment_count {
        let start = rdr.read_u64::<LittleEndian>()? as usize;
        let end = rdr.read_u64::<LittleEndian>()? as usize;
        let span = SegmentSpan::new(start, end);
        if start != cursor || span.is_empty() || end > num_samples {
            return Err(CodecError::InvalidSegmentLayout {
                start,
                end,
                len: num_samples,
            });
        }
        cursor = end;

        let range = match rdr.read_u8()? {
            0 => None,
            1 => {
                let min = B::read_range_endpoint(&mut rdr)?;
                let max = B::read_range_endpoint(&mut rdr)?;
                Some((min, max))
            }
            other => {
                return Err(CodecError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("invalid range-present byte: {other}"),
                )));
            }
        };

        let packed_count = rdr.read_u32::<LittleEndian>()? as usize;
        if packed_count != span.len() {
            return Err(CodecError::OutputLengthMismatch {
                expected: span.len(),
                found: packed_count,
            });
        }
        check_count(packed_count, &rdr, data.len())?;
        let mut packed = Vec::with_capacity(packed_count);
        let mut buf = vec![0u8; payload_len];
        for _ in 0..packed_count {
            rdr.read_exact(&mut buf)?;
            packed.push(PackedVector::from_bytes(&buf, packed_bits)?);
        }

        segments.push(EncodedSegment {
            span,
            range,
            packed,
        });
    }
    if cursor != num_samples {
        return Err(CodecError::InvalidSegmentLayout {
            start: cursor,
            end: cursor,
            len: num_samples,
        });
    }

    // 4. No trailing bytes
    if (rdr.position() as usize) != data.len() {
        return Err(CodecError::InvalidPayloadLength {
            expected: rdr.position() as usize,
            found: data.len(),
        });
    }

    Ok(EncodedClip {
        bit_rate,
        num_bits,
        raw,
        clip_min,
        clip_max,
        num_samples,
        segments,
    })
}
