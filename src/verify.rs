//! Integrity verification for encoded clips and their snapshots.
//!
//! Two independent mechanisms: a CRC64 seal around snapshot bytes for fast
//! corruption detection on the wire, and a blake3 content hash used as a
//! stable identity for deterministic-output checks across runs and hosts.

use crc64fast::Digest;

use crate::backend::Backend;
use crate::codec::EncodedClip;
use crate::error::{CodecError, Result};
use crate::snapshot;

/// Stable 32-byte identity of a snapshot.
pub fn snapshot_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// CRC64 of the packed payload stream, in segment order.
///
/// Two clips with the same digest carry bit-identical quantized payloads,
/// which is the determinism property the codec guarantees per back-end.
pub fn payload_digest<B: Backend>(clip: &EncodedClip<B>) -> u64 {
    let mut digest = Digest::new();
    digest.write(&[B::ID, clip.bit_rate, clip.num_bits, clip.raw as u8]);
    for segment in &clip.segments {
        digest.write(&(segment.span.start as u64).to_le_bytes());
        digest.write(&(segment.span.end as u64).to_le_bytes());
        for packed in &segment.packed {
            digest.write(&packed.raw_bits().to_le_bytes());
        }
    }
    digest.sum64()
}

/// Serialize a clip and prepend a CRC64 of the snapshot body.
pub fn seal<B: Backend>(clip: &EncodedClip<B>) -> Result<Vec<u8>> {
    let body = snapshot::serialize(clip)?;

    let mut digest = Digest::new();
    digest.write(&body);
    let checksum = digest.sum64();

    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Verify the CRC64 seal and deserialize the clip.
pub fn open<B: Backend>(data: &[u8]) -> Result<EncodedClip<B>> {
    if data.len() < 8 {
        return Err(CodecError::InvalidPayloadLength {
            expected: 8,
            found: data.len(),
        });
    }
    let (head, body) = data.split_at(8);
    let expected = u64::from_le_bytes(head.try_into().unwrap());

    let mut digest = Digest::new();
    digest.write(body);
    let found = digest.sum64();
    if found != expected {
        return Err(CodecError::ChecksumMismatch { expected, found });
    }

    snapshot::deserialize(body)
}
