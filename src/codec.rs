//! Encode/decode pipeline.
//!
//! Encoding runs each sample sequence through clip-level range reduction,
//! optional per-segment range reduction, and fixed-width quantization, all in
//! terms of one chosen numeric back-end. Decoding replays the same stages in
//! reverse. Both directions are fully deterministic for a given back-end,
//! bit rate and configuration.

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, RangeLevel};
use crate::bitrate::BitRateTable;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::pack::PackedVector;
use crate::types::Vector4;

/// Half-open sample index range `start..end` of one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpan {
    pub start: usize,
    pub end: usize,
}

impl SegmentSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// One encoded segment: its span, its reduced range (when segment range
/// reduction ran) and its packed payload.
#[derive(Clone, Debug)]
pub struct EncodedSegment<B: Backend> {
    pub span: SegmentSpan,
    pub range: Option<(B::Sample, B::Sample)>,
    pub packed: Vec<PackedVector>,
}

/// A fully encoded clip.
#[derive(Clone, Debug)]
pub struct EncodedClip<B: Backend> {
    /// Bit-rate identifier this clip was encoded at.
    pub bit_rate: u8,
    /// Resolved per-component field width.
    pub num_bits: u8,
    /// True when the raw sentinel rate was selected; packed fields then hold
    /// full-precision values instead of quantized ones.
    pub raw: bool,
    pub clip_min: B::Sample,
    pub clip_max: B::Sample,
    pub num_samples: usize,
    pub segments: Vec<EncodedSegment<B>>,
}

impl<B: Backend> EncodedClip<B> {
    /// Field width the packed payload was written at (32 for raw clips).
    pub fn packed_bits(&self) -> u8 {
        if self.raw {
            32
        } else {
            self.num_bits
        }
    }
}

/// Check that `spans` is a contiguous, exhaustive partition of `0..len`.
fn validate_spans(spans: &[SegmentSpan], len: usize) -> Result<()> {
    let mut cursor = 0usize;
    for span in spans {
        if span.start != cursor || span.is_empty() || span.end > len {
            return Err(CodecError::InvalidSegmentLayout {
                start: span.start,
                end: span.end,
                len,
            });
        }
        cursor = span.end;
    }
    if cursor != len {
        return Err(CodecError::InvalidSegmentLayout {
            start: cursor,
            end: cursor,
            len,
        });
    }
    Ok(())
}

/// Encode `samples` at the given bit rate.
///
/// `segments` must partition the sample indices contiguously; an empty slice
/// means one segment spanning the whole clip. Bit rate 0 (the constant
/// sentinel) carries no payload and is rejected here; the highest identifier
/// selects raw full-precision storage.
pub fn encode<B: Backend, T: BitRateTable>(
    samples: &[Vector4<f64>],
    segments: &[SegmentSpan],
    bit_rate: u8,
    table: &T,
    config: &CodecConfig,
) -> Result<EncodedClip<B>> {
    if samples.is_empty() {
        return Err(CodecError::EmptySamples);
    }
    let num_bits = table.num_bits(bit_rate)?;
    if bit_rate == 0 {
        return Err(CodecError::InvalidBitRate(bit_rate));
    }
    let raw = bit_rate == table.highest();

    let whole_clip = [SegmentSpan::new(0, samples.len())];
    let spans: &[SegmentSpan] = if segments.is_empty() {
        &whole_clip
    } else {
        segments
    };
    validate_spans(spans, samples.len())?;

    let imported: Vec<B::Sample> = samples.iter().map(B::import).collect();
    let (clip_min, clip_max) = B::compute_range(&imported)?;

    let mut clip_normalized = vec![B::Sample::default(); imported.len()];
    B::normalize(
        &imported,
        &clip_min,
        &clip_max,
        RangeLevel::Clip,
        &mut clip_normalized,
    )?;

    let mut encoded_segments = Vec::with_capacity(spans.len());
    for span in spans {
        let window = &clip_normalized[span.start..span.end];
        let mut packed = vec![PackedVector::default(); window.len()];

        let range = if raw {
            B::quantize_raw(window, &mut packed)?;
            None
        } else if config.segment_range_reduction {
            let (mut seg_min, mut seg_max) = B::compute_range(window)?;
            B::fixup_range(&mut seg_min, &mut seg_max);

            let mut seg_normalized = vec![B::Sample::default(); window.len()];
            B::normalize(
                window,
                &seg_min,
                &seg_max,
                RangeLevel::Segment,
                &mut seg_normalized,
            )?;
            B::quantize(&seg_normalized, num_bits, true, &mut packed)?;
            Some((seg_min, seg_max))
        } else {
            B::quantize(window, num_bits, false, &mut packed)?;
            None
        };

        encoded_segments.push(EncodedSegment {
            span: *span,
            range,
            packed,
        });
    }

    Ok(EncodedClip {
        bit_rate,
        num_bits,
        raw,
        clip_min,
        clip_max,
        num_samples: samples.len(),
        segments: encoded_segments,
    })
}

/// Decode a clip back into f64 vectors.
pub fn decode<B: Backend>(clip: &EncodedClip<B>, config: &CodecConfig) -> Result<Vec<Vector4<f64>>> {
    let spans: Vec<SegmentSpan> = clip.segments.iter().map(|s| s.span).collect();
    validate_spans(&spans, clip.num_samples)?;

    let mut clip_normalized = vec![B::Sample::default(); clip.num_samples];
    for segment in &clip.segments {
        let out = &mut clip_normalized[segment.span.start..segment.span.end];
        if clip.raw {
            B::dequantize_raw(&segment.packed, out)?;
            continue;
        }

        match &segment.range {
            Some((seg_min, seg_max)) => {
                let mut seg_normalized = vec![B::Sample::default(); out.len()];
                B::dequantize(&segment.packed, clip.num_bits, true, &mut seg_normalized)?;
                B::denormalize(
                    &seg_normalized,
                    seg_min,
                    seg_max,
                    RangeLevel::Segment,
                    out,
                )?;
            }
            None => {
                B::dequantize(&segment.packed, clip.num_bits, false, out)?;
            }
        }
    }

    let mut reconstructed = vec![B::Sample::default(); clip.num_samples];
    B::denormalize(
        &clip_normalized,
        &clip.clip_min,
        &clip.clip_max,
        RangeLevel::Clip,
        &mut reconstructed,
    )?;

    Ok(reconstructed
        .iter()
        .map(|sample| B::export(sample, config.coercion))
        .collect())
}

/// Mean and peak absolute reconstruction error of `decoded` against `raw`,
/// taken over every component.
pub fn reconstruction_error(
    raw: &[Vector4<f64>],
    decoded: &[Vector4<f64>],
) -> Result<(f64, f64)> {
    if raw.is_empty() {
        return Err(CodecError::EmptySamples);
    }
    if raw.len() != decoded.len() {
        return Err(CodecError::OutputLengthMismatch {
            expected: raw.len(),
            found: decoded.len(),
        });
    }
    let mut sum = 0.0f64;
    let mut peak = 0.0f64;
    for (a, b) in raw.iter().zip(decoded.iter()) {
        let delta = a.abs_delta(b);
        for i in 0..4 {
            sum += delta[i];
            peak = peak.max(delta[i]);
        }
    }
    Ok((sum / (raw.len() * 4) as f64, peak))
}
