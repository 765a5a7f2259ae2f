//! Integer fixed-point back-end.
//!
//! Clip-level values are unsigned Q0.32 lanes, segment-normalized values are
//! Q0.24, and stored segment range endpoints are Q0.8. The lossy rounding
//! direction lives entirely in `FpVector4::convert` at encode time; decode
//! shifts are exact.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::backend::{check_out_len, Backend, RangeLevel};
use crate::bridge;
use crate::config::{CoercionVariant, CLIP_FRAC_BITS, RANGE_FRAC_BITS, SEGMENT_FRAC_BITS};
use crate::error::{CodecError, Result};
use crate::fxp::FpVector4;
use crate::pack::PackedVector;
use crate::types::{Signedness, Vector4};

#[derive(Clone, Copy, Debug, Default)]
pub struct FixedBackend;

const CLIP_LANE_MAX: u64 = (1u64 << CLIP_FRAC_BITS) - 1;
const SEGMENT_LANE_MAX: u64 = (1u64 << SEGMENT_FRAC_BITS) - 1;
const RANGE_LANE_MAX: u64 = (1u64 << RANGE_FRAC_BITS) - 1;

impl FixedBackend {
    fn source_bits(segment_active: bool) -> u8 {
        if segment_active {
            SEGMENT_FRAC_BITS
        } else {
            CLIP_FRAC_BITS
        }
    }
}

impl Backend for FixedBackend {
    type Sample = FpVector4;

    const NAME: &'static str = "fixed-point";
    const ID: u8 = 2;

    fn import(raw: &Vector4<f64>) -> Self::Sample {
        bridge::fp_from_f64(raw, CLIP_FRAC_BITS, Signedness::Signed)
    }

    fn export(sample: &Self::Sample, coercion: CoercionVariant) -> Vector4<f64> {
        // Reconstructed samples leave through f32; the coercion variant
        // selects the conversion flavor.
        let narrowed =
            bridge::f32_from_fp(sample, CLIP_FRAC_BITS, Signedness::Signed, coercion);
        Vector4::new(
            narrowed.x() as f64,
            narrowed.y() as f64,
            narrowed.z() as f64,
            narrowed.w() as f64,
        )
    }

    fn compute_range(samples: &[Self::Sample]) -> Result<(Self::Sample, Self::Sample)> {
        let (first, rest) = samples.split_first().ok_or(CodecError::EmptySamples)?;
        let mut min = *first;
        let mut max = *first;
        for value in rest {
            min = min.min(value);
            max = max.max(value);
        }
        Ok((min, max))
    }

    fn normalize(
        samples: &[Self::Sample],
        min: &Self::Sample,
        max: &Self::Sample,
        level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(samples.len(), out.len())?;
        match level {
            RangeLevel::Clip => {
                // Range and values are Q0.32; output is Q0.32.
                let extent = max.sub(min);
                for (value, slot) in samples.iter().zip(out.iter_mut()) {
                    // Shift the numerator up before the integer divide to
                    // preserve precision.
                    let offset = value.sub(min).shift_left(CLIP_FRAC_BITS);
                    let mut normalized = FpVector4::ZERO;
                    for i in 0..4 {
                        normalized.data[i] = if extent.data[i] != 0 {
                            offset.data[i] / extent.data[i]
                        } else {
                            0
                        };
                    }
                    *slot = normalized.min(&FpVector4::splat(CLIP_LANE_MAX));
                }
            }
            RangeLevel::Segment => {
                // Range endpoints are Q0.8 after fixup; values are Q0.32;
                // output is Q0.24. The 8-bit extent cannot express an exact
                // 1.0 span, so it is incremented by one ULP. The
                // denormalizer mirrors this exactly.
                let divisor = max.sub(min).add(&FpVector4::splat(1));
                let min_q32 = min.shift_left(CLIP_FRAC_BITS - RANGE_FRAC_BITS);
                for (value, slot) in samples.iter().zip(out.iter_mut()) {
                    let offset = value.sub(&min_q32);
                    let normalized = offset.div(&divisor);
                    *slot = normalized.min(&FpVector4::splat(SEGMENT_LANE_MAX));
                }
            }
        }
        Ok(())
    }

    fn fixup_range(min: &mut Self::Sample, max: &mut Self::Sample) {
        // Q0.32 -> Q0.8 with outward padding: the floor shift can only move
        // min down, the ceiling shift can only move max up, so the clamped
        // range always contains the original.
        let shift = CLIP_FRAC_BITS - RANGE_FRAC_BITS;
        let ceil_bias = FpVector4::splat((1u64 << shift) - 1);
        let lane_max = FpVector4::splat(RANGE_LANE_MAX);

        *min = min.shift_right(shift).min(&lane_max);
        *max = max.add(&ceil_bias).shift_right(shift).min(&lane_max);
    }

    fn quantize(
        normalized: &[Self::Sample],
        num_bits: u8,
        segment_active: bool,
        out: &mut [PackedVector],
    ) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        let source_bits = Self::source_bits(segment_active);
        let max_lane = (1u64 << source_bits) - 1;
        for (value, slot) in normalized.iter().zip(out.iter_mut()) {
            for (component, &lane) in value.data.iter().enumerate() {
                // Same contract breach as a float value outside [0, 1]:
                // abort instead of silently saturating through the convert.
                if lane > max_lane {
                    return Err(CodecError::NormalizedOutOfRange {
                        component,
                        value: lane as f64 / (max_lane as f64 + 1.0),
                    });
                }
            }
            let quantized = value.convert(source_bits, num_bits);
            let fields = [
                quantized.x() as u32,
                quantized.y() as u32,
                quantized.z() as u32,
                quantized.w() as u32,
            ];
            *slot = PackedVector::pack(fields, num_bits)?;
        }
        Ok(())
    }

    fn quantize_raw(normalized: &[Self::Sample], out: &mut [PackedVector]) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        for (value, slot) in normalized.iter().zip(out.iter_mut()) {
            let fields = [
                value.x() as u32,
                value.y() as u32,
                value.z() as u32,
                value.w() as u32,
            ];
            *slot = PackedVector::pack(fields, 32)?;
        }
        Ok(())
    }

    fn dequantize(
        packed: &[PackedVector],
        num_bits: u8,
        segment_active: bool,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(packed.len(), out.len())?;
        let target_bits = Self::source_bits(segment_active);
        for (value, slot) in packed.iter().zip(out.iter_mut()) {
            let fields = value.unpack(num_bits)?;
            let lanes = FpVector4::new(
                fields[0] as u64,
                fields[1] as u64,
                fields[2] as u64,
                fields[3] as u64,
            );
            // Pure widening shift: the direction of loss already occurred at
            // encode time.
            *slot = lanes.convert(num_bits, target_bits);
        }
        Ok(())
    }

    fn dequantize_raw(packed: &[PackedVector], out: &mut [Self::Sample]) -> Result<()> {
        check_out_len(packed.len(), out.len())?;
        for (value, slot) in packed.iter().zip(out.iter_mut()) {
            let fields = value.unpack(32)?;
            *slot = FpVector4::new(
                fields[0] as u64,
                fields[1] as u64,
                fields[2] as u64,
                fields[3] as u64,
            );
        }
        Ok(())
    }

    fn denormalize(
        normalized: &[Self::Sample],
        min: &Self::Sample,
        max: &Self::Sample,
        level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        match level {
            RangeLevel::Clip => {
                // Q0.32 throughout: (n * extent) >> 32 + min, truncating.
                let extent = max.sub(min);
                for (value, slot) in normalized.iter().zip(out.iter_mut()) {
                    *slot = value
                        .mul(&extent)
                        .shift_right(CLIP_FRAC_BITS)
                        .add(min);
                }
            }
            RangeLevel::Segment => {
                // Mirrors the segment normalizer: extent + 1 ULP, min
                // rescaled to Q0.32; output is Q0.32.
                let divisor = max.sub(min).add(&FpVector4::splat(1));
                let min_q32 = min.shift_left(CLIP_FRAC_BITS - RANGE_FRAC_BITS);
                for (value, slot) in normalized.iter().zip(out.iter_mut()) {
                    *slot = value.mul(&divisor).add(&min_q32);
                }
            }
        }
        Ok(())
    }

    fn write_sample(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()> {
        for lane in sample.data {
            wtr.write_u64::<LittleEndian>(lane)?;
        }
        Ok(())
    }

    fn read_sample(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample> {
        let mut data = [0u64; 4];
        for slot in data.iter_mut() {
            *slot = rdr.read_u64::<LittleEndian>()?;
        }
        Ok(FpVector4 { data })
    }

    fn write_range_endpoint(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()> {
        // Fixed-up endpoints are Q0.8 lanes already.
        for lane in sample.data {
            if lane > RANGE_LANE_MAX {
                return Err(CodecError::FieldOverflow {
                    field: lane as u32,
                    num_bits: RANGE_FRAC_BITS,
                });
            }
            wtr.write_u8(lane as u8)?;
        }
        Ok(())
    }

    fn read_range_endpoint(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample> {
        let mut data = [0u64; 4];
        for slot in data.iter_mut() {
            *slot = u64::from(rdr.read_u8()?);
        }
        Ok(FpVector4 { data })
    }
}
