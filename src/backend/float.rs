//! Floating-point back-ends (f64 and f32), one implementation generic over
//! the scalar type.

use std::io::Cursor;
use std::marker::PhantomData;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::backend::{check_out_len, Backend, RangeLevel};
use crate::config::{CoercionVariant, RANGE_FRAC_BITS};
use crate::error::{CodecError, Result};
use crate::pack::{field_max, PackedVector};
use crate::types::{Real, Vector4};

#[derive(Clone, Copy, Debug, Default)]
pub struct FloatBackend<T: Real> {
    _marker: PhantomData<T>,
}

pub type F64Backend = FloatBackend<f64>;
pub type F32Backend = FloatBackend<f32>;

/// `round(v * (2^N - 1))`, saturated. Errors when `v` leaves [0, 1]: silent
/// clamping there would mask upstream bugs.
fn pack_scalar<T: Real>(v: T, num_bits: u8, component: usize) -> Result<u32> {
    if v < T::ZERO || v > T::ONE {
        return Err(CodecError::NormalizedOutOfRange {
            component,
            value: v.to_f64(),
        });
    }
    let max = field_max(num_bits);
    let scaled = v * T::from_f64(max as f64);
    let rounded = scaled.round_half_away();
    // A value of exactly 1.0 rounds to max; anything above is overshoot.
    if rounded.to_f64() >= max as f64 {
        Ok(max)
    } else {
        Ok(rounded.to_f64() as u32)
    }
}

/// `field / (2^N - 1)`.
fn unpack_scalar<T: Real>(field: u32, num_bits: u8) -> T {
    let max = field_max(num_bits);
    T::from_f64(field as f64) / T::from_f64(max as f64)
}

/// Saturating variant used where the input domain is already guaranteed.
fn pack_scalar_saturating<T: Real>(v: T, num_bits: u8) -> u32 {
    let max = field_max(num_bits);
    let rounded = (v * T::from_f64(max as f64)).round_half_away().to_f64();
    if rounded <= 0.0 {
        0
    } else if rounded >= max as f64 {
        max
    } else {
        rounded as u32
    }
}

impl<T: Real> FloatBackend<T> {
    fn round_trip_8bit(v: T) -> T {
        unpack_scalar(pack_scalar_saturating(v, RANGE_FRAC_BITS), RANGE_FRAC_BITS)
    }
}

impl<T: Real> Backend for FloatBackend<T> {
    type Sample = Vector4<T>;

    const NAME: &'static str = float::name_of::<T>();
    const ID: u8 = float::id_of::<T>();

    fn import(raw: &Vector4<f64>) -> Self::Sample {
        Vector4 {
            data: [
                T::from_f64(raw.x()),
                T::from_f64(raw.y()),
                T::from_f64(raw.z()),
                T::from_f64(raw.w()),
            ],
        }
    }

    fn export(sample: &Self::Sample, _coercion: CoercionVariant) -> Vector4<f64> {
        Vector4 {
            data: [
                sample.x().to_f64(),
                sample.y().to_f64(),
                sample.z().to_f64(),
                sample.w().to_f64(),
            ],
        }
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
        _level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(samples.len(), out.len())?;
        let extent = max.sub(min);
        for (value, slot) in samples.iter().zip(out.iter_mut()) {
            let mut normalized = Vector4::zero();
            for i in 0..4 {
                // Near-zero extents force 0 instead of dividing; this is a
                // required degenerate-range guard, not an approximation.
                normalized[i] = if extent[i] < T::RANGE_EPSILON {
                    T::ZERO
                } else {
                    (value[i] - min[i]) / extent[i]
                };
            }
            *slot = normalized;
        }
        Ok(())
    }

    fn fixup_range(min: &mut Self::Sample, max: &mut Self::Sample) {
        // Pad each endpoint outward by one 8-bit quantization step so the
        // round-trip through the reduced representation cannot clip samples
        // sitting on the true range boundary.
        let padding = Vector4::splat(unpack_scalar::<T>(1, RANGE_FRAC_BITS));
        let zero = Vector4::splat(T::ZERO);
        let one = Vector4::splat(T::ONE);

        let clamped_min = min.sub(&padding).max(&zero);
        let clamped_max = max.add(&padding).min(&one);

        *min = clamped_min.map(Self::round_trip_8bit);
        *max = clamped_max.map(Self::round_trip_8bit);
    }

    fn quantize(
        normalized: &[Self::Sample],
        num_bits: u8,
        _segment_active: bool,
        out: &mut [PackedVector],
    ) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        for (value, slot) in normalized.iter().zip(out.iter_mut()) {
            let fields = [
                pack_scalar(value.x(), num_bits, 0)?,
                pack_scalar(value.y(), num_bits, 1)?,
                pack_scalar(value.z(), num_bits, 2)?,
                pack_scalar(value.w(), num_bits, 3)?,
            ];
            *slot = PackedVector::pack(fields, num_bits)?;
        }
        Ok(())
    }

    fn quantize_raw(normalized: &[Self::Sample], out: &mut [PackedVector]) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        for (value, slot) in normalized.iter().zip(out.iter_mut()) {
            let fields = [
                value.x().as_f32().to_bits(),
                value.y().as_f32().to_bits(),
                value.z().as_f32().to_bits(),
                value.w().as_f32().to_bits(),
            ];
            *slot = PackedVector::pack(fields, 32)?;
        }
        Ok(())
    }

    fn dequantize(
        packed: &[PackedVector],
        num_bits: u8,
        _segment_active: bool,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(packed.len(), out.len())?;
        for (value, slot) in packed.iter().zip(out.iter_mut()) {
            let fields = value.unpack(num_bits)?;
            *slot = Vector4 {
                data: [
                    unpack_scalar(fields[0], num_bits),
                    unpack_scalar(fields[1], num_bits),
                    unpack_scalar(fields[2], num_bits),
                    unpack_scalar(fields[3], num_bits),
                ],
            };
        }
        Ok(())
    }

    fn dequantize_raw(packed: &[PackedVector], out: &mut [Self::Sample]) -> Result<()> {
        check_out_len(packed.len(), out.len())?;
        for (value, slot) in packed.iter().zip(out.iter_mut()) {
            let fields = value.unpack(32)?;
            *slot = Vector4 {
                data: [
                    T::from_f64(f32::from_bits(fields[0]) as f64),
                    T::from_f64(f32::from_bits(fields[1]) as f64),
                    T::from_f64(f32::from_bits(fields[2]) as f64),
                    T::from_f64(f32::from_bits(fields[3]) as f64),
                ],
            };
        }
        Ok(())
    }

    fn denormalize(
        normalized: &[Self::Sample],
        min: &Self::Sample,
        max: &Self::Sample,
        _level: RangeLevel,
        out: &mut [Self::Sample],
    ) -> Result<()> {
        check_out_len(normalized.len(), out.len())?;
        let extent = max.sub(min);
        for (value, slot) in normalized.iter().zip(out.iter_mut()) {
            *slot = value.mul_add(&extent, min);
        }
        Ok(())
    }

    fn write_sample(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()> {
        for component in sample.as_slice() {
            wtr.write_u64::<LittleEndian>(component.to_f64().to_bits())?;
        }
        Ok(())
    }

    fn read_sample(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample> {
        let mut data = [T::ZERO; 4];
        for slot in data.iter_mut() {
            *slot = T::from_f64(f64::from_bits(rdr.read_u64::<LittleEndian>()?));
        }
        Ok(Vector4 { data })
    }

    fn write_range_endpoint(sample: &Self::Sample, wtr: &mut Vec<u8>) -> Result<()> {
        // Fixed-up endpoints sit exactly on the 1/255 grid, so the 8-bit
        // field recovers them without loss.
        for component in sample.as_slice() {
            wtr.write_u8(pack_scalar_saturating(*component, RANGE_FRAC_BITS) as u8)?;
        }
        Ok(())
    }

    fn read_range_endpoint(rdr: &mut Cursor<&[u8]>) -> Result<Self::Sample> {
        let mut data = [T::ZERO; 4];
        for slot in data.iter_mut() {
            *slot = unpack_scalar(u32::from(rdr.read_u8()?), RANGE_FRAC_BITS);
        }
        Ok(Vector4 { data })
    }
}

// const fn dispatch for per-scalar identity; kept private to the module.
mod float {
    use crate::types::Real;

    pub const fn name_of<T: Real>() -> &'static str {
        if core::mem::size_of::<T>() == 8 {
            "float64"
        } else {
            "float32"
        }
    }

    pub const fn id_of<T: Real>() -> u8 {
        if core::mem::size_of::<T>() == 8 {
            0
        } else {
            1
        }
    }
}
