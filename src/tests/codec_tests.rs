use crate::backend::{F32Backend, F64Backend, FixedBackend};
use crate::bitrate::StandardBitRateTable;
use crate::codec::{decode, encode, reconstruction_error, SegmentSpan};
use crate::config::{CodecConfig, CoercionVariant};
use crate::error::CodecError;
use crate::types::Vector4;

const TABLE: StandardBitRateTable = StandardBitRateTable;

fn flat_config() -> CodecConfig {
    CodecConfig {
        segment_range_reduction: false,
        coercion: CoercionVariant::Canonical,
    }
}

/// Samples whose components all sit on their clip-range boundary, so an
/// 8-bit round trip reconstructs them exactly.
fn boundary_samples() -> Vec<Vector4<f64>> {
    vec![
        Vector4::new(0.1, 0.2, 0.3, 0.4),
        Vector4::new(0.9, 0.8, 0.1, 0.0),
    ]
}

#[test]
fn test_boundary_samples_reconstruct_exactly_at_8_bits() {
    let samples = boundary_samples();
    // Identifier 6 resolves to 8 bits in the standard table.
    let clip = encode::<F64Backend, _>(&samples, &[], 6, &TABLE, &flat_config()).unwrap();
    assert_eq!(clip.num_bits, 8);
    assert!(!clip.raw);

    // Every component is at its own min or max, so the packed fields are all
    // 0 or 255.
    let packed = &clip.segments[0].packed;
    assert_eq!(packed[0].unpack(8).unwrap(), [0, 0, 255, 255]);
    assert_eq!(packed[1].unpack(8).unwrap(), [255, 255, 0, 0]);

    let decoded = decode(&clip, &flat_config()).unwrap();
    assert_eq!(decoded, samples);
}

#[test]
fn test_constant_sentinel_is_rejected() {
    let samples = boundary_samples();
    let err = encode::<F64Backend, _>(&samples, &[], 0, &TABLE, &flat_config()).unwrap_err();
    assert!(matches!(err, CodecError::InvalidBitRate(0)));
}

#[test]
fn test_empty_samples_are_rejected() {
    let err = encode::<F64Backend, _>(&[], &[], 6, &TABLE, &flat_config()).unwrap_err();
    assert!(matches!(err, CodecError::EmptySamples));
}

#[test]
fn test_segment_layout_validation() {
    let samples = vec![Vector4::new(0.0, 0.0, 0.0, 0.0); 10];

    // Gap between segments.
    let gap = [SegmentSpan::new(0, 4), SegmentSpan::new(5, 10)];
    assert!(matches!(
        encode::<F64Backend, _>(&samples, &gap, 6, &TABLE, &flat_config()),
        Err(CodecError::InvalidSegmentLayout { .. })
    ));

    // Overlap.
    let overlap = [SegmentSpan::new(0, 6), SegmentSpan::new(4, 10)];
    assert!(matches!(
        encode::<F64Backend, _>(&samples, &overlap, 6, &TABLE, &flat_config()),
        Err(CodecError::InvalidSegmentLayout { .. })
    ));

    // Not exhaustive.
    let short = [SegmentSpan::new(0, 8)];
    assert!(matches!(
        encode::<F64Backend, _>(&samples, &short, 6, &TABLE, &flat_config()),
        Err(CodecError::InvalidSegmentLayout { .. })
    ));

    // Past the end.
    let long = [SegmentSpan::new(0, 11)];
    assert!(matches!(
        encode::<F64Backend, _>(&samples, &long, 6, &TABLE, &flat_config()),
        Err(CodecError::InvalidSegmentLayout { .. })
    ));
}

fn smooth_samples(n: usize) -> Vec<Vector4<f64>> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            Vector4::new(
                0.9 * (t * 6.0).sin(),
                0.7 * (t * 3.0).cos(),
                1.8 * t - 0.9,
                0.4 * (t * 11.0).sin() - 0.2,
            )
        })
        .collect()
}

#[test]
fn test_two_level_round_trip_within_bound() {
    let samples = smooth_samples(64);
    let spans = [SegmentSpan::new(0, 32), SegmentSpan::new(32, 64)];
    let config = CodecConfig::default();

    let clip = encode::<F64Backend, _>(&samples, &spans, 6, &TABLE, &config).unwrap();
    assert_eq!(clip.segments.len(), 2);
    assert!(clip.segments.iter().all(|s| s.range.is_some()));

    let decoded = decode(&clip, &config).unwrap();
    let (mean, peak) = reconstruction_error(&samples, &decoded).unwrap();
    // Clip extents are < 2; a padded segment range never exceeds the unit
    // interval, so the worst-case two-level error stays under one 8-bit step
    // of the clip extent.
    assert!(peak <= 2.0 / 255.0, "peak {peak}");
    assert!(mean <= peak);
}

#[test]
fn test_segment_reduction_never_hurts_much() {
    let samples = smooth_samples(64);
    let spans = [SegmentSpan::new(0, 16), SegmentSpan::new(16, 64)];

    let flat = encode::<F64Backend, _>(&samples, &spans, 4, &TABLE, &flat_config()).unwrap();
    let nested =
        encode::<F64Backend, _>(&samples, &spans, 4, &TABLE, &CodecConfig::default()).unwrap();

    let (flat_mean, _) = reconstruction_error(
        &samples,
        &decode(&flat, &flat_config()).unwrap(),
    )
    .unwrap();
    let (nested_mean, _) = reconstruction_error(
        &samples,
        &decode(&nested, &CodecConfig::default()).unwrap(),
    )
    .unwrap();

    // At 6 bits the nested range usually wins; it must never be worse than
    // the flat path by more than the range-fixup padding.
    assert!(nested_mean <= flat_mean + 2.0 / 255.0);
}

#[test]
fn test_raw_sentinel_round_trip_f32() {
    let samples: Vec<Vector4<f64>> = smooth_samples(16)
        .into_iter()
        .map(|v| v.map(|c| c as f32 as f64))
        .collect();
    let config = CodecConfig::default();

    let clip = encode::<F32Backend, _>(&samples, &[], 18, &TABLE, &config).unwrap();
    assert!(clip.raw);
    assert_eq!(clip.num_bits, 32);
    assert!(clip.segments[0].range.is_none());

    let decoded = decode(&clip, &config).unwrap();
    let (_, peak) = reconstruction_error(&samples, &decoded).unwrap();
    // Only normalize/denormalize rounding remains at the raw rate.
    assert!(peak <= 1e-6, "peak {peak}");
}

#[test]
fn test_fixed_backend_round_trip() {
    let samples = smooth_samples(48);
    let spans = [SegmentSpan::new(0, 24), SegmentSpan::new(24, 48)];
    let config = CodecConfig::default();

    let clip = encode::<FixedBackend, _>(&samples, &spans, 6, &TABLE, &config).unwrap();
    let decoded = decode(&clip, &config).unwrap();
    let (_, peak) = reconstruction_error(&samples, &decoded).unwrap();
    assert!(peak <= 0.02, "peak {peak}");
}

#[test]
fn test_fixed_backend_coercion_variants_agree() {
    let samples = smooth_samples(32);
    let canonical = CodecConfig::default();
    let spliced = CodecConfig {
        coercion: CoercionVariant::ExponentSplice,
        ..canonical
    };

    let clip = encode::<FixedBackend, _>(&samples, &[], 6, &TABLE, &canonical).unwrap();
    // The splice is bit-exact for Q0.32 lanes, so decode output is identical.
    assert_eq!(
        decode(&clip, &canonical).unwrap(),
        decode(&clip, &spliced).unwrap()
    );
}

#[test]
fn test_encode_is_deterministic() {
    let samples = smooth_samples(40);
    let config = CodecConfig::default();
    let a = encode::<F64Backend, _>(&samples, &[], 9, &TABLE, &config).unwrap();
    let b = encode::<F64Backend, _>(&samples, &[], 9, &TABLE, &config).unwrap();
    assert_eq!(a.segments[0].packed, b.segments[0].packed);
    assert_eq!(a.clip_min, b.clip_min);
    assert_eq!(a.clip_max, b.clip_max);
}
