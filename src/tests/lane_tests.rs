use crate::fxp::FpVector4;

#[test]
fn test_convert_narrowing_rounds_to_nearest() {
    // 4 -> 2 bits drops 2 bits; bias is 2.
    let v = FpVector4::new(11, 9, 0, 5);
    let narrowed = v.convert(4, 2);
    assert_eq!(narrowed, FpVector4::new(3, 2, 0, 1));
}

#[test]
fn test_convert_narrowing_saturates() {
    // 15 + bias overflows past the 2-bit maximum.
    let v = FpVector4::splat(15);
    assert_eq!(v.convert(4, 2), FpVector4::splat(3));
}

#[test]
fn test_convert_widening_is_exact_shift() {
    let v = FpVector4::new(0, 1, 2, 3);
    assert_eq!(v.convert(2, 4), FpVector4::new(0, 4, 8, 12));
}

#[test]
fn test_convert_same_width_is_identity() {
    let v = FpVector4::new(1, 2, 3, 4);
    assert_eq!(v.convert(8, 8), v);
}

#[test]
fn test_widen_then_narrow_round_trips() {
    for lane in [0u64, 1, 100, 254, 255] {
        let v = FpVector4::splat(lane);
        assert_eq!(v.convert(8, 24).convert(24, 8), v);
    }
}

#[test]
fn test_convert_to_full_width() {
    let v = FpVector4::splat(255);
    assert_eq!(v.convert(8, 32), FpVector4::splat(255 << 24));
}

#[test]
fn test_blend_selects_by_mask() {
    let mask = FpVector4::new(u64::MAX, 0, u64::MAX, 0);
    let a = FpVector4::splat(1);
    let b = FpVector4::splat(2);
    assert_eq!(FpVector4::blend(&mask, &a, &b), FpVector4::new(1, 2, 1, 2));
}

#[test]
fn test_equal_mask() {
    let a = FpVector4::new(1, 2, 3, 4);
    let b = FpVector4::new(1, 0, 3, 0);
    assert_eq!(
        a.equal_mask(&b),
        FpVector4::new(u64::MAX, 0, u64::MAX, 0)
    );
}

#[test]
fn test_elementwise_arithmetic() {
    let a = FpVector4::new(10, 20, 30, 40);
    let b = FpVector4::new(1, 2, 3, 4);
    assert_eq!(a.add(&b), FpVector4::new(11, 22, 33, 44));
    assert_eq!(a.sub(&b), FpVector4::new(9, 18, 27, 36));
    assert_eq!(a.mul(&b), FpVector4::new(10, 40, 90, 160));
    assert_eq!(a.div(&b), FpVector4::new(10, 10, 10, 10));
    assert_eq!(a.min(&b), b);
    assert_eq!(a.max(&b), a);
}
