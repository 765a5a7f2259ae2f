use crate::bitrate::{BitRateTable, StandardBitRateTable, STANDARD_NUM_BITS};
use crate::error::CodecError;

#[test]
fn test_standard_table_shape() {
    let table = StandardBitRateTable;
    assert_eq!(table.len(), 19);
    assert_eq!(table.highest(), 18);
    assert!(!table.is_empty());
}

#[test]
fn test_sentinel_identifiers() {
    let table = StandardBitRateTable;
    assert!(table.is_sentinel(0));
    assert!(table.is_sentinel(18));
    for id in 1..18 {
        assert!(!table.is_sentinel(id));
    }
}

#[test]
fn test_widths_monotonically_non_decreasing() {
    for pair in STANDARD_NUM_BITS.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn test_sweep_excludes_sentinels() {
    let table = StandardBitRateTable;
    let sweep: Vec<u8> = table.sweep().collect();
    assert_eq!(sweep.first(), Some(&1));
    assert_eq!(sweep.last(), Some(&17));
    assert_eq!(sweep.len(), 17);
}

#[test]
fn test_width_resolution() {
    let table = StandardBitRateTable;
    assert_eq!(table.num_bits(0).unwrap(), 0);
    assert_eq!(table.num_bits(1).unwrap(), 3);
    assert_eq!(table.num_bits(6).unwrap(), 8);
    assert_eq!(table.num_bits(17).unwrap(), 19);
    assert_eq!(table.num_bits(18).unwrap(), 32);
}

#[test]
fn test_empty_table_has_no_identifiers() {
    struct EmptyTable;

    impl BitRateTable for EmptyTable {
        fn len(&self) -> u8 {
            0
        }

        fn num_bits(&self, bit_rate: u8) -> crate::error::Result<u8> {
            Err(CodecError::InvalidBitRate(bit_rate))
        }
    }

    let table = EmptyTable;
    assert!(table.is_empty());
    // highest() saturates instead of underflowing.
    assert_eq!(table.highest(), 0);
    assert!(table.sweep().is_empty());
}

#[test]
fn test_out_of_table_identifier_is_rejected() {
    let table = StandardBitRateTable;
    assert!(matches!(
        table.num_bits(19),
        Err(CodecError::InvalidBitRate(19))
    ));
}
