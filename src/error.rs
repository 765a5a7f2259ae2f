use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty sample sequence")]
    EmptySamples,

    #[error("invalid bit rate: {0}")]
    InvalidBitRate(u8),

    #[error("invalid bit width: {0} (must be 1..=32)")]
    InvalidBitWidth(u8),

    #[error("normalized value out of range at component {component}: {value}")]
    NormalizedOutOfRange { component: usize, value: f64 },

    #[error("field {field} exceeds {num_bits} bits")]
    FieldOverflow { field: u32, num_bits: u8 },

    #[error("packed buffer has bits set beyond its 4x{num_bits}-bit fields")]
    CorruptPacked { num_bits: u8 },

    #[error("segment span {start}..{end} does not partition {len} samples")]
    InvalidSegmentLayout { start: usize, end: usize, len: usize },

    #[error("output buffer length mismatch: expected {expected}, found {found}")]
    OutputLengthMismatch { expected: usize, found: usize },

    #[error("invalid payload length: expected {expected}, found {found}")]
    InvalidPayloadLength { expected: usize, found: usize },

    #[error("checksum mismatch: expected {expected:#018x}, found {found:#018x}")]
    ChecksumMismatch { expected: u64, found: u64 },

    #[error("bad snapshot magic")]
    BadMagic,

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot encoded with back-end {found}, expected {expected}")]
    BackendMismatch { expected: u8, found: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
