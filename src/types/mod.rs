pub mod real;
pub mod vector;

pub use real::Real;
pub use vector::Vector4;

/// Whether a raw value domain is signed ([-1, 1]) or unsigned ([0, 1]).
///
/// Signed values are remapped to the unsigned unit interval before any
/// fixed-point bit manipulation and remapped back on the way out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signedness {
    Signed,
    Unsigned,
}
