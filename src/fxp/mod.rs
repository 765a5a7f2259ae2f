pub mod lane;

pub use lane::FpVector4;
