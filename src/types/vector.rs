//! 4-component vector container.

use core::ops::{Index, IndexMut};

use crate::types::real::Real;

/// A 4-component vector; each component is quantized independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector4<T> {
    pub data: [T; 4],
}

impl<T: Copy + Default> Default for Vector4<T> {
    fn default() -> Self {
        Self {
            data: [T::default(); 4],
        }
    }
}

impl<T: Copy> Vector4<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { data: [x, y, z, w] }
    }

    pub fn splat(v: T) -> Self {
        Self { data: [v; 4] }
    }

    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }

    pub fn z(&self) -> T {
        self.data[2]
    }

    pub fn w(&self) -> T {
        self.data[3]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Componentwise combination of two vectors.
    pub fn zip_with(&self, other: &Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Self {
            data: [
                f(self.data[0], other.data[0]),
                f(self.data[1], other.data[1]),
                f(self.data[2], other.data[2]),
                f(self.data[3], other.data[3]),
            ],
        }
    }

    pub fn map(&self, mut f: impl FnMut(T) -> T) -> Self {
        Self {
            data: [
                f(self.data[0]),
                f(self.data[1]),
                f(self.data[2]),
                f(self.data[3]),
            ],
        }
    }
}

impl<T: Real> Vector4<T> {
    pub fn zero() -> Self {
        Self::splat(T::ZERO)
    }

    pub fn min(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| if a < b { a } else { b })
    }

    pub fn max(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| if a > b { a } else { b })
    }

    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Componentwise `self * a + b`.
    pub fn mul_add(&self, a: &Self, b: &Self) -> Self {
        Self {
            data: [
                self.data[0].mul_add(a.data[0], b.data[0]),
                self.data[1].mul_add(a.data[1], b.data[1]),
                self.data[2].mul_add(a.data[2], b.data[2]),
                self.data[3].mul_add(a.data[3], b.data[3]),
            ],
        }
    }

    /// Componentwise absolute difference, widened to f64.
    pub fn abs_delta(&self, other: &Self) -> Vector4<f64> {
        Vector4 {
            data: [
                (self.data[0].to_f64() - other.data[0].to_f64()).abs(),
                (self.data[1].to_f64() - other.data[1].to_f64()).abs(),
                (self.data[2].to_f64() - other.data[2].to_f64()).abs(),
                (self.data[3].to_f64() - other.data[3].to_f64()).abs(),
            ],
        }
    }
}

impl<T> Index<usize> for Vector4<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Vector4<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
