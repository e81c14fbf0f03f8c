use super::matrix::Matrix;
use super::MathError;

use std::ops;

/// A fixed sized vector that is generic over its component type and size.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector<T, const N: usize> {
    array: [T; N],
}

impl<T: Copy, const N: usize> Vector<T, N> {
    /// Creates a vector with every component set to `value`.
    pub const fn splat(value: T) -> Self {
        Self { array: [value; N] }
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.array
    }

    // The accessors panic on vectors with too few components.

    pub fn x(&self) -> T {
        self.array[0]
    }

    pub fn y(&self) -> T {
        self.array[1]
    }

    pub fn z(&self) -> T {
        self.array[2]
    }
}

impl<T: Copy> Vector<T, 3> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { array: [x, y, z] }
    }

    /// Appends a fourth component, e.g. `1` to get a homogeneous point.
    pub fn extend(self, w: T) -> Vector<T, 4> {
        let [x, y, z] = self.array;
        Vector { array: [x, y, z, w] }
    }
}

impl<T: Copy> Vector<T, 4> {
    pub fn w(&self) -> T {
        self.array[3]
    }

    /// Drops the fourth component.
    pub fn truncate(self) -> Vector<T, 3> {
        let [x, y, z, _] = self.array;
        Vector { array: [x, y, z] }
    }
}

impl<T, const N: usize> Vector<T, N>
where
    T: Copy + Default + ops::Add<Output = T> + ops::Mul<Output = T>,
{
    pub fn dot(self, rhs: Self) -> T {
        self.array
            .iter()
            .zip(rhs.array.iter())
            .fold(T::default(), |acc, (&a, &b)| acc + a * b)
    }
}

impl<const N: usize> Vector<f32, N> {
    /// Euclidean norm. Zero for the zero vector.
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Scales the vector to unit length.
    ///
    /// Fails with [`MathError::DegenerateVector`] when the length is zero or
    /// not finite, as there is no direction to preserve.
    pub fn normalize(self) -> Result<Self, MathError> {
        let len = self.length();
        if len > 0. && len.is_finite() {
            Ok(self / len)
        } else {
            Err(MathError::DegenerateVector)
        }
    }
}

impl<T> Vector<T, 3>
where
    T: Copy + ops::Mul<Output = T> + ops::Sub<Output = T>,
{
    /// Right handed cross product.
    pub fn cross(self, rhs: Self) -> Self {
        let [ax, ay, az] = self.array;
        let [bx, by, bz] = rhs.array;
        Self { array: [ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx] }
    }
}

impl<T: Copy + ops::Neg<Output = T>, const N: usize> ops::Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { array: self.array.map(|x| -x) }
    }
}

impl<T: Copy + ops::Add<Output = T>, const N: usize> ops::Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { array: std::array::from_fn(|i| self.array[i] + rhs.array[i]) }
    }
}

impl<T: Copy + ops::Add<Output = T>, const N: usize> ops::AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Copy + ops::Sub<Output = T>, const N: usize> ops::Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self { array: std::array::from_fn(|i| self.array[i] - rhs.array[i]) }
    }
}

impl<T: Copy + ops::Sub<Output = T>, const N: usize> ops::SubAssign for Vector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Copy + ops::Mul<Output = T>, const N: usize> ops::Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        Self { array: self.array.map(|x| x * rhs) }
    }
}

impl<T: Copy + ops::Div<Output = T>, const N: usize> ops::Div<T> for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output {
        Self { array: self.array.map(|x| x / rhs) }
    }
}

/// Transforms a column vector, `matrix * vector`.
impl<T, const M: usize, const N: usize> ops::Mul<Vector<T, M>> for Matrix<T, M, N>
where
    T: Copy + Default + ops::Add<Output = T> + ops::Mul<Output = T>,
{
    type Output = Vector<T, N>;

    fn mul(self, rhs: Vector<T, M>) -> Self::Output {
        let mut out = Vector::<T, N>::default();
        for c in 0..M {
            for r in 0..N {
                out[r] = out[r] + self[c][r] * rhs[c];
            }
        }
        out
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(array: [T; N]) -> Self {
        Self { array }
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(vec: Vector<T, N>) -> Self {
        vec.array
    }
}

impl<T, const N: usize> ops::Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.array[idx]
    }
}

impl<T, const N: usize> ops::IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.array[idx]
    }
}

impl<T: Copy + Default, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::splat(T::default())
    }
}
