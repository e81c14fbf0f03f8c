use super::angle::Rad;
use super::vector::Vector;
use super::MathError;

use std::{fmt, ops};

/// A column based matrix type that is generic over its type and size.
/// Where `M` is the number of columns and `N` the number of rows.
///
/// Columns are laid out one after another, so a `Matrix<f32, 4>` has the same
/// memory layout as `[f32; 16]` indexed by `c * 4 + r`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize = M> {
    cols: [Vector<T, N>; M],
}

impl<T: Copy + Default, const M: usize> Matrix<T, M, M> {
    /// Creates a matrix with `value` on its main diagonal and zeroes elsewhere.
    pub fn diag(value: T) -> Self {
        let mut out = Self::default();
        for i in 0..M {
            out.cols[i][i] = value;
        }
        out
    }
}

impl<T: Copy + Default + From<bool>, const M: usize> Matrix<T, M, M> {
    pub fn identity() -> Self {
        Self::diag(true.into())
    }
}

impl<T: Copy, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Element at column `c` and row `r`.
    pub fn get(&self, c: usize, r: usize) -> T {
        self.cols[c][r]
    }
}

impl Matrix<f32, 4> {
    /// Creates a pure translation matrix. This is a constructor, it does not
    /// compose with anything; use `*` for that.
    pub fn from_translation(dx: f32, dy: f32, dz: f32) -> Self {
        let mut out = Self::identity();
        out.cols[3] = Vector::from([dx, dy, dz, 1.]);
        out
    }

    /// Creates a right handed rotation of `angle` around `axis`.
    ///
    /// `axis` does not have to be of unit length but must not be zero.
    pub fn from_axis_angle<A: Into<Rad<f32>>>(axis: Vector<f32, 3>, angle: A) -> Result<Self, MathError> {
        let [x, y, z]: [f32; 3] = axis.normalize()?.into();
        let (s, c) = angle.into().0.sin_cos();
        let m = 1. - c;
        Ok(Self::from([
            [m * x * x + c,     m * x * y + z * s, m * x * z - y * s, 0.],
            [m * x * y - z * s, m * y * y + c,     m * y * z + x * s, 0.],
            [m * x * z + y * s, m * y * z - x * s, m * z * z + c,     0.],
            [0., 0., 0., 1.],
        ]))
    }

    /// Creates a rotation matrix around `x` axis.
    pub fn from_angle_x<A: Into<Rad<f32>>>(angle: A) -> Self {
        let (s, c) = angle.into().0.sin_cos();
        Self::from([
            [1., 0., 0., 0.],
            [0.,  c,  s, 0.],
            [0., -s,  c, 0.],
            [0., 0., 0., 1.],
        ])
    }

    /// Creates a rotation matrix around `y` axis.
    pub fn from_angle_y<A: Into<Rad<f32>>>(angle: A) -> Self {
        let (s, c) = angle.into().0.sin_cos();
        Self::from([
            [ c, 0., -s, 0.],
            [0., 1., 0., 0.],
            [ s, 0.,  c, 0.],
            [0., 0., 0., 1.],
        ])
    }

    /// Creates a rotation matrix around `z` axis.
    pub fn from_angle_z<A: Into<Rad<f32>>>(angle: A) -> Self {
        let (s, c) = angle.into().0.sin_cos();
        Self::from([
            [ c,  s, 0., 0.],
            [-s,  c, 0., 0.],
            [0., 0., 1., 0.],
            [0., 0., 0., 1.],
        ])
    }

    /// OpenGL style perspective projection for an asymmetric view volume.
    ///
    /// Depth is mapped to -1..1 and the camera looks down the negative z-axis.
    pub fn frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, MathError> {
        if !(near > 0. && far > near && far.is_finite()) {
            return Err(MathError::InvalidDepthRange { near, far });
        }
        let width = right - left;
        let height = top - bottom;
        if width == 0. || height == 0. || !width.is_finite() || !height.is_finite() {
            return Err(MathError::DegenerateFrustum { left, right, bottom, top });
        }

        let near2 = 2. * near;
        let depth = far - near;
        Ok(Self::from([
            [near2 / width, 0., 0., 0.],
            [0., near2 / height, 0., 0.],
            [(right + left) / width, (top + bottom) / height, -(far + near) / depth, -1.],
            [0., 0., -(near2 * far) / depth, 0.],
        ]))
    }

    /// Symmetric perspective projection from a vertical field of view.
    pub fn perspective<F>(fovy: F, aspect: f32, near: f32, far: f32) -> Result<Self, MathError>
    where
        F: Into<Rad<f32>>,
    {
        let fovy = fovy.into().0;
        if !(fovy > 0. && fovy < std::f32::consts::PI) {
            return Err(MathError::InvalidFieldOfView(fovy));
        }
        let ymax = near * (fovy / 2.).tan();
        let xmax = ymax * aspect;
        Self::frustum(-xmax, xmax, -ymax, ymax, near, far)
    }

    /// Creates a view matrix for a camera at `eye` looking at `target`, with
    /// the world y-axis as up direction.
    ///
    /// Fails if `eye` and `target` coincide or the view direction is vertical.
    pub fn look_at(eye: Vector<f32, 3>, target: Vector<f32, 3>) -> Result<Self, MathError> {
        let world_up = Vector::new(0., 1., 0.);
        let forward = (eye - target).normalize()?;
        let right = world_up.cross(forward).normalize()?;
        let up = forward.cross(right);

        // basis vectors become the rows of the rotation
        let rotation = Self::from([
            [right.x(), up.x(), forward.x(), 0.],
            [right.y(), up.y(), forward.y(), 0.],
            [right.z(), up.z(), forward.z(), 0.],
            [0., 0., 0., 1.],
        ]);
        Ok(rotation * Self::from_translation(-eye.x(), -eye.y(), -eye.z()))
    }

    /// Flat column major copy, ready to be uploaded as a uniform.
    pub fn to_cols_array(&self) -> [f32; 16] {
        std::array::from_fn(|i| self.cols[i / 4][i % 4])
    }
}

impl<T, const M: usize, const N: usize, const P: usize> ops::Mul<Matrix<T, M, N>> for Matrix<T, N, P>
where
    T: Copy + Default + ops::Add<Output = T> + ops::Mul<Output = T>,
{
    type Output = Matrix<T, M, P>;

    /// `self * rhs`, the result is computed into a fresh matrix.
    fn mul(self, rhs: Matrix<T, M, N>) -> Self::Output {
        let mut out = Self::Output::default();
        for c in 0..M {
            out.cols[c] = self * rhs.cols[c];
        }
        out
    }
}

impl<T, const M: usize> ops::MulAssign for Matrix<T, M, M>
where
    T: Copy + Default + ops::Add<Output = T> + ops::Mul<Output = T>,
{
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: fmt::Display, const M: usize, const N: usize> fmt::Display for Matrix<T, M, N> {
    /// Prints one column per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, col) in self.cols.iter().enumerate() {
            if c > 0 {
                writeln!(f)?;
            }
            for r in 0..N {
                if r > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.6}", col[r])?;
            }
        }
        Ok(())
    }
}

impl<T, const M: usize, const N: usize> From<[Vector<T, N>; M]> for Matrix<T, M, N> {
    fn from(cols: [Vector<T, N>; M]) -> Self {
        Self { cols }
    }
}

impl<T, const M: usize, const N: usize> From<[[T; N]; M]> for Matrix<T, M, N> {
    fn from(cols: [[T; N]; M]) -> Self {
        Self { cols: cols.map(Vector::from) }
    }
}

impl<T, const M: usize, const N: usize> From<Matrix<T, M, N>> for [[T; N]; M] {
    fn from(mat: Matrix<T, M, N>) -> Self {
        mat.cols.map(<[T; N]>::from)
    }
}

impl<T, const M: usize, const N: usize> ops::Index<usize> for Matrix<T, M, N> {
    type Output = Vector<T, N>;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.cols[idx]
    }
}

impl<T, const M: usize, const N: usize> ops::IndexMut<usize> for Matrix<T, M, N> {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.cols[idx]
    }
}

impl<T: Copy + Default, const M: usize, const N: usize> Default for Matrix<T, M, N> {
    fn default() -> Self {
        Self { cols: [Vector::default(); M] }
    }
}
