pub mod angle;
pub mod matrix;
pub mod vector;

pub use angle::{degrees_to_radians, Deg, Rad};

pub type Vector3 = vector::Vector<f32, 3>;
pub type Vector4 = vector::Vector<f32, 4>;

pub type Matrix4 = matrix::Matrix<f32, 4>;

/// Inputs for which no meaningful result exists.
///
/// Degenerate input is reported instead of producing NaN or infinite values,
/// callers that know their input is valid may simply propagate it.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("cannot normalize a vector of zero or non-finite length")]
    DegenerateVector,
    #[error("invalid depth range: near {near}, far {far} (need 0 < near < far)")]
    InvalidDepthRange { near: f32, far: f32 },
    #[error("degenerate frustum: left {left}, right {right}, bottom {bottom}, top {top}")]
    DegenerateFrustum { left: f32, right: f32, bottom: f32, top: f32 },
    #[error("field of view of {0} rad is outside of (0, pi)")]
    InvalidFieldOfView(f32),
}
