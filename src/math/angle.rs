use std::f32::consts::PI;
use std::ops;

/// An angle in radians.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Rad<T>(pub T);

/// An angle in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Deg<T>(pub T);

/// Converts an angle given in degrees to radians.
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (PI / 180.)
}

impl From<Deg<f32>> for Rad<f32> {
    fn from(deg: Deg<f32>) -> Self {
        Rad(degrees_to_radians(deg.0))
    }
}

impl From<Rad<f32>> for Deg<f32> {
    fn from(rad: Rad<f32>) -> Self {
        Deg(rad.0 * (180. / PI))
    }
}

impl<T: ops::Add<Output = T>> ops::Add for Rad<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Rad(self.0 + rhs.0)
    }
}

impl<T: ops::AddAssign> ops::AddAssign for Rad<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl<T: ops::Mul<Output = T>> ops::Mul<T> for Rad<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        Rad(self.0 * rhs)
    }
}

impl<T: ops::Neg<Output = T>> ops::Neg for Rad<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Rad(-self.0)
    }
}

impl<T: ops::Add<Output = T>> ops::Add for Deg<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Deg(self.0 + rhs.0)
    }
}
