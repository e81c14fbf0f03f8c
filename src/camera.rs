use crate::math::{MathError, Matrix4, Rad, Vector3};

/// Where the demo programs put their camera.
pub const DEFAULT_POSITION: Vector3 = Vector3::new(0., 3., 15.);

const WORLD_UP: Vector3 = Vector3::new(0., 1., 0.);

/// Movement keys currently held down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyStates {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyStates {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

/// A camera looking from `position` at `target`.
///
/// The view matrix is never stored, it is derived from both points on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vector3,
    target: Vector3,
}

impl Camera {
    pub fn new(position: Vector3, target: Vector3) -> Self {
        Self { position, target }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn view(&self) -> Result<Matrix4, MathError> {
        Matrix4::look_at(self.position, self.target)
    }

    /// Moves position and target alike, keeping the view direction.
    pub fn translate(&mut self, delta: Vector3) {
        self.position += delta;
        self.target += delta;
    }

    /// Circles the position around the vertical axis through the target.
    pub fn orbit<A: Into<Rad<f32>>>(&mut self, angle: A) {
        let offset = self.position - self.target;
        let rotated = Matrix4::from_angle_y(angle) * offset.extend(0.);
        self.position = self.target + rotated.truncate();
    }

    /// Moves `distance` units according to `keys`: forward and backward along
    /// the view direction, left and right sideways, up and down along the
    /// world y-axis.
    pub fn step(&mut self, keys: &KeyStates, distance: f32) -> Result<(), MathError> {
        if !keys.any() {
            return Ok(());
        }
        let forward = (self.target - self.position).normalize()?;
        let right = forward.cross(WORLD_UP).normalize()?;
        let delta = forward * axis(keys.forward, keys.backward)
            + right * axis(keys.right, keys.left)
            + WORLD_UP * axis(keys.up, keys.down);
        self.translate(delta * distance);
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, Vector3::default())
    }
}
