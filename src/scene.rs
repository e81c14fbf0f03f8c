use crate::camera::{Camera, KeyStates};
use crate::math::{MathError, Matrix4, Rad, Vector3};

use std::f32::consts::TAU;

/// Receives the composed model-view-projection matrix, column major, e.g. to
/// upload it as a shader uniform.
pub trait UniformSink {
    fn upload_mvp(&mut self, mvp: &[f32; 16]);
}

/// A single spinning model seen through a movable camera.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub keys: KeyStates,
    /// Camera movement in units per second.
    pub camera_speed: f32,
    /// Model rotation in radians per second.
    pub spin_speed: f32,
    spin_axis: Vector3,
    spin: Rad<f32>,
    model: Matrix4,
    projection: Matrix4,
    mvp: Matrix4,
}

impl Scene {
    pub fn new(camera: Camera, projection: Matrix4) -> Result<Self, MathError> {
        let mut scene = Self {
            camera,
            keys: KeyStates::default(),
            camera_speed: 5.,
            spin_speed: 1.,
            spin_axis: Vector3::new(0.5, 1., 0.),
            spin: Rad(0.),
            model: Matrix4::identity(),
            projection,
            mvp: Matrix4::identity(),
        };
        scene.compose()?;
        Ok(scene)
    }

    /// Axis the model spins around, need not be of unit length.
    pub fn set_spin_axis(&mut self, axis: Vector3) -> Result<(), MathError> {
        axis.normalize()?;
        self.spin_axis = axis;
        Ok(())
    }

    pub fn set_projection(&mut self, projection: Matrix4) -> Result<(), MathError> {
        self.projection = projection;
        self.compose()
    }

    pub fn model(&self) -> Matrix4 {
        self.model
    }

    pub fn projection(&self) -> Matrix4 {
        self.projection
    }

    /// The matrix composed during the last tick.
    pub fn mvp(&self) -> Matrix4 {
        self.mvp
    }

    /// Advances the scene by `dt_ms` and recomposes the upload matrix.
    pub fn tick(&mut self, dt_ms: f64) -> Result<(), MathError> {
        let dt = (dt_ms / 1000.) as f32;
        self.camera.step(&self.keys, self.camera_speed * dt)?;
        self.spin = Rad((self.spin.0 + self.spin_speed * dt).rem_euclid(TAU));
        self.model = Matrix4::from_axis_angle(self.spin_axis, self.spin)?;
        self.compose()
    }

    pub fn render<U: UniformSink + ?Sized>(&self, sink: &mut U) {
        sink.upload_mvp(&self.mvp.to_cols_array());
    }

    fn compose(&mut self) -> Result<(), MathError> {
        self.mvp = self.projection * self.camera.view()? * self.model;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Deg, Vector4};

    #[derive(Default)]
    struct Uploads(Vec<[f32; 16]>);

    impl UniformSink for Uploads {
        fn upload_mvp(&mut self, mvp: &[f32; 16]) {
            self.0.push(*mvp);
        }
    }

    fn scene() -> Scene {
        let projection = Matrix4::perspective(Deg(45.), 4. / 3., 0.1, 100.).unwrap();
        Scene::new(Camera::default(), projection).unwrap()
    }

    #[test]
    fn composes_projection_view_model() {
        let mut scene = scene();
        scene.tick(50.).unwrap();
        let expected = scene.projection() * scene.camera.view().unwrap() * scene.model();
        assert_eq!(scene.mvp(), expected);
    }

    #[test]
    fn model_spins_with_time() {
        let mut scene = scene();
        scene.set_spin_axis(Vector3::new(0., 2., 0.)).unwrap();
        scene.spin_speed = std::f32::consts::FRAC_PI_2;
        for _ in 0..20 {
            scene.tick(50.).unwrap();
        }
        // a quarter turn around y after one second
        let p: Vector4 = scene.model() * Vector3::new(1., 0., 0.).extend(1.);
        assert!(p.x().abs() < 1e-4 && (p.z() + 1.).abs() < 1e-4);
    }

    #[test]
    fn origin_lands_in_view() {
        let scene = scene();
        let clip = scene.mvp() * Vector3::default().extend(1.);
        let ndc = clip.truncate() / clip.w();
        assert!(clip.w() > 0.);
        assert!(ndc.x().abs() < 1e-4 && ndc.y().abs() < 1e-4);
        assert!(ndc.z() > -1. && ndc.z() < 1.);
    }

    #[test]
    fn keys_move_camera_per_tick() {
        let mut scene = scene();
        scene.keys.forward = true;
        let before = scene.camera.position();
        scene.tick(200.).unwrap();
        let moved = (scene.camera.position() - before).length();
        assert!((moved - scene.camera_speed * 0.2).abs() < 1e-4);
    }

    #[test]
    fn render_uploads_last_composition() {
        let mut scene = scene();
        let mut sink = Uploads::default();
        scene.render(&mut sink);
        scene.tick(50.).unwrap();
        scene.render(&mut sink);
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[1], scene.mvp().to_cols_array());
        assert_ne!(sink.0[0], sink.0[1]);
    }

    #[test]
    fn rejects_zero_spin_axis() {
        let mut scene = scene();
        assert_eq!(scene.set_spin_axis(Vector3::default()), Err(MathError::DegenerateVector));
    }
}
