pub mod camera;
pub mod math;
pub mod scene;
pub mod timestep;
