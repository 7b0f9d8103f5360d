/// Demo settings
use tstack_core::{OrbitCamera, ProjectionSettings};

/// Knobs of the transformations demo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoConfig {
    /// Target frame rate
    pub fps: u32,
    pub projection: ProjectionSettings,
    /// Camera state at start
    pub camera: OrbitCamera,
    /// Degrees the pyramid and the tall box turn each frame
    pub spin_per_frame: f32,
    /// Degrees per arrow key press
    pub orbit_step: f32,
    /// Camera distance change per zoom key press
    pub zoom_step: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            projection: ProjectionSettings::default(),
            camera: OrbitCamera::default(),
            spin_per_frame: 2.0,
            orbit_step: 5.0,
            zoom_step: 0.5,
        }
    }
}
