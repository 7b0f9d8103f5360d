/// Projection volumes and projection settings
use log::debug;

use crate::channel::{Channel, MatrixSink};
use crate::error::StackError;
use crate::stack::TransformStack;

/// Six-bound view volume for orthographic and frustum projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionBox {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Box spanning `-edge..edge` on both x and y
    pub fn symmetric(edge: f32, near: f32, far: f32) -> Self {
        Self::new(-edge, edge, -edge, edge, near, far)
    }

    /// Widen (or narrow) the horizontal bounds by the viewport aspect ratio
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.left *= aspect;
        self.right *= aspect;
        self
    }
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// How the projection channel is filled each time the viewport or camera changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub mode: ProjectionMode,
    /// Vertical field of view in degrees (perspective only)
    pub fovy_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionSettings {
    pub fn new(mode: ProjectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Orthographic volume for a camera `camera_distance` away from its target.
    ///
    /// Changing the distance does not change what an orthographic camera sees,
    /// so the box is sized from it instead: a third of the distance on each side.
    pub fn ortho_box(&self, aspect: f32, camera_distance: f32) -> ProjectionBox {
        ProjectionBox::symmetric(camera_distance / 3.0, self.near, self.far).with_aspect(aspect)
    }

    /// Write the projection into a fresh entry of `stack`, upload it, and restore the stack.
    pub fn apply<S: MatrixSink + ?Sized>(
        &self,
        stack: &mut TransformStack,
        aspect: f32,
        camera_distance: f32,
        sink: &mut S,
    ) -> Result<(), StackError> {
        debug!(
            "applying {:?} projection, aspect {:.3}, distance {:.2}",
            self.mode, aspect, camera_distance
        );

        stack.push_identity();
        match self.mode {
            ProjectionMode::Perspective => {
                stack.perspective(self.fovy_deg, aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => stack.ortho(&self.ortho_box(aspect, camera_distance)),
        }
        sink.upload_matrix(Channel::Projection.uniform_name(), &stack.top());
        stack.pop()?;
        Ok(())
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fovy_deg: 50.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
