/// Cameras driven through the view and projection stacks
use nalgebra::{Point3, Vector3};

use crate::channel::{Channel, MatrixSink, Transforms};
use crate::error::StackError;
use crate::projection::ProjectionBox;
use crate::stack::TransformStack;

/// Camera orbiting the origin. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    pub roll: f32,
    pub latitude: f32,
    pub longitude: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            roll: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Move toward the target by `delta` (negative moves away)
    pub fn zoom(&mut self, delta: f32) {
        self.distance -= delta;
    }

    pub fn orbit(&mut self, d_latitude: f32, d_longitude: f32) {
        self.latitude += d_latitude;
        self.longitude += d_longitude;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compose the view transform on `view`, upload it, and restore the stack.
    pub fn apply<S: MatrixSink + ?Sized>(
        &self,
        view: &mut TransformStack,
        sink: &mut S,
    ) -> Result<(), StackError> {
        view.push_identity();
        // Back off first so the rotations below turn the world about the target.
        view.translate(&Vector3::new(0.0, 0.0, -self.distance));
        view.rotate(self.roll, &Vector3::z());
        view.rotate(self.latitude, &Vector3::x());
        view.rotate(self.longitude, &Vector3::y());
        sink.upload_matrix(Channel::View.uniform_name(), &view.top());
        view.pop()?;
        Ok(())
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// Fixed camera on the +z axis with a perspective frustum.
///
/// With the defaults the `z = 0` plane spans `-1..1` on both axes, so it frames
/// the unit clip box like the default projection does, but in perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareCamera {
    pub eye_distance: f32,
    pub bounds: ProjectionBox,
}

impl SquareCamera {
    /// Overwrite the current view and projection transforms and upload both.
    ///
    /// `aspect` widens the box horizontally; pass 1.0 to use it as given.
    pub fn apply<S: MatrixSink + ?Sized>(&self, transforms: &mut Transforms, aspect: f32, sink: &mut S) {
        transforms.view.look_at(
            &Point3::new(0.0, 0.0, self.eye_distance),
            &Point3::origin(),
            &Vector3::y(),
        );
        transforms.projection.frustum(&self.bounds.with_aspect(aspect));
        transforms.upload(Channel::View, sink);
        transforms.upload(Channel::Projection, sink);
    }
}

impl Default for SquareCamera {
    fn default() -> Self {
        let edge = 2.0 / 3.0;
        Self {
            eye_distance: 6.0,
            bounds: ProjectionBox::symmetric(edge, 4.0, 10.0),
        }
    }
}
