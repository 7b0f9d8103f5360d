/// Save/restore stack of 4x4 transforms
use log::{error, trace};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::StackError;
use crate::projection::ProjectionBox;
use crate::transform::Transform;

/// A stack of homogeneous transforms for one channel (model, view or projection).
///
/// The stack always holds at least one entry; a fresh stack holds the identity.
/// Every operation acts on the top entry. `translate`, `rotate`, `scale` and
/// `apply` right-multiply it, so the newest transform is applied first, in the
/// local frame of everything already accumulated. `load_identity`, `look_at`,
/// `perspective`, `ortho` and `frustum` overwrite it.
///
/// ```
/// use nalgebra::Vector3;
/// use tstack_core::TransformStack;
///
/// let mut model = TransformStack::new();
/// model.push_identity();
/// model.rotate(90.0, &Vector3::z());
/// model.translate(&Vector3::new(0.0, -0.5, 0.0));
/// // ... upload `model.top()` and draw ...
/// model.pop().unwrap();
/// assert_eq!(model.depth(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStack {
    stack: Vec<Matrix4<f32>>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Matrix4::identity()],
        }
    }

    /// Number of entries, base included. Never zero.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The current transform
    pub fn top(&self) -> Matrix4<f32> {
        *self.top_ref()
    }

    fn top_ref(&self) -> &Matrix4<f32> {
        // The base entry is never removed.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix4<f32> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Push a new identity entry
    pub fn push_identity(&mut self) {
        self.stack.push(Matrix4::identity());
        trace!("push identity, depth {}", self.stack.len());
    }

    /// Push a copy of the current transform
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
        trace!("push, depth {}", self.stack.len());
    }

    /// Discard the current transform and return it
    ///
    /// Fails with [`StackError::Underflow`] when only the base entry is left;
    /// the stack is unchanged in that case.
    pub fn pop(&mut self) -> Result<Matrix4<f32>, StackError> {
        if self.stack.len() <= 1 {
            error!("transform stack underflow: pop with only the base entry left");
            return Err(StackError::Underflow);
        }
        let popped = self.top();
        self.stack.truncate(self.stack.len() - 1);
        trace!("pop, depth {}", self.stack.len());
        Ok(popped)
    }

    /// Run `f` between a `push` and the matching restore.
    ///
    /// Whatever `f` pushes is discarded on return. If `f` pops below the entry
    /// pushed for it, the stack is left as `f` left it and
    /// [`StackError::Unbalanced`] is returned.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R, StackError> {
        let depth = self.depth();
        self.push();
        let result = f(self);

        if self.depth() <= depth {
            error!(
                "scoped block popped past its entry: depth {} on exit, expected at least {}",
                self.depth(),
                depth + 1
            );
            return Err(StackError::Unbalanced {
                expected: depth + 1,
                found: self.depth(),
            });
        }
        self.stack.truncate(depth);
        Ok(result)
    }

    /// Replace the current transform with the identity
    pub fn load_identity(&mut self) {
        *self.top_mut() = Matrix4::identity();
    }

    /// Compose an arbitrary transform: `top = top * matrix`
    pub fn apply(&mut self, matrix: &Matrix4<f32>) {
        let top = self.top_mut();
        *top = *top * matrix;
    }

    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.apply(&Transform::translation(offset));
    }

    /// Rotate by `angle_deg` degrees around `axis` (normalized internally)
    pub fn rotate(&mut self, angle_deg: f32, axis: &Vector3<f32>) {
        self.apply(&Transform::rotation(angle_deg, axis));
    }

    pub fn scale(&mut self, factors: &Vector3<f32>) {
        self.apply(&Transform::scaling(factors));
    }

    /// Replace the current transform with a view matrix
    pub fn look_at(&mut self, eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) {
        *self.top_mut() = Transform::look_at(eye, target, up);
    }

    /// Replace the current transform with a perspective projection
    ///
    /// `near` and `far` must be positive with `near < far`.
    pub fn perspective(&mut self, fovy_deg: f32, aspect: f32, near: f32, far: f32) {
        *self.top_mut() = Transform::perspective(fovy_deg, aspect, near, far);
    }

    /// Replace the current transform with an orthographic projection.
    /// The box is used as given; aspect correction is up to the caller.
    pub fn ortho(&mut self, bounds: &ProjectionBox) {
        *self.top_mut() = Transform::orthographic(bounds);
    }

    /// Replace the current transform with a perspective frustum.
    /// The box is used as given; aspect correction is up to the caller.
    pub fn frustum(&mut self, bounds: &ProjectionBox) {
        *self.top_mut() = Transform::frustum(bounds);
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&TransformStack> for Matrix4<f32> {
    fn from(stack: &TransformStack) -> Self {
        stack.top()
    }
}

impl AsRef<Matrix4<f32>> for TransformStack {
    fn as_ref(&self) -> &Matrix4<f32> {
        self.top_ref()
    }
}
