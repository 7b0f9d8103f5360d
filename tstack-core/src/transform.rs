/// Matrix builders shared by the transform stack and its callers
use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3};

use crate::projection::ProjectionBox;

/// Transform builder for 3D transformations
///
/// Angles are taken in degrees, as the stack exposes them.
/// All projections are right-handed with an OpenGL clip range of `[-1, 1]`.
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a rotation matrix of `angle_deg` around `axis`
    ///
    /// The axis is normalized here. A zero-length axis has no direction to
    /// turn around and yields the identity.
    pub fn rotation(angle_deg: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, angle_deg.to_radians()),
            None => Matrix4::identity(),
        }
    }

    /// Create a scale matrix
    pub fn scaling(factors: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(factors)
    }

    /// Create a view matrix for a camera at `eye` looking at `target`
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, target, up)
    }

    /// Create a perspective projection from a vertical field of view
    ///
    /// Degenerate parameters (zero aspect, `near == far`) give non-finite
    /// entries rather than a panic.
    #[rustfmt::skip]
    pub fn perspective(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fovy_deg.to_radians() / 2.0).tan();
        let (n, z) = (near, far);

        Matrix4::new(
            f / aspect, 0.0, 0.0,                0.0,
            0.0,        f,   0.0,                0.0,
            0.0,        0.0, -(z + n) / (z - n), -2.0 * z * n / (z - n),
            0.0,        0.0, -1.0,               0.0,
        )
    }

    /// Create an orthographic projection of the box
    ///
    /// A flat box (e.g. `left == right`) gives non-finite entries rather than a panic.
    #[rustfmt::skip]
    pub fn orthographic(bounds: &ProjectionBox) -> Matrix4<f32> {
        let ProjectionBox { left: l, right: r, bottom: b, top: t, near: n, far: f } = *bounds;

        Matrix4::new(
            2.0 / (r - l), 0.0,           0.0,            -(r + l) / (r - l),
            0.0,           2.0 / (t - b), 0.0,            -(t + b) / (t - b),
            0.0,           0.0,           -2.0 / (f - n), -(f + n) / (f - n),
            0.0,           0.0,           0.0,            1.0,
        )
    }

    /// Create a perspective frustum whose near plane is the box face
    #[rustfmt::skip]
    pub fn frustum(bounds: &ProjectionBox) -> Matrix4<f32> {
        let ProjectionBox { left: l, right: r, bottom: b, top: t, near: n, far: f } = *bounds;

        Matrix4::new(
            2.0 * n / (r - l), 0.0,               (r + l) / (r - l),  0.0,
            0.0,               2.0 * n / (t - b), (t + b) / (t - b),  0.0,
            0.0,               0.0,               -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0,               0.0,               -1.0,               0.0,
        )
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Inverse transpose of the model-view linear part, for transforming normals
    ///
    /// Returns `None` when the model-view matrix is singular (e.g. a zero scale).
    pub fn normal_matrix(view: &Matrix4<f32>, model: &Matrix4<f32>) -> Option<Matrix3<f32>> {
        let model_view: Matrix3<f32> = (view * model).fixed_view::<3, 3>(0, 0).into_owned();
        model_view.try_inverse().map(|inverse| inverse.transpose())
    }
}
