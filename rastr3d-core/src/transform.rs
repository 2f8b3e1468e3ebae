/// Rotation and pose matrices shared by geometry edits and the camera
use nalgebra::{Matrix3, Matrix3x4, Point3, Vector3};

use crate::error::GeometryError;

/// Axis shorter than this is treated as zero length
const AXIS_EPSILON: f32 = 1e-12;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation of `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// The axis is normalized first; a zero-length axis is rejected.
    pub fn axis_angle(axis: &Vector3<f32>, angle: f32) -> Result<Matrix3<f32>, GeometryError> {
        let norm = axis.norm();
        if !norm.is_finite() || norm < AXIS_EPSILON {
            return Err(GeometryError::ZeroAxis);
        }
        let a = axis / norm;
        let (x, y, z) = (a.x, a.y, a.z);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        Ok(Matrix3::new(
            c + t * x * x,
            t * x * y - s * z,
            t * x * z + s * y,
            t * x * y + s * z,
            c + t * y * y,
            t * y * z - s * x,
            t * x * z - s * y,
            t * y * z + s * x,
            c + t * z * z,
        ))
    }

    /// Pose matrix `[R | t]` mapping world points into camera space
    pub fn extrinsic(rotation: &Matrix3<f32>, translation: &Vector3<f32>) -> Matrix3x4<f32> {
        let mut pose = Matrix3x4::zeros();
        pose.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
        pose.set_column(3, translation);
        pose
    }

    /// Apply `f` to every point expressed relative to `pivot`
    pub fn about_pivot<F>(points: &mut [Point3<f32>], pivot: &Point3<f32>, f: F)
    where
        F: Fn(Vector3<f32>) -> Vector3<f32>,
    {
        for p in points.iter_mut() {
            *p = pivot + f(*p - pivot);
        }
    }
}
