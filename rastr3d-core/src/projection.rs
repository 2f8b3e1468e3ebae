/// Pinhole camera and point projection
use log::debug;
use nalgebra::{Matrix3, Matrix3x4, Point2, Point3, Vector3};

use crate::config::SceneConfig;
use crate::transform::Transform;

/// Focal length must stay above this plus one zoom step
pub const MIN_FOCAL_MARGIN: f32 = 10.0;
/// Focal length must stay below this
pub const MAX_FOCAL_LENGTH: f32 = 400.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    /// Declared but without a defined rendering yet
    Rectangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Integer pixel coordinate after projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

/// Camera with an intrinsic matrix `K` and a pose `[R | t]`.
///
/// The default pose keeps the camera 15 units back from the origin, so a
/// model normalized to radius 10 fits in view.
#[derive(Debug, Clone)]
pub struct Camera {
    intrinsic: Matrix3<f32>,
    extrinsic: Matrix3x4<f32>,
    width: u32,
    height: u32,
    zoom_factor: f32,
}

impl Camera {
    /// Camera at `(0, 0, 15)` facing the origin, focal length 200
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&SceneConfig::with_resolution(width, height))
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        let (w, h) = (config.width as f32, config.height as f32);
        let f = config.focal_length;
        Self {
            intrinsic: Matrix3::new(f, 0.0, w / 2.0, 0.0, f, h / 2.0, 0.0, 0.0, 1.0),
            extrinsic: Transform::extrinsic(
                &Matrix3::identity(),
                &Vector3::new(0.0, 0.0, -config.camera_distance),
            ),
            width: config.width,
            height: config.height,
            zoom_factor: config.zoom_factor,
        }
    }

    pub fn intrinsic(&self) -> &Matrix3<f32> {
        &self.intrinsic
    }

    pub fn extrinsic(&self) -> &Matrix3x4<f32> {
        &self.extrinsic
    }

    pub fn focal_length(&self) -> (f32, f32) {
        (self.intrinsic[(0, 0)], self.intrinsic[(1, 1)])
    }

    pub fn principal_point(&self) -> (f32, f32) {
        (self.intrinsic[(0, 2)], self.intrinsic[(1, 2)])
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    pub fn set_pose(&mut self, rotation: &Matrix3<f32>, translation: &Vector3<f32>) {
        self.extrinsic = Transform::extrinsic(rotation, translation);
    }

    /// World point to camera space: `R * p + t`
    pub fn to_camera_space(&self, point: &Point3<f32>) -> Vector3<f32> {
        self.extrinsic * point.to_homogeneous()
    }

    /// Sub-pixel image coordinates, or `None` when the point is not in front
    pub fn project_to_image(&self, point: &Point3<f32>) -> Option<Point2<f32>> {
        let h = self.intrinsic * view_axes() * self.to_camera_space(point);
        if !(h.z > 0.0) {
            return None;
        }
        Some(Point2::new(h.x / h.z, h.y / h.z))
    }

    /// Truncated pixel coordinates when inside `[0, width] x [0, height]`
    pub fn project(&self, point: &Point3<f32>) -> Option<Pixel> {
        let p = self.project_to_image(point)?;
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        let pixel = Pixel {
            x: p.x as i32,
            y: p.y as i32,
        };
        let visible = (0..=self.width as i64).contains(&i64::from(pixel.x))
            && (0..=self.height as i64).contains(&i64::from(pixel.y));
        visible.then_some(pixel)
    }

    /// Change fx and fy by one zoom step unless that leaves the allowed range
    pub fn zoom(&mut self, direction: ZoomDirection) {
        let step = match direction {
            ZoomDirection::In => self.zoom_factor,
            ZoomDirection::Out => -self.zoom_factor,
        };
        let (fx, fy) = self.focal_length();
        let next = fx + step;
        if next > MIN_FOCAL_MARGIN + self.zoom_factor && next < MAX_FOCAL_LENGTH {
            self.intrinsic[(0, 0)] = next;
            self.intrinsic[(1, 1)] = fy + step;
        } else {
            debug!("zoom {direction:?} clamped at focal length {fx}");
        }
    }
}

/// Camera space looks down -z with y up; image rows grow downward
fn view_axes() -> Matrix3<f32> {
    Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0))
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.focal_length(), (200.0, 200.0));
        assert_eq!(camera.principal_point(), (400.0, 300.0));
        assert_eq!(camera.extrinsic()[(2, 3)], -15.0);
    }

    #[test]
    fn test_origin_projects_to_principal_point() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.project(&Point3::origin()), Some(Pixel { x: 400, y: 300 }));
    }

    #[test]
    fn test_world_up_is_image_up() {
        let camera = Camera::new(800, 600);
        // 300 - 200 * 3 / 15
        assert_eq!(
            camera.project(&Point3::new(0.0, 3.0, 0.0)),
            Some(Pixel { x: 400, y: 260 })
        );
    }

    #[test]
    fn test_non_positive_depth_discarded() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.project(&Point3::new(0.0, 0.0, 15.0)), None);
        assert_eq!(camera.project(&Point3::new(1.0, 1.0, 20.0)), None);
        assert!(camera.project_to_image(&Point3::new(0.0, 0.0, 15.0)).is_none());
    }

    #[test]
    fn test_out_of_bounds_discarded() {
        let camera = Camera::new(800, 600);
        // x = 400 + 200 * 100 / 15
        assert_eq!(camera.project(&Point3::new(100.0, 0.0, 0.0)), None);
        assert_eq!(camera.project(&Point3::new(0.0, -100.0, 0.0)), None);
    }

    #[test]
    fn test_far_edge_is_inclusive() {
        let camera = Camera::new(800, 600);
        // 400 + 200 * 30 / 15 = 800
        assert_eq!(
            camera.project(&Point3::new(30.0, 0.0, 0.0)),
            Some(Pixel { x: 800, y: 300 })
        );
    }

    #[test]
    fn test_truncates_toward_zero() {
        let camera = Camera::new(800, 600);
        // 400 + 200 * 0.1 / 15 = 401.33
        assert_eq!(
            camera.project(&Point3::new(0.1, 0.0, 0.0)),
            Some(Pixel { x: 401, y: 300 })
        );
    }

    #[test]
    fn test_halving_focal_length_halves_displacement() {
        let point = Point3::new(3.0, -2.0, 5.0);
        let (cx, cy) = (400.0, 300.0);

        let wide = Camera::from_config(&SceneConfig {
            focal_length: 100.0,
            ..SceneConfig::default()
        });
        let narrow = Camera::new(800, 600);

        let a = wide.project_to_image(&point).unwrap();
        let b = narrow.project_to_image(&point).unwrap();
        assert!(((a.x - cx) * 2.0 - (b.x - cx)).abs() < 1e-3);
        assert!(((a.y - cy) * 2.0 - (b.y - cy)).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_moves_both_focal_lengths() {
        let mut camera = Camera::new(800, 600);
        camera.zoom(ZoomDirection::In);
        assert_eq!(camera.focal_length(), (220.0, 220.0));
        camera.zoom(ZoomDirection::Out);
        camera.zoom(ZoomDirection::Out);
        assert_eq!(camera.focal_length(), (180.0, 180.0));
    }

    #[test]
    fn test_zoom_out_is_clamped() {
        let mut camera = Camera::new(800, 600);
        for _ in 0..50 {
            camera.zoom(ZoomDirection::Out);
            let (fx, fy) = camera.focal_length();
            assert!(fx > 30.0);
            assert_eq!(fx, fy);
        }
        assert_eq!(camera.focal_length().0, 40.0);
    }

    #[test]
    fn test_zoom_in_is_clamped() {
        let mut camera = Camera::new(800, 600);
        for _ in 0..50 {
            camera.zoom(ZoomDirection::In);
            assert!(camera.focal_length().0 < 400.0);
        }
        assert_eq!(camera.focal_length().0, 380.0);
    }

    #[test]
    fn test_pose_rotation() {
        let mut camera = Camera::new(800, 600);
        let r = Transform::axis_angle(&Vector3::y(), std::f32::consts::PI).unwrap();
        camera.set_pose(&r, &Vector3::new(0.0, 0.0, 15.0));
        let c = camera.to_camera_space(&Point3::new(0.0, 0.0, 1.0));
        assert!((c - Vector3::new(0.0, 0.0, 14.0)).norm() < 1e-5);
    }
}
