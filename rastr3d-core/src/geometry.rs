/// Loaded model geometry with a maintained centroid and bounding radius
use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;
use crate::transform::Transform;

/// Index value recorded for an attribute a face reference leaves out
pub const ABSENT: i32 = -1;

/// One corner of a face: zero-based vertex, texcoord and normal indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRef {
    pub vertex: i32,
    pub texcoord: i32,
    pub normal: i32,
}

impl FaceRef {
    pub fn new(vertex: i32, texcoord: i32, normal: i32) -> Self {
        Self {
            vertex,
            texcoord,
            normal,
        }
    }

    pub fn vertex_index(&self) -> Option<usize> {
        index(self.vertex)
    }

    pub fn texcoord_index(&self) -> Option<usize> {
        index(self.texcoord)
    }

    pub fn normal_index(&self) -> Option<usize> {
        index(self.normal)
    }
}

fn index(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

/// A polygon with three or more corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub refs: Vec<FaceRef>,
}

impl Face {
    pub fn new(refs: Vec<FaceRef>) -> Self {
        Self { refs }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Vertex, texcoord, normal and face buffers of one model.
///
/// `centroid` always equals the mean of the current vertex positions and
/// `size` the largest distance from it to a vertex. Every mutating
/// primitive updates both incrementally.
#[derive(Debug, Clone)]
pub struct Geometry {
    vertices: Vec<Point3<f32>>,
    texcoords: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    faces: Vec<Face>,
    materials: Vec<String>,
    centroid: Point3<f32>,
    size: f32,
}

impl Geometry {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Build a geometry from finished buffers, computing centroid and size
    pub fn from_parts(
        vertices: Vec<Point3<f32>>,
        texcoords: Vec<Vector3<f32>>,
        normals: Vec<Vector3<f32>>,
        faces: Vec<Face>,
    ) -> Self {
        let centroid = mean(&vertices).unwrap_or_else(Point3::origin);
        let size = max_distance(&vertices, &centroid);
        Self {
            vertices,
            texcoords,
            normals,
            faces,
            materials: Vec::new(),
            centroid,
            size,
        }
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn texcoords(&self) -> &[Vector3<f32>] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Reserved for material support; always empty for now
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn centroid(&self) -> Point3<f32> {
        self.centroid
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Recenter at the origin and rescale so the bounding radius is `radius`
    pub fn normalize(&mut self, radius: f32) {
        let Some(centroid) = mean_f64(&self.vertices) else {
            return;
        };
        // f32 deltas lose the sub-unit part of large (e.g. georeferenced) coordinates
        for v in &mut self.vertices {
            *v = Point3::from((v.coords.cast::<f64>() - centroid).cast::<f32>());
        }
        self.centroid = mean(&self.vertices).unwrap_or_else(Point3::origin);
        self.size = max_distance(&self.vertices, &self.centroid);
        self.debug_check_centroid(centroid.norm() as f32);

        let factor = radius / self.size;
        if self.size > 0.0 && factor.is_finite() && factor != 0.0 {
            self.scale_about_centroid(factor);
        } else {
            debug!("skipping rescale of degenerate geometry (size {})", self.size);
        }
        debug!(
            "normalized {} vertices from centroid {:?} to radius {}",
            self.vertices.len(),
            centroid,
            self.size
        );
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        let before = self.centroid.coords.norm();
        for v in &mut self.vertices {
            *v += delta;
        }
        self.centroid += delta;
        self.debug_check_centroid(before);
    }

    /// Uniform scale about the centroid
    pub fn scale(&mut self, factor: f32) -> Result<(), GeometryError> {
        if !factor.is_finite() || factor == 0.0 {
            return Err(GeometryError::InvalidScale(factor));
        }
        self.scale_about_centroid(factor);
        Ok(())
    }

    fn scale_about_centroid(&mut self, factor: f32) {
        let centroid = self.centroid;
        let before = self.size;
        Transform::about_pivot(&mut self.vertices, &centroid, |v| v * factor);
        self.size *= factor.abs();
        self.debug_check_centroid(before);
    }

    /// Rotate `angle` radians about `axis` through the centroid
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: f32) -> Result<(), GeometryError> {
        let r = Transform::axis_angle(&axis, angle)?;
        let centroid = self.centroid;
        Transform::about_pivot(&mut self.vertices, &centroid, |v| r * v);
        self.debug_check_centroid(0.0);
        Ok(())
    }

    /// `magnitude` covers coordinates the vertices held before the last edit
    fn debug_check_centroid(&self, magnitude: f32) {
        if cfg!(debug_assertions) {
            if let Some(actual) = mean(&self.vertices) {
                let drift = (actual - self.centroid).norm();
                let scale = self.size + self.centroid.coords.norm() + magnitude;
                let tolerance = 1e-3 * scale.max(1.0);
                debug_assert!(
                    drift <= tolerance,
                    "centroid drifted by {drift} (stored {:?}, actual {:?})",
                    self.centroid.coords,
                    actual.coords
                );
            }
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

fn mean_f64(points: &[Point3<f32>]) -> Option<Vector3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vector3::<f64>::zeros(), |acc, p| {
        acc + p.coords.cast::<f64>()
    });
    Some(sum / points.len() as f64)
}

fn mean(points: &[Point3<f32>]) -> Option<Point3<f32>> {
    mean_f64(points).map(|m| Point3::from(m.cast::<f32>()))
}

fn max_distance(points: &[Point3<f32>], center: &Point3<f32>) -> f32 {
    points
        .iter()
        .map(|p| (p - center).norm())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetra() -> Geometry {
        Geometry::from_parts(
            vec![
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(3.0, 1.0, 1.0),
                Point3::new(1.0, 3.0, 1.0),
                Point3::new(1.0, 1.0, 3.0),
            ],
            Vec::new(),
            Vec::new(),
            vec![Face::new(vec![
                FaceRef::new(0, ABSENT, ABSENT),
                FaceRef::new(1, ABSENT, ABSENT),
                FaceRef::new(2, ABSENT, ABSENT),
            ])],
        )
    }

    fn assert_centroid_is_mean(g: &Geometry) {
        let actual = mean(g.vertices()).unwrap();
        assert!((actual - g.centroid()).norm() < 1e-5);
    }

    #[test]
    fn test_face_ref_indices() {
        let r = FaceRef::new(3, ABSENT, 5);
        assert_eq!(r.vertex_index(), Some(3));
        assert_eq!(r.texcoord_index(), None);
        assert_eq!(r.normal_index(), Some(5));
    }

    #[test]
    fn test_from_parts_computes_centroid() {
        let g = tetra();
        assert!((g.centroid() - Point3::new(1.5, 1.5, 1.5)).norm() < 1e-6);
        assert!(g.size() > 0.0);
        assert!(g.materials().is_empty());
    }

    #[test]
    fn test_normalize_recenters_and_rescales() {
        let mut g = tetra();
        g.normalize(10.0);
        assert!(g.centroid().coords.norm() < 1e-5);
        assert!((g.size() - 10.0).abs() < 1e-5);
        assert_centroid_is_mean(&g);
        let max = max_distance(g.vertices(), &g.centroid());
        assert!((max - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_translate_moves_centroid() {
        let mut g = tetra();
        let size = g.size();
        g.translate(Vector3::new(1.0, -2.0, 0.5));
        assert!((g.centroid() - Point3::new(2.5, -0.5, 2.0)).norm() < 1e-6);
        assert_eq!(g.size(), size);
        assert_centroid_is_mean(&g);
    }

    #[test]
    fn test_scale_about_centroid() {
        let mut g = tetra();
        let centroid = g.centroid();
        let size = g.size();
        g.scale(2.0).unwrap();
        assert!((g.centroid() - centroid).norm() < 1e-6);
        assert!((g.size() - size * 2.0).abs() < 1e-5);
        assert_centroid_is_mean(&g);
    }

    #[test]
    fn test_scale_rejects_zero_and_nan() {
        let mut g = tetra();
        assert_eq!(g.scale(0.0), Err(GeometryError::InvalidScale(0.0)));
        assert!(matches!(g.scale(f32::NAN), Err(GeometryError::InvalidScale(_))));
    }

    #[test]
    fn test_rotate_preserves_centroid_and_size() {
        let mut g = tetra();
        let centroid = g.centroid();
        let size = g.size();
        g.rotate(Vector3::new(0.0, 1.0, 1.0), 0.7).unwrap();
        assert!((g.centroid() - centroid).norm() < 1e-6);
        assert_eq!(g.size(), size);
        assert_centroid_is_mean(&g);
        let max = max_distance(g.vertices(), &g.centroid());
        assert!((max - size).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_zero_axis_leaves_vertices() {
        let mut g = tetra();
        let before = g.vertices().to_vec();
        assert_eq!(g.rotate(Vector3::zeros(), 1.0), Err(GeometryError::ZeroAxis));
        assert_eq!(g.vertices(), before.as_slice());
    }

    #[test]
    fn test_normalize_georeferenced_coordinates() {
        let mut g = Geometry::from_parts(
            vec![
                Point3::new(500000.5, 4649776.2, 100.0),
                Point3::new(500001.5, 4649777.2, 101.0),
                Point3::new(500000.5, 4649777.7, 100.5),
                Point3::new(500001.0, 4649776.9, 100.2),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        g.normalize(10.0);
        assert!(g.centroid().coords.norm() < 1e-5);
        assert_centroid_is_mean(&g);
        assert!((g.size() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_translate_far_and_back() {
        let mut g = tetra();
        g.translate(Vector3::new(500000.0, 4649776.0, 0.0));
        g.translate(Vector3::new(-500000.0, -4649776.0, 0.0));
        assert!((g.centroid() - Point3::new(1.5, 1.5, 1.5)).norm() < 1.0);
    }

    #[test]
    fn test_normalize_single_point() {
        let mut g = Geometry::from_parts(
            vec![Point3::new(4.0, 4.0, 4.0); 3],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        g.normalize(10.0);
        assert!(g.centroid().coords.norm() < 1e-6);
        assert_eq!(g.size(), 0.0);
        assert!(g.vertices().iter().all(|v| v.coords.norm() < 1e-6));
    }

    #[test]
    fn test_normalize_empty_is_noop() {
        let mut g = Geometry::new();
        g.normalize(10.0);
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.size(), 0.0);
    }
}
