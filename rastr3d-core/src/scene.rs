/// Loaded models, the camera and the point rasterizer
use std::path::Path;

use log::{info, warn};
use nalgebra::Vector3;

use crate::config::SceneConfig;
use crate::error::{ConfigError, GeometryError, ParseError, ParseErrorKind, RenderError};
use crate::geometry::Geometry;
use crate::obj;
use crate::projection::{Camera, ProjectionMode, ZoomDirection};
use crate::raster::RasterBuffer;

/// Outcome of [`Scene::open`], for the caller to turn into a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Success,
    NotExist,
    IoError,
    SyntaxNotSupported,
}

impl From<&ParseError> for LoadStatus {
    fn from(err: &ParseError) -> Self {
        match err.kind() {
            ParseErrorKind::FileNotFound => Self::NotExist,
            ParseErrorKind::Io => Self::IoError,
            ParseErrorKind::Syntax => Self::SyntaxNotSupported,
        }
    }
}

/// Render mode switches. Only `projection` affects the current render path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub show_grid: bool,
    pub show_face: bool,
    pub projection: ProjectionMode,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_face: true,
            projection: ProjectionMode::Perspective,
        }
    }
}

pub struct Scene {
    config: SceneConfig,
    models: Vec<Geometry>,
    camera: Camera,
    flags: RenderFlags,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera: Camera::from_config(&config),
            config,
            models: Vec::new(),
            flags: RenderFlags::default(),
        })
    }

    pub fn with_resolution(width: u32, height: u32) -> Result<Self, ConfigError> {
        Self::new(SceneConfig::with_resolution(width, height))
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Load, normalize and append a model, reporting only the status
    pub fn open(&mut self, path: impl AsRef<Path>) -> LoadStatus {
        let path = path.as_ref();
        match self.load(path) {
            Ok(_) => LoadStatus::Success,
            Err(err) => {
                warn!("failed to open {}: {err}", path.display());
                LoadStatus::from(&err)
            }
        }
    }

    /// Like [`Scene::open`] but keeps the error; returns the new model's index
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, ParseError> {
        let mut geometry = obj::parse_obj_file(path)?;
        let (centroid, size) = (geometry.centroid(), geometry.size());
        geometry.normalize(self.config.normalized_radius);
        info!(
            "model {} loaded (source centroid {:?}, radius {size})",
            self.models.len(),
            centroid.coords
        );
        Ok(self.add_model(geometry))
    }

    /// Append a geometry as-is and return its index
    pub fn add_model(&mut self, geometry: Geometry) -> usize {
        self.models.push(geometry);
        self.models.len() - 1
    }

    pub fn models(&self) -> &[Geometry] {
        &self.models
    }

    pub fn model_mut(&mut self, index: usize) -> Option<&mut Geometry> {
        self.models.get_mut(index)
    }

    pub fn remove_model(&mut self, index: usize) -> Option<Geometry> {
        (index < self.models.len()).then(|| self.models.remove(index))
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }

    /// Rotate every model about its own centroid
    pub fn rotate_models(&mut self, axis: Vector3<f32>, angle: f32) -> Result<(), GeometryError> {
        for model in &mut self.models {
            model.rotate(axis, angle)?;
        }
        Ok(())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.camera.zoom(direction);
    }

    pub fn flags(&self) -> &RenderFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut RenderFlags {
        &mut self.flags
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.flags.projection = mode;
    }

    /// Draw every model vertex as a single pixel on a black background
    pub fn render(&self) -> Result<RasterBuffer, RenderError> {
        match self.flags.projection {
            ProjectionMode::Perspective => Ok(self.render_points()),
            mode @ ProjectionMode::Rectangular => Err(RenderError::NotImplemented(mode)),
        }
    }

    fn render_points(&self) -> RasterBuffer {
        let (width, height) = self.resolution();
        let mut buffer = RasterBuffer::new(width, height);
        for model in &self.models {
            for vertex in model.vertices() {
                if let Some(pixel) = self.camera.project(vertex) {
                    // project() only yields non-negative coordinates
                    buffer.put_pixel(pixel.x as u32, pixel.y as u32, self.config.point_color);
                }
            }
        }
        buffer
    }
}
