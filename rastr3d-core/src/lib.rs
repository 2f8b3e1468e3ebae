/// rastr3d Core Library - OBJ loading, model normalization and point projection
///
/// This library provides the geometry pipeline behind the viewers: an OBJ
/// subset parser, centroid-preserving transforms, a pinhole camera and a
/// point-cloud rasterizer producing RGB8 buffers.

pub mod config;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use config::SceneConfig;
pub use error::{ConfigError, GeometryError, ParseError, ParseErrorKind, RenderError};
pub use geometry::{Face, FaceRef, Geometry, ABSENT};
pub use projection::{Camera, Pixel, ProjectionMode, ZoomDirection};
pub use raster::RasterBuffer;
pub use scene::{LoadStatus, RenderFlags, Scene};
pub use transform::Transform;
