/// Error types for model loading, geometry edits and rendering
use std::path::PathBuf;

use thiserror::Error;

use crate::projection::ProjectionMode;

/// Failure while reading a model description file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("model file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

/// Coarse failure taxonomy surfaced to the load boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    FileNotFound,
    Io,
    Syntax,
}

impl ParseError {
    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::FileNotFound(_) => ParseErrorKind::FileNotFound,
            Self::Io(_) => ParseErrorKind::Io,
            Self::Syntax { .. } => ParseErrorKind::Syntax,
        }
    }
}

/// Rejected geometry transform
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("rotation axis has zero length")]
    ZeroAxis,

    #[error("scale factor {0} is not a finite non-zero number")]
    InvalidScale(f32),
}

/// Rejected render request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("{0:?} projection is not implemented")]
    NotImplemented(ProjectionMode),
}

/// Invalid scene configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("resolution {width}x{height} must be non-zero")]
    InvalidResolution { width: u32, height: u32 },

    #[error("zoom factor {0} must be a positive number")]
    InvalidZoomFactor(f32),

    #[error("focal length {focal} must lie strictly between {min} and {max}")]
    InvalidFocalLength { focal: f32, min: f32, max: f32 },

    #[error("camera distance {0} must be a positive number")]
    InvalidCameraDistance(f32),

    #[error("normalized radius {0} must be a positive number")]
    InvalidRadius(f32),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}
