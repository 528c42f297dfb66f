//! Error types.

use thiserror::Error;

/// Failures producing an SVG artifact from diagram source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("empty diagram source")]
    EmptySource,

    #[error("unsupported diagram type: {0}")]
    Unsupported(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Failures of the viewer state operations (file I/O and export).
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("no rendered diagram to export")]
    NothingToExport,

    #[error("unknown example: {0}")]
    UnknownExample(String),
}
