//! mermview - Mermaid diagram viewer core
//!
//! Parses Mermaid diagram syntax, renders it as themed SVG, and provides
//! the viewer-side machinery: auto-fit scaling, zoom, a built-in example
//! catalog, and file open/save/export.
//!
//! # Example
//!
//! ```rust
//! use mermview::{fit, render_to_svg, Theme};
//!
//! let svg = render_to_svg("graph LR\n  A --> B", Theme::Default).unwrap();
//! assert!(svg.starts_with("<svg"));
//!
//! // Scale a 400x300 diagram into a 1000x800 panel.
//! let fit = fit::fit(1000.0, 800.0, 400.0, 300.0).unwrap();
//! assert!(!fit.is_anisotropic());
//! ```
//!
//! # Supported Diagram Types
//!
//! - Flowcharts (graph TD / flowchart LR)
//! - State diagrams (stateDiagram-v2)
//! - Sequence diagrams (sequenceDiagram)
//! - Class diagrams (classDiagram)
//! - ER diagrams (erDiagram)

pub mod app;
pub mod catalog;
pub mod error;
pub mod fit;
pub mod measure;
pub mod parse;
pub mod render;
pub mod types;
pub mod zoom;

pub use app::Studio;
pub use error::{RenderError, StudioError};
pub use fit::{FitError, ViewportFit};
pub use measure::measure_svg;
pub use render::{render, DiagramColors, RenderedDiagram, Theme, DEFAULT_FONT};
pub use zoom::Zoom;

/// Render a Mermaid diagram to an SVG string with the given theme.
pub fn render_to_svg(source: &str, theme: Theme) -> Result<String, RenderError> {
    let colors = DiagramColors::from_theme(theme);
    render::render(source, &colors, DEFAULT_FONT, false).map(|r| r.svg)
}
