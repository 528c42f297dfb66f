//! SVG renderers: one per diagram type, all pure string building.
//!
//! Every renderer lays out its diagram, emits markup back-to-front
//! (containers, connectors, connector labels, shapes, shape labels) and
//! reports the natural canvas size alongside the SVG so the host can feed
//! the auto-fit scaler without re-measuring the markup.

mod class;
mod er;
mod flowchart;
mod sequence;
mod styles;
mod theme;

pub use styles::estimate_text_width;
pub use theme::{build_style_block, svg_open_tag, DiagramColors, Theme};

use crate::error::RenderError;
use crate::types::Diagram;

/// Font family requested by the style block.
pub const DEFAULT_FONT: &str = "Inter";

/// A rendered artifact: the markup plus its natural, unscaled pixel size.
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub svg: String,
    pub width: f64,
    pub height: f64,
}

/// Render Mermaid source text to SVG.
pub fn render(
    source: &str,
    colors: &DiagramColors,
    font: &str,
    transparent: bool,
) -> Result<RenderedDiagram, RenderError> {
    let diagram = crate::parse::parse(source)?;

    let rendered = match diagram {
        Diagram::Flowchart(graph) => flowchart::render(&graph, colors, font, transparent),
        Diagram::Sequence(diagram) => sequence::render(&diagram, colors, font, transparent),
        Diagram::Class(diagram) => class::render(&diagram, colors, font, transparent),
        Diagram::Er(diagram) => er::render(&diagram, colors, font, transparent),
    };

    log::debug!(
        "rendered {}x{} artifact ({} bytes of svg)",
        rendered.width,
        rendered.height,
        rendered.svg.len()
    );
    Ok(rendered)
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a pixel dimension: integers without a decimal point, fractions
/// with trailing zeros removed.
pub(crate) fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Escape text for inclusion in SVG markup.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// An axis-aligned box used for connector anchoring.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Point on this box's border along the ray from its center toward
    /// `(px, py)`. Falls back to the center for degenerate rays.
    pub fn anchor_toward(&self, px: f64, py: f64) -> (f64, f64) {
        let dx = px - self.cx();
        let dy = py - self.cy();
        if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
            return (self.cx(), self.cy());
        }

        let tx = if dx.abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            (self.w / 2.0) / dx.abs()
        };
        let ty = if dy.abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            (self.h / 2.0) / dy.abs()
        };
        let t = tx.min(ty);
        (self.cx() + dx * t, self.cy() + dy * t)
    }
}

/// `<text>` element centered at (x, y) with the baseline shift applied.
pub(crate) fn centered_text(
    x: f64,
    y: f64,
    font_size: f64,
    font_weight: u32,
    fill: &str,
    content: &str,
) -> String {
    format!(
        r#"<text x="{}" y="{}" dy="{}" text-anchor="middle" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
        fmt_num(x),
        fmt_num(y),
        styles::TEXT_BASELINE_SHIFT,
        fmt_num(font_size),
        font_weight,
        fill,
        escape_xml(content)
    )
}

/// Label text with a background halo so it stays readable over connectors.
pub(crate) fn halo_text(
    x: f64,
    y: f64,
    font_size: f64,
    font_weight: u32,
    fill: &str,
    content: &str,
) -> String {
    format!(
        r#"<text x="{}" y="{}" dy="{}" text-anchor="middle" font-size="{}" font-weight="{}" fill="{}" stroke="var(--bg)" stroke-width="3" paint-order="stroke">{}</text>"#,
        fmt_num(x),
        fmt_num(y),
        styles::TEXT_BASELINE_SHIFT,
        fmt_num(font_size),
        font_weight,
        fill,
        escape_xml(content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(320.0), "320");
        assert_eq!(fmt_num(240.5), "240.5");
        assert_eq!(fmt_num(0.25), "0.25");
    }

    #[test]
    fn escape_xml_handles_markup_chars() {
        assert_eq!(
            escape_xml(r#"a < b & "c" > d"#),
            "a &lt; b &amp; &quot;c&quot; &gt; d"
        );
    }

    #[test]
    fn anchor_stays_on_border() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 40.0,
        };
        // Straight down: anchor is the bottom-center.
        let (x, y) = rect.anchor_toward(50.0, 200.0);
        assert_eq!((x, y), (50.0, 40.0));
        // Straight right: anchor is the right-center.
        let (x, y) = rect.anchor_toward(400.0, 20.0);
        assert_eq!((x, y), (100.0, 20.0));
    }

    #[test]
    fn render_reports_unsupported_types() {
        let err = render(
            "journey\n  title Trip",
            &DiagramColors::default(),
            DEFAULT_FONT,
            false,
        )
        .unwrap_err();
        assert_eq!(err, RenderError::Unsupported("journey".to_string()));
    }

    #[test]
    fn rendered_size_matches_svg_attributes() {
        let rendered = render(
            "graph TD\n  A[Start] --> B[End]",
            &DiagramColors::default(),
            DEFAULT_FONT,
            false,
        )
        .unwrap();
        assert!(rendered.svg.contains(&format!(
            r#"width="{}""#,
            fmt_num(rendered.width)
        )));
        assert!(rendered.svg.contains(&format!(
            r#"height="{}""#,
            fmt_num(rendered.height)
        )));
    }
}
