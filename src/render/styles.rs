//! Font metrics and sizing constants shared by the renderers.
//!
//! Calibrated for Inter with system-ui fallback.

/// Approximate rendered width of `text` at the given size and weight.
pub fn estimate_text_width(text: &str, font_size: f64, font_weight: u32) -> f64 {
    let width_ratio = if font_weight >= 600 {
        0.58
    } else if font_weight >= 500 {
        0.55
    } else {
        0.52
    };
    text.chars().count() as f64 * font_size * width_ratio
}

/// Fixed font sizes (px).
pub struct FontSizes;

impl FontSizes {
    pub const NODE_LABEL: f64 = 13.0;
    pub const EDGE_LABEL: f64 = 11.0;
    pub const TITLE: f64 = 13.0;
    pub const MEMBER: f64 = 12.0;
    pub const ANNOTATION: f64 = 10.0;
}

/// Font weights per element type.
pub struct FontWeights;

impl FontWeights {
    pub const NODE_LABEL: u32 = 500;
    pub const EDGE_LABEL: u32 = 400;
    pub const TITLE: u32 = 600;
    pub const MEMBER: u32 = 400;
}

/// Stroke widths (px).
pub struct StrokeWidths;

impl StrokeWidths {
    pub const BOX: f64 = 1.0;
    pub const CONNECTOR: f64 = 1.0;
    pub const LIFELINE: f64 = 0.75;
}

/// Arrow head marker dimensions.
pub struct ArrowHead;

impl ArrowHead {
    pub const WIDTH: f64 = 8.0;
    pub const HEIGHT: f64 = 4.8;
}

/// Vertical shift for font-agnostic vertical centering of `<text>`.
pub const TEXT_BASELINE_SHIFT: &str = "0.35em";

/// Outer margin around every diagram (px).
pub const CANVAS_MARGIN: f64 = 24.0;

#[cfg(test)]
mod tests {
    use super::estimate_text_width;

    #[test]
    fn wider_text_measures_wider() {
        let short = estimate_text_width("Hi", 13.0, 400);
        let long = estimate_text_width("Hello, world", 13.0, 400);
        assert!(long > short);
    }

    #[test]
    fn heavier_weights_measure_wider() {
        let regular = estimate_text_width("Label", 13.0, 400);
        let bold = estimate_text_width("Label", 13.0, 600);
        assert!(bold > regular);
    }
}
