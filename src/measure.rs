//! Measure the natural pixel size of an SVG document from its markup.
//!
//! Used when a fit is requested for markup loaded from disk, where no
//! [`crate::render::RenderedDiagram`] size is available.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_OPEN_TAG: Regex = Regex::new(r"(?s)<svg\b[^>]*>").unwrap();
    static ref RE_WIDTH: Regex = Regex::new(r#"\bwidth="([0-9.]+)(?:px)?""#).unwrap();
    static ref RE_HEIGHT: Regex = Regex::new(r#"\bheight="([0-9.]+)(?:px)?""#).unwrap();
    static ref RE_VIEWBOX: Regex = Regex::new(
        r#"\bviewBox="[0-9.eE+-]+[\s,]+[0-9.eE+-]+[\s,]+([0-9.]+)[\s,]+([0-9.]+)""#
    )
    .unwrap();
}

/// Extract `(width, height)` from the root `<svg>` tag.
///
/// Prefers explicit `width`/`height` attributes and falls back to the
/// viewBox extent. Returns `None` when neither yields two positive finite
/// numbers.
pub fn measure_svg(svg: &str) -> Option<(f64, f64)> {
    let open_tag = RE_OPEN_TAG.find(svg)?.as_str();

    let explicit = |re: &Regex| {
        re.captures(open_tag)
            .and_then(|caps| caps[1].parse::<f64>().ok())
    };
    if let (Some(w), Some(h)) = (explicit(&RE_WIDTH), explicit(&RE_HEIGHT)) {
        if valid(w) && valid(h) {
            return Some((w, h));
        }
    }

    let caps = RE_VIEWBOX.captures(open_tag)?;
    let w = caps[1].parse::<f64>().ok()?;
    let h = caps[2].parse::<f64>().ok()?;
    (valid(w) && valid(h)).then_some((w, h))
}

fn valid(dim: f64) -> bool {
    dim.is_finite() && dim > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_explicit_dimensions() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="240.5"></svg>"#;
        assert_eq!(measure_svg(svg), Some((320.0, 240.5)));
    }

    #[test]
    fn falls_back_to_viewbox() {
        let svg = r#"<svg viewBox="0 0 640 480"><rect width="10" height="10"/></svg>"#;
        assert_eq!(measure_svg(svg), Some((640.0, 480.0)));
    }

    #[test]
    fn ignores_dimensions_on_inner_elements() {
        // No size on the root tag, only on a child.
        let svg = r#"<svg xmlns="x"><rect width="10" height="10"/></svg>"#;
        assert_eq!(measure_svg(svg), None);
    }

    #[test]
    fn rejects_zero_sizes() {
        let svg = r#"<svg width="0" height="0" viewBox="0 0 0 0"></svg>"#;
        assert_eq!(measure_svg(svg), None);
    }

    #[test]
    fn measures_rendered_output() {
        let colors = crate::render::DiagramColors::default();
        let rendered =
            crate::render::render("graph TD\n  A --> B", &colors, "Inter", false).unwrap();
        assert_eq!(
            measure_svg(&rendered.svg),
            Some((rendered.width, rendered.height))
        );
    }
}
