//! Auto-fit scaling: compute the transform that makes a rendered diagram
//! fill its preview panel.
//!
//! The panel reserves a fixed padding on every side; the diagram is scaled
//! against the remaining usable area. When container and content have
//! similar aspect ratios a single uniform scale (with a small safety
//! margin) is used. When the shapes disagree, one axis is stretched to
//! fill while the other keeps its natural size, trading aspect ratio for
//! coverage.

use serde::Serialize;
use thiserror::Error;

/// Padding reserved inside the panel on each side (px).
pub const PANEL_PADDING: f64 = 20.0;

/// Aspect-ratio difference above which the fit goes anisotropic.
pub const ASPECT_THRESHOLD: f64 = 0.2;

/// Margin factor applied to uniform fits so the diagram never touches the
/// padding edge.
pub const SAFETY_FACTOR: f64 = 0.95;

/// Lower clamp for any computed scale.
pub const MIN_SCALE: f64 = 0.1;

/// A computed fit transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ViewportFit {
    /// Both axes scaled by the same factor; aspect ratio preserved.
    Uniform { scale: f64 },
    /// Exactly one axis stretched, the other left at natural size.
    Anisotropic { scale_x: f64, scale_y: f64 },
}

impl ViewportFit {
    /// The no-op transform.
    pub const IDENTITY: ViewportFit = ViewportFit::Uniform { scale: 1.0 };

    pub fn scale_x(&self) -> f64 {
        match *self {
            ViewportFit::Uniform { scale } => scale,
            ViewportFit::Anisotropic { scale_x, .. } => scale_x,
        }
    }

    pub fn scale_y(&self) -> f64 {
        match *self {
            ViewportFit::Uniform { scale } => scale,
            ViewportFit::Anisotropic { scale_y, .. } => scale_y,
        }
    }

    pub fn is_anisotropic(&self) -> bool {
        matches!(self, ViewportFit::Anisotropic { .. })
    }

    /// CSS `transform` value for this fit.
    pub fn to_css(&self) -> String {
        match *self {
            ViewportFit::Uniform { scale } => format!("scale({})", scale),
            ViewportFit::Anisotropic { scale_x, scale_y } => {
                format!("scale({}, {})", scale_x, scale_y)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    /// Content reported a zero, negative, or non-finite dimension.
    #[error("content has no measurable size")]
    NoMeasurableContent,
}

fn measurable(dim: f64) -> bool {
    dim.is_finite() && dim > 0.0
}

/// Compute the fit for `content` inside `container`, both in px.
///
/// Containers smaller than the padding still produce a usable (clamped)
/// fit; only unmeasurable content is an error, and the caller is expected
/// to fall back to [`ViewportFit::IDENTITY`].
pub fn fit(
    container_w: f64,
    container_h: f64,
    content_w: f64,
    content_h: f64,
) -> Result<ViewportFit, FitError> {
    if !measurable(content_w) || !measurable(content_h) {
        return Err(FitError::NoMeasurableContent);
    }

    // max(1.0) also neutralizes NaN container sizes.
    let usable_w = (container_w - 2.0 * PANEL_PADDING).max(1.0);
    let usable_h = (container_h - 2.0 * PANEL_PADDING).max(1.0);

    let scale_x = usable_w / content_w;
    let scale_y = usable_h / content_h;

    let container_aspect = usable_w / usable_h;
    let content_aspect = content_w / content_h;
    let aspect_diff = (container_aspect - content_aspect).abs();

    let chosen = if aspect_diff > ASPECT_THRESHOLD {
        if content_aspect < container_aspect {
            // Content is relatively taller: stretch width only.
            ViewportFit::Anisotropic {
                scale_x: scale_x.max(MIN_SCALE),
                scale_y: 1.0,
            }
        } else {
            ViewportFit::Anisotropic {
                scale_x: 1.0,
                scale_y: scale_y.max(MIN_SCALE),
            }
        }
    } else {
        let scale = (scale_x.min(scale_y) * SAFETY_FACTOR).max(MIN_SCALE);
        ViewportFit::Uniform { scale }
    };

    log::debug!(
        "fit {}x{} into {}x{} -> {:?}",
        content_w,
        content_h,
        container_w,
        container_h,
        chosen
    );
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn similar_aspects_scale_uniformly() {
        // 1000x800 panel, 400x300 diagram: usable 960x760, candidates
        // 2.4 / 2.5333; aspects 1.2632 vs 1.3333 differ by < 0.2.
        let fit = fit(1000.0, 800.0, 400.0, 300.0).unwrap();
        match fit {
            ViewportFit::Uniform { scale } => assert_close(scale, 2.4 * 0.95),
            other => panic!("expected uniform fit, got {:?}", other),
        }
    }

    #[test]
    fn tall_content_in_wide_panel_stretches_width_only() {
        // 1000x400 panel, 300x600 diagram: usable 960x360, aspects 2.6667
        // vs 0.5.
        let fit = fit(1000.0, 400.0, 300.0, 600.0).unwrap();
        match fit {
            ViewportFit::Anisotropic { scale_x, scale_y } => {
                assert_close(scale_x, 3.2);
                assert_close(scale_y, 1.0);
            }
            other => panic!("expected anisotropic fit, got {:?}", other),
        }
    }

    #[test]
    fn wide_content_in_tall_panel_stretches_height_only() {
        let fit = fit(400.0, 1000.0, 600.0, 300.0).unwrap();
        match fit {
            ViewportFit::Anisotropic { scale_x, scale_y } => {
                assert_close(scale_x, 1.0);
                assert_close(scale_y, 960.0 / 300.0);
            }
            other => panic!("expected anisotropic fit, got {:?}", other),
        }
    }

    #[test]
    fn unmeasurable_content_is_an_error() {
        assert_eq!(
            fit(1000.0, 800.0, 0.0, 0.0).unwrap_err(),
            FitError::NoMeasurableContent
        );
        assert_eq!(
            fit(1000.0, 800.0, -5.0, 300.0).unwrap_err(),
            FitError::NoMeasurableContent
        );
        assert_eq!(
            fit(1000.0, 800.0, f64::NAN, 300.0).unwrap_err(),
            FitError::NoMeasurableContent
        );
        assert_eq!(
            fit(1000.0, 800.0, 400.0, f64::INFINITY).unwrap_err(),
            FitError::NoMeasurableContent
        );
    }

    #[test]
    fn scales_never_drop_below_the_floor() {
        // Enormous square diagram in a square panel: uniform branch.
        let fit = fit(100.0, 100.0, 100_000.0, 100_000.0).unwrap();
        assert_close(fit.scale_x(), MIN_SCALE);
        assert_close(fit.scale_y(), MIN_SCALE);
    }

    #[test]
    fn tiny_containers_still_produce_a_fit() {
        let fit = fit(10.0, 10.0, 400.0, 300.0).unwrap();
        assert!(fit.scale_x() >= MIN_SCALE && fit.scale_y() >= MIN_SCALE);
    }

    #[test]
    fn anisotropic_fits_keep_exactly_one_axis_natural() {
        let cases = [
            (1000.0, 400.0, 300.0, 600.0),
            (400.0, 1000.0, 600.0, 300.0),
            (2000.0, 300.0, 100.0, 900.0),
        ];
        for (cw, ch, dw, dh) in cases {
            let fit = fit(cw, ch, dw, dh).unwrap();
            assert!(fit.is_anisotropic());
            let natural_axes =
                (fit.scale_x() == 1.0) as u32 + (fit.scale_y() == 1.0) as u32;
            assert_eq!(natural_axes, 1, "case {:?}", (cw, ch, dw, dh));
        }
    }

    #[test]
    fn identity_and_css() {
        assert_eq!(ViewportFit::IDENTITY.to_css(), "scale(1)");
        let fit = ViewportFit::Anisotropic {
            scale_x: 3.2,
            scale_y: 1.0,
        };
        assert_eq!(fit.to_css(), "scale(3.2, 1)");
        assert!(!ViewportFit::IDENTITY.is_anisotropic());
    }

    #[test]
    fn fit_is_stable_over_a_size_grid() {
        for cw in [200.0, 640.0, 1280.0, 1920.0] {
            for ch in [200.0, 480.0, 1080.0] {
                for dw in [50.0, 400.0, 2000.0] {
                    for dh in [50.0, 400.0, 2000.0] {
                        let fit = fit(cw, ch, dw, dh).unwrap();
                        assert!(fit.scale_x() >= MIN_SCALE);
                        assert!(fit.scale_y() >= MIN_SCALE);
                        assert!(fit.scale_x().is_finite() && fit.scale_y().is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn identical_inputs_yield_identical_fits() {
        for cw in [200.0, 640.0, 1280.0, 1920.0] {
            for ch in [200.0, 480.0, 1080.0] {
                for dw in [50.0, 400.0, 2000.0] {
                    for dh in [50.0, 400.0, 2000.0] {
                        assert_eq!(
                            fit(cw, ch, dw, dh),
                            fit(cw, ch, dw, dh),
                            "repeat call diverged for {:?}",
                            (cw, ch, dw, dh)
                        );
                    }
                }
            }
        }
        // Error inputs repeat identically too.
        assert_eq!(fit(1000.0, 800.0, 0.0, 300.0), fit(1000.0, 800.0, 0.0, 300.0));
    }
}
