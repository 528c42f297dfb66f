//! Manual zoom state for the preview panel.

/// Multiplier applied per zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 1.25;
/// Multiplier applied per zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;
/// Zoom clamp range.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Current zoom level, always within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f64);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

impl Zoom {
    pub fn level(&self) -> f64 {
        self.0
    }

    /// Apply a multiplicative step, clamped to the allowed range.
    pub fn step(&mut self, factor: f64) {
        self.0 = (self.0 * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.step(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.step(ZOOM_OUT_FACTOR);
    }

    pub fn reset(&mut self) {
        self.0 = 1.0;
    }

    /// Zoom level as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_natural_size() {
        assert_eq!(Zoom::default().level(), 1.0);
        assert_eq!(Zoom::default().percent(), 100);
    }

    #[test]
    fn steps_compound() {
        let mut zoom = Zoom::default();
        zoom.zoom_in();
        assert_eq!(zoom.level(), 1.25);
        zoom.zoom_out();
        assert_eq!(zoom.level(), 1.0);
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut zoom = Zoom::default();
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.level(), MAX_ZOOM);

        for _ in 0..40 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.level(), MIN_ZOOM);
    }

    #[test]
    fn reset_returns_to_natural_size() {
        let mut zoom = Zoom::default();
        zoom.zoom_in();
        zoom.zoom_in();
        zoom.reset();
        assert_eq!(zoom.level(), 1.0);
    }

    #[test]
    fn percent_rounds() {
        let mut zoom = Zoom::default();
        zoom.zoom_out(); // 0.8
        zoom.zoom_out(); // 0.64
        assert_eq!(zoom.percent(), 64);
    }
}
