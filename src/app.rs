//! Viewer state: the current source, rendered artifact, zoom and fit.
//!
//! Mirrors the interactive viewer's behavior: a failed render keeps the
//! previous artifact on screen and records the error message instead of
//! blanking the preview.

use crate::catalog;
use crate::error::StudioError;
use crate::fit::{fit, FitError, ViewportFit};
use crate::render::{self, DiagramColors, RenderedDiagram, Theme, DEFAULT_FONT};
use crate::zoom::Zoom;
use std::path::{Path, PathBuf};

pub struct Studio {
    source: String,
    file_name: Option<String>,
    current_example: Option<String>,
    theme: Theme,
    zoom: Zoom,
    fit: ViewportFit,
    rendered: Option<RenderedDiagram>,
    last_error: Option<String>,
}

impl Default for Studio {
    /// A fresh viewer with the first catalog example loaded (not yet
    /// rendered).
    fn default() -> Self {
        let example = catalog::default_example();
        Studio {
            source: example.source.to_string(),
            file_name: None,
            current_example: Some(catalog::example_key(example.name)),
            theme: Theme::default(),
            zoom: Zoom::default(),
            fit: ViewportFit::IDENTITY,
            rendered: None,
            last_error: None,
        }
    }
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn current_example(&self) -> Option<&str> {
        self.current_example.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn artifact(&self) -> Option<&RenderedDiagram> {
        self.rendered.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the source text, detaching it from any loaded example.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.current_example = None;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Load a catalog example by key.
    pub fn load_example(&mut self, key: &str) -> Result<(), StudioError> {
        let example =
            catalog::find(key).ok_or_else(|| StudioError::UnknownExample(key.to_string()))?;
        self.source = example.source.to_string();
        self.current_example = Some(key.to_string());
        self.file_name = None;
        Ok(())
    }

    /// Render the current source. On failure the previous artifact is
    /// kept and the error message recorded; returns whether the render
    /// succeeded.
    pub fn render(&mut self) -> bool {
        let colors = DiagramColors::from_theme(self.theme);
        match render::render(&self.source, &colors, DEFAULT_FONT, false) {
            Ok(rendered) => {
                self.rendered = Some(rendered);
                self.last_error = None;
                true
            }
            Err(err) => {
                log::warn!("render failed: {}", err);
                self.last_error = Some(err.to_string());
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Zoom and fit
    // ------------------------------------------------------------------

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    pub fn fit(&self) -> ViewportFit {
        self.fit
    }

    /// Fit the current artifact into a panel of the given size. Without a
    /// measurable artifact the previous fit stays in place.
    pub fn fit_to_viewport(&mut self, container_w: f64, container_h: f64) {
        let (w, h) = match &self.rendered {
            Some(r) => (r.width, r.height),
            None => return,
        };
        match fit(container_w, container_h, w, h) {
            Ok(computed) => self.fit = computed,
            Err(FitError::NoMeasurableContent) => {
                log::warn!("fit skipped: artifact has no measurable size");
            }
        }
    }

    pub fn reset_fit(&mut self) {
        self.fit = ViewportFit::IDENTITY;
    }

    /// CSS transform for the preview: the fit with the manual zoom
    /// compounded on top.
    pub fn preview_transform(&self) -> String {
        let z = self.zoom.level();
        let sx = self.fit.scale_x() * z;
        let sy = self.fit.scale_y() * z;
        if (sx - sy).abs() < f64::EPSILON {
            format!("scale({})", sx)
        } else {
            format!("scale({}, {})", sx, sy)
        }
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Load source from a `.mmd`/`.md`/text file.
    pub fn open_file(&mut self, path: &Path) -> Result<(), StudioError> {
        self.source = std::fs::read_to_string(path)?;
        self.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        self.current_example = None;
        Ok(())
    }

    /// File name used when saving without an explicit target: the opened
    /// file's name, or `diagram.mmd`.
    pub fn save_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("diagram.mmd")
    }

    /// Save the source to `target`, or to [`Self::save_file_name`] in the
    /// working directory when none is given. Returns the written path.
    pub fn save_source(&self, target: Option<&Path>) -> Result<PathBuf, StudioError> {
        let path = match target {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(self.save_file_name()),
        };
        std::fs::write(&path, &self.source)?;
        Ok(path)
    }

    /// Write the rendered SVG to `path`.
    pub fn export_svg(&self, path: &Path) -> Result<(), StudioError> {
        let rendered = self.rendered.as_ref().ok_or(StudioError::NothingToExport)?;
        std::fs::write(path, &rendered.svg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_default_example() {
        let studio = Studio::new();
        assert_eq!(studio.current_example(), Some("todo_app"));
        assert!(studio.source().starts_with("flowchart TD"));
        assert!(studio.artifact().is_none());
    }

    #[test]
    fn render_failure_keeps_previous_artifact() {
        let mut studio = Studio::new();
        assert!(studio.render());
        let first_svg = studio.artifact().unwrap().svg.clone();

        studio.set_source("gantt\n  title Timeline");
        assert!(!studio.render());
        assert_eq!(studio.artifact().unwrap().svg, first_svg);
        assert_eq!(
            studio.last_error(),
            Some("unsupported diagram type: gantt")
        );

        // A later successful render clears the error.
        studio.set_source("graph TD\n  A --> B");
        assert!(studio.render());
        assert!(studio.last_error().is_none());
    }

    #[test]
    fn loading_an_example_clears_the_file_name() {
        let mut studio = Studio::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.mmd");
        std::fs::write(&path, "graph LR\n  X --> Y").unwrap();

        studio.open_file(&path).unwrap();
        assert_eq!(studio.file_name(), Some("mine.mmd"));
        assert!(studio.current_example().is_none());

        studio.load_example("chat_application").unwrap();
        assert!(studio.file_name().is_none());
        assert_eq!(studio.current_example(), Some("chat_application"));
    }

    #[test]
    fn unknown_example_is_rejected() {
        let mut studio = Studio::new();
        assert!(matches!(
            studio.load_example("nope"),
            Err(StudioError::UnknownExample(_))
        ));
    }

    #[test]
    fn save_round_trips_the_source() {
        let mut studio = Studio::new();
        studio.set_source("graph TD\n  A --> B");
        let dir = tempfile::tempdir().unwrap();

        let target = dir.path().join(studio.save_file_name());
        let path = studio.save_source(Some(&target)).unwrap();
        assert!(path.ends_with("diagram.mmd"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "graph TD\n  A --> B"
        );

        let mut other = Studio::new();
        other.open_file(&path).unwrap();
        assert_eq!(other.source(), "graph TD\n  A --> B");
        // Saving again defaults to the opened name.
        let again = other
            .save_source(Some(&dir.path().join(other.save_file_name())))
            .unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn explicit_save_target_overrides_the_default_name() {
        let mut studio = Studio::new();
        studio.set_source("graph TD\n  A --> B");
        let dir = tempfile::tempdir().unwrap();

        let target = dir.path().join("renamed.mmd");
        let path = studio.save_source(Some(&target)).unwrap();
        assert_eq!(path, target);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "graph TD\n  A --> B"
        );
    }

    #[test]
    fn default_save_name_follows_the_opened_file() {
        let mut studio = Studio::new();
        assert_eq!(studio.save_file_name(), "diagram.mmd");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.mmd");
        std::fs::write(&path, "graph LR\n  X --> Y").unwrap();
        studio.open_file(&path).unwrap();
        assert_eq!(studio.save_file_name(), "mine.mmd");

        // Loading an example reverts to the default.
        studio.load_example("todo_app").unwrap();
        assert_eq!(studio.save_file_name(), "diagram.mmd");
    }

    #[test]
    fn export_requires_an_artifact() {
        let studio = Studio::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            studio.export_svg(&dir.path().join("out.svg")),
            Err(StudioError::NothingToExport)
        ));
    }

    #[test]
    fn export_writes_the_svg() {
        let mut studio = Studio::new();
        studio.render();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        studio.export_svg(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
        assert!(written.ends_with("</svg>"));
    }

    #[test]
    fn fit_then_zoom_compound_in_the_transform() {
        let mut studio = Studio::new();
        studio.render();
        studio.fit_to_viewport(1200.0, 900.0);
        studio.zoom_in();

        let transform = studio.preview_transform();
        assert!(transform.starts_with("scale("));
        assert_ne!(transform, "scale(1)");
    }

    #[test]
    fn fit_without_artifact_is_a_no_op() {
        let mut studio = Studio::new();
        studio.fit_to_viewport(800.0, 600.0);
        assert_eq!(studio.fit(), ViewportFit::IDENTITY);
    }
}
