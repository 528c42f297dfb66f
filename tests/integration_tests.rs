//! Integration tests over the built-in example catalog.
//!
//! Each catalog example gets its own test function: the example is
//! rendered in both themes, the SVG is checked with a real XML parser,
//! and the result is fitted into a reference preview panel.

use mermview::render::{render, DiagramColors, Theme, DEFAULT_FONT};
use mermview::{catalog, fit, measure_svg, Studio};

const PANEL_W: f64 = 1280.0;
const PANEL_H: f64 = 800.0;

fn run_example_test(key: &str) {
    let example = catalog::find(key).unwrap_or_else(|| panic!("no catalog entry for {}", key));

    for theme in [Theme::Default, Theme::Dark] {
        let colors = DiagramColors::from_theme(theme);
        let rendered = render(example.source, &colors, DEFAULT_FONT, false)
            .unwrap_or_else(|e| panic!("{} failed to render ({}): {}", key, theme, e));

        assert!(
            rendered.width > 0.0 && rendered.height > 0.0,
            "{} has a degenerate canvas: {}x{}",
            key,
            rendered.width,
            rendered.height
        );

        // The markup must be well-formed XML rooted at <svg>.
        let doc = roxmltree::Document::parse(&rendered.svg)
            .unwrap_or_else(|e| panic!("{} produced invalid XML: {}", key, e));
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert!(root.has_attribute("viewBox"));

        // The declared size must round-trip through measurement.
        assert_eq!(
            measure_svg(&rendered.svg),
            Some((rendered.width, rendered.height)),
            "{} size does not match its markup",
            key
        );

        // Every example must fit into the reference panel.
        let fit = fit::fit(PANEL_W, PANEL_H, rendered.width, rendered.height)
            .unwrap_or_else(|e| panic!("{} did not fit: {}", key, e));
        assert!(fit.scale_x() >= fit::MIN_SCALE && fit.scale_x().is_finite());
        assert!(fit.scale_y() >= fit::MIN_SCALE && fit.scale_y().is_finite());
    }
}

macro_rules! example_test {
    ($name:ident) => {
        example_test!($name, stringify!($name));
    };
    ($name:ident, $key:expr) => {
        paste::paste! {
            #[test]
            fn [<example_ $name>]() {
                run_example_test($key);
            }
        }
    };
}

example_test!(todo_app);
example_test!(chat_application);
example_test!(ecommerce_platform, "e-commerce_platform");
example_test!(learning_management_system);
example_test!(cicd_pipeline, "ci/cd_pipeline");
example_test!(user_onboarding);
example_test!(order_processing);

// =============================================================================
// End-to-end viewer flows
// =============================================================================

#[test]
fn open_render_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("pipeline.mmd");
    std::fs::write(
        &source_path,
        catalog::find("ci/cd_pipeline").unwrap().source,
    )
    .unwrap();

    let mut studio = Studio::new();
    studio.open_file(&source_path).unwrap();
    assert_eq!(studio.file_name(), Some("pipeline.mmd"));
    assert!(studio.render(), "render failed: {:?}", studio.last_error());

    let svg_path = dir.path().join("pipeline.svg");
    studio.export_svg(&svg_path).unwrap();

    let exported = std::fs::read_to_string(&svg_path).unwrap();
    let artifact = studio.artifact().unwrap();
    assert_eq!(exported, artifact.svg);
    assert_eq!(
        measure_svg(&exported),
        Some((artifact.width, artifact.height))
    );
}

#[test]
fn fit_applies_to_the_preview_transform() {
    let mut studio = Studio::new();
    studio.load_example("chat_application").unwrap();
    assert!(studio.render());

    studio.fit_to_viewport(PANEL_W, PANEL_H);
    let transform = studio.preview_transform();
    assert!(transform.starts_with("scale("));

    // Reset restores the identity transform.
    studio.reset_fit();
    studio.reset_zoom();
    assert_eq!(studio.preview_transform(), "scale(1)");
}

#[test]
fn dark_theme_changes_the_palette() {
    let source = catalog::find("todo_app").unwrap().source;
    let light = mermview::render_to_svg(source, Theme::Default).unwrap();
    let dark = mermview::render_to_svg(source, Theme::Dark).unwrap();

    assert!(light.contains("--bg:#FFFFFF"));
    assert!(dark.contains("--bg:#333333"));
}
