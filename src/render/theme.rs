//! Theme configuration: named color sets exposed to the SVG as CSS custom
//! properties on the root element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in themes, mirroring the Mermaid theme names the viewer offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light theme (white background, dark text).
    #[default]
    Default,
    /// Dark theme.
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Default,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Default => write!(f, "default"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Concrete color set for one theme. Each field becomes a CSS variable on
/// the SVG root (`--bg`, `--fg`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramColors {
    /// Background.
    pub bg: String,
    /// Primary text.
    pub fg: String,
    /// Edges and connectors.
    pub line: String,
    /// Arrow heads and highlights.
    pub accent: String,
    /// Secondary text: edge labels, cardinalities.
    pub muted: String,
    /// Node and note fills.
    pub surface: String,
    /// Node strokes.
    pub border: String,
}

impl Default for DiagramColors {
    fn default() -> Self {
        Self::from_theme(Theme::Default)
    }
}

impl DiagramColors {
    /// Color values follow Mermaid's stock `default` and `dark` themes.
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Default => Self {
                bg: "#FFFFFF".to_string(),
                fg: "#333333".to_string(),
                line: "#333333".to_string(),
                accent: "#333333".to_string(),
                muted: "#666666".to_string(),
                surface: "#ECECFF".to_string(),
                border: "#9370DB".to_string(),
            },
            Theme::Dark => Self {
                bg: "#333333".to_string(),
                fg: "#CCCCCC".to_string(),
                line: "#AAAAAA".to_string(),
                accent: "#CCCCCC".to_string(),
                muted: "#888888".to_string(),
                surface: "#1F2020".to_string(),
                border: "#CCCCCC".to_string(),
            },
        }
    }

    fn css_vars(&self) -> String {
        format!(
            "--bg:{};--fg:{};--line:{};--accent:{};--muted:{};--surface:{};--border:{}",
            self.bg, self.fg, self.line, self.accent, self.muted, self.surface, self.border
        )
    }
}

/// Build the `<svg>` opening tag: viewBox, explicit pixel dimensions, and
/// the theme variables as inline style.
pub fn svg_open_tag(width: f64, height: f64, colors: &DiagramColors, transparent: bool) -> String {
    let bg_style = if transparent {
        ""
    } else {
        ";background:var(--bg)"
    };
    let w = super::fmt_num(width);
    let h = super::fmt_num(height);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="{}{}">"#,
        w,
        h,
        w,
        h,
        colors.css_vars(),
        bg_style
    )
}

/// Build the `<style>` block with the font import and base text styling.
pub fn build_style_block(font: &str) -> String {
    let font_encoded = font.replace(' ', "%20");
    format!(
        r#"<style>
  @import url('https://fonts.googleapis.com/css2?family={}:wght@400;500;600;700&amp;display=swap');
  text {{ font-family: '{}', system-ui, sans-serif; }}
</style>"#,
        font_encoded, font
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parse_defaults_to_light() {
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("DARK "), Theme::Dark);
        assert_eq!(Theme::parse("default"), Theme::Default);
        assert_eq!(Theme::parse("whatever"), Theme::Default);
    }

    #[test]
    fn open_tag_carries_dimensions_and_vars() {
        let tag = svg_open_tag(320.0, 240.5, &DiagramColors::default(), false);
        assert!(tag.contains(r#"viewBox="0 0 320 240.5""#));
        assert!(tag.contains(r#"width="320""#));
        assert!(tag.contains("--bg:#FFFFFF"));
        assert!(tag.contains("background:var(--bg)"));
    }

    #[test]
    fn transparent_omits_background() {
        let tag = svg_open_tag(100.0, 100.0, &DiagramColors::default(), true);
        assert!(!tag.contains("background:"));
    }
}
