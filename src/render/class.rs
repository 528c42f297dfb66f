//! Class diagram renderer: UML-style boxes in a grid, relationship lines
//! with kind-specific markers.

use super::styles::{
    estimate_text_width, ArrowHead, FontSizes, FontWeights, StrokeWidths, CANVAS_MARGIN,
};
use super::theme::{build_style_block, svg_open_tag, DiagramColors};
use super::{centered_text, escape_xml, fmt_num, halo_text, Rect, RenderedDiagram};
use crate::types::{ClassDiagram, ClassMember, ClassNode, RelationKind};
use std::collections::HashMap;

const TITLE_ROW: f64 = 28.0;
const MEMBER_ROW: f64 = 18.0;
const BOX_PAD_X: f64 = 12.0;
const BOX_PAD_Y: f64 = 6.0;
const BOX_MIN_WIDTH: f64 = 120.0;
const CELL_GAP: f64 = 64.0;

pub fn render(
    diagram: &ClassDiagram,
    colors: &DiagramColors,
    font: &str,
    transparent: bool,
) -> RenderedDiagram {
    let (rects, width, height) = layout(diagram);
    let by_id: HashMap<&str, usize> = diagram
        .classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();

    let mut parts: Vec<String> = Vec::new();
    parts.push(svg_open_tag(width, height, colors, transparent));
    parts.push(build_style_block(font));
    parts.push("<defs>".to_string());
    parts.push(marker_defs());
    parts.push("</defs>".to_string());

    // Relationship lines behind the boxes.
    for relation in &diagram.relations {
        let (fi, ti) = match (
            by_id.get(relation.from.as_str()),
            by_id.get(relation.to.as_str()),
        ) {
            (Some(&f), Some(&t)) => (f, t),
            _ => continue,
        };
        if fi == ti {
            continue;
        }
        parts.push(render_relation_line(&rects[fi], &rects[ti], relation.kind));

        let (x1, y1) = rects[fi].anchor_toward(rects[ti].cx(), rects[ti].cy());
        let (x2, y2) = rects[ti].anchor_toward(rects[fi].cx(), rects[fi].cy());
        if let Some(label) = &relation.label {
            parts.push(halo_text(
                (x1 + x2) / 2.0,
                (y1 + y2) / 2.0,
                FontSizes::EDGE_LABEL,
                FontWeights::EDGE_LABEL,
                "var(--muted)",
                label,
            ));
        }
        if let Some(card) = &relation.from_cardinality {
            parts.push(cardinality_text(x1, y1, x2, y2, card));
        }
        if let Some(card) = &relation.to_cardinality {
            parts.push(cardinality_text(x2, y2, x1, y1, card));
        }
    }

    // Class boxes.
    for (i, class) in diagram.classes.iter().enumerate() {
        parts.push(render_class_box(class, &rects[i]));
    }

    parts.push("</svg>".to_string());

    RenderedDiagram {
        svg: parts.join("\n"),
        width,
        height,
    }
}

// ============================================================================
// Layout
// ============================================================================

fn box_size(class: &ClassNode) -> (f64, f64) {
    let title_w = estimate_text_width(&class.id, FontSizes::TITLE, FontWeights::TITLE);
    let member_w = class
        .attributes
        .iter()
        .chain(class.methods.iter())
        .map(|m| {
            estimate_text_width(
                &format!("{}{}", m.visibility.marker(), m.signature),
                FontSizes::MEMBER,
                FontWeights::MEMBER,
            )
        })
        .fold(0.0, f64::max);

    let w = (title_w.max(member_w) + 2.0 * BOX_PAD_X).max(BOX_MIN_WIDTH);
    let member_rows = (class.attributes.len() + class.methods.len()) as f64;
    let h = TITLE_ROW + member_rows * MEMBER_ROW + 2.0 * BOX_PAD_Y;
    (w, h)
}

/// Near-square grid, row-major in declaration order.
fn layout(diagram: &ClassDiagram) -> (Vec<Rect>, f64, f64) {
    let n = diagram.classes.len();
    if n == 0 {
        return (Vec::new(), 2.0 * CANVAS_MARGIN, 2.0 * CANVAS_MARGIN);
    }

    let sizes: Vec<(f64, f64)> = diagram.classes.iter().map(box_size).collect();
    let columns = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(columns);

    let mut col_widths = vec![0.0f64; columns];
    let mut row_heights = vec![0.0f64; rows];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        col_widths[i % columns] = col_widths[i % columns].max(w);
        row_heights[i / columns] = row_heights[i / columns].max(h);
    }

    let mut col_offsets = Vec::with_capacity(columns);
    let mut cursor = CANVAS_MARGIN;
    for w in &col_widths {
        col_offsets.push(cursor);
        cursor += w + CELL_GAP;
    }
    let width = cursor - CELL_GAP + CANVAS_MARGIN;

    let mut row_offsets = Vec::with_capacity(rows);
    cursor = CANVAS_MARGIN;
    for h in &row_heights {
        row_offsets.push(cursor);
        cursor += h + CELL_GAP;
    }
    let height = cursor - CELL_GAP + CANVAS_MARGIN;

    let rects = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            let col = i % columns;
            let row = i / columns;
            Rect {
                x: col_offsets[col] + (col_widths[col] - w) / 2.0,
                y: row_offsets[row] + (row_heights[row] - h) / 2.0,
                w,
                h,
            }
        })
        .collect();

    (rects, width, height)
}

// ============================================================================
// SVG parts
// ============================================================================

fn marker_defs() -> String {
    let w = ArrowHead::WIDTH;
    let h = ArrowHead::HEIGHT;
    format!(
        r#"  <marker id="arrowhead" markerWidth="{w}" markerHeight="{h}" refX="{w}" refY="{half_h}" orient="auto">
    <polygon points="0 0, {w} {half_h}, 0 {h}" fill="var(--accent)" />
  </marker>
  <marker id="triangle" markerWidth="14" markerHeight="12" refX="14" refY="6" orient="auto">
    <polygon points="0 0, 14 6, 0 12" fill="var(--bg)" stroke="var(--line)" stroke-width="1" />
  </marker>
  <marker id="diamond-filled" markerWidth="16" markerHeight="10" refX="16" refY="5" orient="auto">
    <polygon points="0 5, 8 0, 16 5, 8 10" fill="var(--line)" />
  </marker>
  <marker id="diamond-open" markerWidth="16" markerHeight="10" refX="16" refY="5" orient="auto">
    <polygon points="0 5, 8 0, 16 5, 8 10" fill="var(--bg)" stroke="var(--line)" stroke-width="1" />
  </marker>"#,
        w = w,
        h = h,
        half_h = h / 2.0
    )
}

/// Line for one relationship. Inheritance-family markers sit at the `from`
/// end (`A <|-- B` points the triangle at A), arrow markers at the `to`
/// end.
fn render_relation_line(from: &Rect, to: &Rect, kind: RelationKind) -> String {
    let (fx, fy) = from.anchor_toward(to.cx(), to.cy());
    let (tx, ty) = to.anchor_toward(from.cx(), from.cy());

    let dashed = matches!(kind, RelationKind::Dependency | RelationKind::Realization);
    let dash = if dashed {
        r#" stroke-dasharray="5 3""#
    } else {
        ""
    };

    // (marker name, true when it belongs at the `from` end)
    let marker: Option<(&str, bool)> = match kind {
        RelationKind::Inheritance | RelationKind::Realization => Some(("triangle", true)),
        RelationKind::Composition => Some(("diamond-filled", true)),
        RelationKind::Aggregation => Some(("diamond-open", true)),
        RelationKind::Dependency => Some(("arrowhead", false)),
        RelationKind::Association => None,
    };

    // Draw toward the marker so marker-end orients correctly.
    let ((x1, y1), (x2, y2), marker_attr) = match marker {
        Some((name, true)) => (
            (tx, ty),
            (fx, fy),
            format!(r#" marker-end="url(#{})""#, name),
        ),
        Some((name, false)) => (
            (fx, fy),
            (tx, ty),
            format!(r#" marker-end="url(#{})""#, name),
        ),
        None => ((fx, fy), (tx, ty), String::new()),
    };

    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="var(--line)" stroke-width="{}"{}{} />"#,
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        fmt_num(StrokeWidths::CONNECTOR),
        dash,
        marker_attr
    )
}

/// Cardinality label near the (x, y) end, nudged toward the other end.
fn cardinality_text(x: f64, y: f64, other_x: f64, other_y: f64, text: &str) -> String {
    let dx = other_x - x;
    let dy = other_y - y;
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    halo_text(
        x + dx / len * 16.0,
        y + dy / len * 16.0 - 6.0,
        FontSizes::ANNOTATION,
        FontWeights::EDGE_LABEL,
        "var(--muted)",
        text,
    )
}

fn render_class_box(class: &ClassNode, rect: &Rect) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="var(--surface)" stroke="var(--border)" stroke-width="{}" />"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.w),
        fmt_num(rect.h),
        fmt_num(StrokeWidths::BOX)
    ));

    // Title band divider.
    parts.push(format!(
        r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="var(--border)" stroke-width="{}" />"#,
        fmt_num(rect.x),
        fmt_num(rect.x + rect.w),
        fmt_num(StrokeWidths::BOX),
        y = fmt_num(rect.y + TITLE_ROW)
    ));
    parts.push(centered_text(
        rect.cx(),
        rect.y + TITLE_ROW / 2.0,
        FontSizes::TITLE,
        FontWeights::TITLE,
        "var(--fg)",
        &class.id,
    ));

    let mut row_y = rect.y + TITLE_ROW + BOX_PAD_Y + MEMBER_ROW / 2.0;
    for member in class.attributes.iter().chain(class.methods.iter()) {
        parts.push(member_text(rect.x + BOX_PAD_X, row_y, member));
        row_y += MEMBER_ROW;
    }

    // Attribute/method divider when both sections exist.
    if !class.attributes.is_empty() && !class.methods.is_empty() {
        let y = rect.y
            + TITLE_ROW
            + BOX_PAD_Y
            + class.attributes.len() as f64 * MEMBER_ROW
            - 1.0;
        parts.push(format!(
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="var(--border)" stroke-width="0.5" />"#,
            fmt_num(rect.x),
            fmt_num(rect.x + rect.w),
            y = fmt_num(y)
        ));
    }

    parts.join("\n")
}

fn member_text(x: f64, y: f64, member: &ClassMember) -> String {
    format!(
        r#"<text x="{}" y="{}" dy="{}" font-size="{}" fill="var(--fg)">{}{}</text>"#,
        fmt_num(x),
        fmt_num(y),
        super::styles::TEXT_BASELINE_SHIFT,
        fmt_num(FontSizes::MEMBER),
        member.visibility.marker(),
        escape_xml(&member.signature)
    )
}
