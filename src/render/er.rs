//! ER diagram renderer: entity boxes in a grid, relationship lines with
//! textual cardinality pairs.

use super::styles::{
    estimate_text_width, FontSizes, FontWeights, StrokeWidths, CANVAS_MARGIN,
};
use super::theme::{build_style_block, svg_open_tag, DiagramColors};
use super::{centered_text, escape_xml, fmt_num, halo_text, Rect, RenderedDiagram};
use crate::types::{ErAttribute, ErDiagram, ErEntity};
use std::collections::HashMap;

const TITLE_ROW: f64 = 28.0;
const ATTR_ROW: f64 = 20.0;
const BOX_PAD_X: f64 = 12.0;
const BOX_MIN_WIDTH: f64 = 130.0;
const CELL_GAP: f64 = 72.0;
const KEY_BADGE_GAP: f64 = 10.0;

pub fn render(
    diagram: &ErDiagram,
    colors: &DiagramColors,
    font: &str,
    transparent: bool,
) -> RenderedDiagram {
    let (rects, width, height) = layout(diagram);
    let by_id: HashMap<&str, usize> = diagram
        .entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.as_str(), i))
        .collect();

    let mut parts: Vec<String> = Vec::new();
    parts.push(svg_open_tag(width, height, colors, transparent));
    parts.push(build_style_block(font));

    // Relationship lines behind the boxes.
    for relation in &diagram.relations {
        let (li, ri) = match (
            by_id.get(relation.left.as_str()),
            by_id.get(relation.right.as_str()),
        ) {
            (Some(&l), Some(&r)) => (l, r),
            _ => continue,
        };
        if li == ri {
            continue;
        }

        let (x1, y1) = rects[li].anchor_toward(rects[ri].cx(), rects[ri].cy());
        let (x2, y2) = rects[ri].anchor_toward(rects[li].cx(), rects[li].cy());

        let dash = if relation.identifying {
            ""
        } else {
            r#" stroke-dasharray="5 3""#
        };
        parts.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="var(--line)" stroke-width="{}"{} />"#,
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x2),
            fmt_num(y2),
            fmt_num(StrokeWidths::CONNECTOR),
            dash
        ));

        parts.push(halo_text(
            (x1 + x2) / 2.0,
            (y1 + y2) / 2.0,
            FontSizes::EDGE_LABEL,
            FontWeights::EDGE_LABEL,
            "var(--fg)",
            &relation.label,
        ));
        parts.push(cardinality_text(
            x1,
            y1,
            x2,
            y2,
            relation.left_cardinality.as_str(),
        ));
        parts.push(cardinality_text(
            x2,
            y2,
            x1,
            y1,
            relation.right_cardinality.as_str(),
        ));
    }

    // Entity boxes.
    for (i, entity) in diagram.entities.iter().enumerate() {
        parts.push(render_entity_box(entity, &rects[i]));
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

fn attribute_width(attr: &ErAttribute) -> f64 {
    let mut w = estimate_text_width(
        &format!("{} {}", attr.attr_type, attr.name),
        FontSizes::MEMBER,
        FontWeights::MEMBER,
    );
    for key in &attr.keys {
        w += KEY_BADGE_GAP
            + estimate_text_width(key.as_str(), FontSizes::ANNOTATION, FontWeights::TITLE);
    }
    w
}

fn box_size(entity: &ErEntity) -> (f64, f64) {
    let title_w = estimate_text_width(&entity.id, FontSizes::TITLE, FontWeights::TITLE);
    let attr_w = entity
        .attributes
        .iter()
        .map(attribute_width)
        .fold(0.0, f64::max);

    let w = (title_w.max(attr_w) + 2.0 * BOX_PAD_X).max(BOX_MIN_WIDTH);
    let h = TITLE_ROW + entity.attributes.len() as f64 * ATTR_ROW;
    (w, h)
}

/// Near-square grid, row-major in declaration order.
fn layout(diagram: &ErDiagram) -> (Vec<Rect>, f64, f64) {
    let n = diagram.entities.len();
    if n == 0 {
        return (Vec::new(), 2.0 * CANVAS_MARGIN, 2.0 * CANVAS_MARGIN);
    }

    let sizes: Vec<(f64, f64)> = diagram.entities.iter().map(box_size).collect();
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

/// Crow's-foot cardinality as text just outside the (x, y) line end.
fn cardinality_text(x: f64, y: f64, other_x: f64, other_y: f64, text: &str) -> String {
    let dx = other_x - x;
    let dy = other_y - y;
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    halo_text(
        x + dx / len * 14.0,
        y + dy / len * 14.0 - 7.0,
        FontSizes::ANNOTATION,
        FontWeights::EDGE_LABEL,
        "var(--muted)",
        text,
    )
}

fn render_entity_box(entity: &ErEntity, rect: &Rect) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="var(--bg)" stroke="var(--border)" stroke-width="{}" />"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.w),
        fmt_num(rect.h),
        fmt_num(StrokeWidths::BOX)
    ));

    // Filled header band with the entity name.
    parts.push(format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="var(--surface)" stroke="var(--border)" stroke-width="{}" />"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.w),
        fmt_num(TITLE_ROW),
        fmt_num(StrokeWidths::BOX)
    ));
    parts.push(centered_text(
        rect.cx(),
        rect.y + TITLE_ROW / 2.0,
        FontSizes::TITLE,
        FontWeights::TITLE,
        "var(--fg)",
        &entity.id,
    ));

    for (i, attr) in entity.attributes.iter().enumerate() {
        let row_y = rect.y + TITLE_ROW + (i as f64 + 0.5) * ATTR_ROW;
        parts.push(attribute_text(rect, row_y, attr));
        if i > 0 {
            let y = rect.y + TITLE_ROW + i as f64 * ATTR_ROW;
            parts.push(format!(
                r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="var(--border)" stroke-width="0.5" />"#,
                fmt_num(rect.x),
                fmt_num(rect.x + rect.w),
                y = fmt_num(y)
            ));
        }
    }

    parts.join("\n")
}

/// One attribute row: muted type, name, then right-aligned key badges.
fn attribute_text(rect: &Rect, y: f64, attr: &ErAttribute) -> String {
    let mut parts = vec![format!(
        r#"<text x="{}" y="{}" dy="{}" font-size="{}" fill="var(--fg)"><tspan fill="var(--muted)">{}</tspan> {}</text>"#,
        fmt_num(rect.x + BOX_PAD_X),
        fmt_num(y),
        super::styles::TEXT_BASELINE_SHIFT,
        fmt_num(FontSizes::MEMBER),
        escape_xml(&attr.attr_type),
        escape_xml(&attr.name)
    )];

    if !attr.keys.is_empty() {
        let badges = attr
            .keys
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        parts.push(format!(
            r#"<text x="{}" y="{}" dy="{}" text-anchor="end" font-size="{}" font-weight="{}" fill="var(--accent)">{}</text>"#,
            fmt_num(rect.x + rect.w - BOX_PAD_X),
            fmt_num(y),
            super::styles::TEXT_BASELINE_SHIFT,
            fmt_num(FontSizes::ANNOTATION),
            FontWeights::TITLE,
            badges
        ));
    }

    parts.join("\n")
}
