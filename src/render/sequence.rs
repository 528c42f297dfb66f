//! Sequence diagram renderer: participant boxes across the top, lifelines,
//! messages and notes stacked in event order.

use super::styles::{
    estimate_text_width, ArrowHead, FontSizes, FontWeights, StrokeWidths, CANVAS_MARGIN,
};
use super::theme::{build_style_block, svg_open_tag, DiagramColors};
use super::{centered_text, fmt_num, halo_text, RenderedDiagram};
use crate::types::{ArrowLine, NotePlacement, SequenceDiagram, SequenceEvent};
use std::collections::HashMap;

const ACTOR_BOX_HEIGHT: f64 = 34.0;
const ACTOR_GAP: f64 = 48.0;
const ACTOR_MIN_WIDTH: f64 = 80.0;
const EVENT_SPACING: f64 = 44.0;
const NOTE_PAD_X: f64 = 10.0;
const NOTE_HEIGHT: f64 = 28.0;
const SELF_MESSAGE_REACH: f64 = 34.0;
const TAIL: f64 = 16.0;

pub fn render(
    diagram: &SequenceDiagram,
    colors: &DiagramColors,
    font: &str,
    transparent: bool,
) -> RenderedDiagram {
    // Lifeline x positions, in participant order.
    let mut centers: Vec<f64> = Vec::with_capacity(diagram.participants.len());
    let mut cursor = CANVAS_MARGIN;
    let mut box_widths: Vec<f64> = Vec::with_capacity(diagram.participants.len());
    for participant in &diagram.participants {
        let w = (estimate_text_width(&participant.label, FontSizes::TITLE, FontWeights::TITLE)
            + 24.0)
            .max(ACTOR_MIN_WIDTH);
        centers.push(cursor + w / 2.0);
        box_widths.push(w);
        cursor += w + ACTOR_GAP;
    }
    let width = if diagram.participants.is_empty() {
        2.0 * CANVAS_MARGIN
    } else {
        cursor - ACTOR_GAP + CANVAS_MARGIN
    };

    let center_of: HashMap<&str, f64> = diagram
        .participants
        .iter()
        .zip(centers.iter())
        .map(|(p, &c)| (p.id.as_str(), c))
        .collect();

    let lifeline_top = CANVAS_MARGIN + ACTOR_BOX_HEIGHT;
    let events_height = diagram.events.len() as f64 * EVENT_SPACING;
    let lifeline_bottom = lifeline_top + events_height + TAIL;
    let height = lifeline_bottom + CANVAS_MARGIN;

    let mut parts: Vec<String> = Vec::new();
    parts.push(svg_open_tag(width, height, colors, transparent));
    parts.push(build_style_block(font));
    parts.push("<defs>".to_string());
    parts.push(marker_defs());
    parts.push("</defs>".to_string());

    // Lifelines behind everything else.
    for &cx in &centers {
        parts.push(format!(
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="var(--line)" stroke-width="{}" stroke-dasharray="3 3" />"#,
            fmt_num(lifeline_top),
            fmt_num(lifeline_bottom),
            fmt_num(StrokeWidths::LIFELINE),
            x = fmt_num(cx),
        ));
    }

    // Participant boxes.
    for (i, participant) in diagram.participants.iter().enumerate() {
        let x = centers[i] - box_widths[i] / 2.0;
        parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="var(--surface)" stroke="var(--border)" stroke-width="{}" />"#,
            fmt_num(x),
            fmt_num(CANVAS_MARGIN),
            fmt_num(box_widths[i]),
            fmt_num(ACTOR_BOX_HEIGHT),
            fmt_num(StrokeWidths::BOX)
        ));
        parts.push(centered_text(
            centers[i],
            CANVAS_MARGIN + ACTOR_BOX_HEIGHT / 2.0,
            FontSizes::TITLE,
            FontWeights::TITLE,
            "var(--fg)",
            &participant.label,
        ));
    }

    // Events, top to bottom.
    for (i, event) in diagram.events.iter().enumerate() {
        let y = lifeline_top + (i as f64 + 0.5) * EVENT_SPACING;
        match event {
            SequenceEvent::Message(message) => {
                let (from_x, to_x) = match (
                    center_of.get(message.from.as_str()),
                    center_of.get(message.to.as_str()),
                ) {
                    (Some(&a), Some(&b)) => (a, b),
                    _ => continue,
                };
                parts.push(render_message_line(
                    from_x,
                    to_x,
                    y,
                    message.line,
                    message.open_arrow,
                ));
                let label_x = if (from_x - to_x).abs() < f64::EPSILON {
                    from_x + SELF_MESSAGE_REACH + 8.0
                } else {
                    (from_x + to_x) / 2.0
                };
                parts.push(halo_text(
                    label_x,
                    y - 12.0,
                    FontSizes::EDGE_LABEL,
                    FontWeights::EDGE_LABEL,
                    "var(--fg)",
                    &message.label,
                ));
            }
            SequenceEvent::Note {
                placement,
                participants,
                text,
            } => {
                let involved: Vec<f64> = participants
                    .iter()
                    .filter_map(|id| center_of.get(id.as_str()).copied())
                    .collect();
                if involved.is_empty() {
                    continue;
                }
                parts.push(render_note(*placement, &involved, text, y));
            }
        }
    }

    parts.push("</svg>".to_string());

    RenderedDiagram {
        svg: parts.join("\n"),
        width,
        height,
    }
}

fn marker_defs() -> String {
    let w = ArrowHead::WIDTH;
    let h = ArrowHead::HEIGHT;
    format!(
        r#"  <marker id="arrowhead" markerWidth="{w}" markerHeight="{h}" refX="{w}" refY="{half_h}" orient="auto">
    <polygon points="0 0, {w} {half_h}, 0 {h}" fill="var(--accent)" />
  </marker>
  <marker id="arrowopen" markerWidth="{w}" markerHeight="{h}" refX="{w}" refY="{half_h}" orient="auto">
    <polyline points="0 0, {w} {half_h}, 0 {h}" fill="none" stroke="var(--accent)" stroke-width="1" />
  </marker>"#,
        w = w,
        h = h,
        half_h = h / 2.0
    )
}

fn render_message_line(from_x: f64, to_x: f64, y: f64, line: ArrowLine, open_arrow: bool) -> String {
    let dash = match line {
        ArrowLine::Dashed => r#" stroke-dasharray="5 3""#,
        ArrowLine::Solid => "",
    };
    let marker = if open_arrow { "arrowopen" } else { "arrowhead" };

    if (from_x - to_x).abs() < f64::EPSILON {
        // Self message: out to the right and back.
        return format!(
            r#"<polyline points="{},{} {},{} {},{}" fill="none" stroke="var(--line)" stroke-width="{}"{} marker-end="url(#{})" />"#,
            fmt_num(from_x),
            fmt_num(y - 5.0),
            fmt_num(from_x + SELF_MESSAGE_REACH),
            fmt_num(y),
            fmt_num(from_x),
            fmt_num(y + 5.0),
            fmt_num(StrokeWidths::CONNECTOR),
            dash,
            marker
        );
    }

    format!(
        r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="var(--line)" stroke-width="{}"{} marker-end="url(#{})" />"#,
        fmt_num(from_x),
        fmt_num(to_x),
        fmt_num(StrokeWidths::CONNECTOR),
        dash,
        marker,
        y = fmt_num(y)
    )
}

fn render_note(placement: NotePlacement, centers: &[f64], text: &str, y: f64) -> String {
    let text_w = estimate_text_width(text, FontSizes::EDGE_LABEL, FontWeights::EDGE_LABEL);
    let min = centers.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = centers.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let (x, w) = match placement {
        NotePlacement::Over => {
            let span = (max - min).max(text_w) + 2.0 * NOTE_PAD_X;
            ((min + max) / 2.0 - span / 2.0, span)
        }
        NotePlacement::LeftOf => {
            let w = text_w + 2.0 * NOTE_PAD_X;
            (min - w - 8.0, w)
        }
        NotePlacement::RightOf => (max + 8.0, text_w + 2.0 * NOTE_PAD_X),
    };

    let rect = format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="2" fill="var(--surface)" stroke="var(--border)" stroke-width="{}" />"#,
        fmt_num(x),
        fmt_num(y - NOTE_HEIGHT / 2.0),
        fmt_num(w),
        fmt_num(NOTE_HEIGHT),
        fmt_num(StrokeWidths::BOX)
    );
    let label = centered_text(
        x + w / 2.0,
        y,
        FontSizes::EDGE_LABEL,
        FontWeights::EDGE_LABEL,
        "var(--fg)",
        text,
    );
    format!("{}\n{}", rect, label)
}
