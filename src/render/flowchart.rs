//! Flowchart / state diagram renderer: layered rank layout along the
//! declared direction, straight connectors between box borders.

use super::styles::{
    estimate_text_width, ArrowHead, FontSizes, FontWeights, StrokeWidths, CANVAS_MARGIN,
};
use super::theme::{build_style_block, svg_open_tag, DiagramColors};
use super::{centered_text, fmt_num, halo_text, Rect, RenderedDiagram};
use crate::types::{EdgeStyle, FlowGraph, NodeShape};
use std::collections::{HashMap, VecDeque};

const RANK_GAP: f64 = 56.0;
const NODE_GAP: f64 = 40.0;
const NODE_HEIGHT: f64 = 36.0;
const NODE_PAD_X: f64 = 14.0;
const NODE_MIN_WIDTH: f64 = 60.0;
const DIAMOND_HEIGHT: f64 = 48.0;
const PSEUDOSTATE_SIZE: f64 = 14.0;
const SELF_LOOP_REACH: f64 = 22.0;

pub fn render(
    graph: &FlowGraph,
    colors: &DiagramColors,
    font: &str,
    transparent: bool,
) -> RenderedDiagram {
    let (rects, width, height) = layout(graph);
    let by_id: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut parts: Vec<String> = Vec::new();
    parts.push(svg_open_tag(width, height, colors, transparent));
    parts.push(build_style_block(font));
    parts.push("<defs>".to_string());
    parts.push(arrow_marker_defs());
    parts.push("</defs>".to_string());

    // Connectors behind nodes.
    for edge in &graph.edges {
        let (si, ti) = match (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) {
            (Some(&s), Some(&t)) => (s, t),
            _ => continue,
        };
        parts.push(render_edge_line(&rects[si], &rects[ti], si == ti, edge.style));
    }

    // Connector labels above the lines.
    for edge in &graph.edges {
        let label = match &edge.label {
            Some(l) if !l.is_empty() => l,
            _ => continue,
        };
        let (si, ti) = match (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) {
            (Some(&s), Some(&t)) => (s, t),
            _ => continue,
        };
        let (mx, my) = edge_midpoint(&rects[si], &rects[ti], si == ti);
        parts.push(halo_text(
            mx,
            my,
            FontSizes::EDGE_LABEL,
            FontWeights::EDGE_LABEL,
            "var(--muted)",
            label,
        ));
    }

    // Node shapes, then labels.
    for (i, node) in graph.nodes.iter().enumerate() {
        parts.push(render_node_shape(node.shape, &rects[i]));
    }
    for (i, node) in graph.nodes.iter().enumerate() {
        if node.label.is_empty() {
            continue;
        }
        parts.push(centered_text(
            rects[i].cx(),
            rects[i].cy(),
            FontSizes::NODE_LABEL,
            FontWeights::NODE_LABEL,
            "var(--fg)",
            &node.label,
        ));
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

fn node_size(shape: NodeShape, label: &str) -> (f64, f64) {
    let text_w = estimate_text_width(label, FontSizes::NODE_LABEL, FontWeights::NODE_LABEL);
    match shape {
        NodeShape::StateStart | NodeShape::StateEnd => (PSEUDOSTATE_SIZE, PSEUDOSTATE_SIZE),
        NodeShape::Circle => {
            let d = (text_w + 16.0).max(44.0);
            (d, d)
        }
        NodeShape::Diamond => ((text_w * 1.6 + 24.0).max(70.0), DIAMOND_HEIGHT),
        _ => ((text_w + 2.0 * NODE_PAD_X).max(NODE_MIN_WIDTH), NODE_HEIGHT),
    }
}

/// BFS rank assignment from the in-degree-zero sources; cycle-only or
/// disconnected components seed fresh BFS runs at rank zero.
fn assign_ranks(graph: &FlowGraph) -> Vec<usize> {
    let n = graph.nodes.len();
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for edge in &graph.edges {
        if let (Some(&s), Some(&t)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            if s != t {
                adjacency[s].push(t);
                indegree[t] += 1;
            }
        }
    }

    let mut rank = vec![usize::MAX; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for i in 0..n {
        if indegree[i] == 0 {
            rank[i] = 0;
            queue.push_back(i);
        }
    }

    loop {
        while let Some(i) = queue.pop_front() {
            for &t in &adjacency[i] {
                if rank[t] == usize::MAX {
                    rank[t] = rank[i] + 1;
                    queue.push_back(t);
                }
            }
        }
        match (0..n).find(|&i| rank[i] == usize::MAX) {
            Some(i) => {
                rank[i] = 0;
                queue.push_back(i);
            }
            None => break,
        }
    }

    rank
}

/// Returns a rect per node (same order) plus the canvas size.
fn layout(graph: &FlowGraph) -> (Vec<Rect>, f64, f64) {
    let n = graph.nodes.len();
    if n == 0 {
        return (Vec::new(), 2.0 * CANVAS_MARGIN, 2.0 * CANVAS_MARGIN);
    }

    let horizontal = graph.direction.is_horizontal();
    let reversed = graph.direction.is_reversed();

    let sizes: Vec<(f64, f64)> = graph
        .nodes
        .iter()
        .map(|node| node_size(node.shape, &node.label))
        .collect();
    // Extent along the rank axis / across it, per node.
    let along = |i: usize| if horizontal { sizes[i].0 } else { sizes[i].1 };
    let across = |i: usize| if horizontal { sizes[i].1 } else { sizes[i].0 };

    let ranks = assign_ranks(graph);
    let rank_count = ranks.iter().max().copied().unwrap_or(0) + 1;
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for (i, &r) in ranks.iter().enumerate() {
        groups[r].push(i);
    }

    let rank_extents: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().map(|&i| along(i)).fold(0.0, f64::max))
        .collect();
    let mut rank_positions = Vec::with_capacity(rank_count);
    let mut cursor = 0.0;
    for extent in &rank_extents {
        rank_positions.push(cursor);
        cursor += extent + RANK_GAP;
    }
    let rank_span = cursor - RANK_GAP;

    let cross_totals: Vec<f64> = groups
        .iter()
        .map(|g| {
            let widths: f64 = g.iter().map(|&i| across(i)).sum();
            widths + NODE_GAP * (g.len().saturating_sub(1)) as f64
        })
        .collect();
    let cross_span = cross_totals.iter().fold(0.0, |a: f64, &b| a.max(b));

    let mut rects = vec![
        Rect {
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
        };
        n
    ];
    for (r, group) in groups.iter().enumerate() {
        let rank_coord = if reversed {
            rank_span - rank_positions[r] - rank_extents[r]
        } else {
            rank_positions[r]
        };
        let mut cross_cursor = (cross_span - cross_totals[r]) / 2.0;
        for &i in group {
            let centering = (rank_extents[r] - along(i)) / 2.0;
            let (x, y) = if horizontal {
                (
                    CANVAS_MARGIN + rank_coord + centering,
                    CANVAS_MARGIN + cross_cursor,
                )
            } else {
                (
                    CANVAS_MARGIN + cross_cursor,
                    CANVAS_MARGIN + rank_coord + centering,
                )
            };
            rects[i] = Rect {
                x,
                y,
                w: sizes[i].0,
                h: sizes[i].1,
            };
            cross_cursor += across(i) + NODE_GAP;
        }
    }

    let (width, height) = if horizontal {
        (
            rank_span + 2.0 * CANVAS_MARGIN,
            cross_span + 2.0 * CANVAS_MARGIN,
        )
    } else {
        (
            cross_span + 2.0 * CANVAS_MARGIN,
            rank_span + 2.0 * CANVAS_MARGIN,
        )
    };
    (rects, width, height)
}

// ============================================================================
// SVG parts
// ============================================================================

fn arrow_marker_defs() -> String {
    let w = ArrowHead::WIDTH;
    let h = ArrowHead::HEIGHT;
    format!(
        r#"  <marker id="arrowhead" markerWidth="{w}" markerHeight="{h}" refX="{w}" refY="{half_h}" orient="auto">
    <polygon points="0 0, {w} {half_h}, 0 {h}" fill="var(--accent)" />
  </marker>"#,
        w = w,
        h = h,
        half_h = h / 2.0
    )
}

fn render_edge_line(source: &Rect, target: &Rect, self_loop: bool, style: EdgeStyle) -> String {
    let dash = match style {
        EdgeStyle::Dotted => r#" stroke-dasharray="4 3""#,
        _ => "",
    };
    let stroke_width = match style {
        EdgeStyle::Thick => 2.0,
        _ => StrokeWidths::CONNECTOR,
    };

    if self_loop {
        // Self transition: a short loop out the right side.
        let x = source.x + source.w;
        let cy = source.cy();
        return format!(
            r#"<polyline points="{},{} {},{} {},{}" fill="none" stroke="var(--line)" stroke-width="{}"{} marker-end="url(#arrowhead)" />"#,
            fmt_num(x),
            fmt_num(cy - 6.0),
            fmt_num(x + SELF_LOOP_REACH),
            fmt_num(cy),
            fmt_num(x),
            fmt_num(cy + 6.0),
            fmt_num(stroke_width),
            dash
        );
    }

    let (x1, y1) = source.anchor_toward(target.cx(), target.cy());
    let (x2, y2) = target.anchor_toward(source.cx(), source.cy());
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="var(--line)" stroke-width="{}"{} marker-end="url(#arrowhead)" />"#,
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        fmt_num(stroke_width),
        dash
    )
}

fn edge_midpoint(source: &Rect, target: &Rect, self_loop: bool) -> (f64, f64) {
    if self_loop {
        return (source.x + source.w + SELF_LOOP_REACH + 8.0, source.cy());
    }
    let (x1, y1) = source.anchor_toward(target.cx(), target.cy());
    let (x2, y2) = target.anchor_toward(source.cx(), source.cy());
    ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
}

fn render_node_shape(shape: NodeShape, rect: &Rect) -> String {
    let fill = "var(--surface)";
    let stroke = "var(--border)";
    let sw = StrokeWidths::BOX;
    match shape {
        NodeShape::Rectangle | NodeShape::Rounded | NodeShape::Stadium => {
            let rx = match shape {
                NodeShape::Rounded => 8.0,
                NodeShape::Stadium => rect.h / 2.0,
                _ => 0.0,
            };
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
                fmt_num(rect.x),
                fmt_num(rect.y),
                fmt_num(rect.w),
                fmt_num(rect.h),
                fmt_num(rx),
                fill,
                stroke,
                fmt_num(sw)
            )
        }
        NodeShape::Circle => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            fmt_num(rect.cx()),
            fmt_num(rect.cy()),
            fmt_num(rect.w / 2.0),
            fill,
            stroke,
            fmt_num(sw)
        ),
        NodeShape::Diamond => format!(
            r#"<polygon points="{},{} {},{} {},{} {},{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            fmt_num(rect.cx()),
            fmt_num(rect.y),
            fmt_num(rect.x + rect.w),
            fmt_num(rect.cy()),
            fmt_num(rect.cx()),
            fmt_num(rect.y + rect.h),
            fmt_num(rect.x),
            fmt_num(rect.cy()),
            fill,
            stroke,
            fmt_num(sw)
        ),
        NodeShape::StateStart => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="var(--line)" />"#,
            fmt_num(rect.cx()),
            fmt_num(rect.cy()),
            fmt_num(rect.w / 2.0)
        ),
        NodeShape::StateEnd => format!(
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="var(--line)" stroke-width="1.5" /><circle cx="{cx}" cy="{cy}" r="{ri}" fill="var(--line)" />"#,
            cx = fmt_num(rect.cx()),
            cy = fmt_num(rect.cy()),
            r = fmt_num(rect.w / 2.0),
            ri = fmt_num(rect.w / 4.0)
        ),
    }
}
