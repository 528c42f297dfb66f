//! Flowchart and state diagram parsing.

use crate::error::RenderError;
use crate::types::{Direction, EdgeStyle, FlowEdge, FlowGraph, NodeShape};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_HEADER: Regex =
        Regex::new(r"(?i)^(?:graph|flowchart)\s+(TD|TB|LR|BT|RL)\s*$").unwrap();
    static ref RE_ARROW: Regex =
        Regex::new(r"^(-->|-\.->|==>|---)(?:\|([^|]*)\|)?").unwrap();

    // Node shapes, most specific delimiters first.
    static ref RE_STADIUM: Regex = Regex::new(r"^([\w-]+)\(\[(.+?)\]\)").unwrap();
    static ref RE_CIRCLE: Regex = Regex::new(r"^([\w-]+)\(\((.+?)\)\)").unwrap();
    static ref RE_RECT: Regex = Regex::new(r"^([\w-]+)\[(.+?)\]").unwrap();
    static ref RE_ROUND: Regex = Regex::new(r"^([\w-]+)\((.+?)\)").unwrap();
    static ref RE_DIAMOND: Regex = Regex::new(r"^([\w-]+)\{(.+?)\}").unwrap();
    static ref RE_ID: Regex = Regex::new(r"^([\w-]+)").unwrap();

    // State diagram lines.
    static ref RE_STATE_TRANS: Regex =
        Regex::new(r"^(\[\*\]|[\w-]+)\s*-->\s*(\[\*\]|[\w-]+)(?:\s*:\s*(.+))?$").unwrap();
    static ref RE_STATE_ALIAS: Regex =
        Regex::new(r#"^state\s+"([^"]+)"\s+as\s+([\w-]+)\s*$"#).unwrap();
    static ref RE_STATE_BLOCK: Regex =
        Regex::new(r#"^state\s+(?:"[^"]+"\s+as\s+)?([\w-]+)\s*\{$"#).unwrap();
}

/// Parse `graph TD` / `flowchart LR` style diagrams.
pub fn parse_flowchart(lines: &[&str]) -> Result<FlowGraph, RenderError> {
    let caps = RE_HEADER.captures(lines[0]).ok_or_else(|| {
        RenderError::Parse(format!(
            "invalid flowchart header: \"{}\" (expected e.g. \"graph TD\" or \"flowchart LR\")",
            lines[0]
        ))
    })?;
    // RE_HEADER restricts the capture to the valid direction tokens.
    let direction = Direction::parse(&caps[1]).unwrap_or(Direction::TD);

    let mut graph = FlowGraph::new(direction);

    for line in lines.iter().skip(1) {
        // Subgraph grouping carries no layout weight here.
        if line.starts_with("subgraph") || *line == "end" {
            log::debug!("ignoring subgraph line: {}", line);
            continue;
        }
        parse_chain(line, &mut graph);
    }

    Ok(graph)
}

/// Parse a node/edge chain like `A[Start] -->|yes| B{Choice} --> C`.
fn parse_chain(line: &str, graph: &mut FlowGraph) {
    let mut rest = line;

    let mut prev = match take_node(&mut rest, graph) {
        Some(id) => id,
        None => {
            log::debug!("skipping unrecognized flowchart line: {}", line);
            return;
        }
    };

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let (style, label, consumed) = match take_arrow(rest) {
            Some(parts) => parts,
            None => {
                log::debug!("skipping trailing flowchart tokens: {}", rest);
                break;
            }
        };
        rest = rest[consumed..].trim_start();

        let next = match take_node(&mut rest, graph) {
            Some(id) => id,
            None => {
                log::debug!("edge without target in line: {}", line);
                break;
            }
        };

        graph.edges.push(FlowEdge {
            source: prev,
            target: next.clone(),
            label,
            style,
        });
        prev = next;
    }
}

/// Consume one node (with optional shape brackets) from the front of `rest`.
fn take_node(rest: &mut &str, graph: &mut FlowGraph) -> Option<String> {
    let shaped = [
        (&*RE_STADIUM, NodeShape::Stadium),
        (&*RE_CIRCLE, NodeShape::Circle),
        (&*RE_RECT, NodeShape::Rectangle),
        (&*RE_ROUND, NodeShape::Rounded),
        (&*RE_DIAMOND, NodeShape::Diamond),
    ];

    for (re, shape) in shaped {
        if let Some(caps) = re.captures(rest) {
            let id = caps[1].to_string();
            let label = caps[2].trim().to_string();
            graph.upsert_node(&id, label, shape, true);
            *rest = &rest[caps[0].len()..];
            return Some(id);
        }
    }

    if let Some(caps) = RE_ID.captures(rest) {
        let id = caps[1].to_string();
        graph.upsert_node(&id, id.clone(), NodeShape::Rectangle, false);
        *rest = &rest[caps[0].len()..];
        return Some(id);
    }

    None
}

/// Consume an arrow (and optional `|label|`) from the front of `rest`.
fn take_arrow(rest: &str) -> Option<(EdgeStyle, Option<String>, usize)> {
    let caps = RE_ARROW.captures(rest)?;
    let style = match &caps[1] {
        "-.->" => EdgeStyle::Dotted,
        "==>" => EdgeStyle::Thick,
        _ => EdgeStyle::Solid,
    };
    let label = caps.get(2).map(|m| m.as_str().trim().to_string());
    Some((style, label, caps[0].len()))
}

/// Parse `stateDiagram-v2` into a flattened top-down flow graph. Composite
/// state blocks contribute their transitions; the grouping itself is
/// dropped. Each `[*]` occurrence becomes its own start or end pseudostate.
pub fn parse_state(lines: &[&str]) -> FlowGraph {
    let mut graph = FlowGraph::new(Direction::TD);
    let mut start_count = 0usize;
    let mut end_count = 0usize;

    for line in lines.iter().skip(1) {
        if let Some(caps) = RE_STATE_ALIAS.captures(line) {
            let label = caps[1].to_string();
            graph.upsert_node(&caps[2], label, NodeShape::Rounded, true);
            continue;
        }
        if RE_STATE_BLOCK.is_match(line) || *line == "}" {
            log::debug!("flattening composite state line: {}", line);
            continue;
        }
        if let Some(caps) = RE_STATE_TRANS.captures(line) {
            let source = state_endpoint(&caps[1], &mut graph, &mut start_count, true);
            let target = state_endpoint(&caps[2], &mut graph, &mut end_count, false);
            let label = caps.get(3).map(|m| m.as_str().trim().to_string());
            graph.edges.push(FlowEdge {
                source,
                target,
                label,
                style: EdgeStyle::Solid,
            });
            continue;
        }
        log::debug!("skipping unrecognized state line: {}", line);
    }

    graph
}

fn state_endpoint(
    token: &str,
    graph: &mut FlowGraph,
    pseudo_count: &mut usize,
    is_source: bool,
) -> String {
    if token == "[*]" {
        *pseudo_count += 1;
        let (id, shape) = if is_source {
            (format!("__start{}", pseudo_count), NodeShape::StateStart)
        } else {
            (format!("__end{}", pseudo_count), NodeShape::StateEnd)
        };
        graph.upsert_node(&id, String::new(), shape, true);
        id
    } else {
        graph.upsert_node(token, token.to_string(), NodeShape::Rounded, false);
        token.to_string()
    }
}
