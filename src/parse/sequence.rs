//! Sequence diagram parsing.

use crate::types::{
    ArrowLine, NotePlacement, Participant, SeqMessage, SequenceDiagram, SequenceEvent,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_PARTICIPANT: Regex =
        Regex::new(r"^(participant|actor)\s+([\w-]+)(?:\s+as\s+(.+))?$").unwrap();
    static ref RE_MESSAGE: Regex =
        Regex::new(r"^([\w-]+)\s*(-->>|->>|-->|->)\s*([\w-]+)\s*:\s*(.+)$").unwrap();
    static ref RE_NOTE: Regex =
        Regex::new(r"(?i)^note\s+(over|left of|right of)\s+([\w, -]+?)\s*:\s*(.+)$").unwrap();
}

/// Parse a `sequenceDiagram` body. Unrecognized lines (activations, blocks)
/// are skipped.
pub fn parse_sequence(lines: &[&str]) -> SequenceDiagram {
    let mut diagram = SequenceDiagram::default();

    for line in lines.iter().skip(1) {
        if let Some(caps) = RE_PARTICIPANT.captures(line) {
            let id = caps[2].to_string();
            let label = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| id.clone());
            let is_actor = &caps[1] == "actor";

            if let Some(existing) = diagram.participants.iter_mut().find(|p| p.id == id) {
                existing.label = label;
                existing.is_actor = is_actor;
            } else {
                diagram.participants.push(Participant {
                    id,
                    label,
                    is_actor,
                });
            }
            continue;
        }

        if let Some(caps) = RE_MESSAGE.captures(line) {
            let from = caps[1].to_string();
            let to = caps[3].to_string();
            diagram.ensure_participant(&from);
            diagram.ensure_participant(&to);

            let arrow = &caps[2];
            diagram.events.push(SequenceEvent::Message(SeqMessage {
                from,
                to,
                label: caps[4].trim().to_string(),
                line: if arrow.starts_with("--") {
                    ArrowLine::Dashed
                } else {
                    ArrowLine::Solid
                },
                open_arrow: !arrow.ends_with(">>"),
            }));
            continue;
        }

        if let Some(caps) = RE_NOTE.captures(line) {
            let placement = match caps[1].to_lowercase().as_str() {
                "left of" => NotePlacement::LeftOf,
                "right of" => NotePlacement::RightOf,
                _ => NotePlacement::Over,
            };
            let participants: Vec<String> = caps[2]
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            for id in &participants {
                diagram.ensure_participant(id);
            }
            diagram.events.push(SequenceEvent::Note {
                placement,
                participants,
                text: caps[3].trim().to_string(),
            });
            continue;
        }

        log::debug!("skipping unrecognized sequence line: {}", line);
    }

    diagram
}
