//! Mermaid source parsing: header dispatch plus per-type parsers.
//!
//! Parsing is lenient the way Mermaid itself is in practice: a malformed
//! body line is skipped (with a debug log), only an unusable header fails
//! the whole parse.

pub mod class;
pub mod er;
pub mod flowchart;
pub mod sequence;

use crate::error::RenderError;
use crate::types::Diagram;

/// Parse Mermaid diagram text into one of the supported diagram types.
pub fn parse(source: &str) -> Result<Diagram, RenderError> {
    let body = strip_frontmatter(source);

    let lines: Vec<&str> = body
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("%%"))
        .collect();

    if lines.is_empty() {
        return Err(RenderError::EmptySource);
    }

    let header = lines[0].to_lowercase();

    if header.starts_with("sequencediagram") {
        Ok(Diagram::Sequence(sequence::parse_sequence(&lines)))
    } else if header.starts_with("classdiagram") {
        Ok(Diagram::Class(class::parse_class(&lines)))
    } else if header.starts_with("erdiagram") {
        Ok(Diagram::Er(er::parse_er(&lines)))
    } else if header.starts_with("statediagram") {
        Ok(Diagram::Flowchart(flowchart::parse_state(&lines)))
    } else if header.starts_with("graph") || header.starts_with("flowchart") {
        Ok(Diagram::Flowchart(flowchart::parse_flowchart(&lines)?))
    } else {
        let kind = header.split_whitespace().next().unwrap_or("").to_string();
        Err(RenderError::Unsupported(kind))
    }
}

/// Strip a leading YAML frontmatter block (`--- ... ---`).
fn strip_frontmatter(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let mut start = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "---" {
            start = Some(i);
        }
        break;
    }

    let start = match start {
        Some(s) => s,
        None => return text.to_string(),
    };

    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim() == "---" {
            return lines[i + 1..].join("\n");
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_is_an_error() {
        assert_eq!(parse("   \n  \n").unwrap_err(), RenderError::EmptySource);
        assert_eq!(
            parse("%% only a comment").unwrap_err(),
            RenderError::EmptySource
        );
    }

    #[test]
    fn unknown_header_is_unsupported() {
        assert_eq!(
            parse("gantt\n  title Timeline").unwrap_err(),
            RenderError::Unsupported("gantt".to_string())
        );
    }

    #[test]
    fn frontmatter_is_stripped() {
        let source = "---\ntitle: Demo\n---\ngraph TD\n  A --> B";
        assert!(matches!(parse(source), Ok(Diagram::Flowchart(_))));
    }

    #[test]
    fn dispatches_each_supported_header() {
        assert!(matches!(
            parse("sequenceDiagram\n  A->>B: hi"),
            Ok(Diagram::Sequence(_))
        ));
        assert!(matches!(
            parse("classDiagram\n  class Foo"),
            Ok(Diagram::Class(_))
        ));
        assert!(matches!(
            parse("erDiagram\n  A ||--o{ B : has"),
            Ok(Diagram::Er(_))
        ));
        assert!(matches!(
            parse("stateDiagram-v2\n  [*] --> Idle"),
            Ok(Diagram::Flowchart(_))
        ));
    }
}
