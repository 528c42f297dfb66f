//! Class diagram parsing.

use crate::types::{ClassDiagram, ClassMember, ClassRelation, RelationKind, Visibility};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_CLASS_OPEN: Regex = Regex::new(r"^class\s+([\w-]+)\s*\{$").unwrap();
    static ref RE_CLASS_DECL: Regex = Regex::new(r"^class\s+([\w-]+)\s*$").unwrap();
    static ref RE_RELATION: Regex = Regex::new(
        r#"^([\w-]+)(?:\s+"([^"]+)")?\s*(<\|--|\*--|o--|\.\.\|>|\.\.>|-->|--)\s*(?:"([^"]+)"\s+)?([\w-]+)\s*(?::\s*(.+))?$"#
    )
    .unwrap();
}

/// Parse a `classDiagram` body. Unrecognized lines are skipped.
pub fn parse_class(lines: &[&str]) -> ClassDiagram {
    let mut diagram = ClassDiagram::default();
    let mut open_class: Option<String> = None;

    for line in lines.iter().skip(1) {
        if let Some(id) = &open_class {
            if *line == "}" {
                open_class = None;
            } else {
                push_member(&mut diagram, id.clone(), line);
            }
            continue;
        }

        if let Some(caps) = RE_CLASS_OPEN.captures(line) {
            let id = caps[1].to_string();
            diagram.ensure_class(&id);
            open_class = Some(id);
            continue;
        }

        if let Some(caps) = RE_CLASS_DECL.captures(line) {
            diagram.ensure_class(&caps[1]);
            continue;
        }

        if let Some(caps) = RE_RELATION.captures(line) {
            let from = caps[1].to_string();
            let to = caps[5].to_string();
            diagram.ensure_class(&from);
            diagram.ensure_class(&to);
            diagram.relations.push(ClassRelation {
                from,
                to,
                kind: relation_kind(&caps[3]),
                from_cardinality: caps.get(2).map(|m| m.as_str().to_string()),
                to_cardinality: caps.get(4).map(|m| m.as_str().to_string()),
                label: caps.get(6).map(|m| m.as_str().trim().to_string()),
            });
            continue;
        }

        log::debug!("skipping unrecognized class line: {}", line);
    }

    diagram
}

fn push_member(diagram: &mut ClassDiagram, class_id: String, line: &str) {
    let mut chars = line.chars();
    let (visibility, signature) = match chars.next() {
        Some(first) if matches!(first, '+' | '-' | '#' | '~') => {
            (Visibility::from_char(first), chars.as_str().trim())
        }
        _ => (Visibility::Unspecified, line.trim()),
    };

    if signature.is_empty() {
        return;
    }

    let member = ClassMember {
        visibility,
        signature: signature.to_string(),
    };
    let class = diagram.ensure_class(&class_id);
    if member.is_method() {
        class.methods.push(member);
    } else {
        class.attributes.push(member);
    }
}

fn relation_kind(token: &str) -> RelationKind {
    match token {
        "<|--" => RelationKind::Inheritance,
        "*--" => RelationKind::Composition,
        "o--" => RelationKind::Aggregation,
        "..>" => RelationKind::Dependency,
        "..|>" => RelationKind::Realization,
        _ => RelationKind::Association,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<&str> {
        source
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn class_blocks_split_attributes_and_methods() {
        let src = "classDiagram\nclass User {\n+String userId\n+login()\n-secret\n}";
        let diagram = parse_class(&lines(src));

        let user = &diagram.classes[0];
        assert_eq!(user.id, "User");
        assert_eq!(user.attributes.len(), 2);
        assert_eq!(user.methods.len(), 1);
        assert_eq!(user.attributes[0].signature, "String userId");
        assert_eq!(user.attributes[0].visibility, Visibility::Public);
        assert_eq!(user.attributes[1].visibility, Visibility::Private);
        assert_eq!(user.methods[0].signature, "login()");
    }

    #[test]
    fn relations_with_cardinalities_and_labels() {
        let src = "classDiagram\nUser <|-- Student\nStudent \"many\" -- \"many\" Course : enrolled in";
        let diagram = parse_class(&lines(src));

        assert_eq!(diagram.relations.len(), 2);
        assert_eq!(diagram.relations[0].kind, RelationKind::Inheritance);
        let enrollment = &diagram.relations[1];
        assert_eq!(enrollment.kind, RelationKind::Association);
        assert_eq!(enrollment.from_cardinality.as_deref(), Some("many"));
        assert_eq!(enrollment.to_cardinality.as_deref(), Some("many"));
        assert_eq!(enrollment.label.as_deref(), Some("enrolled in"));
    }

    #[test]
    fn relation_endpoints_materialize_classes() {
        let src = "classDiagram\nCourse \"1\" -- \"many\" Assignment : contains";
        let diagram = parse_class(&lines(src));
        assert_eq!(diagram.classes.len(), 2);
    }
}
