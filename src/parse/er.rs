//! ER diagram parsing.

use crate::types::{Cardinality, ErAttribute, ErDiagram, ErKey, ErRelation};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_RELATION: Regex = Regex::new(
        r#"^([\w-]+)\s+([|o\}\{]{2})(--|\.\.)([|o\}\{]{2})\s+([\w-]+)\s*:\s*(.+)$"#
    )
    .unwrap();
    static ref RE_ENTITY_OPEN: Regex = Regex::new(r"^([\w-]+)\s*\{$").unwrap();
    static ref RE_ATTRIBUTE: Regex = Regex::new(
        r#"^([\w\(\)\[\]]+)\s+([\w-]+)((?:\s+(?:PK|FK|UK))*)(?:\s+"[^"]*")?$"#
    )
    .unwrap();
}

/// Parse an `erDiagram` body. Unrecognized lines are skipped.
pub fn parse_er(lines: &[&str]) -> ErDiagram {
    let mut diagram = ErDiagram::default();
    let mut open_entity: Option<String> = None;

    for line in lines.iter().skip(1) {
        if let Some(id) = &open_entity {
            if *line == "}" {
                open_entity = None;
            } else if let Some(caps) = RE_ATTRIBUTE.captures(line) {
                let keys = caps[3]
                    .split_whitespace()
                    .filter_map(|k| match k {
                        "PK" => Some(ErKey::Pk),
                        "FK" => Some(ErKey::Fk),
                        "UK" => Some(ErKey::Uk),
                        _ => None,
                    })
                    .collect();
                let attr = ErAttribute {
                    attr_type: caps[1].to_string(),
                    name: caps[2].to_string(),
                    keys,
                };
                diagram.ensure_entity(id).attributes.push(attr);
            } else {
                log::debug!("skipping unrecognized attribute line: {}", line);
            }
            continue;
        }

        if let Some(caps) = RE_RELATION.captures(line) {
            let left = caps[1].to_string();
            let right = caps[5].to_string();
            diagram.ensure_entity(&left);
            diagram.ensure_entity(&right);
            diagram.relations.push(ErRelation {
                left,
                right,
                left_cardinality: cardinality(&caps[2]),
                right_cardinality: cardinality(&caps[4]),
                label: unquote(caps[6].trim()),
                identifying: &caps[3] == "--",
            });
            continue;
        }

        if let Some(caps) = RE_ENTITY_OPEN.captures(line) {
            let id = caps[1].to_string();
            diagram.ensure_entity(&id);
            open_entity = Some(id);
            continue;
        }

        log::debug!("skipping unrecognized ER line: {}", line);
    }

    diagram
}

/// Map a two-character crow's-foot token (either orientation) to a
/// cardinality: `{`/`}` mean "many", `o` means "zero or".
fn cardinality(token: &str) -> Cardinality {
    let many = token.contains('{') || token.contains('}');
    let zero = token.contains('o');
    match (zero, many) {
        (false, false) => Cardinality::One,
        (true, false) => Cardinality::ZeroOne,
        (false, true) => Cardinality::Many,
        (true, true) => Cardinality::ZeroMany,
    }
}

fn unquote(s: &str) -> String {
    s.trim_matches('"').to_string()
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
    fn relationships_and_cardinalities() {
        let src = "erDiagram\nCUSTOMER ||--o{ ORDER : places\nORDER ||--|{ ORDER_ITEM : contains";
        let diagram = parse_er(&lines(src));

        assert_eq!(diagram.entities.len(), 3);
        assert_eq!(diagram.relations.len(), 2);
        let first = &diagram.relations[0];
        assert_eq!(first.left_cardinality, Cardinality::One);
        assert_eq!(first.right_cardinality, Cardinality::ZeroMany);
        assert_eq!(first.label, "places");
        assert!(first.identifying);
        assert_eq!(diagram.relations[1].right_cardinality, Cardinality::Many);
    }

    #[test]
    fn entity_attribute_blocks() {
        let src = "erDiagram\nCUSTOMER {\nstring customer_id PK\nstring email\ndatetime created_at\n}";
        let diagram = parse_er(&lines(src));

        let customer = &diagram.entities[0];
        assert_eq!(customer.attributes.len(), 3);
        assert_eq!(customer.attributes[0].keys, vec![ErKey::Pk]);
        assert_eq!(customer.attributes[1].attr_type, "string");
        assert_eq!(customer.attributes[1].name, "email");
        assert!(customer.attributes[1].keys.is_empty());
    }

    #[test]
    fn attribute_block_merges_with_relation_mention() {
        let src =
            "erDiagram\nCUSTOMER ||--o{ ORDER : places\nCUSTOMER {\nstring name\n}";
        let diagram = parse_er(&lines(src));

        assert_eq!(diagram.entities.len(), 2);
        assert_eq!(diagram.entities[0].attributes.len(), 1);
    }

    #[test]
    fn non_identifying_relationship() {
        let src = "erDiagram\nPERSON }|..|{ CAR : driver";
        let diagram = parse_er(&lines(src));
        assert!(!diagram.relations[0].identifying);
        assert_eq!(diagram.relations[0].left_cardinality, Cardinality::Many);
    }
}
