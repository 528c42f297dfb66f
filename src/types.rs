//! Data types for parsed Mermaid diagrams.

use std::collections::HashMap;

// ============================================================================
// Flowchart / state diagram
// ============================================================================

/// Layout direction of a flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TD,
    TB,
    LR,
    BT,
    RL,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TD" => Some(Direction::TD),
            "TB" => Some(Direction::TB),
            "LR" => Some(Direction::LR),
            "BT" => Some(Direction::BT),
            "RL" => Some(Direction::RL),
            _ => None,
        }
    }

    /// True when ranks advance horizontally (LR / RL).
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LR | Direction::RL)
    }

    /// True when ranks advance in reverse (BT / RL).
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::BT | Direction::RL)
    }
}

/// Node shapes the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rectangle,  // [text]
    Rounded,    // (text)
    Diamond,    // {text}
    Stadium,    // ([text])
    Circle,     // ((text))
    StateStart, // [*] as a source
    StateEnd,   // [*] as a target
}

/// Edge line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Solid,
    Dotted,
    Thick,
}

#[derive(Debug, Clone)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

/// A parsed flowchart or (flattened) state diagram.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    pub direction: Direction,
    /// Nodes in first-appearance order.
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    index: HashMap<String, usize>,
}

impl FlowGraph {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a node, or refresh the label/shape of an already-seen id when
    /// a later mention carries an explicit shape.
    pub fn upsert_node(&mut self, id: &str, label: String, shape: NodeShape, explicit: bool) {
        match self.index.get(id) {
            Some(&i) => {
                if explicit {
                    self.nodes[i].label = label;
                    self.nodes[i].shape = shape;
                }
            }
            None => {
                self.index.insert(id.to_string(), self.nodes.len());
                self.nodes.push(FlowNode {
                    id: id.to_string(),
                    label,
                    shape,
                });
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }
}

// ============================================================================
// Sequence diagram
// ============================================================================

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub label: String,
    pub is_actor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowLine {
    Solid,
    Dashed,
}

#[derive(Debug, Clone)]
pub struct SeqMessage {
    pub from: String,
    pub to: String,
    pub label: String,
    pub line: ArrowLine,
    /// Open (line) arrow head instead of a filled triangle.
    pub open_arrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePlacement {
    LeftOf,
    RightOf,
    Over,
}

/// Messages and notes interleaved in source order.
#[derive(Debug, Clone)]
pub enum SequenceEvent {
    Message(SeqMessage),
    Note {
        placement: NotePlacement,
        participants: Vec<String>,
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SequenceDiagram {
    pub participants: Vec<Participant>,
    pub events: Vec<SequenceEvent>,
}

impl SequenceDiagram {
    /// Register a participant id on first mention, keeping source order.
    pub fn ensure_participant(&mut self, id: &str) {
        if !self.participants.iter().any(|p| p.id == id) {
            self.participants.push(Participant {
                id: id.to_string(),
                label: id.to_string(),
                is_actor: false,
            });
        }
    }
}

// ============================================================================
// Class diagram
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
    Unspecified,
}

impl Visibility {
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Visibility::Public,
            '-' => Visibility::Private,
            '#' => Visibility::Protected,
            '~' => Visibility::Package,
            _ => Visibility::Unspecified,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Visibility::Public => "+",
            Visibility::Private => "-",
            Visibility::Protected => "#",
            Visibility::Package => "~",
            Visibility::Unspecified => "",
        }
    }
}

/// An attribute or method line inside a class block.
#[derive(Debug, Clone)]
pub struct ClassMember {
    pub visibility: Visibility,
    /// The signature as written, without the visibility marker.
    pub signature: String,
}

impl ClassMember {
    pub fn is_method(&self) -> bool {
        self.signature.ends_with(')')
    }
}

#[derive(Debug, Clone)]
pub struct ClassNode {
    pub id: String,
    pub attributes: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Inheritance, // <|--
    Composition, // *--
    Aggregation, // o--
    Association, // --> or --
    Dependency,  // ..>
    Realization, // ..|>
}

#[derive(Debug, Clone)]
pub struct ClassRelation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub from_cardinality: Option<String>,
    pub to_cardinality: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassDiagram {
    pub classes: Vec<ClassNode>,
    pub relations: Vec<ClassRelation>,
}

impl ClassDiagram {
    pub fn ensure_class(&mut self, id: &str) -> &mut ClassNode {
        let i = match self.classes.iter().position(|c| c.id == id) {
            Some(i) => i,
            None => {
                self.classes.push(ClassNode {
                    id: id.to_string(),
                    attributes: Vec::new(),
                    methods: Vec::new(),
                });
                self.classes.len() - 1
            }
        };
        &mut self.classes[i]
    }
}

// ============================================================================
// ER diagram
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErKey {
    Pk,
    Fk,
    Uk,
}

impl ErKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErKey::Pk => "PK",
            ErKey::Fk => "FK",
            ErKey::Uk => "UK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErAttribute {
    pub attr_type: String,
    pub name: String,
    pub keys: Vec<ErKey>,
}

#[derive(Debug, Clone)]
pub struct ErEntity {
    pub id: String,
    pub attributes: Vec<ErAttribute>,
}

/// Crow's-foot cardinality on one side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,      // ||
    ZeroOne,  // o|
    Many,     // }|
    ZeroMany, // o{
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::ZeroOne => "0..1",
            Cardinality::Many => "1..*",
            Cardinality::ZeroMany => "0..*",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErRelation {
    pub left: String,
    pub right: String,
    pub left_cardinality: Cardinality,
    pub right_cardinality: Cardinality,
    pub label: String,
    pub identifying: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ErDiagram {
    pub entities: Vec<ErEntity>,
    pub relations: Vec<ErRelation>,
}

impl ErDiagram {
    pub fn ensure_entity(&mut self, id: &str) -> &mut ErEntity {
        let i = match self.entities.iter().position(|e| e.id == id) {
            Some(i) => i,
            None => {
                self.entities.push(ErEntity {
                    id: id.to_string(),
                    attributes: Vec::new(),
                });
                self.entities.len() - 1
            }
        };
        &mut self.entities[i]
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// A parsed diagram of any supported type.
#[derive(Debug, Clone)]
pub enum Diagram {
    Flowchart(FlowGraph),
    Sequence(SequenceDiagram),
    Class(ClassDiagram),
    Er(ErDiagram),
}
