use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
}

/// Shape family of a node, derived from the delimiters around its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeCategory {
    Terminal,
    Subprocess,
    Decision,
    Process,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub id: String,
    pub label: String,
    pub category: ShapeCategory,
}

impl NodeDefinition {
    /// Placeholder for an id that is only ever referenced by an edge.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            category: ShapeCategory::Process,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    Arrow,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeStroke {
    Solid,
    Dotted,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDefinition {
    pub source: String,
    pub target: String,
    /// Empty when the source text carries no label.
    pub label: String,
    pub kind: EdgeKind,
    pub stroke: EdgeStroke,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgraph {
    pub id: String,
    pub label: String,
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedGraph {
    pub direction: Direction,
    /// Keyed by id, in first-seen order.
    pub nodes: IndexMap<String, NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
    pub subgraphs: Vec<Subgraph>,
}

impl ParsedGraph {
    pub fn node(&self, id: &str) -> Option<&NodeDefinition> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
