//! Node, edge and layout types for the lineage graph.

use serde::{Deserialize, Serialize};

/// A table in the lineage graph.
///
/// The table name is both the node id and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    /// Table name (case-sensitive)
    pub name: String,
    /// Table type from the most recent row mentioning this table
    pub table_type: String,
    /// Direct parents, deduplicated, in order of first appearance
    pub parents: Vec<String>,
    /// Direct children, deduplicated, in order of first appearance
    pub children: Vec<String>,
}

impl TableNode {
    pub fn new(name: impl Into<String>, table_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: table_type.into(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A table with no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn has_parent(&self, name: &str) -> bool {
        self.parents.iter().any(|p| p == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c == name)
    }

    pub(crate) fn add_parent(&mut self, name: &str) {
        if !self.has_parent(name) {
            self.parents.push(name.to_string());
        }
    }

    pub(crate) fn add_child(&mut self, name: &str) {
        if !self.has_child(name) {
            self.children.push(name.to_string());
        }
    }
}

/// A directed, labelled parent → child edge.
///
/// Edges are never deduplicated: two rows linking the same pair of tables
/// produce two edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    /// Unique within one build (`e-{n}` for rows, `b-{n}` for bypasses)
    pub id: String,
    /// Parent table
    pub source: String,
    /// Child table
    pub target: String,
    /// Relationship label
    pub relationship: String,
    /// Hidden table this edge was routed around, if it is a bypass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

impl LineageEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            via: None,
        }
    }

    /// A synthesized edge bridging a hidden table, labelled `via {hidden}`.
    pub fn bypass(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        hidden: &str,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship: format!("via {}", hidden),
            via: Some(hidden.to_string()),
        }
    }

    pub fn is_bypass(&self) -> bool {
        self.via.is_some()
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl std::fmt::Display for LineageEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.relationship, self.target)
    }
}

/// A 2D point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node placed by the layered layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub table_type: String,
    /// Layer (longest distance from a root)
    pub level: usize,
    pub position: Position,
    /// The position came from a stored manual override
    pub pinned: bool,
}
