//! Directed graph description handed to the rendering engine.
//!
//! The graph only records what was registered, in registration order. It does
//! not check tree shape: uniqueness of edges, acyclicity and completeness are
//! the caller's business.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Ordered `key=value` attribute list.
///
/// Setting an existing key replaces its value in place, so output order
/// only depends on first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the key's original position if present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Graphviz `rankdir`: the direction ranks are laid out in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RankDir {
    /// Top to bottom (Graphviz default)
    #[default]
    TB,
    /// Left to right
    LR,
    /// Bottom to top
    BT,
    /// Right to left
    RL,
}

impl RankDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankDir::TB => "TB",
            RankDir::LR => "LR",
            RankDir::BT => "BT",
            RankDir::RL => "RL",
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankDir {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(RankDir::TB),
            "LR" => Ok(RankDir::LR),
            "BT" => Ok(RankDir::BT),
            "RL" => Ok(RankDir::RL),
            _ => Err(DomainError::InvalidRankDir(s.to_string())),
        }
    }
}

impl TryFrom<String> for RankDir {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RankDir> for String {
    fn from(value: RankDir) -> Self {
        value.as_str().to_string()
    }
}

/// How a registered `(parent, child)` pair is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EdgeDirection {
    /// Arrow points from the child to its parent.
    #[default]
    ChildToParent,
    /// Arrow points from the parent to its child.
    ParentToChild,
}

impl EdgeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeDirection::ChildToParent => "child-to-parent",
            EdgeDirection::ParentToChild => "parent-to-child",
        }
    }

    /// Map a `(parent, child)` pair to the `(tail, head)` of the drawn arrow.
    pub fn orient<'a>(&self, parent: &'a str, child: &'a str) -> (&'a str, &'a str) {
        match self {
            EdgeDirection::ChildToParent => (child, parent),
            EdgeDirection::ParentToChild => (parent, child),
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "child-to-parent" => Ok(EdgeDirection::ChildToParent),
            "parent-to-child" => Ok(EdgeDirection::ParentToChild),
            _ => Err(DomainError::InvalidEdgeDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for EdgeDirection {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EdgeDirection> for String {
    fn from(value: EdgeDirection) -> Self {
        value.as_str().to_string()
    }
}

/// A registered node. The id doubles as the DOT node name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
}

/// A drawn edge, already oriented: the arrow goes `tail -> head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub tail: String,
    pub head: String,
}

/// In-memory directed graph, built once and then handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digraph {
    edge_direction: EdgeDirection,
    graph_attrs: Attributes,
    node_attrs: Attributes,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_direction(mut self, direction: EdgeDirection) -> Self {
        self.edge_direction = direction;
        self
    }

    pub fn edge_direction(&self) -> EdgeDirection {
        self.edge_direction
    }

    /// Set a graph-wide attribute (`size`, `rankdir`, ...).
    pub fn set_graph_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.graph_attrs.set(key, value);
    }

    /// Set a default attribute applied to every node.
    pub fn set_node_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.node_attrs.set(key, value);
    }

    pub fn graph_attrs(&self) -> &Attributes {
        &self.graph_attrs
    }

    pub fn node_attrs(&self) -> &Attributes {
        &self.node_attrs
    }

    /// Register a node whose label is its own id.
    pub fn add_node(&mut self, id: impl ToString) {
        let id = id.to_string();
        let label = id.clone();
        self.add_node_with_label(id, label);
    }

    /// Register a node with an explicit label.
    ///
    /// Registering an id twice keeps the node at its first position. The
    /// label of the latest registration wins, so an identical re-registration
    /// changes nothing.
    pub fn add_node_with_label(&mut self, id: impl Into<String>, label: impl Into<String>) {
        let id = id.into();
        let label = label.into();
        match self.index.get(&id) {
            Some(&pos) => self.nodes[pos].label = label,
            None => {
                self.index.insert(id.clone(), self.nodes.len());
                self.nodes.push(Node { id, label });
            }
        }
    }

    /// Register the `(parent, child)` relation, oriented by the graph's
    /// [`EdgeDirection`].
    ///
    /// Endpoints need not be registered nodes; the engine creates them on
    /// the fly.
    pub fn add_edge(&mut self, parent: impl ToString, child: impl ToString) {
        let parent = parent.to_string();
        let child = child.to_string();
        let (tail, head) = self.edge_direction.orient(&parent, &child);
        self.edges.push(Edge {
            tail: tail.to_string(),
            head: head.to_string(),
        });
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Registered `(parent, child)` pairs, undoing the edge orientation.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges.iter().map(move |e| match self.edge_direction {
            EdgeDirection::ChildToParent => (e.head.as_str(), e.tail.as_str()),
            EdgeDirection::ParentToChild => (e.tail.as_str(), e.head.as_str()),
        })
    }
}
