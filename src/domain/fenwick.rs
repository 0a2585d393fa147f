//! The fixed Fenwick tree diagram
//!
//! The tree is a literal, not computed: edit [`FENWICK_EDGES`] to change
//! its shape.

use std::ops::RangeInclusive;

use crate::domain::{Digraph, DomainError, EdgeDirection, RankDir};

/// Nodes registered up front, in order.
pub const FENWICK_NODES: RangeInclusive<u32> = 0..=12;

/// Registered after the range; the `(0, 16)` edge points at it.
pub const FENWICK_EXTRA_NODE: u32 = 16;

/// `(parent, child)` pairs of the binary indexed tree.
pub const FENWICK_EDGES: [(u32, u32); 13] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (0, 8),
    (0, 16),
    (2, 3),
    (4, 5),
    (4, 6),
    (6, 7),
    (8, 9),
    (8, 10),
    (10, 11),
    (8, 12),
];

/// Visual settings applied to the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramStyle {
    pub node_color: String,
    pub node_style: String,
    /// Canvas size in inches, `"width,height"` with optional trailing `!`
    pub size: String,
    pub rankdir: RankDir,
    pub edge_direction: EdgeDirection,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            node_color: "lightblue2".into(),
            node_style: "filled".into(),
            size: "8,5".into(),
            rankdir: RankDir::TB,
            edge_direction: EdgeDirection::ChildToParent,
        }
    }
}

impl DiagramStyle {
    /// Check that `size` is two positive numbers separated by a comma.
    pub fn validate(&self) -> Result<(), DomainError> {
        let size = self.size.trim();
        let dims = size.strip_suffix('!').unwrap_or(size);
        let valid = match dims.split_once(',') {
            Some((w, h)) => [w, h]
                .iter()
                .all(|d| d.trim().parse::<f64>().map(|v| v > 0.0).unwrap_or(false)),
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidSize(self.size.clone()))
        }
    }

    /// Apply graph-wide and default node attributes to `graph`.
    pub fn apply(&self, graph: &mut Digraph) {
        graph.set_graph_attr("size", self.size.trim());
        graph.set_graph_attr("rankdir", self.rankdir.as_str());
        graph.set_node_attr("color", self.node_color.as_str());
        graph.set_node_attr("style", self.node_style.as_str());
    }
}

/// Build a styled diagram from a node range, extra nodes and `(parent, child)` pairs.
pub fn build_diagram(
    style: &DiagramStyle,
    nodes: impl IntoIterator<Item = u32>,
    edges: &[(u32, u32)],
) -> Digraph {
    let mut graph = Digraph::new().with_edge_direction(style.edge_direction);
    style.apply(&mut graph);
    for n in nodes {
        graph.add_node(n);
    }
    for &(parent, child) in edges {
        graph.add_edge(parent, child);
    }
    graph
}

/// Build the fixed Fenwick tree diagram.
pub fn fenwick_diagram(style: &DiagramStyle) -> Digraph {
    build_diagram(
        style,
        FENWICK_NODES.chain(std::iter::once(FENWICK_EXTRA_NODE)),
        &FENWICK_EDGES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8,5")]
    #[case("8,5!")]
    #[case(" 7.5, 10 ")]
    fn test_validate_accepts_size(#[case] size: &str) {
        let style = DiagramStyle {
            size: size.into(),
            ..Default::default()
        };
        assert!(style.validate().is_ok());
    }

    #[rstest]
    #[case("8")]
    #[case("8,")]
    #[case("a,b")]
    #[case("0,5")]
    #[case("")]
    fn test_validate_rejects_size(#[case] size: &str) {
        let style = DiagramStyle {
            size: size.into(),
            ..Default::default()
        };
        assert_eq!(style.validate(), Err(DomainError::InvalidSize(size.into())));
    }

    #[test]
    fn test_every_edge_endpoint_is_registered() {
        let graph = fenwick_diagram(&DiagramStyle::default());
        for edge in graph.edges() {
            assert!(graph.contains_node(&edge.tail), "missing {}", edge.tail);
            assert!(graph.contains_node(&edge.head), "missing {}", edge.head);
        }
    }
}
