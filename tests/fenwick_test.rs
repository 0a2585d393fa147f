//! Tests for the fixed Fenwick tree diagram and its DOT output

use rstest::rstest;

use fenwick_diagram::domain::{
    build_diagram, fenwick_diagram, DiagramStyle, Digraph, EdgeDirection, RankDir, FENWICK_EDGES,
    FENWICK_EXTRA_NODE,
};

const EXPECTED_DOT: &str = "digraph {
\tgraph [size=\"8,5\" rankdir=TB]
\tnode [color=lightblue2 style=filled]
\t0 [label=0]
\t1 [label=1]
\t2 [label=2]
\t3 [label=3]
\t4 [label=4]
\t5 [label=5]
\t6 [label=6]
\t7 [label=7]
\t8 [label=8]
\t9 [label=9]
\t10 [label=10]
\t11 [label=11]
\t12 [label=12]
\t16 [label=16]
\t1 -> 0
\t2 -> 0
\t4 -> 0
\t8 -> 0
\t16 -> 0
\t3 -> 2
\t5 -> 4
\t6 -> 4
\t7 -> 6
\t9 -> 8
\t10 -> 8
\t11 -> 10
\t12 -> 8
}
";

#[test]
fn given_default_style_when_fenwick_diagram_then_matches_expected_dot() {
    let graph = fenwick_diagram(&DiagramStyle::default());

    assert_eq!(graph.to_dot(), EXPECTED_DOT);
}

#[test]
fn given_node_16_registered_again_when_rendered_then_output_unchanged() {
    // Arrange
    let mut graph = fenwick_diagram(&DiagramStyle::default());
    let before = graph.to_dot();

    // Act
    graph.add_node(FENWICK_EXTRA_NODE);

    // Assert
    assert_eq!(graph.nodes().len(), 14);
    assert_eq!(graph.to_dot(), before);
}

#[test]
fn given_edge_pair_when_registered_then_arrow_runs_child_to_parent() {
    let mut graph = Digraph::new();

    graph.add_edge(4, 6);

    assert_eq!(graph.edges()[0].tail, "6");
    assert_eq!(graph.edges()[0].head, "4");
    assert!(graph.to_dot().contains("\t6 -> 4\n"));
}

#[test]
fn given_relations_when_listed_then_match_literal_in_order() {
    for direction in [EdgeDirection::ChildToParent, EdgeDirection::ParentToChild] {
        let style = DiagramStyle {
            edge_direction: direction,
            ..Default::default()
        };
        let graph = fenwick_diagram(&style);

        let relations: Vec<(u32, u32)> = graph
            .relations()
            .map(|(p, c)| (p.parse().unwrap(), c.parse().unwrap()))
            .collect();

        assert_eq!(relations, FENWICK_EDGES.to_vec(), "{direction}");
    }
}

#[test]
fn given_single_node_and_no_edges_when_built_then_valid_diagram() {
    let graph = build_diagram(&DiagramStyle::default(), [0], &[]);

    assert_eq!(graph.nodes().len(), 1);
    assert!(graph.edges().is_empty());
    assert!(graph.to_dot().ends_with("\t0 [label=0]\n}\n"));
}

#[test]
fn given_same_style_when_built_twice_then_identical() {
    let a = fenwick_diagram(&DiagramStyle::default());
    let b = fenwick_diagram(&DiagramStyle::default());

    assert_eq!(a, b);
    assert_eq!(a.to_dot(), b.to_dot());
}

#[rstest]
#[case(RankDir::LR, "rankdir=LR")]
#[case(RankDir::BT, "rankdir=BT")]
fn given_rankdir_when_built_then_graph_attribute_set(#[case] rankdir: RankDir, #[case] expected: &str) {
    let style = DiagramStyle {
        rankdir,
        ..Default::default()
    };

    let dot = fenwick_diagram(&style).to_dot();

    assert!(dot.contains(expected));
}

#[test]
fn given_custom_colors_when_built_then_quoted_when_needed() {
    let style = DiagramStyle {
        node_color: "#a0c4ff".into(),
        node_style: "filled,rounded".into(),
        ..Default::default()
    };

    let dot = fenwick_diagram(&style).to_dot();

    assert!(dot.contains("\tnode [color=\"#a0c4ff\" style=\"filled,rounded\"]\n"));
}
