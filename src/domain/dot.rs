//! Graphviz DOT serialization
//!
//! Output is a pure function of the graph: same graph, same bytes.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

use crate::domain::{Attributes, Digraph};

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

fn plain_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z_0-9\x{80}-\x{10FFFF}]*|-?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?))$")
            .expect("identifier pattern is valid")
    })
}

/// Quote a DOT identifier unless it is a plain name or numeral.
///
/// Keywords are always quoted. Inside quotes `\` and `"` are escaped and
/// newlines become `\n`.
pub fn quote_id(id: &str) -> Cow<'_, str> {
    let is_keyword = KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id));
    if !is_keyword && plain_id_regex().is_match(id) {
        return Cow::Borrowed(id);
    }
    let escaped = id
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    Cow::Owned(format!("\"{escaped}\""))
}

fn attr_list(attrs: &Attributes) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!("{}={}", quote_id(k), quote_id(v)))
        .join(" ")
}

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {{")?;
        for (keyword, attrs) in [("graph", self.graph_attrs()), ("node", self.node_attrs())] {
            if !attrs.is_empty() {
                writeln!(f, "\t{} [{}]", keyword, attr_list(attrs))?;
            }
        }
        for node in self.nodes() {
            writeln!(f, "\t{} [label={}]", quote_id(&node.id), quote_id(&node.label))?;
        }
        for edge in self.edges() {
            writeln!(f, "\t{} -> {}", quote_id(&edge.tail), quote_id(&edge.head))?;
        }
        writeln!(f, "}}")
    }
}

impl Digraph {
    /// Render the graph as DOT source text.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }
}

/// Write the graph in DOT format to `output`.
pub fn write_dot<W: Write>(graph: &Digraph, output: &mut W) -> io::Result<()> {
    write!(output, "{graph}")?;
    output.flush()
}
