//! Domain layer: graph model and DOT serialization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dot;
pub mod error;
pub mod fenwick;
pub mod graph;

pub use dot::{quote_id, write_dot};
pub use error::DomainError;
pub use fenwick::{
    build_diagram, fenwick_diagram, DiagramStyle, FENWICK_EDGES, FENWICK_EXTRA_NODE, FENWICK_NODES,
};
pub use graph::{Attributes, Digraph, Edge, EdgeDirection, Node, RankDir};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unresolvable variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Check that an output filename is a bare file name: non-empty, no path
/// separators, not `.` or `..`.
pub fn validate_output_filename(name: &str) -> Result<(), DomainError> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if bad {
        Err(DomainError::InvalidFilename(name.to_string()))
    } else {
        Ok(())
    }
}
