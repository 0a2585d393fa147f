//! Draw a Fenwick (binary indexed) tree diagram with Graphviz.
//!
//! The tree is a fixed edge list. It is turned into a [`domain::Digraph`],
//! serialized as DOT and rendered by the external `dot` engine.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
