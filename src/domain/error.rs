//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid diagram settings.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid rank direction: {0} (expected TB, LR, BT or RL)")]
    InvalidRankDir(String),

    #[error("invalid edge direction: {0} (expected child-to-parent or parent-to-child)")]
    InvalidEdgeDirection(String),

    #[error("invalid canvas size: {0} (expected \"width,height\" in inches)")]
    InvalidSize(String),

    #[error("invalid output filename: {0:?}")]
    InvalidFilename(String),
}
