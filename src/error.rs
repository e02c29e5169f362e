use thiserror::Error;

/// Conditions surfaced to callers of [`crate::assemble`].
///
/// Malformed statements and degenerate shapes are recovered locally and never
/// show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("diagram contains no nodes")]
    EmptyDiagram,
}
