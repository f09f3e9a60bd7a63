//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Heuristic detection and document extraction are total and never produce
/// these. Only caller input that needs correction (such as an empty project
/// brief) surfaces as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Input text cannot be empty")]
    EmptyInput,

    #[error(
        "Input must contain idea/MVP, personas, and outcomes. \
         Use '*' to separate sections or provide clear labels."
    )]
    UnrecognizedBrief,

    #[error("Missing required components: {}", .0.join(", "))]
    MissingSections(Vec<String>),
}

impl DomainError {
    /// Check if this error means the caller supplied no usable text at all
    pub fn is_empty_input(&self) -> bool {
        matches!(self, DomainError::EmptyInput)
    }
}
