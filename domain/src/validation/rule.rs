//! The pluggable rule interface behind [`ShapeValidator`](super::ShapeValidator)

use serde_json::Value;

/// Outcome of checking one document against one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The document has this shape; the detail says which
    Accept(String),
    /// The rule applies but the document is wrong; the detail says why
    Reject(String),
    /// The rule does not apply to this document
    Abstain,
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept(_))
    }
}

/// A document shape check.
///
/// Rules are pure and must return a verdict for every input, however
/// malformed.
pub trait ShapeRule: Send + Sync {
    /// Short identifier used in reports
    fn name(&self) -> &str;

    /// Check the document
    fn check(&self, document: &Value) -> Verdict;
}
