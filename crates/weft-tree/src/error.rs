//! Error types for tree construction and rewrite passes.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by structural [`Tree`](crate::Tree) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The operation needs a different kind of node.
    #[error("node {id} is {actual}, expected {expected}")]
    WrongKind {
        id: NodeId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors raised while building or running a rewrite pass.
#[derive(Debug, Error)]
pub enum PassError {
    /// A pass was constructed or invoked with arguments that break its contract.
    #[error("invalid argument for pass '{pass}': {message}")]
    InvalidArgument { pass: &'static str, message: String },

    /// A structural tree operation failed during the pass.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for pass operations.
pub type Result<T> = std::result::Result<T, PassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = PassError::InvalidArgument {
            pass: "heading-class",
            message: "class marker is empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("heading-class"));
        assert!(msg.contains("class marker is empty"));
    }

    #[test]
    fn test_wrong_kind_display() {
        let err = TreeError::WrongKind {
            id: NodeId(3),
            expected: "element",
            actual: "text",
        };
        assert_eq!(err.to_string(), "node #3 is text, expected element");
    }
}
