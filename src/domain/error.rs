//! Tree errors (no I/O concerns)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Errors raised by structural edits, lookups and traversal cursors.
///
/// `AlreadyAttached`, `NotAChild`, `SelfAttach` and `StillAttached` are
/// caller errors: a structural precondition was violated and nothing was
/// changed. `InvariantBreach` means the link structure itself is broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {{Name={name}}} has already been added to a previous tree")]
    AlreadyAttached { name: String },

    #[error(
        "cannot remove child node {{Name={child} ParentName={}}} as it is not a child of parent node {{{parent}}}",
        .child_parent.as_deref().unwrap_or("")
    )]
    NotAChild {
        child: String,
        child_parent: Option<String>,
        parent: String,
    },

    #[error("node {{Name={name}}} cannot be added as a child of itself")]
    SelfAttach { name: String },

    #[error("node {{Name={name}}} is still attached to a parent and cannot be discarded")]
    StillAttached { name: String },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("current node is undefined: cursor is not positioned on a node")]
    NoCurrent,

    #[error("outline line {line}: {reason}")]
    Outline { line: usize, reason: String },

    #[error("internal tree invariant violated: {0}")]
    InvariantBreach(String),
}

impl TreeError {
    /// True for errors that signal a structural precondition violation.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            TreeError::AlreadyAttached { .. }
                | TreeError::NotAChild { .. }
                | TreeError::SelfAttach { .. }
                | TreeError::StillAttached { .. }
        )
    }

    pub(crate) fn outline(line: usize, reason: impl Into<String>) -> Self {
        TreeError::Outline {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
