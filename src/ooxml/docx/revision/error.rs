/// Error types for revision processing.
use crate::ooxml::docx::tree::NodePath;
use thiserror::Error;

/// Result type for revision processing.
pub type Result<T> = std::result::Result<T, RevisionError>;

/// A fatal revision-processing failure.
///
/// Every variant names the part and the node where processing stopped.
/// There is no partial output: one error fails the whole part.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevisionError {
    /// A change record without its prior snapshot, or similar broken markup
    #[error("{part}: malformed revision markup at {path}: {reason}")]
    MalformedRevisionMarkup {
        part: String,
        path: NodePath,
        reason: String,
    },

    /// A move source without a destination or the other way around
    #[error("{part}: move {move_id:?} at {path} has no counterpart")]
    UnresolvedMove {
        part: String,
        path: NodePath,
        move_id: String,
    },

    /// Revision markers left after processing, or an impossible structure
    #[error("{part}: structural violation at {path}: {reason}")]
    StructuralViolation {
        part: String,
        path: NodePath,
        reason: String,
    },

    /// A combination of revisions with no defined outcome
    #[error("{part}: unsupported revision at {path}: {reason}")]
    UnsupportedRevision {
        part: String,
        path: NodePath,
        reason: String,
    },
}

impl RevisionError {
    /// Name of the part that failed.
    pub fn part(&self) -> &str {
        match self {
            Self::MalformedRevisionMarkup { part, .. }
            | Self::UnresolvedMove { part, .. }
            | Self::StructuralViolation { part, .. }
            | Self::UnsupportedRevision { part, .. } => part,
        }
    }

    /// Location of the offending node.
    pub fn path(&self) -> &NodePath {
        match self {
            Self::MalformedRevisionMarkup { path, .. }
            | Self::UnresolvedMove { path, .. }
            | Self::StructuralViolation { path, .. }
            | Self::UnsupportedRevision { path, .. } => path,
        }
    }
}

/// Error-building context: the part being processed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub part: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(part: &'a str) -> Self {
        Self { part }
    }

    pub fn malformed(&self, path: &NodePath, reason: impl Into<String>) -> RevisionError {
        RevisionError::MalformedRevisionMarkup {
            part: self.part.to_string(),
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn unresolved_move(&self, path: &NodePath, move_id: &str) -> RevisionError {
        RevisionError::UnresolvedMove {
            part: self.part.to_string(),
            path: path.clone(),
            move_id: move_id.to_string(),
        }
    }

    pub fn violation(&self, path: &NodePath, reason: impl Into<String>) -> RevisionError {
        RevisionError::StructuralViolation {
            part: self.part.to_string(),
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(&self, path: &NodePath, reason: impl Into<String>) -> RevisionError {
        RevisionError::UnsupportedRevision {
            part: self.part.to_string(),
            path: path.clone(),
            reason: reason.into(),
        }
    }
}
