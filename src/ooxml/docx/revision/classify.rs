/// Revision classification and the mode/action table.
///
/// Every resolver in this module asks the same question: given the kind of
/// revision on a node and the processing mode, what happens to the node?
/// The answer comes from [`action`], and nowhere else.
use super::moves::reduce;
use crate::ooxml::docx::tree::{MarkerKind, PropertyChange, RevisionMarker};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Finalize every edit
    Accept,
    /// Revert every edit
    Reject,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Kind of revision carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    Inserted,
    Deleted,
    MovedFrom,
    MovedTo,
    /// A property-change record with a prior snapshot
    PropertyChanged,
    None,
}

impl From<MarkerKind> for RevisionKind {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Inserted => Self::Inserted,
            MarkerKind::Deleted => Self::Deleted,
            MarkerKind::MovedFrom => Self::MovedFrom,
            MarkerKind::MovedTo => Self::MovedTo,
        }
    }
}

/// What happens to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Keep the node, discard its revision markup
    KeepUnwrapped,
    /// Remove the node and everything below it
    Drop,
    /// Replace current properties with the prior snapshot
    ReplaceWithSnapshot,
    /// Remove a paragraph boundary by joining with the next paragraph
    MergeForward,
}

/// The single `(kind, mode) -> action` table.
///
/// Moves are reduced first: a move source behaves as a deletion, a move
/// destination as an insertion.
pub const fn action(kind: RevisionKind, mode: Mode) -> Action {
    match (reduce(kind), mode) {
        (RevisionKind::Inserted, Mode::Accept) => Action::KeepUnwrapped,
        (RevisionKind::Inserted, Mode::Reject) => Action::Drop,
        (RevisionKind::Deleted, Mode::Accept) => Action::Drop,
        (RevisionKind::Deleted, Mode::Reject) => Action::KeepUnwrapped,
        (RevisionKind::PropertyChanged, Mode::Accept) => Action::KeepUnwrapped,
        (RevisionKind::PropertyChanged, Mode::Reject) => Action::ReplaceWithSnapshot,
        _ => Action::KeepUnwrapped,
    }
}

/// Result of classifying a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: RevisionKind,
    /// Whether a prior-state snapshot is available
    pub has_snapshot: bool,
}

/// Classify a property-change record slot.
pub fn classify_change<T>(change: Option<&PropertyChange<T>>) -> Classification {
    match change {
        Some(record) => Classification {
            kind: RevisionKind::PropertyChanged,
            has_snapshot: record.prior.is_some(),
        },
        None => Classification {
            kind: RevisionKind::None,
            has_snapshot: false,
        },
    }
}

/// Combined action of the markers on one node. Drop dominates.
pub fn marker_action(markers: &[RevisionMarker], mode: Mode) -> Action {
    if markers
        .iter()
        .any(|m| action(m.kind.into(), mode) == Action::Drop)
    {
        Action::Drop
    } else {
        Action::KeepUnwrapped
    }
}

/// Action for a paragraph mark: a dropped mark merges forward.
///
/// A mark carrying both an insertion and a deletion drops in either mode,
/// so it merges in either mode.
pub fn mark_action(markers: &[RevisionMarker], mode: Mode) -> Action {
    match marker_action(markers, mode) {
        Action::Drop => Action::MergeForward,
        other => other,
    }
}
