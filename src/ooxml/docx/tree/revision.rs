/// Revision markers and property-change records.
///
/// Tracked changes record insertions, deletions, moves and formatting
/// changes made by document editors. In the content tree they show up in
/// three shapes:
///
/// - `RevisionMarker`: an insertion/deletion/move marker that decorates a
///   node (a wrapper around inline content, a paragraph mark, a row, a cell)
/// - `PropertyChange<T>`: a record holding the complete prior snapshot of a
///   property set
/// - `Tracked<T>`: a current property set paired with an optional change
///   record
///
/// # Example XML Structure
///
/// ```xml
/// <w:ins w:id="0" w:author="John Doe" w:date="2024-11-05T10:30:00Z">
///   <w:r><w:t>inserted text</w:t></w:r>
/// </w:ins>
/// <w:r>
///   <w:rPr>
///     <w:b/>
///     <w:rPrChange w:id="1" w:author="Jane Smith">
///       <w:rPr/>
///     </w:rPrChange>
///   </w:rPr>
///   <w:t>now bold</w:t>
/// </w:r>
/// ```
use smallvec::SmallVec;
use std::fmt;

/// Kind of an insertion/deletion/move marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Content insertion (`w:ins`, `w:cellIns`)
    Inserted,
    /// Content deletion (`w:del`, `w:cellDel`)
    Deleted,
    /// Move source (`w:moveFrom`)
    MovedFrom,
    /// Move destination (`w:moveTo`)
    MovedTo,
}

impl MarkerKind {
    /// Element name of a run-level wrapper or paragraph-mark marker.
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Inserted => "w:ins",
            Self::Deleted => "w:del",
            Self::MovedFrom => "w:moveFrom",
            Self::MovedTo => "w:moveTo",
        }
    }

    /// Parse a run-level wrapper or marker element name.
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "w:ins" => Some(Self::Inserted),
            "w:del" => Some(Self::Deleted),
            "w:moveFrom" => Some(Self::MovedFrom),
            "w:moveTo" => Some(Self::MovedTo),
            _ => None,
        }
    }

    /// Whether this marker belongs to a move pair.
    #[inline]
    pub const fn is_move(self) -> bool {
        matches!(self, Self::MovedFrom | Self::MovedTo)
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted => write!(f, "Insert"),
            Self::Deleted => write!(f, "Delete"),
            Self::MovedFrom => write!(f, "Move From"),
            Self::MovedTo => write!(f, "Move To"),
        }
    }
}

/// Who made a change and when.
///
/// # Field Ordering
///
/// Strings first, optional strings after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionInfo {
    /// Revision ID (`w:id`)
    pub id: String,
    /// Author (`w:author`)
    pub author: Option<String>,
    /// Date/time of the change, ISO 8601 (`w:date`)
    pub date: Option<String>,
}

impl RevisionInfo {
    /// Create revision info with just an id.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: None,
            date: None,
        }
    }

    /// Builder: set the author.
    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder: set the date.
    #[inline]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// An insertion, deletion or move marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionMarker {
    /// Marker kind
    pub kind: MarkerKind,
    /// Author/date/id
    pub info: RevisionInfo,
    /// Move identifier shared by a `MovedFrom`/`MovedTo` pair
    pub move_id: Option<String>,
}

impl RevisionMarker {
    /// Create a marker that is not part of a move.
    pub fn new(kind: MarkerKind, info: RevisionInfo) -> Self {
        Self {
            kind,
            info,
            move_id: None,
        }
    }

    /// Shorthand for an insertion marker.
    pub fn inserted(id: impl Into<String>) -> Self {
        Self::new(MarkerKind::Inserted, RevisionInfo::new(id))
    }

    /// Shorthand for a deletion marker.
    pub fn deleted(id: impl Into<String>) -> Self {
        Self::new(MarkerKind::Deleted, RevisionInfo::new(id))
    }

    /// Shorthand for a move-source marker.
    pub fn moved_from(id: impl Into<String>, move_id: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::MovedFrom,
            info: RevisionInfo::new(id),
            move_id: Some(move_id.into()),
        }
    }

    /// Shorthand for a move-destination marker.
    pub fn moved_to(id: impl Into<String>, move_id: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::MovedTo,
            info: RevisionInfo::new(id),
            move_id: Some(move_id.into()),
        }
    }
}

/// Markers decorating one node. A node can carry more than one marker, e.g.
/// a paragraph mark that was inserted by one author and deleted by another.
pub type Markers = SmallVec<[RevisionMarker; 1]>;

/// A property-change record holding the complete prior property snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange<T> {
    /// Author/date/id
    pub info: RevisionInfo,
    /// Prior snapshot; `None` only for malformed input
    pub prior: Option<T>,
}

impl<T> PropertyChange<T> {
    /// Create a record with a prior snapshot.
    pub fn new(info: RevisionInfo, prior: T) -> Self {
        Self {
            info,
            prior: Some(prior),
        }
    }
}

/// A property set paired with an optional change record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracked<T> {
    /// Properties as they are now
    pub current: T,
    /// Change record, if the properties were edited with tracking on
    pub change: Option<PropertyChange<T>>,
}

impl<T> Tracked<T> {
    /// Untracked properties.
    pub fn new(current: T) -> Self {
        Self {
            current,
            change: None,
        }
    }

    /// Properties with a change record.
    pub fn changed(current: T, info: RevisionInfo, prior: T) -> Self {
        Self {
            current,
            change: Some(PropertyChange::new(info, prior)),
        }
    }

    /// Whether a change record is attached.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.change.is_some()
    }
}
