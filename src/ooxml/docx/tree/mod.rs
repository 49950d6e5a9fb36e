/// In-memory content tree of WordprocessingML story parts.
///
/// The tree is a closed set of node types. Nodes that can carry revision
/// markup are modeled explicitly; everything else is carried as opaque
/// [`Element`]s so the part round-trips unchanged.
///
/// # Architecture
///
/// - `Part`: one story part (main document, header, footer, notes)
/// - `Block`: paragraphs, tables, content controls, notes
/// - `Inline`: runs, revision wrappers, content controls, groups
/// - `Table`/`Row`/`Cell`: table structure with row and cell revisions
/// - `Tracked<T>`: a property set with its optional change record
///
/// # Example
///
/// ```rust
/// use redline::ooxml::docx::tree::{Block, Inline, Paragraph, Part, PartKind, Run};
///
/// let part = Part::new("/word/document.xml", PartKind::MainDocument).with_content(vec![
///     Block::Paragraph(
///         Paragraph::new()
///             .push(Inline::Run(Run::text("Hello ")))
///             .push(Inline::inserted("1", vec![Inline::Run(Run::text("world"))])),
///     ),
/// ]);
/// assert_eq!(part.paragraphs().next().unwrap().text(), "Hello world");
/// ```
pub mod element;
pub mod paragraph;
pub mod part;
pub mod path;
pub mod properties;
pub mod revision;
pub mod table;

pub use element::{Attribute, Element, Node, Tag};
pub use paragraph::{
    FieldChar, FieldCharKind, Inline, InlineContentControl, InlineGroup, Paragraph, Run,
    RunContent, Text, TrackedInline,
};
pub use part::{Block, BlockContentControl, Note, Part, PartKind};
pub use path::{NodePath, PathStep};
pub use properties::{
    CellMerge, CellProperties, NumberingChange, NumberingReference, ParagraphMark,
    ParagraphProperties, ParagraphProperty, PropertySet, RowProperties, RunProperties,
    SectionProperties,
};
pub use revision::{
    MarkerKind, Markers, PropertyChange, RevisionInfo, RevisionMarker, Tracked,
};
pub use table::{Cell, Row, RowContent, Table, TableContent};
