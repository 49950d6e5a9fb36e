/// Paragraphs, runs and the inline content between them.
use super::element::{Attribute, Element};
use super::properties::{ParagraphProperties, RunProperties};
use super::revision::RevisionMarker;

/// A paragraph (`w:p`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Attributes of `w:p` (rsids, `w14:paraId`)
    pub attributes: Vec<Attribute>,
    /// Paragraph properties, including the paragraph mark
    pub properties: ParagraphProperties,
    /// Inline content in source order
    pub content: Vec<Inline>,
}

impl Paragraph {
    /// An empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph holding one plain run of text.
    pub fn with_text(text: &str) -> Self {
        Self {
            content: vec![Inline::Run(Run::text(text))],
            ..Self::default()
        }
    }

    /// Builder: append inline content.
    pub fn push(mut self, inline: Inline) -> Self {
        self.content.push(inline);
        self
    }

    /// Builder: set paragraph properties.
    pub fn with_properties(mut self, properties: ParagraphProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Builder: add a revision marker to the paragraph mark.
    pub fn with_mark(mut self, marker: RevisionMarker) -> Self {
        self.properties.mark.markers.push(marker);
        self
    }

    /// Visible text, including text inside revision wrappers.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in &self.content {
            inline.collect_text(&mut out);
        }
        out
    }
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A run of text (`w:r`)
    Run(Run),
    /// A revision wrapper (`w:ins`, `w:del`, `w:moveFrom`, `w:moveTo`)
    Tracked(TrackedInline),
    /// An inline content control (`w:sdt`)
    ContentControl(InlineContentControl),
    /// A plain container of inline content (`w:hyperlink`, `w:smartTag`,
    /// `w:customXml`, `w:fldSimple`, `w:dir`, `w:bdo`)
    Group(InlineGroup),
    /// Anything else (bookmarks, comment ranges, math, range markers)
    Other(Element),
}

impl Inline {
    /// Wrap content in an insertion.
    pub fn inserted(id: &str, content: Vec<Inline>) -> Self {
        Self::Tracked(TrackedInline::new(RevisionMarker::inserted(id), content))
    }

    /// Wrap content in a deletion. Text is converted to its deleted form.
    pub fn deleted(id: &str, content: Vec<Inline>) -> Self {
        Self::Tracked(TrackedInline::new(
            RevisionMarker::deleted(id),
            content.into_iter().map(Inline::into_deleted_form).collect(),
        ))
    }

    /// Convert `w:t`/`w:instrText` to `w:delText`/`w:delInstrText`.
    pub fn into_deleted_form(self) -> Self {
        match self {
            Self::Run(mut run) => {
                for item in &mut run.content {
                    match item {
                        RunContent::Text(t) | RunContent::InstrText(t) => t.deleted = true,
                        RunContent::FieldChar(_) | RunContent::Other(_) => {},
                    }
                }
                Self::Run(run)
            },
            other => other,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Run(run) => out.push_str(&run.text_content()),
            Self::Tracked(t) => t.content.iter().for_each(|i| i.collect_text(out)),
            Self::ContentControl(c) => c.content.iter().for_each(|i| i.collect_text(out)),
            Self::Group(g) => g.content.iter().for_each(|i| i.collect_text(out)),
            Self::Other(_) => {},
        }
    }
}

/// A revision wrapper around inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedInline {
    /// The wrapper's marker
    pub marker: RevisionMarker,
    /// Wrapped content
    pub content: Vec<Inline>,
}

impl TrackedInline {
    /// Create a wrapper.
    pub fn new(marker: RevisionMarker, content: Vec<Inline>) -> Self {
        Self { marker, content }
    }
}

/// An inline content control (`w:sdt` inside a paragraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineContentControl {
    /// `w:sdtPr`
    pub properties: Option<Element>,
    /// `w:sdtEndPr`
    pub end_properties: Option<Element>,
    /// `w:sdtContent` children
    pub content: Vec<Inline>,
}

/// A container of inline content with no revision semantics of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineGroup {
    /// Qualified element name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Properties element that precedes the content (`w:customXmlPr`,
    /// `w:smartTagPr`)
    pub properties: Option<Element>,
    /// Contained inline content
    pub content: Vec<Inline>,
}

/// A run (`w:r`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// Attributes of `w:r` (rsids)
    pub attributes: Vec<Attribute>,
    /// Run properties (`w:rPr`), absent when the source had none
    pub properties: Option<RunProperties>,
    /// Run content in source order
    pub content: Vec<RunContent>,
}

impl Run {
    /// A plain run holding `text`.
    pub fn text(text: &str) -> Self {
        Self {
            content: vec![RunContent::Text(Text::new(text))],
            ..Self::default()
        }
    }

    /// A run holding a field structural marker.
    pub fn field_char(kind: FieldCharKind) -> Self {
        Self {
            content: vec![RunContent::FieldChar(FieldChar::new(kind))],
            ..Self::default()
        }
    }

    /// A run holding field instruction text.
    pub fn instr_text(text: &str) -> Self {
        Self {
            content: vec![RunContent::InstrText(Text::new(text))],
            ..Self::default()
        }
    }

    /// Builder: set run properties.
    pub fn with_properties(mut self, properties: RunProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Concatenated text of `w:t` and `w:delText` children.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(t) => Some(t.value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the run holds a field begin/separate/end marker.
    pub fn has_field_char(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, RunContent::FieldChar(_)))
    }
}

/// Content of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// `w:t`, or `w:delText` when `deleted`
    Text(Text),
    /// `w:instrText`, or `w:delInstrText` when `deleted`
    InstrText(Text),
    /// `w:fldChar`
    FieldChar(FieldChar),
    /// Anything else (`w:tab`, `w:br`, `w:drawing`, `w:footnoteReference`)
    Other(Element),
}

/// Character data of a text or instruction element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// Unescaped text
    pub value: String,
    /// Deleted representation (`w:delText`, `w:delInstrText`)
    pub deleted: bool,
    /// Attributes (`xml:space`)
    pub attributes: Vec<Attribute>,
}

impl Text {
    /// Normal (not deleted) text that preserves its whitespace.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            deleted: false,
            attributes: vec![Attribute::new("xml:space", "preserve")],
        }
    }
}

/// Kind of a field structural marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCharKind {
    /// Start of the field (`begin`)
    Begin,
    /// Boundary between instruction and result (`separate`)
    Separate,
    /// End of the field (`end`)
    End,
}

impl FieldCharKind {
    /// Parse `w:fldCharType`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "begin" => Some(Self::Begin),
            "separate" => Some(Self::Separate),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    /// Value of `w:fldCharType`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Separate => "separate",
            Self::End => "end",
        }
    }
}

/// A field structural marker (`w:fldChar`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChar {
    /// Begin, separate or end
    pub kind: FieldCharKind,
    /// Remaining attributes (`w:dirty`, `w:fldLock`)
    pub attributes: Vec<Attribute>,
    /// Children (`w:ffData`)
    pub children: Vec<Element>,
}

impl FieldChar {
    /// Marker without extra attributes.
    pub fn new(kind: FieldCharKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }
}
