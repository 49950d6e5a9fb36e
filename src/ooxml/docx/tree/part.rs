/// Story parts and their block-level content.
use super::element::{Element, Tag};
use super::paragraph::Paragraph;
use super::properties::SectionProperties;
use super::table::Table;
use std::fmt;

/// Kind of story a part holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// `word/document.xml`
    MainDocument,
    /// `word/headerN.xml`
    Header,
    /// `word/footerN.xml`
    Footer,
    /// `word/footnotes.xml`
    Footnotes,
    /// `word/endnotes.xml`
    Endnotes,
}

impl PartKind {
    /// Qualified name of the part's root element.
    pub const fn root_name(self) -> &'static str {
        match self {
            Self::MainDocument => "w:document",
            Self::Header => "w:hdr",
            Self::Footer => "w:ftr",
            Self::Footnotes => "w:footnotes",
            Self::Endnotes => "w:endnotes",
        }
    }

    /// Whether block content lives inside a `w:body` element.
    #[inline]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::MainDocument)
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainDocument => write!(f, "Main Document"),
            Self::Header => write!(f, "Header"),
            Self::Footer => write!(f, "Footer"),
            Self::Footnotes => write!(f, "Footnotes"),
            Self::Endnotes => write!(f, "Endnotes"),
        }
    }
}

/// The content tree of one story part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part name within the package (`/word/document.xml`)
    pub name: String,
    /// Story kind
    pub kind: PartKind,
    /// Root element start tag, namespace declarations included
    pub root: Tag,
    /// Root children before `w:body` (`w:background`)
    pub leading: Vec<Element>,
    /// `w:body` start tag, main document only
    pub body: Option<Tag>,
    /// Block content
    pub content: Vec<Block>,
    /// Final section properties (`w:body/w:sectPr`)
    pub section: Option<SectionProperties>,
}

impl Part {
    /// An empty part with the usual WordprocessingML namespace declaration.
    pub fn new(name: impl Into<String>, kind: PartKind) -> Self {
        let mut root = Tag::new(kind.root_name());
        root.attributes.push(super::element::Attribute::new(
            "xmlns:w",
            crate::ooxml::opc::constants::namespace::WML_MAIN,
        ));
        Self {
            name: name.into(),
            kind,
            root,
            leading: Vec::new(),
            body: kind.has_body().then(|| Tag::new("w:body")),
            content: Vec::new(),
            section: None,
        }
    }

    /// Builder: set the block content.
    pub fn with_content(mut self, content: Vec<Block>) -> Self {
        self.content = content;
        self
    }

    /// Iterate over top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over top-level tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// A block-level content control (`w:sdt`)
    ContentControl(BlockContentControl),
    /// A footnote or endnote (`w:footnote`, `w:endnote`)
    Note(Note),
    /// Anything else (bookmarks, range markers, `w:altChunk`)
    Other(Element),
}

/// A block-level content control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContentControl {
    /// `w:sdtPr`
    pub properties: Option<Element>,
    /// `w:sdtEndPr`
    pub end_properties: Option<Element>,
    /// `w:sdtContent` children
    pub content: Vec<Block>,
}

/// A footnote or endnote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// `w:footnote`/`w:endnote` start tag with its id and type
    pub tag: Tag,
    /// Note content
    pub content: Vec<Block>,
}
