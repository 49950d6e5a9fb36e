/// Binding of parsed story-part markup to the content tree.
///
/// Works on the owned [`Element`] tree produced by [`super::dom::parse`],
/// moving nodes into the typed tree without copying their subtrees.
use super::dom;
use crate::ooxml::docx::tree::{
    Block, BlockContentControl, Cell, CellMerge, CellProperties, Element, FieldChar,
    FieldCharKind, Inline, InlineContentControl, InlineGroup, MarkerKind, Markers, Node, Note,
    NumberingChange, NumberingReference, Paragraph, ParagraphProperties,
    ParagraphProperty, Part, PartKind, PropertyChange, PropertySet, RevisionInfo,
    RevisionMarker, Row, RowContent, RowProperties, Run, RunContent, RunProperties,
    SectionProperties, Table, TableContent, Text, Tracked, TrackedInline,
};
use crate::ooxml::error::{OoxmlError, Result};

/// Parse a story part.
///
/// # Arguments
///
/// * `name` - Part name inside the package, used in error reports
/// * `kind` - Story kind; the root element must match it
/// * `xml_bytes` - The part's XML
///
/// # Example
///
/// ```rust
/// use redline::ooxml::docx::tree::PartKind;
/// use redline::ooxml::docx::xml::read_part;
///
/// let xml = br#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
///   <w:p><w:r><w:t>Page header</w:t></w:r></w:p>
/// </w:hdr>"#;
/// let part = read_part("/word/header1.xml", PartKind::Header, xml)?;
/// assert_eq!(part.paragraphs().next().unwrap().text(), "Page header");
/// # Ok::<(), redline::ooxml::OoxmlError>(())
/// ```
pub fn read_part(name: &str, kind: PartKind, xml_bytes: &[u8]) -> Result<Part> {
    part_from_element(name, kind, dom::parse(xml_bytes)?)
}

/// Bind an already parsed root element.
pub fn part_from_element(name: &str, kind: PartKind, root: Element) -> Result<Part> {
    if root.name != kind.root_name() {
        return Err(OoxmlError::InvalidFormat(format!(
            "{}: expected <{}> root, found <{}>",
            name,
            kind.root_name(),
            root.name
        )));
    }

    let mut part = Part {
        name: name.to_string(),
        kind,
        root: root.tag(),
        leading: Vec::new(),
        body: None,
        content: Vec::new(),
        section: None,
    };
    let mut binder = Binder::default();

    if !kind.has_body() {
        part.content = binder.blocks(root.children)?;
        return Ok(part);
    }

    for child in elements(root.children) {
        if child.name != "w:body" || part.body.is_some() {
            part.leading.push(child);
            continue;
        }
        part.body = Some(child.tag());
        let mut blocks: Vec<Element> = elements(child.children).collect();
        if blocks.last().is_some_and(|e| e.name == "w:sectPr") {
            part.section = blocks.pop().map(section_properties);
        }
        part.content = blocks
            .into_iter()
            .map(|b| binder.block(b))
            .collect::<Result<_>>()?;
    }

    if part.body.is_none() {
        return Err(OoxmlError::InvalidFormat(format!("{}: missing <w:body>", name)));
    }
    Ok(part)
}

/// Child elements, dropping character data between them.
fn elements(children: Vec<Node>) -> impl Iterator<Item = Element> {
    children.into_iter().filter_map(|n| match n {
        Node::Element(e) => Some(e),
        Node::Text(_) => None,
    })
}

/// Revision info from `w:id`, `w:author` and `w:date`.
fn revision_info(element: &Element) -> RevisionInfo {
    RevisionInfo {
        id: element.attr("w:id").unwrap_or_default().to_string(),
        author: element.attr("w:author").map(str::to_string),
        date: element.attr("w:date").map(str::to_string),
    }
}

/// Open move ranges of one direction.
#[derive(Debug, Default)]
pub(crate) struct MoveRanges {
    /// `(w:id, w:name)` of ranges started and not yet ended
    open: Vec<(String, String)>,
    /// Name of the most recently started range
    last: Option<String>,
}

impl MoveRanges {
    pub(crate) fn start(&mut self, element: &Element) {
        let id = element.attr("w:id").unwrap_or_default().to_string();
        let Some(name) = element.attr("w:name") else {
            return;
        };
        self.open.push((id, name.to_string()));
        self.last = Some(name.to_string());
    }

    pub(crate) fn end(&mut self, element: &Element) {
        let id = element.attr("w:id").unwrap_or_default();
        if let Some(pos) = self.open.iter().rposition(|(open, _)| open == id) {
            self.open.remove(pos);
        }
    }

    pub(crate) fn current(&self) -> Option<String> {
        self.open
            .last()
            .map(|(_, name)| name.clone())
            .or_else(|| self.last.clone())
    }
}

/// Markup-to-tree binder. Tracks open move ranges in document order.
#[derive(Debug, Default)]
struct Binder {
    move_from: MoveRanges,
    move_to: MoveRanges,
}

impl Binder {
    /// Record range boundaries inside markup carried opaquely.
    fn observe(&mut self, element: &Element) {
        match element.name.as_str() {
            "w:moveFromRangeStart" => self.move_from.start(element),
            "w:moveFromRangeEnd" => self.move_from.end(element),
            "w:moveToRangeStart" => self.move_to.start(element),
            "w:moveToRangeEnd" => self.move_to.end(element),
            _ => {
                for child in element.child_elements() {
                    self.observe(child);
                }
            },
        }
    }

    fn marker(&self, kind: MarkerKind, element: &Element) -> RevisionMarker {
        let move_id = match kind {
            MarkerKind::MovedFrom => self.move_from.current(),
            MarkerKind::MovedTo => self.move_to.current(),
            MarkerKind::Inserted | MarkerKind::Deleted => None,
        };
        RevisionMarker {
            kind,
            info: revision_info(element),
            move_id,
        }
    }

    fn blocks(&mut self, children: Vec<Node>) -> Result<Vec<Block>> {
        elements(children).map(|e| self.block(e)).collect()
    }

    fn block(&mut self, element: Element) -> Result<Block> {
        Ok(match element.name.as_str() {
            "w:p" => Block::Paragraph(self.paragraph(element)?),
            "w:tbl" => Block::Table(self.table(element)?),
            "w:sdt" => Block::ContentControl(self.block_content_control(element)?),
            "w:footnote" | "w:endnote" => Block::Note(Note {
                tag: element.tag(),
                content: self.blocks(element.children)?,
            }),
            _ => {
                self.observe(&element);
                Block::Other(element)
            },
        })
    }

    fn block_content_control(&mut self, element: Element) -> Result<BlockContentControl> {
        let mut sdt = BlockContentControl {
            properties: None,
            end_properties: None,
            content: Vec::new(),
        };
        for child in elements(element.children) {
            match child.name.as_str() {
                "w:sdtPr" => sdt.properties = Some(child),
                "w:sdtEndPr" => sdt.end_properties = Some(child),
                "w:sdtContent" => sdt.content = self.blocks(child.children)?,
                _ => {},
            }
        }
        Ok(sdt)
    }

    fn paragraph(&mut self, element: Element) -> Result<Paragraph> {
        let mut paragraph = Paragraph {
            attributes: element.attributes,
            ..Paragraph::default()
        };
        let mut mark_markers = Vec::new();

        for child in elements(element.children) {
            if child.name == "w:pPr" {
                let (properties, markers) = paragraph_properties(child);
                paragraph.properties = properties;
                mark_markers = markers;
            } else {
                paragraph.content.push(self.inline(child)?);
            }
        }

        // The mark terminates the paragraph, so its move markers belong to
        // whichever range is open after the inline content.
        for (kind, marker) in mark_markers {
            let marker = self.marker(kind, &marker);
            paragraph.properties.mark.markers.push(marker);
        }
        Ok(paragraph)
    }

    fn inlines(&mut self, children: Vec<Node>) -> Result<Vec<Inline>> {
        elements(children).map(|e| self.inline(e)).collect()
    }

    fn inline(&mut self, element: Element) -> Result<Inline> {
        if let Some(kind) = MarkerKind::from_element_name(&element.name) {
            let marker = self.marker(kind, &element);
            let content = self.inlines(element.children)?;
            return Ok(Inline::Tracked(TrackedInline::new(marker, content)));
        }

        Ok(match element.name.as_str() {
            "w:r" => Inline::Run(self.run(element)),
            "w:sdt" => Inline::ContentControl(self.inline_content_control(element)?),
            "w:hyperlink" | "w:smartTag" | "w:customXml" | "w:fldSimple" | "w:dir"
            | "w:bdo" => Inline::Group(self.group(element)?),
            _ => {
                self.observe(&element);
                Inline::Other(element)
            },
        })
    }

    fn inline_content_control(&mut self, element: Element) -> Result<InlineContentControl> {
        let mut sdt = InlineContentControl {
            properties: None,
            end_properties: None,
            content: Vec::new(),
        };
        for child in elements(element.children) {
            match child.name.as_str() {
                "w:sdtPr" => sdt.properties = Some(child),
                "w:sdtEndPr" => sdt.end_properties = Some(child),
                "w:sdtContent" => sdt.content = self.inlines(child.children)?,
                _ => {},
            }
        }
        Ok(sdt)
    }

    fn run(&mut self, element: Element) -> Run {
        let mut run = Run {
            attributes: element.attributes,
            ..Run::default()
        };
        for child in elements(element.children) {
            let content = match child.name.as_str() {
                "w:rPr" => {
                    run.properties = Some(run_properties(child));
                    continue;
                },
                "w:t" | "w:delText" => RunContent::Text(text(child)),
                "w:instrText" | "w:delInstrText" => RunContent::InstrText(text(child)),
                "w:fldChar" => match field_char(child) {
                    Ok(fld) => RunContent::FieldChar(fld),
                    Err(other) => RunContent::Other(other),
                },
                _ => {
                    // Drawings can hold text boxes with their own move ranges.
                    self.observe(&child);
                    RunContent::Other(child)
                },
            };
            run.content.push(content);
        }
        run
    }

    fn group(&mut self, element: Element) -> Result<InlineGroup> {
        let mut group = InlineGroup {
            name: element.name,
            attributes: element.attributes,
            properties: None,
            content: Vec::new(),
        };
        for child in elements(element.children) {
            let is_properties = group.properties.is_none()
                && group.content.is_empty()
                && matches!(
                    child.name.as_str(),
                    "w:customXmlPr" | "w:smartTagPr" | "w:fldData"
                );
            if is_properties {
                group.properties = Some(child);
            } else {
                group.content.push(self.inline(child)?);
            }
        }
        Ok(group)
    }

    fn table(&mut self, element: Element) -> Result<Table> {
        let mut table = Table::default();
        for child in elements(element.children) {
            match child.name.as_str() {
                "w:tblPr" => table.properties = tracked(child, "w:tblPrChange", "w:tblPr"),
                "w:tblGrid" => table.grid = tracked(child, "w:tblGridChange", "w:tblGrid"),
                "w:tr" => table.content.push(TableContent::Row(self.row(child)?)),
                _ => {
                    self.observe(&child);
                    table.content.push(TableContent::Other(child));
                },
            }
        }
        Ok(table)
    }

    fn row(&mut self, element: Element) -> Result<Row> {
        let mut row = Row {
            attributes: element.attributes,
            ..Row::default()
        };
        for child in elements(element.children) {
            match child.name.as_str() {
                "w:tblPrEx" => {
                    row.exceptions = Some(tracked(child, "w:tblPrExChange", "w:tblPrEx"));
                },
                "w:trPr" => row.properties = row_properties(child),
                "w:tc" => row.content.push(RowContent::Cell(self.cell(child)?)),
                _ => {
                    self.observe(&child);
                    row.content.push(RowContent::Other(child));
                },
            }
        }
        Ok(row)
    }

    fn cell(&mut self, element: Element) -> Result<Cell> {
        let mut cell = Cell::default();
        for child in elements(element.children) {
            if child.name == "w:tcPr" && cell.content.is_empty() {
                cell.properties = cell_properties(child);
            } else {
                cell.content.push(self.block(child)?);
            }
        }
        Ok(cell)
    }
}

fn row_properties(element: Element) -> RowProperties {
    let mut markers = Markers::new();
    let properties = split_tracked(element, "w:trPrChange", "w:trPr", |child| {
        match MarkerKind::from_element_name(&child.name) {
            Some(kind @ (MarkerKind::Inserted | MarkerKind::Deleted)) => {
                markers.push(RevisionMarker::new(kind, revision_info(&child)));
                None
            },
            _ => Some(child),
        }
    });
    RowProperties {
        properties,
        markers,
    }
}

fn text(element: Element) -> Text {
    Text {
        value: element.text(),
        deleted: element.name.starts_with("w:del"),
        attributes: element.attributes,
    }
}

/// A `w:fldChar` with a recognized type, or the element unchanged.
fn field_char(mut element: Element) -> std::result::Result<FieldChar, Element> {
    let Some(kind) = element.attr("w:fldCharType").and_then(FieldCharKind::parse) else {
        return Err(element);
    };
    element.attributes.retain(|a| a.name != "w:fldCharType");
    Ok(FieldChar {
        kind,
        attributes: element.attributes,
        children: elements(element.children).collect(),
    })
}

fn run_properties(element: Element) -> RunProperties {
    tracked(element, "w:rPrChange", "w:rPr")
}

/// Split a property container into current properties and its change record.
fn tracked(element: Element, change: &str, snapshot: &str) -> Tracked<PropertySet> {
    split_tracked(element, change, snapshot, Some)
}

/// Like [`tracked`], offering every other child to `other` first; children
/// for which it returns `None` are consumed.
fn split_tracked(
    element: Element,
    change: &str,
    snapshot: &str,
    mut other: impl FnMut(Element) -> Option<Element>,
) -> Tracked<PropertySet> {
    let mut properties = Tracked::<PropertySet>::default();
    for child in elements(element.children) {
        if child.name == change {
            let info = revision_info(&child);
            let prior = elements(child.children)
                .find(|e| e.name == snapshot)
                .map(|s| elements(s.children).collect());
            properties.change = Some(PropertyChange { info, prior });
        } else if let Some(child) = other(child) {
            properties.current.elements.push(child);
        }
    }
    properties
}

fn section_properties(element: Element) -> SectionProperties {
    SectionProperties {
        attributes: element.attributes.clone(),
        properties: tracked(element, "w:sectPrChange", "w:sectPr"),
    }
}

/// Paragraph properties plus the mark's markers, bound later.
fn paragraph_properties(element: Element) -> (ParagraphProperties, Vec<(MarkerKind, Element)>) {
    let mut properties = ParagraphProperties::default();
    let mut markers = Vec::new();

    for child in elements(element.children) {
        match child.name.as_str() {
            "w:rPr" => {
                properties.mark.properties = split_tracked(child, "w:rPrChange", "w:rPr", |e| {
                    match MarkerKind::from_element_name(&e.name) {
                        Some(kind) => {
                            markers.push((kind, e));
                            None
                        },
                        None => Some(e),
                    }
                });
            },
            "w:sectPr" => properties.section = Some(section_properties(child)),
            "w:pPrChange" => {
                let info = revision_info(&child);
                let prior = elements(child.children)
                    .find(|e| e.name == "w:pPr")
                    .map(|p| elements(p.children).map(paragraph_property).collect());
                properties.items.change = Some(PropertyChange { info, prior });
            },
            _ => properties.items.current.push(paragraph_property(child)),
        }
    }
    (properties, markers)
}

fn paragraph_property(element: Element) -> ParagraphProperty {
    if element.name != "w:numPr" {
        return ParagraphProperty::Other(element);
    }
    let mut numbering = NumberingReference::default();
    for child in elements(element.children) {
        match child.name.as_str() {
            "w:ins" => numbering.inserted = Some(revision_info(&child)),
            "w:numberingChange" => {
                numbering.change = Some(NumberingChange {
                    info: revision_info(&child),
                    original: child.attr("w:original").map(str::to_string),
                });
            },
            _ => numbering.elements.push(child),
        }
    }
    ParagraphProperty::Numbering(numbering)
}

fn cell_properties(element: Element) -> CellProperties {
    let mut markers = Markers::new();
    let mut merge = None;
    let properties = split_tracked(element, "w:tcPrChange", "w:tcPr", |child| {
        match child.name.as_str() {
            "w:cellIns" => markers.push(RevisionMarker::new(
                MarkerKind::Inserted,
                revision_info(&child),
            )),
            "w:cellDel" => markers.push(RevisionMarker::new(
                MarkerKind::Deleted,
                revision_info(&child),
            )),
            "w:cellMerge" => {
                merge = Some(CellMerge {
                    info: revision_info(&child),
                    merge: child.attr("w:vMerge").map(str::to_string),
                    original: child.attr("w:vMergeOrig").map(str::to_string),
                });
            },
            _ => return Some(child),
        }
        None
    });
    CellProperties {
        properties,
        markers,
        merge,
    }
}
