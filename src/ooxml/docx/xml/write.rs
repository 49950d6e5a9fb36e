/// Serialization of the content tree back to story-part markup.
///
/// Child order follows the WordprocessingML schema sequences: properties
/// first, then markers, then change records.
use super::dom::{XML_DECLARATION, close_tag, open_tag, write_element};
use crate::common::xml::{escape_text, escape_xml};
use crate::ooxml::docx::tree::{
    Attribute, Block, Cell, CellProperties, Element, Inline, InlineGroup, MarkerKind,
    ParagraphProperties, ParagraphProperty, Part, PropertySet, RevisionInfo, RevisionMarker,
    Row, RowContent, Run, RunContent, SectionProperties, Table, TableContent, Tag, Text,
    Tracked,
};
use std::fmt::Write as FmtWrite;

/// Serialize a story part as a standalone XML document.
///
/// # Performance
///
/// Writes into a single pre-sized buffer.
pub fn write_part(part: &Part) -> String {
    let mut xml = String::with_capacity(8192);
    xml.push_str(XML_DECLARATION);
    part.to_xml(&mut xml);
    xml
}

/// Types that append their own markup to a buffer.
pub trait ToXml {
    fn to_xml(&self, xml: &mut String);
}

impl ToXml for Part {
    fn to_xml(&self, xml: &mut String) {
        write_start(xml, &self.root);
        for element in &self.leading {
            write_element(xml, element);
        }
        match &self.body {
            Some(body) => {
                write_start(xml, body);
                write_blocks(xml, &self.content);
                if let Some(section) = &self.section {
                    section.to_xml(xml);
                }
                close_tag(xml, &body.name);
            },
            None => write_blocks(xml, &self.content),
        }
        close_tag(xml, &self.root.name);
    }
}

fn write_start(xml: &mut String, tag: &Tag) {
    open_tag(xml, &tag.name, &tag.attributes, false);
}

fn write_blocks(xml: &mut String, blocks: &[Block]) {
    for block in blocks {
        block.to_xml(xml);
    }
}

impl ToXml for Block {
    fn to_xml(&self, xml: &mut String) {
        match self {
            Block::Paragraph(p) => {
                open_tag(xml, "w:p", &p.attributes, false);
                p.properties.to_xml(xml);
                write_inlines(xml, &p.content);
                close_tag(xml, "w:p");
            },
            Block::Table(t) => t.to_xml(xml),
            Block::ContentControl(sdt) => {
                xml.push_str("<w:sdt>");
                if let Some(props) = &sdt.properties {
                    write_element(xml, props);
                }
                if let Some(props) = &sdt.end_properties {
                    write_element(xml, props);
                }
                xml.push_str("<w:sdtContent>");
                write_blocks(xml, &sdt.content);
                xml.push_str("</w:sdtContent></w:sdt>");
            },
            Block::Note(note) => {
                write_start(xml, &note.tag);
                write_blocks(xml, &note.content);
                close_tag(xml, &note.tag.name);
            },
            Block::Other(element) => write_element(xml, element),
        }
    }
}

fn write_inlines(xml: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        inline.to_xml(xml);
    }
}

impl ToXml for Inline {
    fn to_xml(&self, xml: &mut String) {
        match self {
            Inline::Run(run) => run.to_xml(xml),
            Inline::Tracked(tracked) => {
                let name = tracked.marker.kind.element_name();
                write_marker_start(xml, name, &tracked.marker.info, false);
                write_inlines(xml, &tracked.content);
                close_tag(xml, name);
            },
            Inline::ContentControl(sdt) => {
                xml.push_str("<w:sdt>");
                if let Some(props) = &sdt.properties {
                    write_element(xml, props);
                }
                if let Some(props) = &sdt.end_properties {
                    write_element(xml, props);
                }
                xml.push_str("<w:sdtContent>");
                write_inlines(xml, &sdt.content);
                xml.push_str("</w:sdtContent></w:sdt>");
            },
            Inline::Group(group) => group.to_xml(xml),
            Inline::Other(element) => write_element(xml, element),
        }
    }
}

impl ToXml for InlineGroup {
    fn to_xml(&self, xml: &mut String) {
        let empty = self.properties.is_none() && self.content.is_empty();
        open_tag(xml, &self.name, &self.attributes, empty);
        if empty {
            return;
        }
        if let Some(props) = &self.properties {
            write_element(xml, props);
        }
        write_inlines(xml, &self.content);
        close_tag(xml, &self.name);
    }
}

impl ToXml for Run {
    fn to_xml(&self, xml: &mut String) {
        open_tag(xml, "w:r", &self.attributes, false);
        if let Some(props) = &self.properties {
            write_tracked(xml, "w:rPr", &[], props, "w:rPrChange", "");
        }
        for content in &self.content {
            match content {
                RunContent::Text(t) => {
                    write_text(xml, if t.deleted { "w:delText" } else { "w:t" }, t);
                },
                RunContent::InstrText(t) => {
                    let name = if t.deleted { "w:delInstrText" } else { "w:instrText" };
                    write_text(xml, name, t);
                },
                RunContent::FieldChar(fld) => {
                    let _ = write!(xml, "<w:fldChar w:fldCharType=\"{}\"", fld.kind.as_str());
                    write_attributes(xml, &fld.attributes);
                    if fld.children.is_empty() {
                        xml.push_str("/>");
                    } else {
                        xml.push('>');
                        for child in &fld.children {
                            write_element(xml, child);
                        }
                        xml.push_str("</w:fldChar>");
                    }
                },
                RunContent::Other(element) => write_element(xml, element),
            }
        }
        close_tag(xml, "w:r");
    }
}

fn write_text(xml: &mut String, name: &str, text: &Text) {
    open_tag(xml, name, &text.attributes, false);
    xml.push_str(&escape_text(&text.value));
    close_tag(xml, name);
}

fn write_attributes(xml: &mut String, attributes: &[Attribute]) {
    for attr in attributes {
        let _ = write!(xml, " {}=\"{}\"", attr.name, escape_xml(&attr.value));
    }
}

/// Write the start tag of a revision element: `w:id`, `w:author`,
/// `w:date`, then any record-specific attributes.
fn write_revision_start(
    xml: &mut String,
    name: &str,
    info: &RevisionInfo,
    extra: &[(&str, Option<&String>)],
    empty: bool,
) {
    let _ = write!(xml, "<{} w:id=\"{}\"", name, escape_xml(&info.id));
    if let Some(author) = &info.author {
        let _ = write!(xml, " w:author=\"{}\"", escape_xml(author));
    }
    if let Some(date) = &info.date {
        let _ = write!(xml, " w:date=\"{}\"", escape_xml(date));
    }
    for (attr, value) in extra {
        if let Some(value) = value {
            let _ = write!(xml, " {}=\"{}\"", attr, escape_xml(value));
        }
    }
    xml.push_str(if empty { "/>" } else { ">" });
}

#[inline]
fn write_marker_start(xml: &mut String, name: &str, info: &RevisionInfo, empty: bool) {
    write_revision_start(xml, name, info, &[], empty);
}

fn write_markers(xml: &mut String, markers: &[RevisionMarker], cell: bool) {
    for marker in markers {
        let name = match (cell, marker.kind) {
            (true, MarkerKind::Inserted) => "w:cellIns",
            (true, MarkerKind::Deleted) => "w:cellDel",
            (_, kind) => kind.element_name(),
        };
        write_marker_start(xml, name, &marker.info, true);
    }
}

fn write_elements(xml: &mut String, elements: &[Element]) {
    for element in elements {
        write_element(xml, element);
    }
}

/// Write a property container: current properties, then `extra` (markers
/// already rendered), then the change record.
fn write_tracked(
    xml: &mut String,
    name: &str,
    attributes: &[Attribute],
    properties: &Tracked<PropertySet>,
    change: &str,
    extra: &str,
) {
    let empty = properties.current.is_empty() && properties.change.is_none() && extra.is_empty();
    open_tag(xml, name, attributes, empty);
    if empty {
        return;
    }
    write_elements(xml, &properties.current.elements);
    xml.push_str(extra);
    if let Some(record) = &properties.change {
        write_marker_start(xml, change, &record.info, record.prior.is_none());
        if let Some(prior) = &record.prior {
            open_tag(xml, name, &[], prior.is_empty());
            if !prior.is_empty() {
                write_elements(xml, &prior.elements);
                close_tag(xml, name);
            }
            close_tag(xml, change);
        }
    }
    close_tag(xml, name);
}

fn write_paragraph_items(xml: &mut String, items: &[ParagraphProperty]) {
    for item in items {
        match item {
            ParagraphProperty::Other(element) => write_element(xml, element),
            ParagraphProperty::Numbering(numbering) => {
                xml.push_str("<w:numPr>");
                write_elements(xml, &numbering.elements);
                if let Some(change) = &numbering.change {
                    write_revision_start(
                        xml,
                        "w:numberingChange",
                        &change.info,
                        &[("w:original", change.original.as_ref())],
                        true,
                    );
                }
                if let Some(inserted) = &numbering.inserted {
                    write_marker_start(xml, "w:ins", inserted, true);
                }
                xml.push_str("</w:numPr>");
            },
        }
    }
}

impl ToXml for ParagraphProperties {
    fn to_xml(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:pPr>");
        write_paragraph_items(xml, &self.items.current);

        let mark = &self.mark;
        if !mark.is_empty() {
            let mut markers = String::new();
            write_markers(&mut markers, &mark.markers, false);
            xml.push_str("<w:rPr>");
            xml.push_str(&markers);
            write_elements(xml, &mark.properties.current.elements);
            if let Some(record) = &mark.properties.change {
                write_marker_start(xml, "w:rPrChange", &record.info, record.prior.is_none());
                if let Some(prior) = &record.prior {
                    xml.push_str("<w:rPr>");
                    write_elements(xml, &prior.elements);
                    xml.push_str("</w:rPr></w:rPrChange>");
                }
            }
            xml.push_str("</w:rPr>");
        }

        if let Some(section) = &self.section {
            section.to_xml(xml);
        }
        if let Some(record) = &self.items.change {
            write_marker_start(xml, "w:pPrChange", &record.info, record.prior.is_none());
            if let Some(prior) = &record.prior {
                xml.push_str("<w:pPr>");
                write_paragraph_items(xml, prior);
                xml.push_str("</w:pPr></w:pPrChange>");
            }
        }
        xml.push_str("</w:pPr>");
    }
}

impl ToXml for SectionProperties {
    fn to_xml(&self, xml: &mut String) {
        write_tracked(
            xml,
            "w:sectPr",
            &self.attributes,
            &self.properties,
            "w:sectPrChange",
            "",
        );
    }
}

impl ToXml for Table {
    fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:tbl>");
        write_tracked(xml, "w:tblPr", &[], &self.properties, "w:tblPrChange", "");
        write_tracked(xml, "w:tblGrid", &[], &self.grid, "w:tblGridChange", "");
        for content in &self.content {
            match content {
                TableContent::Row(row) => row.to_xml(xml),
                TableContent::Other(element) => write_element(xml, element),
            }
        }
        xml.push_str("</w:tbl>");
    }
}

impl ToXml for Row {
    fn to_xml(&self, xml: &mut String) {
        open_tag(xml, "w:tr", &self.attributes, false);
        if let Some(exceptions) = &self.exceptions {
            write_tracked(xml, "w:tblPrEx", &[], exceptions, "w:tblPrExChange", "");
        }
        if !self.properties.is_empty() {
            let mut markers = String::new();
            write_markers(&mut markers, &self.properties.markers, false);
            write_tracked(
                xml,
                "w:trPr",
                &[],
                &self.properties.properties,
                "w:trPrChange",
                &markers,
            );
        }
        for content in &self.content {
            match content {
                RowContent::Cell(cell) => cell.to_xml(xml),
                RowContent::Other(element) => write_element(xml, element),
            }
        }
        xml.push_str("</w:tr>");
    }
}

impl ToXml for Cell {
    fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:tc>");
        self.properties.to_xml(xml);
        write_blocks(xml, &self.content);
        xml.push_str("</w:tc>");
    }
}

impl ToXml for CellProperties {
    fn to_xml(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        let mut extra = String::new();
        write_markers(&mut extra, &self.markers, true);
        if let Some(merge) = &self.merge {
            write_revision_start(
                &mut extra,
                "w:cellMerge",
                &merge.info,
                &[
                    ("w:vMerge", merge.merge.as_ref()),
                    ("w:vMergeOrig", merge.original.as_ref()),
                ],
                true,
            );
        }
        write_tracked(
            xml,
            "w:tcPr",
            &[],
            &self.properties,
            "w:tcPrChange",
            &extra,
        );
    }
}
