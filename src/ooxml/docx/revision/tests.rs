//! Document-level scenarios and properties of revision processing.

use super::*;
use crate::ooxml::docx::tree::{
    Block, Cell, Inline, Paragraph, PartKind, RevisionMarker, Row, Run, RunContent, Table,
};
use crate::ooxml::docx::xml::{read_part, write_part};
use proptest::prelude::*;

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn document(body: &str) -> Part {
    let xml = format!(
        r#"<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        W, body
    );
    read_part("/word/document.xml", PartKind::MainDocument, xml.as_bytes()).unwrap()
}

fn texts(part: &Part) -> Vec<String> {
    part.paragraphs().map(Paragraph::text).collect()
}

fn accept(part: &Part) -> Part {
    accept_part(part).unwrap()
}

fn reject(part: &Part) -> Part {
    reject_part(part).unwrap()
}

fn field_chars(part: &Part) -> usize {
    fn count(inlines: &[Inline]) -> usize {
        inlines
            .iter()
            .map(|i| match i {
                Inline::Run(r) => r
                    .content
                    .iter()
                    .filter(|c| matches!(c, RunContent::FieldChar(_)))
                    .count(),
                Inline::Tracked(t) => count(&t.content),
                Inline::ContentControl(c) => count(&c.content),
                Inline::Group(g) => count(&g.content),
                Inline::Other(_) => 0,
            })
            .sum()
    }
    part.paragraphs().map(|p| count(&p.content)).sum()
}

#[test]
fn test_deleted_text() {
    let part = document(
        r#"<w:p><w:r><w:t>keep </w:t></w:r><w:del w:id="1" w:author="A"><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>"#,
    );
    assert_eq!(texts(&accept(&part)), ["keep "]);

    let rejected = reject(&part);
    assert_eq!(texts(&rejected), ["keep gone"]);
    let xml = write_part(&rejected);
    assert!(!xml.contains("delText"));
    assert!(!xml.contains("<w:del "));
}

#[test]
fn test_inserted_text() {
    let part = document(
        r#"<w:p><w:r><w:t>a</w:t></w:r><w:ins w:id="1"><w:r><w:t>b</w:t></w:r></w:ins><w:r><w:t>c</w:t></w:r></w:p>"#,
    );
    assert_eq!(texts(&accept(&part)), ["abc"]);
    assert_eq!(texts(&reject(&part)), ["ac"]);
}

#[test]
fn test_deleted_paragraph_mark_merges() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:pStyle w:val="A"/><w:rPr><w:del w:id="1"/></w:rPr></w:pPr><w:r><w:t>one </w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="B"/></w:pPr><w:r><w:t>two</w:t></w:r></w:p>"#,
    ));

    let accepted = accept(&part);
    assert_eq!(texts(&accepted), ["one two"]);
    let merged = accepted.paragraphs().next().unwrap();
    assert_eq!(merged.properties.style(), Some("B"));

    let rejected = reject(&part);
    assert_eq!(texts(&rejected), ["one ", "two"]);
    assert!(rejected.paragraphs().all(|p| p.properties.mark.markers.is_empty()));
}

#[test]
fn test_inserted_mark_cascade() {
    let mark = r#"<w:pPr><w:rPr><w:ins w:id="1"/></w:rPr></w:pPr>"#;
    let part = document(&format!(
        "<w:p>{m}<w:r><w:t>a</w:t></w:r></w:p><w:p>{m}<w:r><w:t>b</w:t></w:r></w:p><w:p><w:r><w:t>c</w:t></w:r></w:p>",
        m = mark
    ));
    assert_eq!(texts(&reject(&part)), ["abc"]);
    assert_eq!(texts(&accept(&part)), ["a", "b", "c"]);
}

#[test]
fn test_mark_before_table_keeps_boundary() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:rPr><w:del w:id="1"/></w:rPr></w:pPr><w:r><w:t>before</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
    ));
    let accepted = accept(&part);
    assert_eq!(texts(&accepted), ["before"]);
    assert_eq!(accepted.tables().count(), 1);
}

#[test]
fn test_row_deletion() {
    let part = document(concat!(
        "<w:tbl><w:tblGrid><w:gridCol w:w=\"100\"/></w:tblGrid>",
        r#"<w:tr><w:tc><w:p><w:r><w:t>first</w:t></w:r></w:p></w:tc></w:tr>"#,
        r#"<w:tr><w:trPr><w:del w:id="7"/></w:trPr><w:tc><w:p><w:del w:id="8"><w:r><w:delText>second</w:delText></w:r></w:del></w:p></w:tc></w:tr>"#,
        "</w:tbl>",
    ));

    let accepted = accept(&part);
    assert_eq!(accepted.tables().next().unwrap().row_count(), 1);

    let rejected = reject(&part);
    let table = rejected.tables().next().unwrap();
    assert_eq!(table.row_count(), 2);
    assert!(table.rows().all(|r| r.properties.markers.is_empty()));
}

#[test]
fn test_inserted_table_rejected_disappears() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>text</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:trPr><w:ins w:id="1"/></w:trPr><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
    ));
    let rejected = reject(&part);
    assert_eq!(rejected.tables().count(), 0);
    assert_eq!(texts(&rejected), ["text"]);
}

#[test]
fn test_cell_insertion_and_merge_record() {
    let part = document(concat!(
        "<w:tbl><w:tr>",
        r#"<w:tc><w:tcPr><w:tcW w:w="100" w:type="dxa"/><w:vMerge/><w:cellMerge w:id="3" w:vMerge="cont" w:vMergeOrig="rest"/></w:tcPr><w:p/></w:tc>"#,
        r#"<w:tc><w:tcPr><w:cellIns w:id="4"/></w:tcPr><w:p><w:r><w:t>new</w:t></w:r></w:p></w:tc>"#,
        "</w:tr></w:tbl>",
    ));

    let rejected = reject(&part);
    let row = rejected.tables().next().unwrap().rows().next().unwrap().clone();
    assert_eq!(row.cells().count(), 1);
    let xml = write_part(&rejected);
    assert!(xml.contains(r#"<w:vMerge w:val="restart"/>"#));
    assert!(!xml.contains("cellMerge"));

    let accepted = accept(&part);
    let row = accepted.tables().next().unwrap().rows().next().unwrap().clone();
    assert_eq!(row.cells().count(), 2);
    assert!(row.cells().next().unwrap().is_merge_continuation());
    assert!(!write_part(&accepted).contains("cellIns"));
}

#[test]
fn test_move_round_trip() {
    let part = document(concat!(
        r#"<w:moveFromRangeStart w:id="1" w:name="move1"/>"#,
        r#"<w:p><w:moveFrom w:id="2"><w:r><w:t>moved </w:t></w:r></w:moveFrom><w:r><w:t>stay</w:t></w:r></w:p>"#,
        r#"<w:moveFromRangeEnd w:id="1"/>"#,
        r#"<w:p><w:moveToRangeStart w:id="3" w:name="move1"/><w:moveTo w:id="4"><w:r><w:t>moved </w:t></w:r></w:moveTo><w:moveToRangeEnd w:id="3"/><w:r><w:t>here</w:t></w:r></w:p>"#,
    ));

    assert_eq!(texts(&accept(&part)), ["stay", "moved here"]);
    assert_eq!(texts(&reject(&part)), ["moved stay", "here"]);
    assert!(!write_part(&accept(&part)).contains("RangeStart"));
}

#[test]
fn test_unpaired_move_is_reported() {
    let part = document(concat!(
        r#"<w:p><w:moveFromRangeStart w:id="1" w:name="lonely"/>"#,
        r#"<w:moveFrom w:id="2"><w:r><w:t>x</w:t></w:r></w:moveFrom>"#,
        r#"<w:moveFromRangeEnd w:id="1"/></w:p>"#,
    ));
    match accept_part(&part) {
        Err(RevisionError::UnresolvedMove { part, move_id, .. }) => {
            assert_eq!(part, "/word/document.xml");
            assert_eq!(move_id, "lonely");
        },
        other => panic!("expected an unresolved move, got {:?}", other),
    }
}

#[test]
fn test_mark_overlapping_move_is_unsupported() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:rPr><w:del w:id="9"/></w:rPr></w:pPr>"#,
        r#"<w:moveToRangeStart w:id="1" w:name="m"/><w:moveTo w:id="2"><w:r><w:t>x</w:t></w:r></w:moveTo><w:moveToRangeEnd w:id="1"/></w:p>"#,
        r#"<w:p><w:moveFromRangeStart w:id="3" w:name="m"/><w:moveFrom w:id="4"><w:r><w:t>x</w:t></w:r></w:moveFrom><w:moveFromRangeEnd w:id="3"/></w:p>"#,
    ));
    assert!(matches!(
        accept_part(&part),
        Err(RevisionError::UnsupportedRevision { .. })
    ));
}

#[test]
fn test_run_property_change() {
    let part = document(
        r#"<w:p><w:r><w:rPr><w:b/><w:rPrChange w:id="5" w:author="A"><w:rPr><w:i/></w:rPr></w:rPrChange></w:rPr><w:t>x</w:t></w:r></w:p>"#,
    );
    let accepted = write_part(&accept(&part));
    assert!(accepted.contains("<w:b/>") && !accepted.contains("<w:i/>"));
    assert!(!accepted.contains("rPrChange"));

    let rejected = write_part(&reject(&part));
    assert!(rejected.contains("<w:i/>") && !rejected.contains("<w:b/>"));
}

#[test]
fn test_paragraph_property_change() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/>"#,
        r#"<w:pPrChange w:id="6"><w:pPr><w:pStyle w:val="Normal"/></w:pPr></w:pPrChange></w:pPr>"#,
        r#"<w:r><w:t>t</w:t></w:r></w:p>"#,
    ));
    let accepted = accept(&part);
    assert_eq!(accepted.paragraphs().next().unwrap().properties.style(), Some("Heading1"));

    let rejected = reject(&part);
    let properties = &rejected.paragraphs().next().unwrap().properties;
    assert_eq!(properties.style(), Some("Normal"));
    assert!(!write_part(&rejected).contains("w:jc"));
}

#[test]
fn test_change_without_snapshot_is_malformed() {
    let part = document(
        r#"<w:p><w:r><w:rPr><w:b/><w:rPrChange w:id="5"/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
    );
    assert!(accept_part(&part).is_ok());
    match reject_part(&part) {
        Err(RevisionError::MalformedRevisionMarkup { part, path, .. }) => {
            assert_eq!(part, "/word/document.xml");
            assert_eq!(path.to_string(), "p[0]/r[0]");
        },
        other => panic!("expected malformed markup, got {:?}", other),
    }
}

#[test]
fn test_section_and_grid_changes() {
    let part = document(concat!(
        r#"<w:tbl><w:tblGrid><w:gridCol w:w="200"/><w:tblGridChange w:id="2"><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid></w:tblGridChange></w:tblGrid>"#,
        r#"<w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
        r#"<w:sectPr><w:pgSz w:w="12240"/><w:sectPrChange w:id="3"><w:sectPr><w:pgSz w:w="11906"/></w:sectPr></w:sectPrChange></w:sectPr>"#,
    ));
    let rejected = write_part(&reject(&part));
    assert!(rejected.contains(r#"<w:gridCol w:w="100"/>"#));
    assert!(rejected.contains(r#"<w:pgSz w:w="11906"/>"#));

    let accepted = write_part(&accept(&part));
    assert!(accepted.contains(r#"<w:gridCol w:w="200"/>"#));
    assert!(accepted.contains(r#"<w:pgSz w:w="12240"/>"#));
    assert!(!accepted.contains("Change"));
}

#[test]
fn test_numbering_revisions() {
    let inserted = document(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="3"/><w:ins w:id="1"/></w:numPr></w:pPr><w:r><w:t>item</w:t></w:r></w:p>"#,
    );
    let numbering = |part: &Part| part.paragraphs().next().unwrap().properties.numbering().cloned();
    assert!(numbering(&reject(&inserted)).is_none());
    let kept = numbering(&accept(&inserted)).unwrap();
    assert_eq!(kept.num_id(), Some(3));
    assert!(kept.inserted.is_none());

    let changed = document(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="3"/><w:numberingChange w:id="2" w:original=""/></w:numPr></w:pPr></w:p>"#,
    );
    assert!(numbering(&reject(&changed)).is_none());
    assert!(numbering(&accept(&changed)).is_some());

    let broken = document(
        r#"<w:p><w:pPr><w:numPr><w:numId w:val="3"/><w:numberingChange w:id="2"/></w:numPr></w:pPr></w:p>"#,
    );
    assert!(matches!(
        reject_part(&broken),
        Err(RevisionError::MalformedRevisionMarkup { .. })
    ));
}

#[test]
fn test_field_switch_edit_keeps_structure() {
    // Only the instruction switch was edited; the field itself predates it.
    let part = document(concat!(
        r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> PAGE </w:instrText></w:r>"#,
        r#"<w:ins w:id="1"><w:r><w:instrText>\* MERGEFORMAT </w:instrText></w:r></w:ins>"#,
        r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>1</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#,
    ));
    let rejected = reject(&part);
    assert_eq!(field_chars(&rejected), 3);
    assert!(!write_part(&rejected).contains("MERGEFORMAT"));
    assert!(write_part(&accept(&part)).contains("MERGEFORMAT"));
}

#[test]
fn test_partially_inserted_field_salvages_markers() {
    let part = document(concat!(
        r#"<w:p><w:ins w:id="1"><w:r><w:rPr><w:b/></w:rPr><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> DATE </w:instrText></w:r></w:ins>"#,
        r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>today</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#,
    ));
    let rejected = reject(&part);
    assert_eq!(field_chars(&rejected), 3);
    let xml = write_part(&rejected);
    assert!(!xml.contains("DATE"));
    assert!(xml.contains("<w:b/>"));
}

#[test]
fn test_fully_inserted_field_removed() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>x</w:t></w:r><w:ins w:id="1"><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> PAGE </w:instrText></w:r>"#,
        r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>1</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:ins></w:p>"#,
    ));
    let rejected = reject(&part);
    assert_eq!(field_chars(&rejected), 0);
    assert_eq!(texts(&rejected), ["x"]);
}

#[test]
fn test_math_control_characters() {
    let part = document(concat!(
        r#"<w:p><m:oMath xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math">"#,
        r#"<m:r><w:rPr><w:ins w:id="1"/></w:rPr><m:t>x</m:t></m:r>"#,
        r#"<w:ins w:id="2"><m:r><m:t>+1</m:t></m:r></w:ins>"#,
        r#"<w:del w:id="3"><m:r><m:t>-1</m:t></m:r></w:del>"#,
        r#"</m:oMath></w:p>"#,
    ));
    let accepted = write_part(&accept(&part));
    assert!(accepted.contains("+1") && !accepted.contains("-1"));
    assert!(accepted.contains("<m:t>x</m:t>"));
    assert!(!accepted.contains("<w:ins"));

    let rejected = write_part(&reject(&part));
    assert!(!rejected.contains("+1") && rejected.contains("-1"));
    assert!(!rejected.contains("<w:del"));
}

#[test]
fn test_emptied_content_control_removed() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>a</w:t></w:r><w:sdt><w:sdtPr><w:alias w:val="c"/></w:sdtPr>"#,
        r#"<w:sdtContent><w:ins w:id="1"><w:r><w:t>b</w:t></w:r></w:ins></w:sdtContent></w:sdt></w:p>"#,
    ));
    let rejected = reject(&part);
    assert!(!write_part(&rejected).contains("w:sdt"));
    let accepted = accept(&part);
    assert!(write_part(&accepted).contains("<w:sdtContent>"));
    assert_eq!(texts(&accepted), ["ab"]);
}

#[test]
fn test_header_part() {
    let xml = format!(
        r#"<w:hdr xmlns:w="{}"><w:p><w:ins w:id="1"><w:r><w:t>Draft</w:t></w:r></w:ins></w:p></w:hdr>"#,
        W
    );
    let part = read_part("/word/header1.xml", PartKind::Header, xml.as_bytes()).unwrap();
    assert_eq!(texts(&reject(&part)), [""]);
    assert_eq!(texts(&accept(&part)), ["Draft"]);
}

#[test]
fn test_untouched_markup_round_trips() {
    let body = concat!(
        r#"<w:p><w:pPr><w:jc w:val="both"/></w:pPr><w:bookmarkStart w:id="0" w:name="b"/>"#,
        r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">plain &amp; simple</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let part = document(body);
    let processed = accept(&part);
    assert_eq!(processed, part);
    assert_eq!(write_part(&processed), write_part(&part));
}

#[test]
fn test_validation_can_be_disabled() {
    let part = Part::new("/word/document.xml", PartKind::MainDocument)
        .with_content(vec![Block::Table(Table::default())]);
    assert!(matches!(
        process_part(&part, Mode::Accept, &RevisionOptions::default()),
        Err(RevisionError::StructuralViolation { .. })
    ));
    let options = RevisionOptions::new().with_validate(false);
    assert!(process_part(&part, Mode::Accept, &options).is_ok());
}

fn first_cell_texts(part: &Part) -> Vec<String> {
    let table = part.tables().next().unwrap();
    let cell = table.rows().next().unwrap().cells().next().unwrap();
    cell.content
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph(p) => Some(p.text()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_rejected_section_change_keeps_header_references() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>body</w:t></w:r></w:p>"#,
        r#"<w:sectPr><w:headerReference w:type="default" r:id="rId8"/><w:footerReference w:type="default" r:id="rId9"/>"#,
        r#"<w:pgSz w:w="12240"/><w:sectPrChange w:id="3"><w:sectPr><w:pgSz w:w="11906"/></w:sectPr></w:sectPrChange></w:sectPr>"#,
    ));

    let rejected = reject(&part);
    let names: Vec<&str> = rejected
        .section
        .as_ref()
        .unwrap()
        .properties
        .current
        .elements
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["w:headerReference", "w:footerReference", "w:pgSz"]);
    let xml = write_part(&rejected);
    assert!(xml.contains(r#"r:id="rId8""#) && xml.contains(r#"r:id="rId9""#));
    assert!(xml.contains(r#"<w:pgSz w:w="11906"/>"#));
    assert!(!xml.contains("sectPrChange"));

    let accepted = write_part(&accept(&part));
    assert!(accepted.contains(r#"r:id="rId8""#));
    assert!(accepted.contains(r#"<w:pgSz w:w="12240"/>"#));
}

#[test]
fn test_paragraph_section_change_keeps_header_references() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:sectPr><w:headerReference w:type="first" r:id="rId4"/><w:type w:val="nextPage"/>"#,
        r#"<w:sectPrChange w:id="1"><w:sectPr><w:type w:val="continuous"/></w:sectPr></w:sectPrChange></w:sectPr></w:pPr>"#,
        r#"<w:r><w:t>end of section</w:t></w:r></w:p>"#,
    ));
    let xml = write_part(&reject(&part));
    let reference = xml.find(r#"r:id="rId4""#).unwrap();
    let kind = xml.find(r#"<w:type w:val="continuous"/>"#).unwrap();
    assert!(reference < kind);
    assert!(!xml.contains("nextPage"));
}

#[test]
fn test_merge_stops_at_block_markup_with_content() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:rPr><w:del w:id="1"/></w:rPr></w:pPr><w:r><w:t>first</w:t></w:r></w:p>"#,
        r#"<w:customXml w:element="note"><w:p><w:r><w:t>middle</w:t></w:r></w:p></w:customXml>"#,
        r#"<w:p><w:r><w:t>last</w:t></w:r></w:p>"#,
    ));
    let accepted = accept(&part);
    assert_eq!(accepted.content.len(), 3);
    assert!(matches!(&accepted.content[0], Block::Paragraph(p) if p.text() == "first"));
    assert!(matches!(&accepted.content[1], Block::Other(e) if e.name == "w:customXml"));
    assert!(matches!(&accepted.content[2], Block::Paragraph(p) if p.text() == "last"));
    assert!(accepted.paragraphs().all(|p| p.properties.mark.markers.is_empty()));
}

#[test]
fn test_merge_passes_over_bookmarks() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:rPr><w:del w:id="1"/></w:rPr></w:pPr><w:r><w:t>first </w:t></w:r></w:p>"#,
        r#"<w:bookmarkStart w:id="0" w:name="here"/>"#,
        r#"<w:p><w:r><w:t>last</w:t></w:r></w:p>"#,
    ));
    assert_eq!(texts(&accept(&part)), ["first last"]);
}

#[test]
fn test_move_into_text_box_pairs() {
    let part = document(concat!(
        r#"<w:p><w:moveFromRangeStart w:id="1" w:name="mv"/><w:moveFrom w:id="2"><w:r><w:t>boxed</w:t></w:r></w:moveFrom>"#,
        r#"<w:moveFromRangeEnd w:id="1"/></w:p>"#,
        r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><wps:wsp><wps:txbx><w:txbxContent>"#,
        r#"<w:p><w:moveToRangeStart w:id="3" w:name="mv"/><w:moveTo w:id="4"><w:r><w:t>boxed</w:t></w:r></w:moveTo>"#,
        r#"<w:moveToRangeEnd w:id="3"/></w:p>"#,
        r#"</w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
    ));

    let accepted = accept(&part);
    assert_eq!(texts(&accepted)[0], "");
    let xml = write_part(&accepted);
    assert_eq!(xml.matches("<w:t>boxed</w:t>").count(), 1);
    assert!(!xml.contains("moveTo") && !xml.contains("moveFrom"));

    let rejected = reject(&part);
    assert_eq!(texts(&rejected)[0], "boxed");
    assert_eq!(write_part(&rejected).matches("<w:t>boxed</w:t>").count(), 1);
}

#[test]
fn test_unpaired_move_in_text_box_is_reported() {
    let part = document(concat!(
        r#"<w:p><w:r><w:drawing><w:txbxContent><w:p><w:moveToRangeStart w:id="3" w:name="boxed"/>"#,
        r#"<w:moveTo w:id="4"><w:r><w:t>x</w:t></w:r></w:moveTo><w:moveToRangeEnd w:id="3"/></w:p>"#,
        r#"</w:txbxContent></w:drawing></w:r></w:p>"#,
    ));
    match accept_part(&part) {
        Err(RevisionError::UnresolvedMove { move_id, path, .. }) => {
            assert_eq!(move_id, "boxed");
            assert_eq!(path.to_string(), "p[0]/r[0]");
        },
        other => panic!("expected an unresolved move, got {:?}", other),
    }
}

#[test]
fn test_table_property_changes_rejected() {
    let part = document(concat!(
        r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/>"#,
        r#"<w:tblPrChange w:id="1"><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr></w:tblPrChange></w:tblPr>"#,
        r#"<w:tblGrid><w:gridCol w:w="100"/></w:tblGrid>"#,
        r#"<w:tr><w:tblPrEx><w:jc w:val="center"/><w:tblPrExChange w:id="2"><w:tblPrEx><w:jc w:val="left"/></w:tblPrEx></w:tblPrExChange></w:tblPrEx>"#,
        r#"<w:trPr><w:cantSplit/><w:trPrChange w:id="3"><w:trPr><w:tblHeader/></w:trPr></w:trPrChange></w:trPr>"#,
        r#"<w:tc><w:tcPr><w:shd w:fill="FF0000"/><w:tcPrChange w:id="4"><w:tcPr><w:shd w:fill="00FF00"/></w:tcPr></w:tcPrChange></w:tcPr>"#,
        r#"<w:p/></w:tc></w:tr></w:tbl>"#,
    ));

    let rejected = write_part(&reject(&part));
    for restored in [r#"w:type="auto""#, r#"w:val="left""#, "<w:tblHeader/>", "00FF00"] {
        assert!(rejected.contains(restored), "missing {}", restored);
    }
    for replaced in [r#"w:type="pct""#, r#"w:val="center""#, "<w:cantSplit/>", "FF0000"] {
        assert!(!rejected.contains(replaced), "kept {}", replaced);
    }
    assert!(!rejected.contains("Change"));

    let accepted = write_part(&accept(&part));
    for kept in [r#"w:type="pct""#, r#"w:val="center""#, "<w:cantSplit/>", "FF0000"] {
        assert!(accepted.contains(kept), "missing {}", kept);
    }
    assert!(!accepted.contains("Change"));
}

#[test]
fn test_deleted_cell_accepted() {
    let part = document(concat!(
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>stays</w:t></w:r></w:p></w:tc>"#,
        r#"<w:tc><w:tcPr><w:cellDel w:id="5"/></w:tcPr><w:p><w:r><w:t>gone</w:t></w:r></w:p></w:tc>"#,
        r#"</w:tr></w:tbl>"#,
    ));

    let accepted = accept(&part);
    let row = accepted.tables().next().unwrap().rows().next().unwrap().clone();
    assert_eq!(row.cells().count(), 1);
    assert!(!write_part(&accepted).contains("gone"));

    let rejected = reject(&part);
    let row = rejected.tables().next().unwrap().rows().next().unwrap().clone();
    assert_eq!(row.cells().count(), 2);
    assert!(!write_part(&rejected).contains("cellDel"));
}

#[test]
fn test_deleted_merge_anchor_row_leaves_continuation() {
    let part = document(concat!(
        r#"<w:tbl><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid>"#,
        r#"<w:tr><w:trPr><w:del w:id="1"/></w:trPr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>anchor</w:t></w:r></w:p></w:tc></w:tr>"#,
        r#"<w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>"#,
        r#"</w:tbl>"#,
    ));

    let accepted = accept(&part);
    let table = accepted.tables().next().unwrap();
    assert_eq!(table.row_count(), 1);
    let cell = table.rows().next().unwrap().cells().next().unwrap();
    assert!(cell.is_merge_continuation());

    let rejected = reject(&part);
    assert_eq!(rejected.tables().next().unwrap().row_count(), 2);
}

#[test]
fn test_inserted_paragraph_rejected() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>a</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:rPr><w:ins w:id="1"/></w:rPr></w:pPr><w:ins w:id="2"><w:r><w:t>new</w:t></w:r></w:ins></w:p>"#,
        r#"<w:p><w:r><w:t>c</w:t></w:r></w:p>"#,
    ));
    assert_eq!(texts(&reject(&part)), ["a", "c"]);
    assert_eq!(texts(&accept(&part)), ["a", "new", "c"]);
}

#[test]
fn test_revised_last_paragraph_of_body() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>a</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:rPr><w:del w:id="1"/></w:rPr></w:pPr><w:del w:id="2"><w:r><w:delText>b</w:delText></w:r></w:del></w:p>"#,
        r#"<w:sectPr><w:pgSz w:w="12240"/></w:sectPr>"#,
    ));
    let accepted = accept(&part);
    assert_eq!(texts(&accepted), ["a", ""]);
    assert!(accepted.paragraphs().all(|p| p.properties.mark.markers.is_empty()));
    assert!(accepted.section.is_some());
    assert_eq!(texts(&reject(&part)), ["a", "b"]);

    let inserted = document(concat!(
        r#"<w:p><w:r><w:t>a</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:rPr><w:ins w:id="1"/></w:rPr></w:pPr><w:ins w:id="2"><w:r><w:t>b</w:t></w:r></w:ins></w:p>"#,
    ));
    assert_eq!(texts(&reject(&inserted)), ["a", ""]);
    assert_eq!(texts(&accept(&inserted)), ["a", "b"]);
}

#[test]
fn test_revised_marks_at_end_of_cell() {
    let mark = r#"<w:pPr><w:rPr><w:del w:id="1"/></w:rPr></w:pPr>"#;
    let last_only = document(&format!(
        "<w:tbl><w:tr><w:tc><w:p>{}<w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        mark
    ));
    let accepted = accept(&last_only);
    assert_eq!(first_cell_texts(&accepted), ["x"]);
    assert!(!write_part(&accepted).contains("<w:del "));

    let two = document(&format!(
        "<w:tbl><w:tr><w:tc><w:p>{}<w:r><w:t>x</w:t></w:r></w:p><w:p><w:r><w:t>y</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        mark
    ));
    assert_eq!(first_cell_texts(&accept(&two)), ["xy"]);
    assert_eq!(first_cell_texts(&reject(&two)), ["x", "y"]);

    let inserted = document(concat!(
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:rPr><w:ins w:id="3"/></w:rPr></w:pPr><w:r><w:t>y</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
    ));
    assert_eq!(first_cell_texts(&reject(&inserted)), ["x", "y"]);
}

#[test]
fn test_mark_both_inserted_and_deleted_merges_either_way() {
    let part = document(concat!(
        r#"<w:p><w:pPr><w:rPr><w:ins w:id="1"/><w:del w:id="2"/></w:rPr></w:pPr><w:r><w:t>one </w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>two</w:t></w:r></w:p>"#,
    ));
    let markers = &part.paragraphs().next().unwrap().properties.mark.markers;
    assert_eq!(markers.len(), 2);

    assert_eq!(texts(&accept(&part)), ["one two"]);
    assert_eq!(texts(&reject(&part)), ["one two"]);
}

#[test]
fn test_deleted_footnote_reference() {
    let part = document(concat!(
        r#"<w:p><w:r><w:t>see</w:t></w:r><w:del w:id="1"><w:r><w:rPr><w:rStyle w:val="FootnoteReference"/></w:rPr>"#,
        r#"<w:footnoteReference w:id="2"/></w:r></w:del></w:p>"#,
    ));
    let accepted = write_part(&accept(&part));
    assert!(!accepted.contains("footnoteReference"));
    assert!(!accepted.contains("FootnoteReference"));

    let rejected = write_part(&reject(&part));
    assert!(rejected.contains(r#"<w:footnoteReference w:id="2"/>"#));
    assert!(!rejected.contains("<w:del "));
}

#[test]
fn test_deleted_mark_cascade_keeps_last_properties() {
    let paragraph = |style: &str, text: &str, deleted: bool| {
        let mark = if deleted {
            r#"<w:rPr><w:del w:id="9"/></w:rPr>"#
        } else {
            ""
        };
        format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/>{}</w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            style, mark, text
        )
    };
    let body: String = [
        paragraph("S1", "1", true),
        paragraph("S2", "2", true),
        paragraph("S3", "3", true),
        paragraph("Last", "4", false),
    ]
    .concat();
    let part = document(&body);

    let accepted = accept(&part);
    assert_eq!(texts(&accepted), ["1234"]);
    let survivor = accepted.paragraphs().next().unwrap();
    assert_eq!(survivor.properties.style(), Some("Last"));
    assert!(survivor.properties.mark.markers.is_empty());

    let rejected = reject(&part);
    assert_eq!(texts(&rejected), ["1", "2", "3", "4"]);
    let styles: Vec<_> = rejected.paragraphs().map(|p| p.properties.style()).collect();
    assert_eq!(styles, [Some("S1"), Some("S2"), Some("S3"), Some("Last")]);
}

/// One inline edit in a generated document.
#[derive(Debug, Clone)]
enum Edit {
    Plain(String),
    Inserted(String),
    Deleted(String),
}

fn edit() -> impl Strategy<Value = Edit> {
    let text = "[a-z ]{1,6}";
    prop_oneof![
        text.prop_map(Edit::Plain),
        text.prop_map(Edit::Inserted),
        text.prop_map(Edit::Deleted),
    ]
}

/// A paragraph: its edits and an optional mark revision (true = inserted).
fn paragraph() -> impl Strategy<Value = (Vec<Edit>, Option<bool>)> {
    (
        prop::collection::vec(edit(), 0..5),
        prop_oneof![Just(None), Just(Some(true)), Just(Some(false))],
    )
}

fn build(paragraphs: &[(Vec<Edit>, Option<bool>)], rows: &[bool]) -> Part {
    let mut id = 0;
    let mut next_id = || {
        id += 1;
        id.to_string()
    };

    let mut blocks = Vec::new();
    for (edits, mark) in paragraphs {
        let mut para = Paragraph::new();
        for edit in edits {
            para = para.push(match edit {
                Edit::Plain(t) => Inline::Run(Run::text(t)),
                Edit::Inserted(t) => Inline::inserted(&next_id(), vec![Inline::Run(Run::text(t))]),
                Edit::Deleted(t) => Inline::deleted(&next_id(), vec![Inline::Run(Run::text(t))]),
            });
        }
        match mark {
            Some(true) => para = para.with_mark(RevisionMarker::inserted(next_id())),
            Some(false) => para = para.with_mark(RevisionMarker::deleted(next_id())),
            None => {},
        }
        blocks.push(Block::Paragraph(para));
    }

    if !rows.is_empty() {
        let rows = rows
            .iter()
            .map(|&inserted| {
                let row = Row::with_cells(vec![Cell::with_blocks(vec![Block::Paragraph(
                    Paragraph::with_text("cell"),
                )])]);
                if inserted {
                    row.with_marker(RevisionMarker::inserted(next_id()))
                } else {
                    row
                }
            })
            .collect();
        blocks.push(Block::Table(Table::with_rows(rows)));
    }

    Part::new("/word/document.xml", PartKind::MainDocument).with_content(blocks)
}

fn generated_part() -> impl Strategy<Value = Part> {
    (
        prop::collection::vec(paragraph(), 1..6),
        prop::collection::vec(any::<bool>(), 0..4),
    )
        .prop_map(|(paragraphs, rows)| build(&paragraphs, &rows))
}

proptest! {
    #[test]
    fn prop_processing_is_idempotent(part in generated_part()) {
        for mode in [Mode::Accept, Mode::Reject] {
            let options = RevisionOptions::default();
            let once = process_part(&part, mode, &options).unwrap();
            let twice = process_part(&once, mode, &options).unwrap();
            prop_assert_eq!(&once, &twice);
        }
    }

    #[test]
    fn prop_no_revision_markers_remain(part in generated_part()) {
        for mode in [Mode::Accept, Mode::Reject] {
            let options = RevisionOptions::new().with_validate(false);
            let processed = process_part(&part, mode, &options).unwrap();
            prop_assert!(validate(&processed).is_ok());
            prop_assert!(!write_part(&processed).contains("<w:ins"));
            prop_assert!(!write_part(&processed).contains("<w:del"));
        }
    }

    #[test]
    fn prop_single_insertion_complement(
        before in "[a-z]{0,8}",
        inserted in "[a-z]{1,8}",
        after in "[a-z]{0,8}",
    ) {
        let para = Paragraph::new()
            .push(Inline::Run(Run::text(&before)))
            .push(Inline::inserted("1", vec![Inline::Run(Run::text(&inserted))]))
            .push(Inline::Run(Run::text(&after)));
        let part = Part::new("/word/document.xml", PartKind::MainDocument)
            .with_content(vec![Block::Paragraph(para)]);

        prop_assert_eq!(texts(&accept(&part)), vec![format!("{before}{inserted}{after}")]);
        prop_assert_eq!(texts(&reject(&part)), vec![format!("{before}{after}")]);
    }
}
