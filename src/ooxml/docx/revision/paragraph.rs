/// Paragraph-mark revisions.
///
/// The paragraph mark is the boundary between a paragraph and the next one.
/// Dropping a mark removes the boundary: the paragraph's content moves to
/// the front of the next paragraph and the next paragraph's properties win.
///
/// | Mode   | Inserted mark      | Deleted mark       |
/// |--------|--------------------|--------------------|
/// | Accept | keep boundary      | merge forward      |
/// | Reject | merge forward      | keep boundary      |
///
/// Merges only cross zero-width markup (bookmarks, comment and permission
/// ranges, proofing marks). A table, a content control, block markup with
/// content of its own or the end of the container stops them, in which case
/// only the marker goes away.
use super::classify::{Action, RevisionKind, action, mark_action};
use super::error::Result;
use super::rewriter::Rewriter;
use crate::ooxml::docx::tree::{
    Block, Inline, Markers, NodePath, NumberingReference, Paragraph, ParagraphMark,
    ParagraphProperties, ParagraphProperty, Tracked,
};
use tracing::trace;

/// A block after resolution, waiting for the container's merge pass.
#[derive(Debug)]
pub(crate) enum Resolved {
    /// A paragraph and whether its mark merges forward
    Paragraph(Paragraph, bool),
    /// Zero-width markup that does not interrupt a merge
    Opaque(Block),
    /// A block that stops a merge (table, content control, note)
    Barrier(Block),
}

/// Apply pending paragraph-mark merges within one block container.
///
/// Cascades collapse into the last paragraph of the run of merging marks:
/// it holds the concatenated content and keeps its own properties. Opaque
/// blocks met inside a cascade are placed before the surviving paragraph.
pub(crate) fn merge_paragraphs(resolved: Vec<Resolved>) -> Vec<Block> {
    let mut out = Vec::with_capacity(resolved.len());
    let mut pending: Option<Paragraph> = None;
    let mut held: Vec<Block> = Vec::new();

    for item in resolved {
        match item {
            Resolved::Opaque(block) => match pending {
                Some(_) => held.push(block),
                None => out.push(block),
            },
            Resolved::Paragraph(mut paragraph, merge_forward) => {
                if let Some(previous) = pending.take() {
                    trace!(
                        merged_inlines = previous.content.len(),
                        "paragraph boundary removed"
                    );
                    let mut content = previous.content;
                    content.append(&mut paragraph.content);
                    paragraph.content = content;
                    out.append(&mut held);
                }
                if merge_forward {
                    pending = Some(paragraph);
                } else {
                    out.push(Block::Paragraph(paragraph));
                }
            },
            Resolved::Barrier(block) => {
                flush(&mut out, &mut pending, &mut held);
                out.push(block);
            },
        }
    }
    flush(&mut out, &mut pending, &mut held);
    out
}

/// A merge with nothing to merge into keeps its boundary.
fn flush(out: &mut Vec<Block>, pending: &mut Option<Paragraph>, held: &mut Vec<Block>) {
    if let Some(paragraph) = pending.take() {
        trace!("paragraph mark kept, no following paragraph");
        out.push(Block::Paragraph(paragraph));
    }
    out.append(held);
}

/// Whether block-level markup takes up no room in the text, so a paragraph
/// merge can pass over it.
pub(crate) fn is_zero_width(name: &str) -> bool {
    matches!(
        name,
        "w:bookmarkStart"
            | "w:bookmarkEnd"
            | "w:commentRangeStart"
            | "w:commentRangeEnd"
            | "w:permStart"
            | "w:permEnd"
            | "w:proofErr"
    )
}

/// Whether inline content holds move wrappers at any depth.
fn contains_move(inlines: &[Inline]) -> bool {
    inlines.iter().any(|inline| match inline {
        Inline::Tracked(t) => t.marker.kind.is_move() || contains_move(&t.content),
        Inline::ContentControl(sdt) => contains_move(&sdt.content),
        Inline::Group(g) => contains_move(&g.content),
        Inline::Run(_) | Inline::Other(_) => false,
    })
}

impl Rewriter<'_> {
    /// Resolve a paragraph's content and properties. The merge itself is
    /// left to [`merge_paragraphs`].
    pub(crate) fn paragraph(&mut self, paragraph: &Paragraph, path: &NodePath) -> Result<Resolved> {
        let markers = &paragraph.properties.mark.markers;
        if markers.iter().any(|m| !m.kind.is_move()) && contains_move(&paragraph.content) {
            return Err(self.ctx.unsupported(
                path,
                "paragraph mark insertion/deletion overlapping a move",
            ));
        }

        let merge_forward = mark_action(markers, self.mode) == Action::MergeForward;
        let content = self.inlines(&paragraph.content, path, false)?;
        let properties = self.paragraph_properties(&paragraph.properties, path)?;

        Ok(Resolved::Paragraph(
            Paragraph {
                attributes: paragraph.attributes.clone(),
                properties,
                content,
            },
            merge_forward,
        ))
    }

    fn paragraph_properties(
        &self,
        properties: &ParagraphProperties,
        path: &NodePath,
    ) -> Result<ParagraphProperties> {
        let items_path = path.child("pPr", 0);
        let chosen = self.choose(&properties.items, &items_path, "paragraph properties")?;

        let mut items = Vec::with_capacity(chosen.len());
        for item in chosen {
            match item {
                ParagraphProperty::Other(element) => items.extend(
                    self.markup
                        .element(element, &items_path)?
                        .into_iter()
                        .map(ParagraphProperty::Other),
                ),
                ParagraphProperty::Numbering(numbering) => {
                    if let Some(numbering) = self.numbering(numbering, &items_path)? {
                        items.push(ParagraphProperty::Numbering(numbering));
                    }
                },
            }
        }

        let mark_path = path.child("mark", 0);
        Ok(ParagraphProperties {
            items: Tracked::new(items),
            mark: ParagraphMark {
                properties: self.tracked(&properties.mark.properties, &mark_path)?,
                markers: Markers::new(),
            },
            section: properties
                .section
                .as_ref()
                .map(|s| self.section(s, &path.child("sectPr", 0)))
                .transpose()?,
        })
    }

    /// Resolve a list reference; `None` when the paragraph ends up unnumbered.
    fn numbering(
        &self,
        numbering: &NumberingReference,
        path: &NodePath,
    ) -> Result<Option<NumberingReference>> {
        if numbering.inserted.is_some()
            && action(RevisionKind::Inserted, self.mode) == Action::Drop
        {
            trace!(part = self.ctx.part, %path, "inserted list reference removed");
            return Ok(None);
        }

        let restores =
            action(RevisionKind::PropertyChanged, self.mode) == Action::ReplaceWithSnapshot;
        if let (Some(change), true) = (&numbering.change, restores) {
            match change.original.as_deref() {
                None => {
                    return Err(self
                        .ctx
                        .malformed(path, "<w:numberingChange> without w:original"));
                },
                Some("") => {
                    trace!(part = self.ctx.part, %path, "list reference restored to none");
                    return Ok(None);
                },
                Some(_) => {},
            }
        }

        Ok(Some(NumberingReference {
            elements: self.markup.elements(&numbering.elements, path)?,
            inserted: None,
            change: None,
        }))
    }
}
