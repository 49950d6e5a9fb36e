/// Field integrity planning.
///
/// A complex field spans several runs: a `begin` marker, instruction text,
/// an optional `separate` marker, the field result and an `end` marker.
/// Revisions routinely cover only part of that span (an edited switch in
/// the instruction, a re-typed result). Dropping a run that holds one of
/// the structural markers would leave the field unbalanced, so a marker is
/// removed only when every marker of its field is removed.
///
/// The plan is computed by a pre-walk that mirrors the rewriter's traversal
/// and records, for each `w:fldChar` in document order, whether it sits in
/// content the rewriter is going to drop.
use super::classify::{Action, Mode, marker_action};
use crate::ooxml::docx::tree::{
    Block, FieldCharKind, Inline, Part, RevisionMarker, RowContent, RunContent, TableContent,
};

/// Per-invocation field decisions, indexed by the ordinal of each field
/// structural marker in document order.
#[derive(Debug, Clone, Default)]
pub struct FieldPlan {
    survives: Vec<bool>,
}

impl FieldPlan {
    /// Plan a part for the given mode.
    pub fn build(part: &Part, mode: Mode) -> Self {
        let mut walker = Walker {
            mode,
            markers: Vec::new(),
        };
        walker.blocks(&part.content, false);
        Self::from_markers(&walker.markers)
    }

    /// Plan from `(kind, in dropped content)` pairs in document order.
    fn from_markers(markers: &[(FieldCharKind, bool)]) -> Self {
        let mut survives = vec![true; markers.len()];
        let mut open: Vec<Vec<usize>> = Vec::new();

        for (ordinal, (kind, _)) in markers.iter().enumerate() {
            match kind {
                FieldCharKind::Begin => open.push(vec![ordinal]),
                FieldCharKind::Separate => {
                    if let Some(field) = open.last_mut() {
                        field.push(ordinal);
                    }
                },
                FieldCharKind::End => {
                    let Some(mut field) = open.pop() else {
                        continue;
                    };
                    field.push(ordinal);
                    if field.iter().all(|&o| markers[o].1) {
                        for o in field {
                            survives[o] = false;
                        }
                    }
                },
            }
        }
        // Markers of fields left open keep their default: they survive.
        Self { survives }
    }

    /// Whether the structural marker with this ordinal must be kept even
    /// though the run holding it is dropped.
    #[inline]
    pub fn survives(&self, ordinal: usize) -> bool {
        self.survives.get(ordinal).copied().unwrap_or(true)
    }

    /// Number of structural markers in the part.
    #[inline]
    pub fn len(&self) -> usize {
        self.survives.len()
    }

    /// Whether the part has no complex fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.survives.is_empty()
    }
}

struct Walker {
    mode: Mode,
    markers: Vec<(FieldCharKind, bool)>,
}

impl Walker {
    fn drops(&self, markers: &[RevisionMarker]) -> bool {
        marker_action(markers, self.mode) == Action::Drop
    }

    fn blocks(&mut self, blocks: &[Block], dropping: bool) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.inlines(&p.content, dropping),
                Block::Table(t) => {
                    for content in &t.content {
                        let TableContent::Row(row) = content else {
                            continue;
                        };
                        let row_dropping = dropping || self.drops(&row.properties.markers);
                        for content in &row.content {
                            if let RowContent::Cell(cell) = content {
                                let cell_dropping =
                                    row_dropping || self.drops(&cell.properties.markers);
                                self.blocks(&cell.content, cell_dropping);
                            }
                        }
                    }
                },
                Block::ContentControl(sdt) => self.blocks(&sdt.content, dropping),
                Block::Note(note) => self.blocks(&note.content, dropping),
                Block::Other(_) => {},
            }
        }
    }

    fn inlines(&mut self, inlines: &[Inline], dropping: bool) {
        for inline in inlines {
            match inline {
                Inline::Run(run) => {
                    for content in &run.content {
                        if let RunContent::FieldChar(fld) = content {
                            self.markers.push((fld.kind, dropping));
                        }
                    }
                },
                Inline::Tracked(t) => {
                    let dropping = dropping || self.drops(std::slice::from_ref(&t.marker));
                    self.inlines(&t.content, dropping);
                },
                Inline::ContentControl(sdt) => self.inlines(&sdt.content, dropping),
                Inline::Group(g) => self.inlines(&g.content, dropping),
                Inline::Other(_) => {},
            }
        }
    }
}

/// Count the structural markers in block content the rewriter skips
/// wholesale (dropped rows and cells), keeping ordinals aligned.
pub(crate) fn count_field_chars(blocks: &[Block]) -> usize {
    let mut walker = Walker {
        mode: Mode::Accept,
        markers: Vec::new(),
    };
    walker.blocks(blocks, true);
    walker.markers.len()
}
