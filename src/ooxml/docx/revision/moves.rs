/// Move pairing.
///
/// A move is recorded twice: a source (`w:moveFrom`) and a destination
/// (`w:moveTo`) sharing the name of their enclosing move ranges. Processing
/// reduces both to ordinary insertions and deletions, so the only work here
/// is checking that every move has both halves before anything is
/// rewritten.
///
/// Halves inside markup the tree carries opaquely (text boxes in drawings,
/// custom XML blocks) are found by walking that markup in document order and
/// naming them after the move range open at that point.
use super::classify::RevisionKind;
use super::error::{Context, Result};
use crate::ooxml::docx::tree::{
    Block, Element, Inline, MarkerKind, NodePath, Part, RevisionMarker, RowContent, RunContent,
    TableContent,
};
use crate::ooxml::docx::xml::read::MoveRanges;
use std::collections::BTreeMap;
use tracing::trace;

/// Reduce a move kind to the insertion/deletion it behaves as.
pub const fn reduce(kind: RevisionKind) -> RevisionKind {
    match kind {
        RevisionKind::MovedFrom => RevisionKind::Deleted,
        RevisionKind::MovedTo => RevisionKind::Inserted,
        other => other,
    }
}

/// Where a move half was first seen.
#[derive(Debug, Clone)]
struct Location {
    part: String,
    path: NodePath,
}

/// Move identifiers seen in one or more parts.
///
/// Built once per invocation. A package builds a single table over all of
/// its story parts, since a move can cross part boundaries.
#[derive(Debug, Default)]
pub struct MoveTable {
    sources: BTreeMap<String, Location>,
    destinations: BTreeMap<String, Location>,
}

impl MoveTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and check a table for a single part.
    pub fn for_part(part: &Part) -> Result<Self> {
        let mut table = Self::new();
        table.add_part(part)?;
        table.check()?;
        Ok(table)
    }

    /// Record every move marker of a part.
    ///
    /// # Errors
    ///
    /// `UnresolvedMove` for a move marker outside any named move range.
    pub fn add_part(&mut self, part: &Part) -> Result<()> {
        let ctx = Context::new(&part.name);
        let mut collector = Collector {
            ctx,
            table: self,
            move_from: MoveRanges::default(),
            move_to: MoveRanges::default(),
        };
        collector.blocks(&part.content, &NodePath::root())
    }

    /// Number of distinct move identifiers.
    pub fn len(&self) -> usize {
        self.sources.len().max(self.destinations.len())
    }

    /// Whether no moves were recorded.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty()
    }

    /// Check that every source has a destination and vice versa.
    pub fn check(&self) -> Result<()> {
        let unpaired = self
            .sources
            .iter()
            .find(|(id, _)| !self.destinations.contains_key(*id))
            .or_else(|| {
                self.destinations
                    .iter()
                    .find(|(id, _)| !self.sources.contains_key(*id))
            });
        match unpaired {
            Some((id, loc)) => Err(Context::new(&loc.part).unresolved_move(&loc.path, id)),
            None => Ok(()),
        }
    }
}

struct Collector<'a, 't> {
    ctx: Context<'a>,
    table: &'t mut MoveTable,
    /// Ranges seen in opaque markup; typed markers arrive already named
    move_from: MoveRanges,
    move_to: MoveRanges,
}

impl Collector<'_, '_> {
    fn marker(&mut self, marker: &RevisionMarker, path: &NodePath) -> Result<()> {
        self.record(marker.kind, marker.move_id.as_deref(), path)
    }

    fn record(&mut self, kind: MarkerKind, move_id: Option<&str>, path: &NodePath) -> Result<()> {
        let side = match kind {
            MarkerKind::MovedFrom => &mut self.table.sources,
            MarkerKind::MovedTo => &mut self.table.destinations,
            MarkerKind::Inserted | MarkerKind::Deleted => return Ok(()),
        };
        let Some(move_id) = move_id else {
            return Err(self.ctx.unresolved_move(path, ""));
        };
        if !side.contains_key(move_id) {
            trace!(part = self.ctx.part, move_id = %move_id, kind = %kind, "move recorded");
            side.insert(
                move_id.to_string(),
                Location {
                    part: self.ctx.part.to_string(),
                    path: path.clone(),
                },
            );
        }
        Ok(())
    }

    fn blocks(&mut self, blocks: &[Block], path: &NodePath) -> Result<()> {
        for (i, block) in blocks.iter().enumerate() {
            match block {
                Block::Paragraph(p) => {
                    let path = path.child("p", i);
                    self.inlines(&p.content, &path)?;
                    for marker in &p.properties.mark.markers {
                        self.marker(marker, &path.child("mark", 0))?;
                    }
                },
                Block::Table(t) => {
                    let path = path.child("tbl", i);
                    for (r, content) in t.content.iter().enumerate() {
                        let row = match content {
                            TableContent::Row(row) => row,
                            TableContent::Other(e) => {
                                self.opaque(e, &path.child("other", r))?;
                                continue;
                            },
                        };
                        let path = path.child("tr", r);
                        for (c, content) in row.content.iter().enumerate() {
                            match content {
                                RowContent::Cell(cell) => {
                                    self.blocks(&cell.content, &path.child("tc", c))?
                                },
                                RowContent::Other(e) => self.opaque(e, &path.child("other", c))?,
                            }
                        }
                    }
                },
                Block::ContentControl(sdt) => self.blocks(&sdt.content, &path.child("sdt", i))?,
                Block::Note(note) => self.blocks(&note.content, &path.child("note", i))?,
                Block::Other(e) => self.opaque(e, &path.child("other", i))?,
            }
        }
        Ok(())
    }

    fn inlines(&mut self, inlines: &[Inline], path: &NodePath) -> Result<()> {
        for (i, inline) in inlines.iter().enumerate() {
            match inline {
                Inline::Tracked(t) => {
                    let path = path.child(inline_label(inline), i);
                    self.marker(&t.marker, &path)?;
                    self.inlines(&t.content, &path)?;
                },
                Inline::ContentControl(sdt) => self.inlines(&sdt.content, &path.child("sdt", i))?,
                Inline::Group(g) => self.inlines(&g.content, &path.child("group", i))?,
                Inline::Run(run) => {
                    let path = path.child("r", i);
                    for item in &run.content {
                        if let RunContent::Other(e) = item {
                            self.opaque(e, &path)?;
                        }
                    }
                },
                Inline::Other(e) => self.opaque(e, &path.child("other", i))?,
            }
        }
        Ok(())
    }

    /// Walk markup carried as plain elements.
    fn opaque(&mut self, element: &Element, path: &NodePath) -> Result<()> {
        match element.name.as_str() {
            "w:moveFromRangeStart" => self.move_from.start(element),
            "w:moveFromRangeEnd" => self.move_from.end(element),
            "w:moveToRangeStart" => self.move_to.start(element),
            "w:moveToRangeEnd" => self.move_to.end(element),
            name => {
                let kind = MarkerKind::from_element_name(name);
                if let Some(kind @ (MarkerKind::MovedFrom | MarkerKind::MovedTo)) = kind {
                    let move_id = match kind {
                        MarkerKind::MovedFrom => self.move_from.current(),
                        _ => self.move_to.current(),
                    };
                    self.record(kind, move_id.as_deref(), path)?;
                }
                for child in element.child_elements() {
                    self.opaque(child, path)?;
                }
            },
        }
        Ok(())
    }
}

/// Path label of an inline node.
pub(crate) fn inline_label(inline: &Inline) -> &'static str {
    match inline {
        Inline::Run(_) => "r",
        Inline::Tracked(t) => match t.marker.kind {
            MarkerKind::Inserted => "ins",
            MarkerKind::Deleted => "del",
            MarkerKind::MovedFrom => "moveFrom",
            MarkerKind::MovedTo => "moveTo",
        },
        Inline::ContentControl(_) => "sdt",
        Inline::Group(_) => "group",
        Inline::Other(_) => "other",
    }
}
