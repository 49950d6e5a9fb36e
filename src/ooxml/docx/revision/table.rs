/// Table, row and cell revisions.
///
/// Rows carry `w:ins`/`w:del` in `w:trPr`, cells carry `w:cellIns`/
/// `w:cellDel` in `w:tcPr`; both follow the ordinary action table. A
/// dropped row or cell takes its content with it. Vertically merged
/// continuation cells get no special treatment: dropping the row holding a
/// merge's first cell leaves the continuation in place.
use super::classify::{Action, RevisionKind, action, marker_action};
use super::error::Result;
use super::rewriter::Rewriter;
use crate::ooxml::docx::tree::{
    Cell, CellMerge, CellProperties, Element, Markers, NodePath, PropertySet, Row, RowContent,
    RowProperties, Table, TableContent,
};
use tracing::trace;

/// `w:tcPr` children that precede `w:vMerge` in schema order.
const BEFORE_VMERGE: [&str; 4] = ["w:cnfStyle", "w:tcW", "w:gridSpan", "w:hMerge"];

impl Rewriter<'_> {
    /// Resolve a table. `None` when every row was dropped.
    pub(crate) fn table(&mut self, table: &Table, path: &NodePath) -> Result<Option<Table>> {
        let properties = self.tracked(&table.properties, &path.child("tblPr", 0))?;
        let grid = self.tracked(&table.grid, &path.child("tblGrid", 0))?;

        let mut content = Vec::with_capacity(table.content.len());
        let mut source_rows = 0usize;
        let mut kept_rows = 0usize;
        for (r, item) in table.content.iter().enumerate() {
            match item {
                TableContent::Row(row) => {
                    source_rows += 1;
                    if let Some(row) = self.row(row, &path.child("tr", r))? {
                        kept_rows += 1;
                        content.push(TableContent::Row(row));
                    }
                },
                TableContent::Other(element) => content.extend(
                    self.markup
                        .element(element, &path.child("other", r))?
                        .into_iter()
                        .map(TableContent::Other),
                ),
            }
        }

        if source_rows > 0 && kept_rows == 0 {
            trace!(part = self.ctx.part, %path, rows = source_rows, "table removed, no rows left");
            return Ok(None);
        }
        Ok(Some(Table {
            properties,
            grid,
            content,
        }))
    }

    fn row(&mut self, row: &Row, path: &NodePath) -> Result<Option<Row>> {
        if marker_action(&row.properties.markers, self.mode) == Action::Drop {
            trace!(part = self.ctx.part, %path, "row dropped");
            for cell in row.cells() {
                self.skip_fields(&cell.content);
            }
            return Ok(None);
        }

        let exceptions = row
            .exceptions
            .as_ref()
            .map(|e| self.tracked(e, &path.child("tblPrEx", 0)))
            .transpose()?;
        let properties = RowProperties {
            properties: self.tracked(&row.properties.properties, &path.child("trPr", 0))?,
            markers: Markers::new(),
        };

        let mut content = Vec::with_capacity(row.content.len());
        let mut source_cells = 0usize;
        let mut kept_cells = 0usize;
        for (c, item) in row.content.iter().enumerate() {
            match item {
                RowContent::Cell(cell) => {
                    source_cells += 1;
                    if let Some(cell) = self.cell(cell, &path.child("tc", c))? {
                        kept_cells += 1;
                        content.push(RowContent::Cell(cell));
                    }
                },
                RowContent::Other(element) => content.extend(
                    self.markup
                        .element(element, &path.child("other", c))?
                        .into_iter()
                        .map(RowContent::Other),
                ),
            }
        }

        if source_cells > 0 && kept_cells == 0 {
            trace!(part = self.ctx.part, %path, "row removed, no cells left");
            return Ok(None);
        }
        Ok(Some(Row {
            attributes: row.attributes.clone(),
            exceptions,
            properties,
            content,
        }))
    }

    fn cell(&mut self, cell: &Cell, path: &NodePath) -> Result<Option<Cell>> {
        if marker_action(&cell.properties.markers, self.mode) == Action::Drop {
            trace!(part = self.ctx.part, %path, "cell dropped");
            self.skip_fields(&cell.content);
            return Ok(None);
        }

        let mut properties = self.tracked(&cell.properties.properties, &path.child("tcPr", 0))?;
        if let Some(merge) = &cell.properties.merge {
            self.restore_merge(&mut properties.current, merge, path);
        }
        let content = self.blocks(&cell.content, path)?;

        Ok(Some(Cell {
            properties: CellProperties {
                properties,
                markers: Markers::new(),
                merge: None,
            },
            content,
        }))
    }

    /// Apply a vertical merge record. Rejecting restores `w:vMergeOrig`.
    fn restore_merge(&self, properties: &mut PropertySet, merge: &CellMerge, path: &NodePath) {
        if action(RevisionKind::PropertyChanged, self.mode) != Action::ReplaceWithSnapshot {
            return;
        }

        properties.remove("w:vMerge");
        let restored = match merge.original.as_deref() {
            Some("rest" | "restart") => {
                Some(Element::new("w:vMerge").with_attr("w:val", "restart"))
            },
            Some("cont" | "continue") => Some(Element::new("w:vMerge")),
            _ => None,
        };
        trace!(
            part = self.ctx.part,
            %path,
            original = merge.original.as_deref().unwrap_or("none"),
            "vertical merge restored"
        );

        if let Some(vmerge) = restored {
            let at = properties
                .elements
                .iter()
                .position(|e| !BEFORE_VMERGE.contains(&e.name.as_str()))
                .unwrap_or(properties.elements.len());
            properties.elements.insert(at, vmerge);
        }
    }
}
