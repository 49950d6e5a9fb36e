/// Post-processing validation.
///
/// A processed part must hold no revision markup at all: no tracked
/// wrappers, no markers on marks, rows or cells, no change records, no
/// deleted-text forms, and nothing revision-related hidden inside opaque
/// markup. Tables must keep at least one row and rows at least one cell.
use super::error::{Context, Result};
use super::markup::is_revision_element;
use super::moves::inline_label;
use crate::ooxml::docx::tree::{
    Block, Cell, Element, Inline, NodePath, ParagraphProperties, ParagraphProperty, Part,
    PropertySet, Row, RowContent, Run, RunContent, Table, TableContent, Tracked,
};

/// Check that a processed part is free of revisions and structurally sound.
///
/// # Errors
///
/// [`RevisionError::StructuralViolation`](super::RevisionError::StructuralViolation)
/// naming the first offending node.
pub fn validate(part: &Part) -> Result<()> {
    let checker = Checker {
        ctx: Context::new(&part.name),
    };
    let root = NodePath::root();
    checker.elements(&part.leading, &root)?;
    checker.blocks(&part.content, &root)?;
    if let Some(section) = &part.section {
        checker.tracked(&section.properties, &root.child("sectPr", 0))?;
    }
    Ok(())
}

struct Checker<'a> {
    ctx: Context<'a>,
}

impl Checker<'_> {
    fn element(&self, element: &Element, path: &NodePath) -> Result<()> {
        if element.any(&|e| is_revision_element(&e.name)) {
            return Err(self
                .ctx
                .violation(path, format!("revision markup left inside <{}>", element.name)));
        }
        Ok(())
    }

    fn elements(&self, elements: &[Element], path: &NodePath) -> Result<()> {
        elements.iter().try_for_each(|e| self.element(e, path))
    }

    fn opaque(&self, element: Option<&Element>, path: &NodePath) -> Result<()> {
        element.map_or(Ok(()), |e| self.element(e, path))
    }

    fn tracked(&self, properties: &Tracked<PropertySet>, path: &NodePath) -> Result<()> {
        if properties.is_changed() {
            return Err(self.ctx.violation(path, "property change record left"));
        }
        self.elements(&properties.current.elements, path)
    }

    fn blocks(&self, blocks: &[Block], path: &NodePath) -> Result<()> {
        for (i, block) in blocks.iter().enumerate() {
            match block {
                Block::Paragraph(p) => {
                    let path = path.child("p", i);
                    self.paragraph_properties(&p.properties, &path)?;
                    self.inlines(&p.content, &path)?;
                },
                Block::Table(t) => self.table(t, &path.child("tbl", i))?,
                Block::ContentControl(sdt) => {
                    let path = path.child("sdt", i);
                    self.opaque(sdt.properties.as_ref(), &path)?;
                    self.opaque(sdt.end_properties.as_ref(), &path)?;
                    self.blocks(&sdt.content, &path)?;
                },
                Block::Note(note) => self.blocks(&note.content, &path.child("note", i))?,
                Block::Other(element) => self.element(element, &path.child("other", i))?,
            }
        }
        Ok(())
    }

    fn paragraph_properties(
        &self,
        properties: &ParagraphProperties,
        path: &NodePath,
    ) -> Result<()> {
        let mark = path.child("mark", 0);
        if !properties.mark.markers.is_empty() {
            return Err(self.ctx.violation(&mark, "paragraph mark still carries revision markers"));
        }
        self.tracked(&properties.mark.properties, &mark)?;

        let items = path.child("pPr", 0);
        if properties.items.is_changed() {
            return Err(self.ctx.violation(&items, "paragraph property change record left"));
        }
        for item in &properties.items.current {
            match item {
                ParagraphProperty::Numbering(numbering) => {
                    if numbering.inserted.is_some() || numbering.change.is_some() {
                        return Err(self.ctx.violation(&items, "list reference revision left"));
                    }
                    self.elements(&numbering.elements, &items)?;
                },
                ParagraphProperty::Other(element) => self.element(element, &items)?,
            }
        }
        if let Some(section) = &properties.section {
            self.tracked(&section.properties, &path.child("sectPr", 0))?;
        }
        Ok(())
    }

    fn inlines(&self, inlines: &[Inline], path: &NodePath) -> Result<()> {
        for (i, inline) in inlines.iter().enumerate() {
            let path = path.child(inline_label(inline), i);
            match inline {
                Inline::Run(run) => self.run(run, &path)?,
                Inline::Tracked(tracked) => {
                    return Err(self.ctx.violation(
                        &path,
                        format!("{} revision left in place", tracked.marker.kind),
                    ));
                },
                Inline::ContentControl(sdt) => {
                    self.opaque(sdt.properties.as_ref(), &path)?;
                    self.opaque(sdt.end_properties.as_ref(), &path)?;
                    self.inlines(&sdt.content, &path)?;
                },
                Inline::Group(group) => {
                    self.opaque(group.properties.as_ref(), &path)?;
                    self.inlines(&group.content, &path)?;
                },
                Inline::Other(element) => self.element(element, &path)?,
            }
        }
        Ok(())
    }

    fn run(&self, run: &Run, path: &NodePath) -> Result<()> {
        if let Some(properties) = &run.properties {
            self.tracked(properties, path)?;
        }
        for item in &run.content {
            match item {
                RunContent::Text(text) | RunContent::InstrText(text) if text.deleted => {
                    return Err(self.ctx.violation(path, "deleted text form left"));
                },
                RunContent::Other(element) => self.element(element, path)?,
                _ => {},
            }
        }
        Ok(())
    }

    fn table(&self, table: &Table, path: &NodePath) -> Result<()> {
        if table.row_count() == 0 {
            return Err(self.ctx.violation(path, "table has no rows"));
        }
        self.tracked(&table.properties, &path.child("tblPr", 0))?;
        self.tracked(&table.grid, &path.child("tblGrid", 0))?;
        for (r, item) in table.content.iter().enumerate() {
            match item {
                TableContent::Row(row) => self.row(row, &path.child("tr", r))?,
                TableContent::Other(element) => self.element(element, &path.child("other", r))?,
            }
        }
        Ok(())
    }

    fn row(&self, row: &Row, path: &NodePath) -> Result<()> {
        if !row.properties.markers.is_empty() {
            return Err(self.ctx.violation(path, "row still carries revision markers"));
        }
        if row.cells().next().is_none() {
            return Err(self.ctx.violation(path, "row has no cells"));
        }
        if let Some(exceptions) = &row.exceptions {
            self.tracked(exceptions, &path.child("tblPrEx", 0))?;
        }
        self.tracked(&row.properties.properties, &path.child("trPr", 0))?;
        for (c, item) in row.content.iter().enumerate() {
            match item {
                RowContent::Cell(cell) => self.cell(cell, &path.child("tc", c))?,
                RowContent::Other(element) => self.element(element, &path.child("other", c))?,
            }
        }
        Ok(())
    }

    fn cell(&self, cell: &Cell, path: &NodePath) -> Result<()> {
        if !cell.properties.markers.is_empty() || cell.properties.merge.is_some() {
            return Err(self.ctx.violation(path, "cell still carries revision markers"));
        }
        self.tracked(&cell.properties.properties, &path.child("tcPr", 0))?;
        self.blocks(&cell.content, path)
    }
}
