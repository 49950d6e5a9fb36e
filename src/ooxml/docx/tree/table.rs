/// Tables, rows and cells.
use super::element::{Attribute, Element};
use super::part::Block;
use super::properties::{CellProperties, PropertySet, RowProperties};
use super::revision::{RevisionMarker, Tracked};

/// A table (`w:tbl`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Table properties (`w:tblPr`) and `w:tblPrChange`
    pub properties: Tracked<PropertySet>,
    /// Grid columns (`w:tblGrid/w:gridCol`) and `w:tblGridChange`
    pub grid: Tracked<PropertySet>,
    /// Rows and row-level markup in source order
    pub content: Vec<TableContent>,
}

impl Table {
    /// A table with the given rows and no properties.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            content: rows.into_iter().map(TableContent::Row).collect(),
            ..Self::default()
        }
    }

    /// Iterate over rows, skipping row-level markup.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.content.iter().filter_map(|c| match c {
            TableContent::Row(r) => Some(r),
            TableContent::Other(_) => None,
        })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }
}

/// A child of `w:tbl` after the properties and grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableContent {
    /// A row
    Row(Row),
    /// Bookmarks, range markers, row-level content controls
    Other(Element),
}

/// A table row (`w:tr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Attributes of `w:tr`
    pub attributes: Vec<Attribute>,
    /// Table property exceptions (`w:tblPrEx`) and `w:tblPrExChange`
    pub exceptions: Option<Tracked<PropertySet>>,
    /// Row properties and markers
    pub properties: RowProperties,
    /// Cells and cell-level markup in source order
    pub content: Vec<RowContent>,
}

impl Row {
    /// A row with the given cells and no properties.
    pub fn with_cells(cells: Vec<Cell>) -> Self {
        Self {
            content: cells.into_iter().map(RowContent::Cell).collect(),
            ..Self::default()
        }
    }

    /// Builder: add a row marker.
    pub fn with_marker(mut self, marker: RevisionMarker) -> Self {
        self.properties.markers.push(marker);
        self
    }

    /// Iterate over cells, skipping cell-level markup.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.content.iter().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Other(_) => None,
        })
    }
}

/// A child of `w:tr` after the properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowContent {
    /// A cell
    Cell(Cell),
    /// Bookmarks, range markers, cell-level content controls
    Other(Element),
}

/// A table cell (`w:tc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Cell properties, markers and merge record
    pub properties: CellProperties,
    /// Block content (a cell always ends with a paragraph)
    pub content: Vec<Block>,
}

impl Cell {
    /// A cell holding the given blocks.
    pub fn with_blocks(content: Vec<Block>) -> Self {
        Self {
            properties: CellProperties::default(),
            content,
        }
    }

    /// Whether the cell continues a vertical merge from the row above.
    #[inline]
    pub fn is_merge_continuation(&self) -> bool {
        self.properties.is_merge_continuation()
    }
}
