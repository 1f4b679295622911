//! In-memory table model of a template.
//!
//! The grid is an owned, index-addressed structure: tables → rows → cells.
//! Only cell content is mutable; the shape is fixed once built.

use std::fmt;

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Styling
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Upper-case hex without a leading `#`, as stored in `w:color/@w:val`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Run-level style applied to written content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStyle {
    pub color: RgbColor,
    pub font: String,
}

impl RunStyle {
    /// Dark navy Calibri used for every generated answer.
    pub fn report() -> Self {
        Self {
            color: RgbColor(0, 50, 100),
            font: "Calibri".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coordinates
// ────────────────────────────────────────────────────────────────────────────

/// Zero-based table/row/grid-column coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellCoord {
    pub table: usize,
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(table: usize, row: usize, col: usize) -> Self {
        Self { table, row, col }
    }

    pub fn below(self) -> Self {
        Self {
            row: self.row + 1,
            ..self
        }
    }
}

/// One-based, the way a person reading the document counts.
impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table {}, Row {}, Column {}",
            self.table + 1,
            self.row + 1,
            self.col + 1
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cells, rows, tables
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    text: String,
    grid_span: usize,
    written: Option<RunStyle>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self::spanning(text, 1)
    }

    /// A cell covering `grid_span` grid columns (merged horizontally).
    pub fn spanning(text: impl Into<String>, grid_span: usize) -> Self {
        Self {
            text: text.into(),
            grid_span: grid_span.max(1),
            written: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn grid_span(&self) -> usize {
        self.grid_span
    }

    /// Style of content written during this run, if any.
    pub fn written_style(&self) -> Option<&RunStyle> {
        self.written.as_ref()
    }

    pub fn is_written(&self) -> bool {
        self.written.is_some()
    }

    /// Replaces the whole content with a single run of `text`.
    pub fn replace_content(&mut self, text: &str, style: &RunStyle) {
        self.text = text.to_string();
        self.written = Some(style.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of grid columns covered by this row's cells.
    pub fn grid_len(&self) -> usize {
        self.cells.iter().map(Cell::grid_span).sum()
    }

    /// Index into `cells()` of the cell covering grid column `col`.
    pub fn cell_index_at(&self, col: usize) -> Option<usize> {
        let mut start = 0;
        for (idx, cell) in self.cells.iter().enumerate() {
            let end = start + cell.grid_span();
            if col < end {
                return Some(idx);
            }
            start = end;
        }
        None
    }

    pub fn cell_at(&self, col: usize) -> Option<&Cell> {
        let idx = self.cell_index_at(col)?;
        self.cells.get(idx)
    }

    pub fn cell_at_mut(&mut self, col: usize) -> Option<&mut Cell> {
        let idx = self.cell_index_at(col)?;
        self.cells.get_mut(idx)
    }

    /// `(grid column, cell)` for every grid column, left to right.
    /// A spanning cell is yielded once per column it covers.
    pub fn columns(&self) -> impl Iterator<Item = (usize, &Cell)> + '_ {
        self.cells
            .iter()
            .flat_map(|cell| std::iter::repeat(cell).take(cell.grid_span()))
            .enumerate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds a table of unmerged cells from row-major text.
    #[cfg(test)]
    pub fn from_text<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| Row::new(row.iter().map(|t| Cell::new(t.as_ref())).collect()))
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::grid_len).max().unwrap_or(0)
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut Row> {
        self.rows.get_mut(row)
    }
}

/// All tables of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentGrid {
    tables: Vec<Table>,
}

impl DocumentGrid {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn table_mut(&mut self, table: usize) -> Option<&mut Table> {
        self.tables.get_mut(table)
    }

    pub fn cell(&self, at: CellCoord) -> Option<&Cell> {
        self.tables.get(at.table)?.rows.get(at.row)?.cell_at(at.col)
    }

    /// Every cell position in scan order: tables, then rows, then grid columns.
    pub fn coordinates(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        self.tables.iter().enumerate().flat_map(|(t, table)| {
            table.rows.iter().enumerate().flat_map(move |(r, row)| {
                row.columns()
                    .map(move |(c, cell)| (CellCoord::new(t, r, c), cell))
            })
        })
    }

    /// Coordinates of cells written during this run, in scan order.
    pub fn written_cells(&self) -> Vec<CellCoord> {
        let mut written = Vec::new();
        for (t, table) in self.tables.iter().enumerate() {
            for (r, row) in table.rows.iter().enumerate() {
                let mut col = 0;
                for cell in row.cells() {
                    if cell.is_written() {
                        written.push(CellCoord::new(t, r, col));
                    }
                    col += cell.grid_span();
                }
            }
        }
        written
    }
}
