//! Writes generated content into the cell directly below a resolved anchor.

use serde::Serialize;
use thiserror::Error;

use crate::template::grid::{CellCoord, DocumentGrid, RunStyle};

/// Result of a single write attempt. Failures are values, not errors: one
/// section's failure must never abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteOutcome {
    Written { target: CellCoord },
    NoRowBelow,
    WriteError { reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellWriteError {
    #[error("anchor is in the last row of table {table}")]
    NoRowBelow { table: usize },

    #[error("table {0} does not exist")]
    MissingTable(usize),

    #[error("row {row} of table {table} has no cell at column {col}")]
    MissingCell { table: usize, row: usize, col: usize },

    #[error("content contains a character not allowed in the document: U+{0:04X}")]
    IllegalCharacter(u32),
}

/// Replaces the content of the cell one row below `anchor`, same grid column.
///
/// Nothing is mutated unless the outcome is `Written`.
pub fn write_below(
    grid: &mut DocumentGrid,
    anchor: CellCoord,
    text: &str,
    style: &RunStyle,
) -> WriteOutcome {
    match try_write_below(grid, anchor, text, style) {
        Ok(target) => WriteOutcome::Written { target },
        Err(CellWriteError::NoRowBelow { .. }) => WriteOutcome::NoRowBelow,
        Err(e) => WriteOutcome::WriteError {
            reason: e.to_string(),
        },
    }
}

fn try_write_below(
    grid: &mut DocumentGrid,
    anchor: CellCoord,
    text: &str,
    style: &RunStyle,
) -> Result<CellCoord, CellWriteError> {
    let target = anchor.below();
    let table = grid
        .table_mut(anchor.table)
        .ok_or(CellWriteError::MissingTable(anchor.table + 1))?;

    if target.row >= table.row_count() {
        return Err(CellWriteError::NoRowBelow {
            table: anchor.table + 1,
        });
    }

    check_document_text(text)?;

    let cell = table
        .row_mut(target.row)
        .and_then(|row| row.cell_at_mut(target.col))
        .ok_or(CellWriteError::MissingCell {
            table: target.table + 1,
            row: target.row + 1,
            col: target.col + 1,
        })?;

    cell.replace_content(text, style);
    Ok(target)
}

/// XML 1.0 `Char`: tab, LF, CR and everything from U+0020 except U+FFFE/U+FFFF.
fn check_document_text(text: &str) -> Result<(), CellWriteError> {
    match text.chars().find(|&c| !is_document_char(c)) {
        Some(c) => Err(CellWriteError::IllegalCharacter(c as u32)),
        None => Ok(()),
    }
}

fn is_document_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}
