//! Anchor resolution: finds the first cell whose normalized text contains an
//! anchor label.

use tracing::{debug, warn};

use crate::template::grid::{CellCoord, DocumentGrid};
use crate::template::normalize::{normalize, NormalizedKey};

/// Scans tables, then rows, then grid columns and returns the first cell whose
/// normalized text contains the normalized `anchor_label`.
///
/// `None` is a normal outcome. An anchor that normalizes to the empty key never
/// matches, otherwise it would claim the very first cell of the document.
pub fn resolve(grid: &DocumentGrid, anchor_label: &str) -> Option<CellCoord> {
    let key = normalize(anchor_label);
    if key.is_empty() {
        warn!("Anchor label {anchor_label:?} normalizes to an empty key; skipping scan");
        return None;
    }
    resolve_key(grid, &key)
}

pub fn resolve_key(grid: &DocumentGrid, key: &NormalizedKey) -> Option<CellCoord> {
    if key.is_empty() {
        return None;
    }
    let found = grid
        .coordinates()
        .find(|(_, cell)| normalize(cell.text()).contains(key))
        .map(|(at, _)| at);
    debug!(anchor = %key, ?found, "anchor scan finished");
    found
}
