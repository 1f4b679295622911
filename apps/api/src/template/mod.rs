// Anchor-resolution and template-population engine.
// Pure, synchronous and index-addressed: no I/O happens in this module.

pub mod grid;
pub mod normalize;
pub mod resolver;
pub mod writer;

pub use grid::{Cell, CellCoord, DocumentGrid, Row, RunStyle, Table};
pub use normalize::normalize;
pub use resolver::resolve;
pub use writer::{write_below, WriteOutcome};
