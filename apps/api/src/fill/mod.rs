//! Template population: drives the catalog through generation, anchor
//! resolution and cell writing, and reports what happened per section.

pub mod log;
pub mod orchestrator;
pub mod pipeline;

pub use log::{LogEntry, SectionState};
pub use orchestrator::ProgressSink;
pub use pipeline::{fill_template, load_transcript, FillError, OpenedTemplate};
