//! Orchestrator: runs every catalog section against the grid, strictly in order.
//!
//! Per section: Generating → Resolving → Writing → Done | Skipped | Failed.
//! Section i's write lands before section i+1's scan, so later sections see
//! earlier writes. No section outcome ever stops the run.

use tracing::{info, warn};

use crate::catalog::{SectionCatalog, SectionSpec};
use crate::fill::log::{FillReport, LogEntry, SectionOutcome, SectionState};
use crate::generation::ContentGenerator;
use crate::template::{resolve, write_below, DocumentGrid, RunStyle, WriteOutcome};

/// Receives progress while a run is in flight. Both methods default to no-ops.
pub trait ProgressSink: Send {
    fn state_changed(&mut self, _section: usize, _spec: &SectionSpec, _state: SectionState) {}

    /// Called once per section after it reaches a terminal state.
    /// `progress` is `(section + 1) / total`, monotonic in `[0, 1]`.
    fn section_finished(&mut self, _entry: &LogEntry, _progress: f64) {}
}

/// Discards all progress.
#[cfg(test)]
pub struct NoProgress;

#[cfg(test)]
impl ProgressSink for NoProgress {}

/// Fills `grid` in place for every section of `catalog` and returns the log.
pub async fn fill_grid(
    grid: &mut DocumentGrid,
    catalog: &SectionCatalog,
    transcript: &str,
    generator: &dyn ContentGenerator,
    style: &RunStyle,
    progress: &mut dyn ProgressSink,
) -> FillReport {
    let total = catalog.len();
    let mut report = FillReport::default();

    for (index, spec) in catalog.iter().enumerate() {
        info!("Looking for header '{}'...", spec.anchor_label);

        progress.state_changed(index, spec, SectionState::Generating);
        let (content, generation_failed) =
            match generator.generate(transcript, &spec.instruction).await {
                Ok(text) => (text, false),
                Err(e) => {
                    warn!("Generation failed for '{}': {e}", spec.anchor_label);
                    (format!("Error: {e}"), true)
                }
            };

        progress.state_changed(index, spec, SectionState::Resolving);
        let outcome = match resolve(grid, &spec.anchor_label) {
            None => SectionOutcome::AnchorNotFound,
            Some(anchor) => {
                progress.state_changed(index, spec, SectionState::Writing);
                match write_below(grid, anchor, &content, style) {
                    WriteOutcome::Written { target } => SectionOutcome::Done { anchor, target },
                    WriteOutcome::NoRowBelow => SectionOutcome::NoRowBelow { anchor },
                    WriteOutcome::WriteError { reason } => {
                        SectionOutcome::WriteFailed { anchor, reason }
                    }
                }
            }
        };

        progress.state_changed(index, spec, outcome.state());
        let entry = LogEntry::new(index, spec, &outcome, generation_failed);
        match outcome.state() {
            SectionState::Done => info!("{}", entry.message),
            _ => warn!("{}", entry.message),
        }

        let fraction = (index + 1) as f64 / total as f64;
        progress.section_finished(&entry, fraction);
        report.entries.push(entry);
    }

    report
}
