//! Outcome log: one terminal entry per section, in catalog order.

use serde::Serialize;

use crate::catalog::SectionSpec;
use crate::template::CellCoord;

/// Per-section processing state, reported to the progress sink as it changes.
/// Sections after the current one are implicitly pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Generating,
    Resolving,
    Writing,
    Done,
    Skipped,
    Failed,
}

/// Terminal result of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    Done { anchor: CellCoord, target: CellCoord },
    AnchorNotFound,
    NoRowBelow { anchor: CellCoord },
    WriteFailed { anchor: CellCoord, reason: String },
}

impl SectionOutcome {
    pub fn state(&self) -> SectionState {
        match self {
            SectionOutcome::Done { .. } => SectionState::Done,
            SectionOutcome::AnchorNotFound | SectionOutcome::NoRowBelow { .. } => {
                SectionState::Skipped
            }
            SectionOutcome::WriteFailed { .. } => SectionState::Failed,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            SectionOutcome::Done { .. } => OutcomeKind::Written,
            SectionOutcome::AnchorNotFound => OutcomeKind::AnchorNotFound,
            SectionOutcome::NoRowBelow { .. } => OutcomeKind::NoRowBelow,
            SectionOutcome::WriteFailed { .. } => OutcomeKind::WriteError,
        }
    }
}

/// Category tag surfaced with every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Written,
    NoRowBelow,
    WriteError,
    AnchorNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// One-based position in the catalog.
    pub section: usize,
    pub anchor_label: String,
    pub outcome: OutcomeKind,
    pub anchor: Option<CellCoord>,
    pub target: Option<CellCoord>,
    /// The service call failed and an inline error text was written instead.
    pub generation_failed: bool,
    pub message: String,
}

impl LogEntry {
    pub fn new(
        index: usize,
        spec: &SectionSpec,
        outcome: &SectionOutcome,
        generation_failed: bool,
    ) -> Self {
        let label = &spec.anchor_label;
        let (anchor, target, message) = match outcome {
            SectionOutcome::Done { anchor, target } => (
                Some(*anchor),
                Some(*target),
                format!(
                    "Found '{label}' in Table {}, Row {}; wrote content to Row {}",
                    anchor.table + 1,
                    anchor.row + 1,
                    target.row + 1
                ),
            ),
            SectionOutcome::AnchorNotFound => (
                None,
                None,
                format!("Could not find header '{label}' anywhere in the tables"),
            ),
            SectionOutcome::NoRowBelow { anchor } => (
                Some(*anchor),
                None,
                format!(
                    "Found '{label}' in Table {}, Row {} but no row exists below it",
                    anchor.table + 1,
                    anchor.row + 1
                ),
            ),
            SectionOutcome::WriteFailed { anchor, reason } => (
                Some(*anchor),
                None,
                format!(
                    "Found '{label}' in Table {}, Row {} but writing failed: {reason}",
                    anchor.table + 1,
                    anchor.row + 1
                ),
            ),
        };

        Self {
            section: index + 1,
            anchor_label: label.clone(),
            outcome: outcome.kind(),
            anchor,
            target,
            generation_failed,
            message,
        }
    }
}

/// Everything a run reports back besides the document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub entries: Vec<LogEntry>,
}

impl FillReport {
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.entries.iter().filter(|e| e.outcome == kind).count()
    }

    pub fn generation_failures(&self) -> usize {
        self.entries.iter().filter(|e| e.generation_failed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SectionSpec {
        SectionSpec::new("Focus: Improvement", "Describe the plan.")
    }

    #[test]
    fn test_messages_use_one_based_positions() {
        let done = LogEntry::new(
            0,
            &spec(),
            &SectionOutcome::Done {
                anchor: CellCoord::new(1, 2, 0),
                target: CellCoord::new(1, 3, 0),
            },
            false,
        );
        assert_eq!(done.section, 1);
        assert_eq!(done.outcome, OutcomeKind::Written);
        assert_eq!(
            done.message,
            "Found 'Focus: Improvement' in Table 2, Row 3; wrote content to Row 4"
        );

        let last_row = LogEntry::new(
            2,
            &spec(),
            &SectionOutcome::NoRowBelow {
                anchor: CellCoord::new(0, 0, 0),
            },
            true,
        );
        assert_eq!(last_row.section, 3);
        assert!(last_row.generation_failed);
        assert_eq!(
            last_row.message,
            "Found 'Focus: Improvement' in Table 1, Row 1 but no row exists below it"
        );
    }

    #[test]
    fn test_outcome_states() {
        assert_eq!(SectionOutcome::AnchorNotFound.state(), SectionState::Skipped);
        assert_eq!(
            SectionOutcome::WriteFailed {
                anchor: CellCoord::new(0, 0, 0),
                reason: "x".into()
            }
            .state(),
            SectionState::Failed
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(OutcomeKind::AnchorNotFound).unwrap();
        assert_eq!(json, "anchor_not_found");
        let entry = LogEntry::new(0, &spec(), &SectionOutcome::AnchorNotFound, false);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["outcome"], "anchor_not_found");
        assert!(json["anchor"].is_null());
    }
}
