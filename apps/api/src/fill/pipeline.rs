//! End-to-end fill: template bytes + transcript text in, completed document
//! bytes + outcome log out. The only place fatal input errors arise.

use thiserror::Error;
use tokio::task;
use tracing::{debug, info, warn};

use crate::catalog::SectionCatalog;
use crate::docx::{DocxError, DocxTemplate};
use crate::fill::log::{FillReport, OutcomeKind};
use crate::fill::orchestrator::{fill_grid, ProgressSink};
use crate::generation::ContentGenerator;
use crate::template::{DocumentGrid, RunStyle};
use crate::transcript::{read_transcript, TranscriptError, TranscriptSource};

#[derive(Debug, Error)]
pub enum FillError {
    /// The template could not be opened; nothing was processed.
    #[error("Template could not be opened: {0}")]
    FatalInput(DocxError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// The filled document could not be serialized.
    #[error("Completed document could not be written: {0}")]
    Output(DocxError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// A parsed template ready to be filled.
#[derive(Debug, Clone)]
pub struct OpenedTemplate {
    template: DocxTemplate,
    grid: DocumentGrid,
}

impl OpenedTemplate {
    pub fn parse(bytes: &[u8]) -> Result<Self, FillError> {
        let (template, grid) = DocxTemplate::open(bytes).map_err(FillError::FatalInput)?;
        if grid.table_count() == 0 {
            warn!("Template has no tables; every section will be skipped");
        }
        debug!(
            shapes = ?grid.tables().iter().map(|t| (t.row_count(), t.column_count())).collect::<Vec<_>>(),
            "template tables (rows, columns)"
        );
        Ok(Self { template, grid })
    }

    /// Parses on the blocking pool.
    pub async fn open(bytes: Vec<u8>) -> Result<Self, FillError> {
        task::spawn_blocking(move || Self::parse(&bytes))
            .await
            .map_err(|e| FillError::Task(e.to_string()))?
    }

    pub fn grid(&self) -> &DocumentGrid {
        &self.grid
    }
}

/// Extracts transcript text on the blocking pool.
pub async fn load_transcript(bytes: Vec<u8>, source: TranscriptSource) -> Result<String, FillError> {
    let text = task::spawn_blocking(move || read_transcript(&bytes, source))
        .await
        .map_err(|e| FillError::Task(e.to_string()))??;
    Ok(text)
}

#[derive(Debug, Clone)]
pub struct FilledReport {
    pub document: Vec<u8>,
    pub report: FillReport,
}

/// Runs every section of `catalog` against `opened` and serializes the result.
pub async fn fill_template(
    opened: OpenedTemplate,
    transcript: &str,
    catalog: &SectionCatalog,
    generator: &dyn ContentGenerator,
    progress: &mut dyn ProgressSink,
) -> Result<FilledReport, FillError> {
    let OpenedTemplate { template, mut grid } = opened;
    info!(
        sections = catalog.len(),
        tables = grid.table_count(),
        "filling template"
    );

    let report = fill_grid(
        &mut grid,
        catalog,
        transcript,
        generator,
        &RunStyle::report(),
        progress,
    )
    .await;

    debug!(cells = ?grid.written_cells(), "splicing written cells");
    let document = task::spawn_blocking(move || template.save(&grid))
        .await
        .map_err(|e| FillError::Task(e.to_string()))?
        .map_err(FillError::Output)?;

    info!(
        written = report.count(OutcomeKind::Written),
        skipped = report.count(OutcomeKind::AnchorNotFound) + report.count(OutcomeKind::NoRowBelow),
        failed = report.count(OutcomeKind::WriteError),
        generation_failures = report.generation_failures(),
        bytes = document.len(),
        "template filled"
    );

    Ok(FilledReport { document, report })
}
