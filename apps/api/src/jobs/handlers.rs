use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::catalog::SectionCatalog;
use crate::errors::AppError;
use crate::fill::{load_transcript, OpenedTemplate};
use crate::jobs::{spawn_fill_job, DocumentLookup, FillRequest, JobSnapshot, JobStatus};
use crate::state::AppState;
use crate::transcript::{TranscriptSource, DOCX_MIME};

pub const COMPLETED_FILE_NAME: &str = "Completed_Strategy_Plan.docx";

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// POST /api/v1/reports
/// Multipart: `transcript` (file), `template` (file), optional `catalog` (JSON text).
pub async fn handle_create_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateReportResponse>), AppError> {
    let mut transcript: Option<UploadedFile> = None;
    let mut template: Option<Bytes> = None;
    let mut catalog_json: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "transcript" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                transcript = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "template" => template = Some(field.bytes().await?),
            "catalog" => catalog_json = Some(field.text().await?),
            _ => {}
        }
    }

    let transcript =
        transcript.ok_or_else(|| AppError::Validation("Missing 'transcript' file".into()))?;
    let template = template.ok_or_else(|| AppError::Validation("Missing 'template' file".into()))?;

    let catalog = match catalog_json.filter(|c| !c.trim().is_empty()) {
        Some(json) => Arc::new(SectionCatalog::from_json(&json)?),
        None => state.catalog.clone(),
    };

    let source = TranscriptSource::detect(
        transcript.file_name.as_deref(),
        transcript.content_type.as_deref(),
    )?;
    let transcript_text = load_transcript(transcript.bytes.to_vec(), source).await?;
    let opened = OpenedTemplate::open(template.to_vec()).await?;
    let tables = opened.grid().table_count();
    let sections = catalog.len();

    let job_id = spawn_fill_job(
        &state.jobs,
        state.generator.clone(),
        FillRequest {
            template: opened,
            transcript: transcript_text,
            catalog,
        },
    );
    info!(%job_id, tables, sections, "report queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateReportResponse {
            job_id,
            status: JobStatus::Queued,
        }),
    ))
}

/// GET /api/v1/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobSnapshot>, AppError> {
    state
        .jobs
        .snapshot(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
}

/// GET /api/v1/reports/:id/document
pub async fn handle_download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match state.jobs.document(id) {
        DocumentLookup::Ready(bytes) => Ok((
            [
                (header::CONTENT_TYPE, DOCX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{COMPLETED_FILE_NAME}\""),
                ),
            ],
            bytes,
        )
            .into_response()),
        DocumentLookup::NotReady(JobStatus::Failed) => Err(AppError::Conflict(format!(
            "Report {id} failed; no document was produced"
        ))),
        DocumentLookup::NotReady(_) => Err(AppError::Conflict(format!(
            "Report {id} is not completed yet"
        ))),
        DocumentLookup::Unknown => Err(AppError::NotFound(format!("Report {id} not found"))),
    }
}

/// GET /api/v1/sections
pub async fn handle_list_sections(State(state): State<AppState>) -> Json<SectionCatalog> {
    Json(state.catalog.as_ref().clone())
}
