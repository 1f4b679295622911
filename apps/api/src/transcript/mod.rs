//! Transcript ingestion: turns an uploaded file into plain text context.

use thiserror::Error;
use tracing::debug;

use crate::docx::{self, DocxError};

/// Default upper bound on transcript characters sent as generation context.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 30_000;

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Transcript is not valid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Transcript document could not be read: {0}")]
    Docx(#[from] DocxError),

    #[error("Transcript PDF could not be read: {0}")]
    Pdf(String),

    #[error("Unsupported transcript type '{0}' (expected .txt, .docx or .pdf)")]
    Unsupported(String),

    #[error("Transcript contains no text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    PlainText,
    Docx,
    Pdf,
}

impl TranscriptSource {
    /// Picks a reader from the upload's declared content type, falling back to
    /// the file extension when the type is missing or generic.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, TranscriptError> {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        if content_type.starts_with("text/plain") {
            return Ok(Self::PlainText);
        }
        if content_type.contains("wordprocessingml") || content_type == DOCX_MIME {
            return Ok(Self::Docx);
        }
        if content_type == "application/pdf" {
            return Ok(Self::Pdf);
        }

        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("txt") | Some("text") | Some("md") => Ok(Self::PlainText),
            Some("docx") => Ok(Self::Docx),
            Some("pdf") => Ok(Self::Pdf),
            _ => Err(TranscriptError::Unsupported(
                file_name
                    .map(str::to_string)
                    .unwrap_or_else(|| content_type.clone()),
            )),
        }
    }
}

/// Extracts the transcript text. Failing here is fatal for the whole run.
pub fn read_transcript(bytes: &[u8], source: TranscriptSource) -> Result<String, TranscriptError> {
    let text = match source {
        TranscriptSource::PlainText => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec())?
        }
        TranscriptSource::Docx => docx::extract_text(bytes)?,
        TranscriptSource::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| TranscriptError::Pdf(e.to_string()))?,
    };

    if text.trim().is_empty() {
        return Err(TranscriptError::Empty);
    }
    debug!(chars = text.chars().count(), ?source, "transcript extracted");
    Ok(text)
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
