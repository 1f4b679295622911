//! DOCX (OPC zip) package I/O.
//!
//! Parts are kept in archive order and re-written verbatim unless replaced.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::docx::DocxError;

/// Main document part of a WordprocessingML package.
pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct DocxPackage {
    parts: Vec<Part>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let mut data = Vec::new();
            if !is_dir {
                file.read_to_end(&mut data)
                    .map_err(|e| DocxError::Io(format!("Failed to read '{name}': {e}")))?;
            }
            parts.push(Part { name, data, is_dir });
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Ok(package)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name && !p.is_dir)
            .map(|p| p.data.as_slice())
    }

    /// The main document part decoded as UTF-8.
    pub fn document_xml(&self) -> Result<&str, DocxError> {
        let bytes = self
            .part(DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;
        std::str::from_utf8(bytes)
            .map_err(|e| DocxError::Malformed(format!("{DOCUMENT_PART} is not UTF-8: {e}")))
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Writes the package, substituting `replacements` (name → bytes) for
    /// existing parts of the same name.
    pub fn to_bytes(&self, replacements: &[(&str, &[u8])]) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            if part.is_dir {
                writer.add_directory(part.name.as_str(), options)?;
                continue;
            }
            let data = replacements
                .iter()
                .find(|(name, _)| *name == part.name)
                .map(|(_, data)| *data)
                .unwrap_or(part.data.as_slice());

            writer.start_file(part.name.as_str(), options)?;
            writer
                .write_all(data)
                .map_err(|e| DocxError::Io(format!("Failed to write '{}': {e}", part.name)))?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}
