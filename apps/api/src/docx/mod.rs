// DOCX binding: package I/O plus the table view of `word/document.xml`.
// Parsing and serialization are CPU-bound; async callers run them inside
// tokio::task::spawn_blocking.

pub mod body;
pub mod package;

use thiserror::Error;
use tracing::debug;

use crate::template::DocumentGrid;

pub use body::{extract_body_text, DocumentBody};
pub use package::{DocxPackage, DOCUMENT_PART};

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Invalid document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document package is missing '{0}'")]
    MissingPart(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// An opened template: the untouched package plus the parsed main document.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    package: DocxPackage,
    body: DocumentBody,
}

impl DocxTemplate {
    /// Opens a template and returns it with the grid of its top-level tables.
    pub fn open(bytes: &[u8]) -> Result<(Self, DocumentGrid), DocxError> {
        let package = DocxPackage::from_bytes(bytes)?;
        debug!(parts = ?package.part_names().collect::<Vec<_>>(), "template package read");
        let (body, grid) = DocumentBody::parse(package.document_xml()?)?;
        Ok((Self { package, body }, grid))
    }

    /// Serializes the package with the cells written in `grid`.
    pub fn save(&self, grid: &DocumentGrid) -> Result<Vec<u8>, DocxError> {
        let document = self.body.render(grid)?;
        self.package.to_bytes(&[(DOCUMENT_PART, document.as_slice())])
    }
}

/// Plain text of a DOCX file: its body paragraphs joined with newlines.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let package = DocxPackage::from_bytes(bytes)?;
    extract_body_text(package.document_xml()?)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Builders for small in-memory DOCX fixtures.

    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults/></w:styles>"#;

    pub fn minimal_document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    pub fn table_xml(rows: &[&[&str]]) -> String {
        let mut xml = String::from("<w:tbl><w:tblPr/>");
        for row in rows {
            xml.push_str("<w:tr>");
            for text in *row {
                xml.push_str(&format!(
                    "<w:tc><w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p></w:tc>"
                ));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        xml
    }

    pub fn build_package(document_xml: &str) -> Vec<u8> {
        build_parts(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", RELS),
            ("word/document.xml", document_xml),
            ("word/styles.xml", STYLES),
        ])
    }

    /// A zip holding exactly `parts`, in order.
    pub fn build_parts(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// A template whose body holds the given tables.
    pub fn template_docx(tables: &[&[&[&str]]]) -> Vec<u8> {
        let body: String = tables.iter().map(|t| table_xml(t)).collect();
        build_package(&minimal_document(&body))
    }

    /// A transcript document with one paragraph per line.
    pub fn transcript_docx(lines: &[&str]) -> Vec<u8> {
        let body: String = lines
            .iter()
            .map(|l| format!("<w:p><w:r><w:t xml:space=\"preserve\">{l}</w:t></w:r></w:p>"))
            .collect();
        build_package(&minimal_document(&body))
    }
}
