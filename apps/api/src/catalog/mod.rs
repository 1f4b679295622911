//! Section Catalog: the ordered list of anchors and the instruction answered
//! under each one.
//!
//! Order is identity: sections are processed in catalog order and matched by
//! position, never by key. The catalog is an explicit value handed to the
//! orchestrator: the built-in default, a JSON file, or a per-request override.

mod defaults;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::template::normalize;

/// Anchors whose normalized key is shorter than this are accepted but warned
/// about: substring matching on very short keys hits unintended cells.
pub const MIN_ANCHOR_KEY_CHARS: usize = 4;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Section {index} has an empty anchor label")]
    EmptyAnchor { index: usize },

    #[error("Section {index} ('{anchor_label}') has an empty instruction")]
    EmptyInstruction { index: usize, anchor_label: String },

    #[error("Catalog contains no sections")]
    NoSections,

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// One unit of work: where the answer goes and what to ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub anchor_label: String,
    pub instruction: String,
}

impl SectionSpec {
    pub fn new(anchor_label: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            anchor_label: anchor_label.into(),
            instruction: instruction.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCatalog {
    sections: Vec<SectionSpec>,
}

impl SectionCatalog {
    /// Validates and wraps `sections`, keeping their order.
    pub fn new(sections: Vec<SectionSpec>) -> Result<Self, CatalogError> {
        if sections.is_empty() {
            return Err(CatalogError::NoSections);
        }
        for (i, section) in sections.iter().enumerate() {
            let index = i + 1;
            let key = normalize(&section.anchor_label);
            if key.is_empty() {
                return Err(CatalogError::EmptyAnchor { index });
            }
            if section.instruction.trim().is_empty() {
                return Err(CatalogError::EmptyInstruction {
                    index,
                    anchor_label: section.anchor_label.clone(),
                });
            }
            if key.char_len() < MIN_ANCHOR_KEY_CHARS {
                warn!(
                    "Section {index} anchor '{}' is very short; it may match unintended cells",
                    section.anchor_label
                );
            }
        }
        Ok(Self { sections })
    }

    /// The productivity strategy template sections.
    pub fn builtin() -> Self {
        Self {
            sections: defaults::sections(),
        }
    }

    /// Parses `{"sections": [{"anchor_label": .., "instruction": ..}, ..]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        #[derive(Deserialize)]
        struct CatalogFile {
            sections: Vec<SectionSpec>,
        }

        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.sections)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionSpec> + '_ {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_is_valid_and_ordered() {
        let builtin = SectionCatalog::builtin();
        let validated = SectionCatalog::new(builtin.iter().cloned().collect()).unwrap();
        assert_eq!(validated, builtin);

        let anchors: Vec<_> = builtin.iter().map(|s| s.anchor_label.as_str()).collect();
        assert_eq!(
            anchors,
            vec![
                "Focus: Business Section",
                "Measure: Business Section",
                "Focus: Improvement",
                "Focus:Action/Milestone",
                "Measure:Action/Milestone",
                "Improve:Action/Milestone",
            ]
        );
    }

    #[test]
    fn test_from_json_keeps_order() {
        let catalog = SectionCatalog::from_json(
            r#"{"sections": [
                {"anchor_label": "Zeta heading", "instruction": "last letter"},
                {"anchor_label": "Alpha heading", "instruction": "first letter"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let sections: Vec<_> = catalog.iter().collect();
        assert_eq!(sections[0].anchor_label, "Zeta heading");
        assert_eq!(sections[1].instruction, "first letter");
    }

    #[test]
    fn test_whitespace_anchor_rejected() {
        let err = SectionCatalog::new(vec![
            SectionSpec::new("Focus: Improvement", "ok"),
            SectionSpec::new(" \t ", "orphan"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyAnchor { index: 2 }));
    }

    #[test]
    fn test_blank_instruction_rejected() {
        let err = SectionCatalog::new(vec![SectionSpec::new("Focus: Improvement", "\n")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Section 1 ('Focus: Improvement') has an empty instruction"
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            SectionCatalog::new(Vec::new()),
            Err(CatalogError::NoSections)
        ));
        assert!(matches!(
            SectionCatalog::from_json(r#"{"sections": []}"#),
            Err(CatalogError::NoSections)
        ));
    }

    #[test]
    fn test_short_anchor_accepted() {
        let catalog = SectionCatalog::new(vec![SectionSpec::new("KPI", "list them")]).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SectionCatalog::from_json("[1, 2"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sections": [{{"anchor_label": "Risk: Register", "instruction": "List risks."}}]}}"#
        )
        .unwrap();

        let catalog = SectionCatalog::load(file.path()).unwrap();
        assert_eq!(
            catalog.iter().next(),
            Some(&SectionSpec::new("Risk: Register", "List risks."))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = SectionCatalog::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
