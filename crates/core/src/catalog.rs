//! # Operation Catalog
//!
//! Static description of the operations the processing service offers,
//! grouped into presentation stages. Built once and never mutated.
//!
//! Each operation carries a dependency tag. The tags are informational
//! unless the workbench runs with [`GatingPolicy::Enforce`](crate::config::GatingPolicy).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Identifier of a remote operation, sent as the `/process/{id}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationId {
    /// PowerPoint to PDF, default export
    Default,
    /// PowerPoint to PDF, notes pages export
    Custom,
    /// Term definitions from generated PDFs
    Terms,
    /// Short-form lecture transcripts from generated PDFs
    Brainrot,
    /// Audio narration from transcripts
    Audio,
    /// Videos from transcripts
    Video,
}

impl OperationId {
    /// All identifiers, in catalog order
    pub fn all() -> [OperationId; 6] {
        [
            OperationId::Default,
            OperationId::Custom,
            OperationId::Terms,
            OperationId::Brainrot,
            OperationId::Audio,
            OperationId::Video,
        ]
    }

    /// Wire value of the identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
            Self::Terms => "terms",
            Self::Brainrot => "brainrot",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Conversion-class operations clear the staging store when they succeed
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Default | Self::Custom)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationId::all()
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| CatalogError::UnknownOperation(s.to_string()))
    }
}

/// Prior-stage artifact class an operation depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// Files staged locally (or uploaded earlier in the session)
    StagedFiles,
    /// PDFs produced by a conversion
    GeneratedPdf,
    /// Transcripts produced by short-form content generation
    GeneratedTranscripts,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StagedFiles => "requires-staged-files",
            Self::GeneratedPdf => "requires-generated-pdf",
            Self::GeneratedTranscripts => "requires-generated-transcripts",
        }
    }
}

/// A selectable unit of remote work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Display label
    pub label: String,
    /// Unique identifier
    pub id: OperationId,
    /// What must exist before the operation makes sense
    pub requires: Dependency,
    /// What a successful run makes available to later operations
    #[serde(default)]
    pub satisfies: Option<Dependency>,
}

impl Operation {
    fn new(label: &str, id: OperationId, requires: Dependency) -> Self {
        Self {
            label: label.to_string(),
            id,
            requires,
            satisfies: None,
        }
    }

    fn satisfying(mut self, dependency: Dependency) -> Self {
        self.satisfies = Some(dependency);
        self
    }
}

/// Presentation grouping of related operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub title: String,
    pub description: String,
    pub options: Vec<Operation>,
}

/// The immutable operation catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    stages: Vec<Stage>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Build a catalog from arbitrary stages.
    ///
    /// Fails if the same identifier appears twice.
    pub fn new(stages: Vec<Stage>) -> Result<Self, CatalogError> {
        let mut seen = Vec::new();
        for op in stages.iter().flat_map(|s| s.options.iter()) {
            if seen.contains(&op.id) {
                return Err(CatalogError::DuplicateOperation(op.id));
            }
            seen.push(op.id);
        }
        Ok(Self { stages })
    }

    /// The three stages offered by the processing service
    pub fn standard() -> Self {
        let stages = vec![
            Stage {
                title: "PowerPoint Conversion".to_string(),
                description: "Convert PPTX files to PDF format".to_string(),
                options: vec![
                    Operation::new("Default PDF", OperationId::Default, Dependency::StagedFiles)
                        .satisfying(Dependency::GeneratedPdf),
                    Operation::new(
                        "Custom PDF with Notes",
                        OperationId::Custom,
                        Dependency::StagedFiles,
                    )
                    .satisfying(Dependency::GeneratedPdf),
                ],
            },
            Stage {
                title: "Content Generation".to_string(),
                description: "Generate study materials and content".to_string(),
                options: vec![
                    Operation::new(
                        "Generate Term Definitions",
                        OperationId::Terms,
                        Dependency::GeneratedPdf,
                    ),
                    Operation::new(
                        "Create Short-Form Content",
                        OperationId::Brainrot,
                        Dependency::GeneratedPdf,
                    )
                    .satisfying(Dependency::GeneratedTranscripts),
                ],
            },
            Stage {
                title: "Media Creation".to_string(),
                description: "Generate audio and video content".to_string(),
                options: vec![
                    Operation::new(
                        "Generate Audio",
                        OperationId::Audio,
                        Dependency::GeneratedTranscripts,
                    ),
                    Operation::new(
                        "Create Videos",
                        OperationId::Video,
                        Dependency::GeneratedTranscripts,
                    ),
                ],
            },
        ];

        Self { stages }
    }

    /// Ordered stages with their ordered options
    pub fn describe(&self) -> &[Stage] {
        &self.stages
    }

    /// Every operation, in display order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.stages.iter().flat_map(|s| s.options.iter())
    }

    pub fn find(&self, id: OperationId) -> Option<&Operation> {
        self.operations().find(|op| op.id == id)
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.find(id).is_some()
    }

    /// Resolve a user-supplied value to an operation of this catalog
    pub fn resolve(&self, value: &str) -> Result<&Operation, CatalogError> {
        let id: OperationId = value.parse()?;
        self.find(id)
            .ok_or_else(|| CatalogError::UnknownOperation(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = Catalog::standard();
        let stages = catalog.describe();
        assert_eq!(stages.len(), 3);
        assert!(stages.iter().all(|s| s.options.len() == 2));

        let ids: Vec<&str> = catalog.operations().map(|op| op.id.as_str()).collect();
        assert_eq!(ids, ["default", "custom", "terms", "brainrot", "audio", "video"]);
    }

    #[test]
    fn test_dependency_tags() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.find(OperationId::Custom).unwrap().requires,
            Dependency::StagedFiles
        );
        assert_eq!(
            catalog.find(OperationId::Terms).unwrap().requires,
            Dependency::GeneratedPdf
        );
        assert_eq!(
            catalog.find(OperationId::Video).unwrap().requires,
            Dependency::GeneratedTranscripts
        );
        assert_eq!(
            catalog.find(OperationId::Brainrot).unwrap().satisfies,
            Some(Dependency::GeneratedTranscripts)
        );
    }

    #[test]
    fn test_parse_operation_id() {
        assert_eq!("brainrot".parse::<OperationId>().unwrap(), OperationId::Brainrot);
        assert_eq!(" audio ".parse::<OperationId>().unwrap(), OperationId::Audio);
        assert!(matches!(
            "pdf".parse::<OperationId>(),
            Err(CatalogError::UnknownOperation(v)) if v == "pdf"
        ));
    }

    #[test]
    fn test_conversion_class() {
        let conversions: Vec<OperationId> = OperationId::all()
            .into_iter()
            .filter(|id| id.is_conversion())
            .collect();
        assert_eq!(conversions, [OperationId::Default, OperationId::Custom]);
    }

    #[test]
    fn test_custom_catalog_rejects_duplicates() {
        let stage = Stage {
            title: "Twice".to_string(),
            description: String::new(),
            options: vec![
                Operation::new("A", OperationId::Audio, Dependency::StagedFiles),
                Operation::new("B", OperationId::Audio, Dependency::StagedFiles),
            ],
        };
        assert!(matches!(
            Catalog::new(vec![stage]),
            Err(CatalogError::DuplicateOperation(OperationId::Audio))
        ));
    }

    #[test]
    fn test_resolve_outside_custom_catalog() {
        let stage = Stage {
            title: "Media only".to_string(),
            description: String::new(),
            options: vec![Operation::new(
                "Audio",
                OperationId::Audio,
                Dependency::GeneratedTranscripts,
            )],
        };
        let catalog = Catalog::new(vec![stage]).unwrap();
        assert!(catalog.resolve("audio").is_ok());
        assert!(catalog.resolve("video").is_err());
    }

    #[test]
    fn test_operation_id_serialization() {
        let json = serde_json::to_string(&OperationId::Brainrot).unwrap();
        assert_eq!(json, "\"brainrot\"");
    }
}
