//! Source corpus collaborator: the immutable set of extracted English
//! strings and the glossary term set.
//!
//! Both files are produced by an external extraction/build step and are
//! never mutated by the portal. The JSON shapes mirror that step's output:
//! sections of source units with per-string character counts, and glossary
//! categories of controlled-vocabulary terms.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One extracted piece of original-language text requiring translation.
///
/// Immutable: id is unique and stable across extractions, `chars` is the
/// character count used for progress weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub id: String,

    /// The English source text.
    pub en: String,

    /// Character count of the source text.
    pub chars: usize,

    /// Short content hash from the extraction step, for change detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Extraction context (e.g. "header", "paragraph", "list_item").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A group of source units extracted from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub strings: Vec<SourceUnit>,
}

/// Extraction metadata carried through from the build step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_strings: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<usize>,
}

/// The full source corpus: extraction metadata plus named sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCorpus {
    #[serde(default)]
    pub meta: CorpusMeta,

    #[serde(default)]
    pub sections: BTreeMap<String, Section>,
}

impl SourceCorpus {
    /// Load the corpus from the extraction output file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source corpus at {}", path.display()))?;
        let corpus: SourceCorpus = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse source corpus at {}", path.display()))?;
        Ok(corpus)
    }

    /// Iterate over every source unit across all sections.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.sections
            .values()
            .flat_map(|section| section.strings.iter())
    }

    /// Total number of source units.
    pub fn total_strings(&self) -> usize {
        self.units().count()
    }

    /// Total character count across all source units.
    pub fn total_chars(&self) -> usize {
        self.units().map(|unit| unit.chars).sum()
    }

    /// Look up a unit by its stable id.
    pub fn unit_by_id(&self, id: &str) -> Option<&SourceUnit> {
        self.units().find(|unit| unit.id == id)
    }
}

/// A controlled-vocabulary term requiring consistent translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// The English term.
    pub en: String,

    /// Optional usage context from the curation step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// One glossary category: a display name, its terms, and a curation note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlossaryCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub terms: Vec<GlossaryTerm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The shared glossary: categories of terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glossary {
    #[serde(default)]
    pub categories: BTreeMap<String, GlossaryCategory>,
}

impl Glossary {
    /// Load the glossary from its build output file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read glossary at {}", path.display()))?;
        let glossary: Glossary = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse glossary at {}", path.display()))?;
        Ok(glossary)
    }

    /// Iterate over every term across all categories, with its category id.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &GlossaryTerm)> {
        self.categories.iter().flat_map(|(category, data)| {
            data.terms.iter().map(move |term| (category.as_str(), term))
        })
    }

    /// Whether the glossary contains the given English term.
    pub fn contains(&self, term: &str) -> bool {
        self.terms().any(|(_, t)| t.en == term)
    }
}
