//! Export effective translations for consumption by the target application.
//!
//! Two artifacts per language: a nested map for vue-i18n (simplified
//! `category.index` keys) and a flat map keyed by the full unit id for easy
//! lookup. Only records a human has acted on (draft, submitted, approved)
//! are exported; AI suggestions awaiting review are not.

use crate::corpus::SourceCorpus;
use crate::i18n::Language;
use crate::snapshot::{LanguageSnapshot, Status};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::info;

/// The two export artifacts for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifacts {
    /// Nested vue-i18n map, e.g. `{"AppHeader": {"0": "대시보드"}}`.
    pub nested: Value,

    /// Flat map: `{"_meta": {...}, "strings": {id: {en, <lang>, status}}}`.
    pub flat: Value,

    /// Number of strings exported (same for both artifacts).
    pub string_count: usize,
}

fn is_exportable(status: Status) -> bool {
    matches!(status, Status::Draft | Status::Submitted | Status::Approved)
}

/// Collapse a dotted unit id into a short vue-i18n key.
///
/// Ids carry the full extraction path (`vue.layout.AppHeader.0`); the
/// consuming app only wants the last component and index. Structural parts
/// like "header" or "paragraph" are skipped in favor of the part before them.
fn simplify_key(id: &str) -> String {
    let parts: Vec<&str> = id.split('.').collect();
    if parts.len() < 3 {
        return id.to_string();
    }
    let index = parts[parts.len() - 1];
    let candidate = parts[parts.len() - 2];
    let category = if matches!(candidate, "header" | "paragraph" | "list_item") {
        parts[parts.len() - 3]
    } else {
        candidate
    };
    format!("{}.{}", category, index)
}

/// Insert a leaf value into a nested object, creating intermediate maps.
fn insert_nested(root: &mut Map<String, Value>, key: &str, text: &str) {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = root;
    for part in &parts[..parts.len() - 1] {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut().unwrap();
    }
    current.insert(parts[parts.len() - 1].to_string(), Value::String(text.to_string()));
}

/// Build both export artifacts for a language from its effective snapshot.
///
/// Walks the corpus (not the snapshot) so that orphaned records for retired
/// unit ids never leak into the output.
pub fn export_language(
    language: Language,
    effective: &LanguageSnapshot,
    corpus: &SourceCorpus,
    exported_at: &str,
) -> ExportArtifacts {
    let mut nested = Map::new();
    let mut flat_strings = Map::new();
    let mut string_count = 0;

    for unit in corpus.units() {
        let Some(record) = effective.strings.get(&unit.id) else {
            continue;
        };
        if !is_exportable(record.status) {
            continue;
        }
        let text = record.text.as_deref().unwrap_or_default();

        insert_nested(&mut nested, &simplify_key(&unit.id), text);
        flat_strings.insert(
            unit.id.clone(),
            json!({
                "en": unit.en,
                language.code(): text,
                "status": record.status.as_str(),
            }),
        );
        string_count += 1;
    }

    let flat = json!({
        "_meta": {
            "language": language.code(),
            "exported_at": exported_at,
            "string_count": string_count,
        },
        "strings": flat_strings,
    });

    ExportArtifacts {
        nested: Value::Object(nested),
        flat,
        string_count,
    }
}

/// Write both artifacts into the locales output directory.
///
/// Layout matches the consuming app: `{lang}.json` (nested, for vue-i18n)
/// and `{lang}-flat.json` next to it.
pub fn write_artifacts(
    out_dir: &Path,
    language: Language,
    artifacts: &ExportArtifacts,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create locales dir {}", out_dir.display()))?;

    let nested_path = out_dir.join(format!("{}.json", language.code()));
    std::fs::write(
        &nested_path,
        serde_json::to_string_pretty(&artifacts.nested)?,
    )
    .with_context(|| format!("Failed to write {}", nested_path.display()))?;

    let flat_path = out_dir.join(format!("{}-flat.json", language.code()));
    std::fs::write(&flat_path, serde_json::to_string_pretty(&artifacts.flat)?)
        .with_context(|| format!("Failed to write {}", flat_path.display()))?;

    info!(
        "Exported {} strings to {}",
        artifacts.string_count,
        nested_path.display()
    );
    Ok(())
}
