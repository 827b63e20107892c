//! Translation record data model and snapshot wire format.
//!
//! A language snapshot is stored as one JSON object per language: translation
//! records keyed by source unit id at the top level, a nested `glossary` map
//! keyed by term, and a `_meta` block. `_meta`, `glossary`, and `strings` are
//! structural keys, never translation units.
//!
//! Parsing is lenient by design: a snapshot that is not a JSON object is
//! treated as empty, and entries that do not look like records are skipped.
//! A malformed store blob must never take the session down.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Lifecycle status of a translation unit.
///
/// `pending` is the implicit initial state (no stored record). `needs_review`
/// is stamped by the AI pre-translation step and also derived at display time
/// for any record with a suggestion but no human text; it is never written by
/// the human workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No work recorded yet. Unknown status strings parse to this.
    Pending,
    /// An AI suggestion exists but no human has touched the unit.
    NeedsReview,
    /// A translator saved partial work.
    Draft,
    /// A translator marked the unit ready for review.
    Submitted,
    /// A reviewer confirmed the translation.
    Approved,
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

// Lenient on input: an unrecognized status string is treated as pending
// rather than failing the whole record.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "needs_review" => Status::NeedsReview,
            "draft" => Status::Draft,
            "submitted" => Status::Submitted,
            "approved" => Status::Approved,
            _ => Status::Pending,
        })
    }
}

impl Status {
    /// Stable lowercase name, matching the wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::NeedsReview => "needs_review",
            Status::Draft => "draft",
            Status::Submitted => "submitted",
            Status::Approved => "approved",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One translation record, keyed by source unit id (or glossary term).
///
/// Wire field names are snake_case to match the files written by the AI
/// pre-translation step; camelCase spellings from older portal saves are
/// accepted on input via aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Human-submitted translation text. Empty/absent means no human edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Stored lifecycle status.
    #[serde(default)]
    pub status: Status,

    /// Machine-suggested translation, read-only from the workflow's view.
    #[serde(
        default,
        alias = "aiSuggestion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_suggestion: Option<String>,

    /// Identity of the translator who last saved the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,

    /// RFC 3339 time of the last save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Reviewer identity, set only on approval.
    #[serde(default, alias = "approvedBy", skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,

    /// RFC 3339 approval time, set only on approval.
    #[serde(default, alias = "approvedAt", skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,

    /// Glossary terms only: marks the translation as the official in-game term.
    #[serde(
        default,
        alias = "officialGameTerm",
        skip_serializing_if = "is_false"
    )]
    pub official_game_term: bool,
}

impl TranslationRecord {
    /// Whether the record carries non-empty human translation text.
    pub fn has_text(&self) -> bool {
        self.text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }

    /// Whether the record carries a non-empty AI suggestion.
    pub fn has_suggestion(&self) -> bool {
        self.ai_suggestion
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// Status for display purposes.
    ///
    /// `needs_review` is derived, not trusted from storage: a record with a
    /// suggestion and no human text renders as needs_review, a record with
    /// no text at all renders as pending, anything with text keeps its
    /// stored status.
    pub fn display_status(&self) -> Status {
        if self.has_text() {
            self.status
        } else if self.has_suggestion() {
            Status::NeedsReview
        } else {
            Status::Pending
        }
    }
}

/// The `_meta` block of a snapshot.
///
/// `last_saved` uses the camelCase spelling on the wire; `last_updated`
/// stays snake_case. Both are stamped on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(
        default,
        rename = "lastSaved",
        alias = "last_saved",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_saved: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// All translation records for one language: string units plus the nested
/// glossary namespace.
///
/// Two snapshots exist per language: a read-only AI baseline and a
/// read-write human override; the effective snapshot is their merge.
/// `BTreeMap` keys keep iteration and serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageSnapshot {
    pub meta: SnapshotMeta,
    pub strings: BTreeMap<String, TranslationRecord>,
    pub glossary: BTreeMap<String, TranslationRecord>,
}

impl LanguageSnapshot {
    /// Empty snapshot pre-stamped with a language code.
    pub fn empty_for(code: &str) -> Self {
        LanguageSnapshot {
            meta: SnapshotMeta {
                language: Some(code.to_string()),
                code: Some(code.to_string()),
                ..SnapshotMeta::default()
            },
            ..LanguageSnapshot::default()
        }
    }

    /// Parse a snapshot from a JSON value, leniently.
    ///
    /// A non-object value yields an empty snapshot. Structural keys are
    /// routed to their fields; any other key whose value parses as a record
    /// becomes a string unit, and entries that do not parse are skipped.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(entries) = value else {
            warn!("Snapshot is not a JSON object, treating as empty");
            return LanguageSnapshot::default();
        };

        let mut snapshot = LanguageSnapshot::default();
        for (key, entry) in entries {
            match key.as_str() {
                "_meta" => {
                    snapshot.meta = serde_json::from_value(entry).unwrap_or_default();
                }
                "glossary" => {
                    snapshot.glossary = parse_record_map(entry);
                }
                // Some exports nest units under a "strings" wrapper; fold
                // those into the unit namespace instead of treating the
                // wrapper itself as a unit.
                "strings" => {
                    snapshot.strings.extend(parse_record_map(entry));
                }
                _ => match serde_json::from_value::<TranslationRecord>(entry) {
                    Ok(record) => {
                        snapshot.strings.insert(key, record);
                    }
                    Err(e) => {
                        warn!("Skipping malformed record '{}': {}", key, e);
                    }
                },
            }
        }
        snapshot
    }

    /// Parse from a JSON string, leniently (invalid JSON yields empty).
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!("Snapshot is not valid JSON, treating as empty: {}", e);
                LanguageSnapshot::default()
            }
        }
    }

    /// Serialize to the wire shape: `_meta` + `glossary` + top-level units.
    pub fn to_value(&self) -> Value {
        let mut out = serde_json::Map::new();
        if self.meta != SnapshotMeta::default() {
            out.insert(
                "_meta".to_string(),
                serde_json::to_value(&self.meta).unwrap_or(Value::Null),
            );
        }
        if !self.glossary.is_empty() {
            let glossary: serde_json::Map<String, Value> = self
                .glossary
                .iter()
                .map(|(term, record)| {
                    (
                        term.clone(),
                        serde_json::to_value(record).unwrap_or(Value::Null),
                    )
                })
                .collect();
            out.insert("glossary".to_string(), Value::Object(glossary));
        }
        for (id, record) in &self.strings {
            out.insert(
                id.clone(),
                serde_json::to_value(record).unwrap_or(Value::Null),
            );
        }
        Value::Object(out)
    }

    /// Stamp `_meta.lastSaved` and `_meta.last_updated` with the given
    /// RFC 3339 instant. Called by the store on every save.
    pub fn stamp(&mut self, now: &str) {
        self.meta.last_saved = Some(now.to_string());
        self.meta.last_updated = Some(now.to_string());
    }

    /// Total number of records (string units + glossary terms).
    pub fn record_count(&self) -> usize {
        self.strings.len() + self.glossary.len()
    }

    /// Whether the snapshot holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.glossary.is_empty()
    }
}

/// Parse a JSON object into a record map, skipping anything malformed.
fn parse_record_map(value: Value) -> BTreeMap<String, TranslationRecord> {
    let Value::Object(entries) = value else {
        return BTreeMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(key, entry)| {
            serde_json::from_value::<TranslationRecord>(entry)
                .ok()
                .map(|record| (key, record))
        })
        .collect()
}
