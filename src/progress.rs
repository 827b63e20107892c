//! Progress Aggregator: character-weighted completion metrics and
//! per-contributor statistics over the effective snapshot.
//!
//! Pure computation: rendering is someone else's job. Glossary terms are
//! excluded from these aggregates; only source units carry progress weight.

use crate::corpus::SourceCorpus;
use crate::snapshot::{LanguageSnapshot, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Unit and character subtotals for one status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTotals {
    pub units: usize,
    pub chars: usize,
}

/// Statistics for one contributor, over records with non-empty text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorStats {
    pub translator: String,

    /// Units this contributor translated.
    pub units: usize,

    /// Source characters this contributor translated.
    pub chars: usize,

    /// Per-status unit counts.
    pub approved: usize,
    pub submitted: usize,
    pub draft: usize,

    /// Share of all translated characters, percent (0-100, one decimal).
    pub share_of_translated: f64,

    /// Share of the whole corpus' characters, percent (0-100, one decimal).
    pub share_of_corpus: f64,
}

/// Character-weighted completion report for one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    /// Total source unit count (glossary excluded).
    pub total_units: usize,

    /// Total source character count.
    pub total_chars: usize,

    pub approved: StatusTotals,
    pub submitted: StatusTotals,
    pub draft: StatusTotals,

    /// Percent complete by character weight, one decimal place.
    /// 0.0 when the corpus is empty.
    pub percent_complete: f64,

    /// Contributors sorted descending by translated characters.
    pub contributors: Vec<ContributorStats>,
}

/// Round a percentage to one decimal place for display.
fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Default)]
struct ContributorAccumulator {
    units: usize,
    chars: usize,
    approved: usize,
    submitted: usize,
    draft: usize,
}

/// Compute the progress report for an effective snapshot against the corpus.
///
/// A unit counts toward a status bucket only when its record carries
/// non-empty text (a draft without text is not progress, and an approved
/// record without text would violate the workflow invariant anyway).
pub fn aggregate(effective: &LanguageSnapshot, corpus: &SourceCorpus) -> ProgressReport {
    let mut approved = StatusTotals::default();
    let mut submitted = StatusTotals::default();
    let mut draft = StatusTotals::default();
    let mut total_units = 0usize;
    let mut total_chars = 0usize;
    // BTreeMap keeps contributor ordering stable before the final sort
    let mut contributors: BTreeMap<String, ContributorAccumulator> = BTreeMap::new();

    for unit in corpus.units() {
        total_units += 1;
        total_chars += unit.chars;

        let Some(record) = effective.strings.get(&unit.id) else {
            continue;
        };
        if !record.has_text() {
            continue;
        }

        let bucket = match record.status {
            Status::Approved => Some(&mut approved),
            Status::Submitted => Some(&mut submitted),
            Status::Draft => Some(&mut draft),
            Status::Pending | Status::NeedsReview => None,
        };
        if let Some(bucket) = bucket {
            bucket.units += 1;
            bucket.chars += unit.chars;
        }

        if let Some(translator) = record.translator.as_deref() {
            if !translator.trim().is_empty() {
                let acc = contributors.entry(translator.to_string()).or_default();
                acc.units += 1;
                acc.chars += unit.chars;
                match record.status {
                    Status::Approved => acc.approved += 1,
                    Status::Submitted => acc.submitted += 1,
                    Status::Draft => acc.draft += 1,
                    Status::Pending | Status::NeedsReview => {}
                }
            }
        }
    }

    let translated_chars = approved.chars + submitted.chars + draft.chars;
    let percent_complete = if total_chars == 0 {
        0.0
    } else {
        round_one(translated_chars as f64 / total_chars as f64 * 100.0)
    };

    let mut contributors: Vec<ContributorStats> = contributors
        .into_iter()
        .map(|(translator, acc)| ContributorStats {
            translator,
            units: acc.units,
            chars: acc.chars,
            approved: acc.approved,
            submitted: acc.submitted,
            draft: acc.draft,
            share_of_translated: if translated_chars == 0 {
                0.0
            } else {
                round_one(acc.chars as f64 / translated_chars as f64 * 100.0)
            },
            share_of_corpus: if total_chars == 0 {
                0.0
            } else {
                round_one(acc.chars as f64 / total_chars as f64 * 100.0)
            },
        })
        .collect();
    contributors.sort_by(|a, b| b.chars.cmp(&a.chars).then(a.translator.cmp(&b.translator)));

    ProgressReport {
        total_units,
        total_chars,
        approved,
        submitted,
        draft,
        percent_complete,
        contributors,
    }
}
