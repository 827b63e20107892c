//! Merge Engine: combines the AI-suggested baseline with human overrides.
//!
//! The baseline snapshot is read-only once loaded; the override snapshot
//! holds everything translators have saved. The effective snapshot used for
//! display, progress, and export is their merge.

use crate::snapshot::{LanguageSnapshot, TranslationRecord};
use std::collections::BTreeMap;

/// Merge a baseline and an override snapshot into the effective snapshot.
///
/// For each key present in either input: if the override has a record with
/// non-empty text, the effective record is the override record, with its
/// `ai_suggestion` backfilled from the baseline record at the same key when
/// the override's own suggestion is absent. Otherwise the effective record
/// is the baseline record (or absent if neither has one).
///
/// String units and glossary terms merge independently; structural keys
/// (`_meta`, the `glossary` container) never participate because the typed
/// snapshot keeps them out of the record maps. The function is pure:
/// identical inputs always produce identical output.
pub fn merge(baseline: &LanguageSnapshot, overrides: &LanguageSnapshot) -> LanguageSnapshot {
    LanguageSnapshot {
        // Effective metadata mirrors the override (it carries the save stamps)
        meta: overrides.meta.clone(),
        strings: merge_records(&baseline.strings, &overrides.strings),
        glossary: merge_records(&baseline.glossary, &overrides.glossary),
    }
}

fn merge_records(
    baseline: &BTreeMap<String, TranslationRecord>,
    overrides: &BTreeMap<String, TranslationRecord>,
) -> BTreeMap<String, TranslationRecord> {
    let mut effective = BTreeMap::new();

    for (key, base_record) in baseline {
        effective.insert(key.clone(), base_record.clone());
    }

    for (key, over_record) in overrides {
        if !over_record.has_text() {
            // Override without human text never shadows the baseline
            continue;
        }
        let mut record = over_record.clone();
        if record.ai_suggestion.is_none() {
            if let Some(base_record) = baseline.get(key) {
                record.ai_suggestion = base_record.ai_suggestion.clone();
            }
        }
        effective.insert(key.clone(), record);
    }

    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Status;
    use proptest::prelude::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> LanguageSnapshot {
        LanguageSnapshot::from_value(value)
    }

    // ==================== Precedence Tests ====================

    #[test]
    fn test_override_with_text_wins() {
        let baseline = snapshot(json!({
            "u1": {"text": "hola", "status": "needs_review", "ai_suggestion": "hola"}
        }));
        let overrides = snapshot(json!({
            "u1": {"text": "buenas", "status": "submitted", "translator": "Ana",
                   "ai_suggestion": "saludos"}
        }));

        let effective = merge(&baseline, &overrides);
        let record = &effective.strings["u1"];
        assert_eq!(record.text.as_deref(), Some("buenas"));
        assert_eq!(record.status, Status::Submitted);
        assert_eq!(record.translator.as_deref(), Some("Ana"));
        // Override's own suggestion is kept, not replaced
        assert_eq!(record.ai_suggestion.as_deref(), Some("saludos"));
    }

    #[test]
    fn test_ai_suggestion_backfilled_from_baseline() {
        let baseline = snapshot(json!({
            "u1": {"ai_suggestion": "안녕", "status": "needs_review"}
        }));
        let overrides = snapshot(json!({
            "u1": {"text": "반가워", "status": "submitted", "translator": "Kim"}
        }));

        let effective = merge(&baseline, &overrides);
        let record = &effective.strings["u1"];
        assert_eq!(record.text.as_deref(), Some("반가워"));
        assert_eq!(record.ai_suggestion.as_deref(), Some("안녕"));
    }

    #[test]
    fn test_override_without_text_falls_back_to_baseline() {
        let baseline = snapshot(json!({
            "u1": {"text": "안녕", "ai_suggestion": "안녕", "status": "draft", "translator": "Kim"}
        }));
        let overrides = snapshot(json!({
            "u1": {"status": "draft", "translator": "Lee"}
        }));

        let effective = merge(&baseline, &overrides);
        let record = &effective.strings["u1"];
        assert_eq!(record.text.as_deref(), Some("안녕"));
        assert_eq!(record.translator.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_empty_override_yields_baseline() {
        // baseline {u1: {text:"안녕", ai_suggestion:"안녕"}}, override {}
        let baseline = snapshot(json!({
            "u1": {"text": "안녕", "ai_suggestion": "안녕"}
        }));
        let overrides = LanguageSnapshot::default();

        let effective = merge(&baseline, &overrides);
        assert_eq!(effective.strings["u1"].text.as_deref(), Some("안녕"));
    }

    #[test]
    fn test_key_only_in_override() {
        let baseline = LanguageSnapshot::default();
        let overrides = snapshot(json!({
            "u9": {"text": "novo", "status": "draft", "translator": "Rui"}
        }));

        let effective = merge(&baseline, &overrides);
        assert_eq!(effective.strings["u9"].text.as_deref(), Some("novo"));
        assert!(effective.strings["u9"].ai_suggestion.is_none());
    }

    #[test]
    fn test_both_empty_yields_empty() {
        let effective = merge(&LanguageSnapshot::default(), &LanguageSnapshot::default());
        assert!(effective.is_empty());
    }

    // ==================== Namespace Tests ====================

    #[test]
    fn test_glossary_merges_independently() {
        let baseline = snapshot(json!({
            "glossary": {"Infantry": {"ai_suggestion": "보병", "status": "needs_review"}},
            "Infantry": {"ai_suggestion": "unit-not-term", "status": "needs_review"}
        }));
        let overrides = snapshot(json!({
            "glossary": {"Infantry": {"text": "보병대", "status": "approved",
                          "translator": "Kim", "official_game_term": true}}
        }));

        let effective = merge(&baseline, &overrides);
        assert_eq!(
            effective.glossary["Infantry"].text.as_deref(),
            Some("보병대")
        );
        assert!(effective.glossary["Infantry"].official_game_term);
        // The string unit that happens to share the name is untouched
        assert!(effective.strings["Infantry"].text.is_none());
    }

    #[test]
    fn test_meta_comes_from_override() {
        let baseline = snapshot(json!({"_meta": {"language": "ko", "last_updated": "old"}}));
        let overrides = snapshot(json!({"_meta": {"language": "ko", "last_updated": "new"}}));

        let effective = merge(&baseline, &overrides);
        assert_eq!(effective.meta.last_updated.as_deref(), Some("new"));
    }

    // ==================== Determinism / Idempotence Tests ====================

    #[test]
    fn test_merge_is_deterministic() {
        let baseline = snapshot(json!({
            "u1": {"ai_suggestion": "a"}, "u2": {"text": "b", "ai_suggestion": "b"}
        }));
        let overrides = snapshot(json!({
            "u1": {"text": "x", "status": "draft", "translator": "T"}
        }));

        let once = serde_json::to_string(&merge(&baseline, &overrides).to_value()).unwrap();
        let twice = serde_json::to_string(&merge(&baseline, &overrides).to_value()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_idempotent_simple() {
        let baseline = snapshot(json!({
            "u1": {"ai_suggestion": "안녕", "status": "needs_review"},
            "u2": {"text": "기존", "ai_suggestion": "기존", "status": "draft", "translator": "Kim"}
        }));
        let overrides = snapshot(json!({
            "u1": {"text": "반가워", "status": "submitted", "translator": "Kim"}
        }));

        let effective = merge(&baseline, &overrides);
        let again = merge(&baseline, &effective);
        assert_eq!(effective, again);
    }

    // ==================== Property Tests ====================

    fn arb_record() -> impl Strategy<Value = TranslationRecord> {
        (
            proptest::option::of("[a-z가-힣]{0,6}"),
            proptest::option::of("[a-z가-힣]{1,6}"),
            proptest::option::of("[A-Za-z]{1,8}"),
            0usize..5,
        )
            .prop_map(|(text, ai_suggestion, translator, status)| TranslationRecord {
                text,
                status: match status {
                    0 => Status::Pending,
                    1 => Status::NeedsReview,
                    2 => Status::Draft,
                    3 => Status::Submitted,
                    _ => Status::Approved,
                },
                ai_suggestion,
                translator,
                ..TranslationRecord::default()
            })
    }

    fn arb_snapshot() -> impl Strategy<Value = LanguageSnapshot> {
        proptest::collection::btree_map("u[0-9]{1,2}", arb_record(), 0..8).prop_map(|strings| {
            LanguageSnapshot {
                strings,
                ..LanguageSnapshot::default()
            }
        })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(baseline in arb_snapshot(), overrides in arb_snapshot()) {
            let effective = merge(&baseline, &overrides);
            let again = merge(&baseline, &effective);
            prop_assert_eq!(effective, again);
        }

        #[test]
        fn prop_effective_keys_come_from_inputs(
            baseline in arb_snapshot(),
            overrides in arb_snapshot()
        ) {
            let effective = merge(&baseline, &overrides);
            for key in effective.strings.keys() {
                prop_assert!(
                    baseline.strings.contains_key(key) || overrides.strings.contains_key(key)
                );
            }
        }
    }
}
