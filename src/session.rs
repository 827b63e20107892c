//! Editing session: explicit context object for one translator, one language.
//!
//! The session owns the two per-language snapshots (read-only baseline,
//! read-write override) instead of keeping them in ambient globals. Every
//! operation takes the session explicitly; a rejected transition leaves both
//! snapshots untouched.

use crate::corpus::SourceCorpus;
use crate::error::PortalError;
use crate::i18n::Language;
use crate::merge::merge;
use crate::progress::{aggregate, ProgressReport};
use crate::snapshot::{LanguageSnapshot, TranslationRecord};
use crate::store::{RecordStore, SaveOutcome, SnapshotKind};
use crate::workflow::{apply, Actor, TransitionAction};
use chrono::Utc;

/// Whether a unit id addresses the string namespace or the glossary.
///
/// The two namespaces live in the same snapshot but carry no transactional
/// guarantee across each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitScope {
    StringUnit,
    GlossaryTerm,
}

/// One editing session: language, actor, and the two loaded snapshots.
#[derive(Debug, Clone)]
pub struct Session {
    language: Language,
    actor: Actor,
    baseline: LanguageSnapshot,
    overrides: LanguageSnapshot,
}

impl Session {
    /// Open a session by loading both snapshots from the store.
    ///
    /// The baseline is loaded once and never written back; the override is
    /// the working copy persisted on every save.
    pub async fn open(store: &RecordStore, language: Language, actor: Actor) -> Self {
        let baseline = store.load(language, SnapshotKind::Baseline).await;
        let overrides = store.load(language, SnapshotKind::Override).await;
        Session {
            language,
            actor,
            baseline,
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The merged view used for display, progress, and export.
    pub fn effective(&self) -> LanguageSnapshot {
        merge(&self.baseline, &self.overrides)
    }

    /// The current effective record for a unit, if any.
    pub fn effective_record(&self, scope: UnitScope, id: &str) -> Option<TranslationRecord> {
        let effective = self.effective();
        match scope {
            UnitScope::StringUnit => effective.strings.get(id).cloned(),
            UnitScope::GlossaryTerm => effective.glossary.get(id).cloned(),
        }
    }

    /// Apply a workflow action to one unit and persist the override snapshot.
    ///
    /// Guards and authorization run against the unit's effective record; on
    /// rejection nothing is mutated and nothing is written. On success the
    /// new record replaces the unit's override entry and the full override
    /// snapshot is saved (fire-and-forget, last-write-wins).
    pub async fn save_unit(
        &mut self,
        store: &RecordStore,
        scope: UnitScope,
        id: &str,
        action: TransitionAction,
        text: &str,
    ) -> Result<SaveOutcome, PortalError> {
        let existing = self.effective_record(scope, id);
        let record = apply(
            action,
            text,
            &self.actor,
            existing.as_ref(),
            scope == UnitScope::GlossaryTerm,
            &Utc::now().to_rfc3339(),
        )?;

        match scope {
            UnitScope::StringUnit => {
                self.overrides.strings.insert(id.to_string(), record);
            }
            UnitScope::GlossaryTerm => {
                self.overrides.glossary.insert(id.to_string(), record);
            }
        }

        Ok(store.save(self.language, &self.overrides).await)
    }

    /// Progress report over the effective snapshot.
    pub fn progress(&self, corpus: &SourceCorpus) -> ProgressReport {
        aggregate(&self.effective(), corpus)
    }
}
