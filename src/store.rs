//! Record Store: file-backed key-value namespace for language snapshots.
//!
//! One JSON blob per target language code holds the human override snapshot
//! (`{code}.json`); the AI baseline lives next to it (`{code}.baseline.json`)
//! and is read-only from the portal's perspective. Semantics are
//! at-least-once overwrite with last-write-wins: no locking, no optimistic
//! concurrency token, no retries. Two sessions editing the same unit can
//! silently clobber each other's save; that is an accepted limitation.

use crate::i18n::Language;
use crate::snapshot::LanguageSnapshot;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which of the two per-language snapshots to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// AI-suggested translations, read-only once loaded.
    Baseline,
    /// Human edits, overwritten on every save.
    Override,
}

/// Result of a save attempt.
///
/// A failed primary write falls back to the backup directory ("local device
/// storage"); only a double failure is reported as such. There are no
/// partial-failure or rollback semantics beyond this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the primary store.
    Saved,
    /// Primary write failed; the full snapshot went to the backup directory.
    BackedUp,
    /// Both the primary and the backup write failed.
    Failed,
}

impl SaveOutcome {
    /// Boolean success view: a backup write still counts as (degraded) success.
    pub fn is_success(&self) -> bool {
        !matches!(self, SaveOutcome::Failed)
    }

    /// Whether this save landed in the backup rather than the primary store.
    pub fn is_degraded(&self) -> bool {
        matches!(self, SaveOutcome::BackedUp)
    }
}

/// File-backed record store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
    backup_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        RecordStore {
            data_dir: data_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Path of a snapshot blob inside the data directory.
    fn path_for(&self, language: Language, kind: SnapshotKind) -> PathBuf {
        let file = match kind {
            SnapshotKind::Baseline => format!("{}.baseline.json", language.code()),
            SnapshotKind::Override => format!("{}.json", language.code()),
        };
        self.data_dir.join(file)
    }

    /// Load a snapshot, degrading to an empty default on any failure.
    ///
    /// A missing file is the normal "no data yet" case; unreadable or
    /// malformed content is logged and likewise treated as empty. Loads
    /// never fail the session.
    pub async fn load(&self, language: Language, kind: SnapshotKind) -> LanguageSnapshot {
        let path = self.path_for(language, kind);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => LanguageSnapshot::from_json_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                LanguageSnapshot::empty_for(language.code())
            }
            Err(e) => {
                warn!(
                    "Failed to read snapshot {} ({:?}): {}; using empty default",
                    language, kind, e
                );
                LanguageSnapshot::empty_for(language.code())
            }
        }
    }

    /// Overwrite the override snapshot for a language.
    ///
    /// Stamps `_meta.lastSaved`/`_meta.last_updated` with the current time
    /// before writing. On primary-write failure the full snapshot is written
    /// to the backup directory instead and the outcome reports degraded
    /// success.
    pub async fn save(&self, language: Language, snapshot: &LanguageSnapshot) -> SaveOutcome {
        let mut stamped = snapshot.clone();
        stamped.stamp(&Utc::now().to_rfc3339());
        let body = match serde_json::to_string_pretty(&stamped.to_value()) {
            Ok(body) => body,
            Err(e) => {
                // Snapshots are plain data; this indicates a bug, not bad input
                warn!("Failed to serialize snapshot for {}: {}", language, e);
                return SaveOutcome::Failed;
            }
        };

        let primary = self.path_for(language, SnapshotKind::Override);
        match write_file(&primary, &body).await {
            Ok(()) => {
                info!(
                    "Saved {} records for {} to {}",
                    stamped.record_count(),
                    language,
                    primary.display()
                );
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(
                    "Primary save for {} failed ({}); falling back to backup",
                    language, e
                );
                let backup = self.backup_dir.join(format!("{}.json", language.code()));
                match write_file(&backup, &body).await {
                    Ok(()) => {
                        warn!("Snapshot for {} written to backup {}", language, backup.display());
                        SaveOutcome::BackedUp
                    }
                    Err(e) => {
                        warn!("Backup save for {} failed too: {}", language, e);
                        SaveOutcome::Failed
                    }
                }
            }
        }
    }
}

/// Write a file, creating parent directories as needed.
async fn write_file(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, body).await
}
