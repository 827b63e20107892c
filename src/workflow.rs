//! Status Workflow: the guarded lifecycle of a translation unit.
//!
//! pending → draft → submitted → approved, where pending is the implicit
//! "no stored record" state. Every transition requires non-empty text and a
//! non-empty translator identity, and is subject to the ownership check in
//! [`authorize`]. Actions deliberately do not check the *current* stored
//! status: re-invoking a guarded action always overwrites, matching the
//! original portal's behavior (an accepted business-logic gap).

use crate::error::PortalError;
use crate::snapshot::{Status, TranslationRecord};
use serde::Deserialize;

/// The acting user: a declared translator identity plus a privilege flag.
///
/// The identity is what the translator typed into the portal; the admin flag
/// comes from the authentication collaborator (or from the permissive
/// fallback when authentication is not required).
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>, is_admin: bool) -> Self {
        Actor {
            name: name.into(),
            is_admin,
        }
    }

    /// An administrator actor, used by the open (no-auth) fallback mode.
    pub fn admin(name: impl Into<String>) -> Self {
        Actor::new(name, true)
    }
}

/// A workflow action a translator can invoke on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    /// Save partial work (status becomes `draft`).
    SaveDraft,
    /// Mark the unit ready for review (status becomes `submitted`).
    Submit,
    /// Confirm the translation (status becomes `approved`).
    Approve,
}

impl TransitionAction {
    /// The stored status this action produces.
    pub fn target_status(&self) -> Status {
        match self {
            TransitionAction::SaveDraft => Status::Draft,
            TransitionAction::Submit => Status::Submitted,
            TransitionAction::Approve => Status::Approved,
        }
    }
}

/// Check whether the actor may edit a unit currently owned as recorded.
///
/// A non-privileged actor may edit only units with no recorded translator,
/// or units whose recorded translator equals the actor's declared identity
/// case-insensitively. Administrators may edit anything.
pub fn authorize(actor: &Actor, existing: Option<&TranslationRecord>) -> Result<(), PortalError> {
    if actor.is_admin {
        return Ok(());
    }
    let owner = existing.and_then(|record| record.translator.as_deref());
    match owner {
        None => Ok(()),
        Some(owner) if owner.trim().to_lowercase() == actor.name.trim().to_lowercase() => Ok(()),
        Some(owner) => Err(PortalError::Authorization(format!(
            "unit is owned by '{}'",
            owner
        ))),
    }
}

/// Apply a workflow action, producing the new record for the unit.
///
/// Guards: trimmed `text` and the actor's trimmed identity must both be
/// non-empty, otherwise `ValidationError` and nothing is mutated. The
/// authorization check runs against the unit's current effective record.
/// The existing record's AI suggestion is carried onto the new record.
///
/// `now` is the RFC 3339 timestamp to stamp; `is_glossary_term` controls the
/// official-game-term flag set on approval.
pub fn apply(
    action: TransitionAction,
    text: &str,
    actor: &Actor,
    existing: Option<&TranslationRecord>,
    is_glossary_term: bool,
    now: &str,
) -> Result<TranslationRecord, PortalError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PortalError::Validation(
            "translation text is empty".to_string(),
        ));
    }
    let translator = actor.name.trim();
    if translator.is_empty() {
        return Err(PortalError::Validation(
            "translator identity is empty".to_string(),
        ));
    }

    authorize(actor, existing)?;

    let mut record = TranslationRecord {
        text: Some(text.to_string()),
        status: action.target_status(),
        ai_suggestion: existing.and_then(|r| r.ai_suggestion.clone()),
        translator: Some(translator.to_string()),
        timestamp: Some(now.to_string()),
        ..TranslationRecord::default()
    };

    if action == TransitionAction::Approve {
        record.approved_by = Some(translator.to_string());
        record.approved_at = Some(now.to_string());
        if is_glossary_term {
            record.official_game_term = true;
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2025-04-01T10:00:00+00:00";

    fn kim() -> Actor {
        Actor::new("Kim", false)
    }

    fn existing_by(translator: &str) -> TranslationRecord {
        TranslationRecord {
            text: Some("이전".to_string()),
            status: Status::Draft,
            translator: Some(translator.to_string()),
            ..TranslationRecord::default()
        }
    }

    // ==================== Guard Tests ====================

    #[test]
    fn test_empty_text_rejected() {
        for action in [
            TransitionAction::SaveDraft,
            TransitionAction::Submit,
            TransitionAction::Approve,
        ] {
            let result = apply(action, "", &kim(), None, false, NOW);
            assert!(matches!(result, Err(PortalError::Validation(_))));
        }
    }

    #[test]
    fn test_whitespace_text_rejected() {
        let result = apply(TransitionAction::Submit, "   \n\t ", &kim(), None, false, NOW);
        assert!(matches!(result, Err(PortalError::Validation(_))));
    }

    #[test]
    fn test_empty_translator_rejected() {
        let anonymous = Actor::new("  ", false);
        let result = apply(TransitionAction::SaveDraft, "안녕", &anonymous, None, false, NOW);
        assert!(matches!(result, Err(PortalError::Validation(_))));
    }

    #[test]
    fn test_no_transition_leaves_text_empty() {
        // Every successful transition carries non-empty text
        let record = apply(TransitionAction::Approve, "  텍스트  ", &kim(), None, false, NOW)
            .expect("should succeed");
        assert!(record.has_text());
        assert_eq!(record.text.as_deref(), Some("텍스트"));
    }

    // ==================== Transition Effect Tests ====================

    #[test]
    fn test_save_draft_sets_fields() {
        let record =
            apply(TransitionAction::SaveDraft, "임시", &kim(), None, false, NOW).unwrap();

        assert_eq!(record.status, Status::Draft);
        assert_eq!(record.text.as_deref(), Some("임시"));
        assert_eq!(record.translator.as_deref(), Some("Kim"));
        assert_eq!(record.timestamp.as_deref(), Some(NOW));
        assert!(record.approved_by.is_none());
        assert!(record.approved_at.is_none());
    }

    #[test]
    fn test_submit_carries_ai_suggestion() {
        // baseline {u1: {ai_suggestion: "안녕"}}, submit "반가워" as Kim
        let baseline_record = TranslationRecord {
            ai_suggestion: Some("안녕".to_string()),
            status: Status::NeedsReview,
            ..TranslationRecord::default()
        };

        let record = apply(
            TransitionAction::Submit,
            "반가워",
            &kim(),
            Some(&baseline_record),
            false,
            NOW,
        )
        .unwrap();

        assert_eq!(record.text.as_deref(), Some("반가워"));
        assert_eq!(record.status, Status::Submitted);
        assert_eq!(record.translator.as_deref(), Some("Kim"));
        assert_eq!(record.ai_suggestion.as_deref(), Some("안녕"));
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_approve_sets_approval_fields() {
        let record = apply(TransitionAction::Approve, "승인됨", &kim(), None, false, NOW).unwrap();

        assert_eq!(record.status, Status::Approved);
        assert!(record.has_text());
        assert_eq!(record.approved_by.as_deref(), Some("Kim"));
        assert_eq!(record.approved_at.as_deref(), Some(NOW));
        assert!(!record.official_game_term);
    }

    #[test]
    fn test_approve_glossary_sets_official_flag() {
        let record = apply(TransitionAction::Approve, "보병", &kim(), None, true, NOW).unwrap();
        assert!(record.official_game_term);
    }

    #[test]
    fn test_draft_glossary_does_not_set_official_flag() {
        let record = apply(TransitionAction::SaveDraft, "보병", &kim(), None, true, NOW).unwrap();
        assert!(!record.official_game_term);
    }

    #[test]
    fn test_action_ignores_current_status() {
        // Re-saving an approved unit as draft is not blocked (accepted gap)
        let approved = TranslationRecord {
            text: Some("승인됨".to_string()),
            status: Status::Approved,
            translator: Some("Kim".to_string()),
            approved_by: Some("Kim".to_string()),
            approved_at: Some(NOW.to_string()),
            ..TranslationRecord::default()
        };

        let record = apply(
            TransitionAction::SaveDraft,
            "다시",
            &kim(),
            Some(&approved),
            false,
            NOW,
        )
        .unwrap();
        assert_eq!(record.status, Status::Draft);
        assert!(record.approved_by.is_none(), "approval fields reset");
    }

    // ==================== Authorization Tests ====================

    #[test]
    fn test_unowned_unit_editable_by_anyone() {
        assert!(authorize(&kim(), None).is_ok());
        assert!(authorize(&kim(), Some(&TranslationRecord::default())).is_ok());
    }

    #[test]
    fn test_owner_match_is_case_insensitive() {
        let existing = existing_by("Kim");
        let lowercase_kim = Actor::new("kim", false);
        assert!(authorize(&lowercase_kim, Some(&existing)).is_ok());

        let record = apply(
            TransitionAction::Submit,
            "새 번역",
            &lowercase_kim,
            Some(&existing),
            false,
            NOW,
        );
        assert!(record.is_ok());
    }

    #[test]
    fn test_other_actor_rejected() {
        let existing = existing_by("Kim");
        let lee = Actor::new("Lee", false);

        let result = authorize(&lee, Some(&existing));
        assert!(matches!(result, Err(PortalError::Authorization(_))));

        let result = apply(TransitionAction::Submit, "텍스트", &lee, Some(&existing), false, NOW);
        assert!(matches!(result, Err(PortalError::Authorization(_))));
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let existing = existing_by("Kim");
        let admin_lee = Actor::new("Lee", true);

        assert!(authorize(&admin_lee, Some(&existing)).is_ok());
        let record = apply(
            TransitionAction::Approve,
            "관리자 승인",
            &admin_lee,
            Some(&existing),
            false,
            NOW,
        )
        .unwrap();
        assert_eq!(record.approved_by.as_deref(), Some("Lee"));
    }

    // ==================== Action Parsing Tests ====================

    #[test]
    fn test_action_deserializes_snake_case() {
        let action: TransitionAction = serde_json::from_str("\"save_draft\"").unwrap();
        assert_eq!(action, TransitionAction::SaveDraft);
        let action: TransitionAction = serde_json::from_str("\"submit\"").unwrap();
        assert_eq!(action, TransitionAction::Submit);
        let action: TransitionAction = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(action, TransitionAction::Approve);
    }

    #[test]
    fn test_target_statuses() {
        assert_eq!(TransitionAction::SaveDraft.target_status(), Status::Draft);
        assert_eq!(TransitionAction::Submit.target_status(), Status::Submitted);
        assert_eq!(TransitionAction::Approve.target_status(), Status::Approved);
    }
}
