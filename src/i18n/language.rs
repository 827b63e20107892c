//! Language type: Flexible, validated language representation.
//!
//! This module provides the `Language` type, a struct that validates
//! language codes against the registry so that only supported codes can be
//! constructed.

use crate::error::PortalError;
use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A validated language.
///
/// This type represents a language that has been validated against the
/// registry. It ensures that only supported, enabled languages can be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "ko")
    code: &'static str,
}

impl Language {
    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err(PortalError::InvalidLanguage)` otherwise
    pub fn from_code(code: &str) -> Result<Language, PortalError> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language {
                code: config.code, // Use the static str from the registry
            }),
            _ => Err(PortalError::InvalidLanguage(code.to_string())),
        }
    }

    /// Create a Language from a code, additionally requiring it to be a
    /// translation target (enabled and not the canonical language).
    ///
    /// This is the validation used for record store keys: the store holds
    /// one snapshot per target language, and requests for any other code
    /// are invalid input.
    pub fn target_from_code(code: &str) -> Result<Language, PortalError> {
        let registry = LanguageRegistry::get();
        if registry.is_target(code) {
            Self::from_code(code)
        } else {
            Err(PortalError::InvalidLanguage(code.to_string()))
        }
    }

    /// Get the canonical (source) language.
    ///
    /// This is the language all source strings are extracted in, and from
    /// which all translations are derived.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// All enabled translation targets, in registry order.
    pub fn targets() -> Vec<Language> {
        LanguageRegistry::get()
            .list_targets()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This
    /// cannot happen for a Language constructed via `from_code` or the
    /// associated constructors.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_korean() {
        let language = Language::from_code("ko").expect("Should succeed");
        assert_eq!(language.code(), "ko");
        assert_eq!(language.name(), "Korean");
    }

    #[test]
    fn test_from_code_canonical() {
        let language = Language::from_code("en").expect("Should succeed");
        assert!(language.is_canonical());
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("de");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("de"));
    }

    #[test]
    fn test_from_code_empty() {
        let result = Language::from_code("");
        assert!(result.is_err());
    }

    // ==================== target_from_code Tests ====================

    #[test]
    fn test_target_from_code_accepts_targets() {
        for code in ["ko", "es", "pt", "fr"] {
            let language = Language::target_from_code(code).expect("Should succeed");
            assert_eq!(language.code(), code);
            assert!(!language.is_canonical());
        }
    }

    #[test]
    fn test_target_from_code_rejects_canonical() {
        let result = Language::target_from_code("en");
        assert!(result.is_err(), "canonical language is not a store key");
    }

    #[test]
    fn test_target_from_code_rejects_unknown() {
        assert!(Language::target_from_code("de").is_err());
        assert!(Language::target_from_code("xx").is_err());
    }

    // ==================== canonical / targets Tests ====================

    #[test]
    fn test_canonical_returns_english() {
        let canonical = Language::canonical();
        assert_eq!(canonical.code(), "en");
        assert!(canonical.is_canonical());
    }

    #[test]
    fn test_targets_count() {
        let targets = Language::targets();
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|lang| !lang.is_canonical()));
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_language_equality() {
        let lang1 = Language::from_code("ko").unwrap();
        let lang2 = Language::target_from_code("ko").unwrap();
        assert_eq!(lang1, lang2);
    }

    #[test]
    fn test_language_copy() {
        let lang1 = Language::from_code("es").unwrap();
        let lang2 = lang1; // Copy
        assert_eq!(lang1, lang2); // Both still valid
    }

    #[test]
    fn test_language_display() {
        let lang = Language::from_code("pt").unwrap();
        assert_eq!(lang.to_string(), "pt");
    }

    #[test]
    fn test_native_name() {
        let korean = Language::from_code("ko").unwrap();
        assert_eq!(korean.native_name(), "한국어");
    }
}
