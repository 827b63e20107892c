//! Internationalization (i18n) module.
//!
//! Language-related infrastructure for the portal: the registry of supported
//! languages and the validated `Language` type used as the record store key.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language type that replaces hardcoded code strings
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Language, LanguageRegistry};
//!
//! // Validate a store key
//! let korean = Language::target_from_code("ko")?;
//!
//! // List all translation targets
//! let targets = LanguageRegistry::get().list_targets();
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
