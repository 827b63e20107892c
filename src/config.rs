use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Record store
    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,

    // Source corpus
    pub source_strings_file: PathBuf,
    pub glossary_file: PathBuf,

    // Authentication
    pub admin_emails: Vec<String>,
    pub require_auth: bool,
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("PORTAL_DATA_DIR").context("PORTAL_DATA_DIR not set")?,
        );

        Ok(Self {
            // Server
            port: std::env::var("PORTAL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // Record store
            backup_dir: std::env::var("PORTAL_BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("backups")),

            // Source corpus (defaults live next to the translation data)
            source_strings_file: std::env::var("PORTAL_SOURCE_STRINGS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("source-strings.json")),
            glossary_file: std::env::var("PORTAL_GLOSSARY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("glossary.json")),

            // Authentication
            admin_emails: std::env::var("PORTAL_ADMIN_EMAILS")
                .map(|v| {
                    v.split(',')
                        .map(|email| email.trim().to_string())
                        .filter(|email| !email.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            require_auth: std::env::var("PORTAL_REQUIRE_AUTH")
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(false),
            api_key: std::env::var("PORTAL_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),

            data_dir,
        })
    }
}
