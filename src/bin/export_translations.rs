//! Export binary - writes effective translations as vue-i18n locale files
//!
//! Usage:
//!   cargo run --bin export                     # Export all target languages
//!   cargo run --bin export -- --lang ko        # Export one language
//!   cargo run --bin export -- --dry-run        # Preview counts without writing
//!
//! Required environment variables:
//! - PORTAL_DATA_DIR
//!
//! Optional:
//! - PORTAL_EXPORT_DIR (defaults to <data dir>/locales)
//! - PORTAL_SOURCE_STRINGS (defaults to <data dir>/source-strings.json)

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;
use translation_portal::config::Config;
use translation_portal::corpus::SourceCorpus;
use translation_portal::export::{export_language, write_artifacts};
use translation_portal::i18n::Language;
use translation_portal::merge::merge;
use translation_portal::store::{RecordStore, SnapshotKind};

struct Args {
    lang: Option<String>,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        lang: None,
        dry_run: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lang" => {
                args.lang = Some(iter.next().context("--lang requires a language code")?);
            }
            "--dry-run" => args.dry_run = true,
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_portal=info".parse()?),
        )
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let out_dir = std::env::var("PORTAL_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.data_dir.join("locales"));

    let corpus = SourceCorpus::load(&config.source_strings_file)?;
    info!("Loaded {} source strings", corpus.total_strings());

    let languages = match &args.lang {
        Some(code) => vec![Language::target_from_code(code)?],
        None => Language::targets(),
    };

    let store = RecordStore::new(&config.data_dir, &config.backup_dir);
    let exported_at = Utc::now().to_rfc3339();
    let mut total_exported = 0;

    for language in languages {
        let baseline = store.load(language, SnapshotKind::Baseline).await;
        let overrides = store.load(language, SnapshotKind::Override).await;
        let effective = merge(&baseline, &overrides);

        if effective.is_empty() {
            info!("No translations found for {}", language);
            continue;
        }

        let artifacts = export_language(language, &effective, &corpus, &exported_at);
        if args.dry_run {
            info!(
                "[DRY RUN] Would export {} strings to {}/{}.json",
                artifacts.string_count,
                out_dir.display(),
                language.code()
            );
        } else {
            write_artifacts(&out_dir, language, &artifacts)?;
        }
        total_exported += artifacts.string_count;
    }

    info!("Total exported: {} strings", total_exported);
    Ok(())
}
