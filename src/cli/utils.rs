//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{Config, DocRecord};
use crate::extract::{record_from_document, MetadataFields};
use crate::fetch::{fetch_all, HttpSource};

/// Options shared by the subcommands that scan the remote corpus.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Documents requested per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Corpus key to scan
    #[arg(long = "corpus", value_name = "KEY")]
    pub corpus_key: Option<String>,

    /// API key (default: config file or CORPUS_REPORT_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Output file (default: <output-dir>/<report file name>)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for generated reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Days since the latest document for an entity to count as active
    #[arg(long, value_name = "DAYS")]
    pub recency_days: Option<i64>,
}

impl CorpusArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key.clone(),
            corpus_key: self.corpus_key.clone(),
            page_size: self.page_size,
            output_dir: self.output_dir.clone(),
            recency_days: self.recency_days,
            ..CliOverrides::default()
        }
    }
}

/// Load file and env configuration from the working directory, then apply flags.
pub fn resolve_config(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, config_path)?;
    Ok(merge_cli_with_config(file_config, overrides))
}

/// `--output` when given, else `file_name` inside the configured output directory.
pub fn output_path(config: &Config, explicit: Option<&Path>, file_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => config.output_dir.join(file_name),
    }
}

/// Result of scanning the corpus, ready for aggregation.
pub struct CorpusScan {
    pub records: Vec<DocRecord>,
    pub pages: usize,
    pub truncated: bool,
}

/// Page through the configured corpus and normalize every document.
///
/// A failed page is reported on stderr and the partial scan is returned.
pub fn scan_corpus(config: &Config) -> Result<CorpusScan> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .context("Missing API key: set api_key in the config file, CORPUS_REPORT_API_KEY, or --api-key")?;

    let mut source = HttpSource::new(&config.api_base_url, &config.corpus_key, api_key);
    tracing::debug!(url = source.url(), page_size = config.page_size, "scanning corpus");

    let outcome = fetch_all(&mut source, config.page_size);
    if let Some(err) = &outcome.error {
        eprintln!(
            "warning: corpus scan stopped after {} pages ({} documents): {}",
            outcome.pages,
            outcome.documents.len(),
            err
        );
    }

    let fields = MetadataFields::from(config);
    let records = outcome.documents.iter().map(|doc| record_from_document(doc, &fields)).collect();

    Ok(CorpusScan { records, pages: outcome.pages, truncated: !outcome.is_complete() })
}
