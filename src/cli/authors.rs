//! Authors command implementation

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::Path;

use super::utils::{output_path, resolve_config, scan_corpus, CorpusArgs};
use crate::aggregate::{aggregate, authors_of, AggregateOptions, Weighting};
use crate::domain::AUTHORS_OUTPUT;
use crate::render::{author_entries, write_snapshot, AuthorsSnapshot, SnapshotHeader};

#[derive(Args)]
pub struct AuthorsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

pub fn run(args: AuthorsArgs, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, args.corpus.overrides())?;
    let scan = scan_corpus(&config)?;

    // A document shared by N authors credits each of them 1/N.
    let options = AggregateOptions { weighting: Weighting::EqualSplit, ..AggregateOptions::default() };
    let agg = aggregate(&scan.records, authors_of, &options);

    let today = Local::now().date_naive();
    let snapshot = AuthorsSnapshot {
        header: SnapshotHeader::new(
            scan.records.iter().map(|r| r.id.as_str()),
            scan.records.len(),
            agg.skipped,
        ),
        authors: author_entries(&agg, today, config.recency_days),
    };

    let path = output_path(&config, args.corpus.output.as_deref(), AUTHORS_OUTPUT);
    write_snapshot(&path, &snapshot)?;

    let active = snapshot.authors.iter().filter(|a| a.is_active).count();
    println!("Documents scanned: {} ({} pages)", scan.records.len(), scan.pages);
    println!("Documents without authors: {}", agg.skipped);
    println!("Authors: {} ({} active)", snapshot.authors.len(), active);
    if scan.truncated {
        println!("Scan incomplete: the snapshot covers only the documents read before the failure");
    }
    println!("Wrote {}", path.display());

    Ok(())
}
