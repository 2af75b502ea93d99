//! Topics command implementation

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::Path;

use super::utils::{output_path, resolve_config, scan_corpus, CorpusArgs};
use crate::aggregate::{aggregate, clean_names, count_pairs, keywords_of, AggregateOptions};
use crate::config::CliOverrides;
use crate::domain::TOPICS_OUTPUT;
use crate::render::{topic_entries, write_snapshot, SnapshotHeader, TopicsSnapshot};

#[derive(Args)]
pub struct TopicsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Number of co-occurring topic pairs to keep
    #[arg(long, value_name = "N")]
    pub top_pairs: Option<usize>,
}

pub fn run(args: TopicsArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = CliOverrides { top_pairs: args.top_pairs, ..args.corpus.overrides() };
    let config = resolve_config(config_path, overrides)?;
    let scan = scan_corpus(&config)?;

    let options = AggregateOptions {
        retain_details: true,
        min_name_chars: config.min_topic_chars,
        ..AggregateOptions::default()
    };
    let agg = aggregate(&scan.records, keywords_of, &options);

    let topic_lists = scan.records.iter().map(|r| clean_names(keywords_of(r), config.min_topic_chars));
    let pairs = count_pairs(topic_lists, config.top_pairs);

    let today = Local::now().date_naive();
    let snapshot = TopicsSnapshot {
        header: SnapshotHeader::new(
            scan.records.iter().map(|r| r.id.as_str()),
            scan.records.len(),
            agg.skipped,
        ),
        topics: topic_entries(&agg, today, config.recency_days),
        pairs,
    };

    let path = output_path(&config, args.corpus.output.as_deref(), TOPICS_OUTPUT);
    write_snapshot(&path, &snapshot)?;

    println!("Documents scanned: {} ({} pages)", scan.records.len(), scan.pages);
    println!("Documents without topics: {}", agg.skipped);
    println!("Topics: {}", snapshot.topics.len());
    println!("Topic pairs kept: {}", snapshot.pairs.len());
    if let Some(top) = snapshot.topics.first() {
        println!("Most frequent topic: {} ({} documents)", top.value, top.count);
    }
    if scan.truncated {
        println!("Scan incomplete: the snapshot covers only the documents read before the failure");
    }
    println!("Wrote {}", path.display());

    Ok(())
}
