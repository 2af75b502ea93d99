//! Requesters command implementation

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::{Path, PathBuf};

use super::utils::{output_path, resolve_config};
use crate::aggregate::{analyze_requesters, RequesterType};
use crate::config::CliOverrides;
use crate::domain::REQUESTERS_OUTPUT;
use crate::fetch::{find_latest_input, read_requester_csv};
use crate::render::render_requesters_dashboard;

#[derive(Args)]
pub struct RequestersArgs {
    /// Scraped CSV to read (default: newest file matching input_glob in the working directory)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file (default: <output-dir>/requesters.html)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for generated reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Encoding tried when the input is not UTF-8 (e.g. windows-1255, or auto)
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,
}

pub fn run(args: RequestersArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = CliOverrides {
        output_dir: args.output_dir.clone(),
        fallback_encoding: args.encoding.clone(),
        ..CliOverrides::default()
    };
    let config = resolve_config(config_path, overrides)?;

    let input = match args.input {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            find_latest_input(&cwd, &config.input_glob)?.with_context(|| {
                format!("No input file matching '{}' in {}", config.input_glob, cwd.display())
            })?
        }
    };
    println!("Reading {}", input.display());

    let (records, encoding) = read_requester_csv(&input, &config.fallback_encoding)?;
    tracing::debug!(rows = records.len(), encoding = %encoding, "loaded requester CSV");

    let report = analyze_requesters(&records);
    let generated_at = Local::now().format("%d-%b-%Y %H:%M").to_string();
    let html = render_requesters_dashboard(&report, &generated_at)?;

    let path = output_path(&config, args.output.as_deref(), REQUESTERS_OUTPUT);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Statistics:");
    println!("  Total rows: {}", report.total_rows);
    println!("  Valid rows: {}", report.valid_rows);
    println!("  Skipped (no date): {}", report.skipped_no_date);
    println!("  Skipped (no requester): {}", report.skipped_no_requester);
    println!(
        "  Date range: {} - {}",
        format_day(report.first_date),
        format_day(report.last_date)
    );
    println!("  Requesters: {}", report.rows.len());
    for kind in RequesterType::ALL {
        println!("    {}: {}", kind.label(), report.unique_count(kind));
    }
    println!("Wrote {}", path.display());

    Ok(())
}

fn format_day(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_else(|| "N/A".to_string())
}
