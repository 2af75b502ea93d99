//! corpus-report: offline reports over a research-document corpus
//!
//! Pages through a remote document collection (or reads a scraped CSV),
//! folds loosely typed metadata into per-author, per-topic and per-requester
//! statistics, and writes JSON snapshots or a static HTML dashboard.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod domain;
pub mod extract;
pub mod fetch;
pub mod render;
pub mod utils;
