//! Document acquisition (remote corpus API, scraped CSV)

use crate::domain::Document;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;

pub mod csv_input;
pub mod http;

pub use csv_input::{find_latest_input, read_requester_csv};
pub use http::HttpSource;

/// One page of documents plus the token for the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    pub next_page_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A paginated document collection.
pub trait DocumentSource {
    fn fetch_page(&mut self, page_key: Option<&str>, limit: usize) -> Result<Page, FetchError>;
}

/// Everything collected by [`fetch_all`].
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub documents: Vec<Document>,
    pub pages: usize,
    /// Set when the scan stopped early. `documents` holds what was read before.
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Read every page of `source`, following continuation tokens until none is
/// returned.
///
/// A failed page ends the scan: the documents gathered so far are returned
/// along with the error. Pages are never retried.
pub fn fetch_all<S: DocumentSource + ?Sized>(source: &mut S, page_size: usize) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();
    let mut page_key: Option<String> = None;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Starting corpus scan...");

    loop {
        match source.fetch_page(page_key.as_deref(), page_size) {
            Ok(page) => {
                outcome.pages += 1;
                outcome.documents.extend(page.documents);
                spinner.set_message(format!(
                    "Scanned {} documents so far...",
                    outcome.documents.len()
                ));
                tracing::debug!(
                    page = outcome.pages,
                    total = outcome.documents.len(),
                    "fetched page"
                );

                match page.next_page_key.filter(|k| !k.is_empty()) {
                    Some(next) => page_key = Some(next),
                    None => break,
                }
            }
            Err(err) => {
                tracing::warn!(
                    page = outcome.pages + 1,
                    collected = outcome.documents.len(),
                    "corpus scan stopped early: {err}"
                );
                outcome.error = Some(err);
                break;
            }
        }
    }

    spinner.finish_and_clear();
    outcome
}
