//! Corpus documents endpoint over HTTP.

use super::{DocumentSource, FetchError, Page};
use crate::domain::Document;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Option<Vec<Value>>,
    #[serde(default)]
    metadata: Option<ListMetadata>,
}

impl ListDocumentsResponse {
    fn into_page(self) -> Page {
        let raw = self.documents.unwrap_or_default();
        let total = raw.len();
        let documents: Vec<Document> = raw.into_iter().filter_map(Document::from_value).collect();
        if documents.len() < total {
            tracing::warn!(dropped = total - documents.len(), "skipped non-object documents in page");
        }
        Page { documents, next_page_key: self.metadata.and_then(|m| m.page_key) }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListMetadata {
    #[serde(default)]
    page_key: Option<String>,
}

/// Lists documents of one corpus: `GET {base}/v2/corpora/{corpus}/documents`.
pub struct HttpSource {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpSource {
    pub fn new(base_url: &str, corpus_key: &str, api_key: &str) -> Self {
        Self::with_client(Client::new(), base_url, corpus_key, api_key)
    }

    pub fn with_client(client: Client, base_url: &str, corpus_key: &str, api_key: &str) -> Self {
        Self {
            client,
            url: documents_url(base_url, corpus_key),
            api_key: api_key.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DocumentSource for HttpSource {
    fn fetch_page(&mut self, page_key: Option<&str>, limit: usize) -> Result<Page, FetchError> {
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(key) = page_key {
            query.push(("page_key", key.to_string()));
        }

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .header("x-api-key", &self.api_key)
            .query(&query)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), body });
        }

        let body: ListDocumentsResponse =
            response.json().map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(body.into_page())
    }
}

fn documents_url(base_url: &str, corpus_key: &str) -> String {
    format!("{}/v2/corpora/{}/documents", base_url.trim_end_matches('/'), corpus_key)
}
