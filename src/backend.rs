//! HTTP client for the document-intelligence backend.
//!
//! Thin typed wrappers over the six backend endpoints. Transport policy is
//! deliberately minimal: no retries, no caching, one request per call. A
//! non-2xx status or a JSON body carrying an `error` field becomes an
//! `anyhow` error holding the status and response text; the command layer
//! translates those into its fixed user-facing messages.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::models::{
    DocumentPayload, HealthResponse, IngestedDocument, QaResponse, SearchResponse,
};

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client from the `[backend]` config table.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`. The backend is healthy iff `status == "ok"`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST /ingest` — multipart upload of one PDF.
    pub async fn ingest(&self, path: &Path) -> Result<IngestedDocument> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.pdf")
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/ingest", self.base_url))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST /search`.
    pub async fn search(&self, query: &str, top_k: u32) -> Result<SearchResponse> {
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&serde_json::json!({ "query": query, "top_k": top_k }))
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST /qa`.
    pub async fn qa(&self, question: &str, top_k: u32) -> Result<QaResponse> {
        let response = self
            .http
            .post(format!("{}/qa", self.base_url))
            .json(&serde_json::json!({ "question": question, "top_k": top_k }))
            .send()
            .await?;
        read_json(response).await
    }

    /// `GET /documents/{doc_id}` — the full OCR payload for one document.
    pub async fn fetch_document(&self, doc_id: &str) -> Result<DocumentPayload> {
        let response = self
            .http
            .get(format!("{}/documents/{}", self.base_url, doc_id))
            .send()
            .await?;
        read_json(response).await
    }

    /// `GET /documents` — the backend's own metadata listing.
    pub async fn list_documents(&self) -> Result<Vec<IngestedDocument>> {
        let response = self
            .http
            .get(format!("{}/documents", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }
}

/// Decode a response body, treating non-2xx statuses and JSON `error`
/// fields as failures.
async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        bail!(
            "Request failed with status {}: {}",
            status,
            truncate(&body, 200)
        );
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .with_context(|| format!("Malformed response body: {}", truncate(&body, 200)))?;
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        bail!("Backend error: {}", error);
    }

    serde_json::from_value(value)
        .with_context(|| format!("Unexpected response shape: {}", truncate(&body, 200)))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
