//! Core data models shared with the backend's JSON contract.
//!
//! These types mirror the document-intelligence backend's wire format
//! exactly (snake_case field names), so every struct derives both
//! `Serialize` and `Deserialize` and round-trips through `serde_json`.

use serde::{Deserialize, Serialize};

/// Index statistics reported by the backend after an ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub chunks_added: u64,
    pub total_chunks: u64,
}

/// Metadata record for one ingested document.
///
/// This is the unit the registry persists. `doc_id` is minted by the
/// backend and is unique across the registry; `created_at` is an ISO-8601
/// UTC timestamp used for newest-first ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    pub doc_id: String,
    pub original_filename: String,
    pub created_at: String,
    pub page_count: u32,
    pub ocr_engine: String,
    pub pdf_render_dpi: u32,
    pub preprocess_deskew: bool,
    pub block_y_gap: f64,
    #[serde(default)]
    pub index: IndexStats,
}

/// A single recognized text line with its OCR confidence and bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub score: f64,
    pub bbox: [f64; 4],
}

/// A layout block grouping consecutive lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrBlock {
    pub block_index: u32,
    pub text: String,
    pub bbox: [f64; 4],
    pub line_count: u32,
}

/// A named entity detected on a page, with its character span in the
/// page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrEntity {
    pub text: String,
    pub label: String,
    pub start_char: u32,
    pub end_char: u32,
}

/// OCR output for one page. `page` is 0-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    pub page: u32,
    pub text: String,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
    #[serde(default)]
    pub blocks: Vec<OcrBlock>,
    #[serde(default)]
    pub entities: Vec<OcrEntity>,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub preprocessed_image_path: String,
}

/// Full OCR payload for one document, fetched on demand from
/// `GET /documents/{doc_id}`.
///
/// Transient view state: never persisted, discarded on deselect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub doc_id: String,
    pub page_count: u32,
    pub pages: Vec<OcrPage>,
}

/// A scored text span returned by the search or QA endpoint.
///
/// `score` is an opaque backend-assigned float (higher = more relevant);
/// the client never mutates it, only filters on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalItem {
    pub doc_id: String,
    pub page: u32,
    pub chunk_index: u32,
    pub text: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Response body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<RetrievalItem>,
}

/// Response body of `POST /qa`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResponse {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub contexts: Vec<RetrievalItem>,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
