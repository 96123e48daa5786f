//! The document registry: the authoritative local copy of
//! ingested-document metadata.
//!
//! The durable form is a single JSON file holding the full
//! [`IngestedDocument`] sequence. Storage trouble never surfaces to the
//! caller: a missing, unreadable, or corrupt file loads as an empty
//! registry, and a failed write is a silent no-op. The registry must not
//! take the console down because a disk is unavailable.

use std::path::Path;

use crate::models::IngestedDocument;

/// Read the registry from disk.
///
/// Returns an empty vector when the file is absent, unreadable, not valid
/// JSON, or not a JSON array. Never returns an error.
pub fn load(path: &Path) -> Vec<IngestedDocument> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str::<Vec<IngestedDocument>>(&raw) {
        Ok(docs) => docs,
        Err(_) => Vec::new(),
    }
}

/// Write the full registry to disk, creating the parent directory if
/// needed. Write failures are swallowed.
pub fn save(path: &Path, documents: &[IngestedDocument]) {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let json = match serde_json::to_string_pretty(documents) {
        Ok(json) => json,
        Err(_) => return,
    };
    let _ = std::fs::write(path, json);
}

/// Insert or replace a document record, returning the new sequence.
///
/// Pure: the input slice is not mutated. Any existing record with the same
/// `doc_id` is removed before the new one is appended, then the whole
/// sequence is re-sorted newest-first. Ordering compares the raw
/// `created_at` strings, which is lexicographically correct for UTC
/// ISO-8601 stamps.
pub fn upsert(documents: &[IngestedDocument], doc: IngestedDocument) -> Vec<IngestedDocument> {
    let mut next: Vec<IngestedDocument> = documents
        .iter()
        .filter(|item| item.doc_id != doc.doc_id)
        .cloned()
        .collect();
    next.push(doc);
    next.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    next
}

/// Look up a document record by id.
pub fn find<'a>(documents: &'a [IngestedDocument], doc_id: &str) -> Option<&'a IngestedDocument> {
    documents.iter().find(|doc| doc.doc_id == doc_id)
}
