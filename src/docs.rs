//! Registry listing command.
//!
//! Prints the local document registry as a table, optionally narrowed by
//! a case-insensitive substring match on doc id or filename. `--sync`
//! first pulls the backend's own listing and upserts every record, for
//! the case where another console instance ingested documents this
//! registry has not seen.

use anyhow::Result;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::models::IngestedDocument;
use crate::registry;

pub async fn run_docs(config: &Config, filter: Option<String>, sync: bool) -> Result<()> {
    let mut documents = registry::load(&config.registry.path);

    if sync {
        let client = BackendClient::new(config)?;
        match client.list_documents().await {
            Ok(remote) => {
                let fetched = remote.len();
                for doc in remote {
                    documents = registry::upsert(&documents, doc);
                }
                registry::save(&config.registry.path, &documents);
                println!("synced {} records from backend", fetched);
                println!();
            }
            Err(err) => {
                // The registry stays authoritative when the backend
                // listing is unavailable.
                eprintln!("Warning: backend listing unavailable: {}", err);
                eprintln!();
            }
        }
    }

    let shown = filter_documents(&documents, filter.as_deref());

    if shown.is_empty() {
        if documents.is_empty() {
            println!("No documents ingested yet. Upload a PDF to start indexing.");
        } else {
            println!("No documents match the filter.");
        }
        return Ok(());
    }

    println!(
        "  {:<14} {:<32} {:>5} {:>8}   {}",
        "DOC ID", "FILENAME", "PAGES", "CHUNKS", "INGESTED"
    );
    println!("  {}", "-".repeat(84));
    for doc in &shown {
        println!(
            "  {:<14} {:<32} {:>5} {:>8}   {}",
            doc.doc_id,
            truncate_name(&doc.original_filename, 32),
            doc.page_count,
            doc.index.chunks_added,
            doc.created_at
        );
    }
    println!();
    println!("  {} of {} documents", shown.len(), documents.len());

    Ok(())
}

/// Case-insensitive substring filter over doc id and filename. A blank
/// needle keeps everything.
pub fn filter_documents<'a>(
    documents: &'a [IngestedDocument],
    needle: Option<&str>,
) -> Vec<&'a IngestedDocument> {
    let needle = needle.unwrap_or("").trim().to_lowercase();
    documents
        .iter()
        .filter(|doc| {
            needle.is_empty()
                || doc.doc_id.to_lowercase().contains(&needle)
                || doc.original_filename.to_lowercase().contains(&needle)
        })
        .collect()
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let prefix: String = name.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexStats;

    fn make_doc(doc_id: &str, filename: &str) -> IngestedDocument {
        IngestedDocument {
            doc_id: doc_id.to_string(),
            original_filename: filename.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            page_count: 1,
            ocr_engine: "paddleocr".to_string(),
            pdf_render_dpi: 200,
            preprocess_deskew: false,
            block_y_gap: 12.0,
            index: IndexStats::default(),
        }
    }

    #[test]
    fn test_filter_matches_id_and_filename() {
        let docs = vec![
            make_doc("doc-aaa", "quarterly_report.pdf"),
            make_doc("doc-bbb", "service_contract.pdf"),
        ];
        assert_eq!(filter_documents(&docs, Some("report")).len(), 1);
        assert_eq!(filter_documents(&docs, Some("BBB")).len(), 1);
        assert_eq!(filter_documents(&docs, Some("doc-")).len(), 2);
        assert!(filter_documents(&docs, Some("missing")).is_empty());
    }

    #[test]
    fn test_blank_filter_keeps_everything() {
        let docs = vec![make_doc("a", "a.pdf"), make_doc("b", "b.pdf")];
        assert_eq!(filter_documents(&docs, None).len(), 2);
        assert_eq!(filter_documents(&docs, Some("   ")).len(), 2);
    }
}
