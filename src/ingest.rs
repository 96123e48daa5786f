//! PDF upload command.
//!
//! Validates the file locally, hands it to the backend for OCR and
//! indexing, then records the returned metadata in the registry. The
//! registry write happens only after a successful ingest, and a failed
//! ingest leaves the registry exactly as it was.

use anyhow::Result;
use std::path::Path;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::registry;

/// Shown when a file without a `.pdf` extension is offered.
pub const NON_PDF_MESSAGE: &str = "Only PDF files are supported.";

/// Shown when the upload itself fails.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Check backend connectivity.";

/// Reject non-PDF uploads before any network traffic.
pub fn validate_pdf_filename(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

pub async fn run_ingest(config: &Config, file: &Path) -> Result<()> {
    if !validate_pdf_filename(file) {
        eprintln!("{}", NON_PDF_MESSAGE);
        std::process::exit(1);
    }
    if !file.exists() {
        eprintln!("Error: no such file: {}", file.display());
        std::process::exit(1);
    }

    let client = BackendClient::new(config)?;
    let metadata = match client.ingest(file).await {
        Ok(metadata) => metadata,
        Err(err) => {
            eprintln!("{}", UPLOAD_FAILED_MESSAGE);
            eprintln!("  cause: {}", err);
            std::process::exit(1);
        }
    };

    let documents = registry::load(&config.registry.path);
    let documents = registry::upsert(&documents, metadata.clone());
    registry::save(&config.registry.path, &documents);

    println!("ingest {}", file.display());
    println!("  doc id:       {}", metadata.doc_id);
    println!("  filename:     {}", metadata.original_filename);
    println!("  pages:        {}", metadata.page_count);
    println!("  ocr engine:   {}", metadata.ocr_engine);
    println!(
        "  chunks:       {} added / {} total",
        metadata.index.chunks_added, metadata.index.total_chunks
    );
    println!("  registry:     {} documents", documents.len());
    println!("ok");

    Ok(())
}
