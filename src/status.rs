//! Backend health and registry overview.
//!
//! Probes `GET /health` and summarizes the local registry: document,
//! page, and chunk totals plus the most recent ingest. An unreachable
//! backend is reported as OFFLINE; the registry summary still prints,
//! since it needs no network.

use anyhow::Result;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::registry;

pub async fn run_status(config: &Config) -> Result<()> {
    let client = BackendClient::new(config)?;

    let health = match client.health().await {
        Ok(response) if response.status == "ok" => "HEALTHY".to_string(),
        Ok(response) => format!("DEGRADED (status: {})", response.status),
        Err(_) => "OFFLINE".to_string(),
    };

    let documents = registry::load(&config.registry.path);
    let total_pages: u64 = documents.iter().map(|doc| doc.page_count as u64).sum();
    let total_chunks: u64 = documents.iter().map(|doc| doc.index.chunks_added).sum();
    // Registry is newest-first, so the first record is the latest ingest.
    let last_ingest = documents.first().map(|doc| doc.created_at.as_str());

    let registry_size = std::fs::metadata(&config.registry.path)
        .map(|meta| meta.len())
        .unwrap_or(0);

    println!("DocIntel Console — Status");
    println!("=========================");
    println!();
    println!("  Backend:      {}", client.base_url());
    println!("  API health:   {}", health);
    println!();
    println!("  Registry:     {}", config.registry.path.display());
    println!("  Size:         {}", format_bytes(registry_size));
    println!();
    println!("  Documents:    {}", documents.len());
    println!("  Pages:        {}", total_pages);
    println!("  Chunks added: {}", total_chunks);
    println!("  Last ingest:  {}", last_ingest.unwrap_or("never"));
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
