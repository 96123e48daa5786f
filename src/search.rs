//! Semantic search command.
//!
//! Sends the query to the backend, then runs the raw results through the
//! refinement pipeline (confidence threshold, recency window, category
//! filter) before printing. Filter flags override the `[retrieval]` config
//! defaults for one invocation; ordering among survivors is the backend's.

use anyhow::Result;
use chrono::Utc;
use std::str::FromStr;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::refine::{self, DocCategory, FilterState, RecencyWindow};
use crate::registry;

/// Shown when the search request fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Check backend connectivity or index state.";

pub struct SearchOptions {
    pub top_k: Option<u32>,
    pub min_confidence: Option<f64>,
    pub days: Option<String>,
    pub types: Vec<DocCategory>,
}

/// Build the effective filter state from config defaults and flag
/// overrides. `--types` lists the categories to keep; everything else is
/// disabled.
pub fn build_filters(config: &Config, options: &SearchOptions) -> Result<FilterState> {
    let mut filters = FilterState::default();
    filters.min_confidence = options
        .min_confidence
        .unwrap_or(config.retrieval.min_confidence);
    filters.recency = RecencyWindow::from_str(
        options
            .days
            .as_deref()
            .unwrap_or(config.retrieval.recency_days.as_str()),
    )
    .map_err(anyhow::Error::msg)?;
    if !options.types.is_empty() {
        for category in DocCategory::ALL {
            filters.set_enabled(category, options.types.contains(&category));
        }
    }
    Ok(filters)
}

pub async fn run_search(config: &Config, query: &str, options: SearchOptions) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let filters = build_filters(config, &options)?;
    let top_k = options.top_k.unwrap_or(config.retrieval.top_k);

    let client = BackendClient::new(config)?;
    let response = match client.search(query.trim(), top_k).await {
        Ok(response) => response,
        Err(err) => {
            eprintln!("{}", SEARCH_FAILED_MESSAGE);
            eprintln!("  cause: {}", err);
            std::process::exit(1);
        }
    };

    let documents = registry::load(&config.registry.path);
    let kept = refine::refine_results(&response.results, &filters, &documents, Utc::now());

    println!(
        "Found {} matches ({} returned, {} filtered out)",
        kept.len(),
        response.results.len(),
        response.results.len() - kept.len()
    );
    println!(
        "  filters: min score {:.2} // {}",
        filters.min_confidence,
        filters.recency.label()
    );
    println!();

    if kept.is_empty() {
        println!("No results returned. Try another query or adjust filters.");
        return Ok(());
    }

    for (i, item) in kept.iter().enumerate() {
        let meta = registry::find(&documents, &item.doc_id);
        let name = meta
            .map(|m| m.original_filename.as_str())
            .unwrap_or(item.doc_id.as_str());
        let category = refine::classify_doc_type(name);

        println!("{}. [{:.4}] {}", i + 1, item.score, name);
        println!("    doc: {}  page: {}", item.doc_id, item.page);
        println!("    type: {}", category.label());
        if let Some(ref source) = item.source {
            println!("    source: {}", source);
        }
        println!("    excerpt: \"{}\"", format_snippet(&item.text));
        println!();
    }

    Ok(())
}

/// Collapse whitespace and cap the excerpt length for one-line display.
fn format_snippet(text: &str) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() <= 220 {
        return cleaned;
    }
    let prefix: String = cleaned.chars().take(220).collect();
    format!("{}…", prefix)
}
