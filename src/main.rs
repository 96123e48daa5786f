//! # DocIntel Console CLI (`doci`)
//!
//! The `doci` binary is the console for a document-intelligence backend.
//! It provides commands for PDF ingestion, registry inspection, semantic
//! search, extractive question answering, OCR page viewing, and backend
//! health monitoring.
//!
//! ## Usage
//!
//! ```bash
//! doci --config ./config/doci.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `doci ingest <file.pdf>` | Upload a PDF for OCR and indexing |
//! | `doci docs` | List the local document registry |
//! | `doci search "<query>"` | Semantic search with client-side refinement |
//! | `doci qa "<question>"` | Ask an extractive question over the corpus |
//! | `doci view <doc_id>` | Inspect a document's OCR pages |
//! | `doci status` | Backend health and registry overview |
//!
//! ## Examples
//!
//! ```bash
//! # Ingest a contract
//! doci ingest ./contracts/master_service_agreement.pdf
//!
//! # Search recent financial documents only
//! doci search "operating margin" --days 90 --types financial
//!
//! # Ask with supporting contexts shown
//! doci qa "When does the lease renew?" --top-k 5 --contexts
//!
//! # Page through OCR output interactively
//! doci view 2f1c9a --interactive
//! ```

mod backend;
mod config;
mod docs;
mod ingest;
mod models;
mod qa;
mod rag;
mod refine;
mod registry;
mod search;
mod status;
mod view;
mod viewer;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::refine::DocCategory;

/// DocIntel Console — a client console for a document-intelligence OCR
/// and retrieval backend.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with `[backend]`, `[registry]`, and `[retrieval]` tables. When the
/// file is absent, built-in defaults target `http://localhost:8000`.
#[derive(Parser)]
#[command(
    name = "doci",
    about = "DocIntel Console — client console for a document-intelligence backend",
    version,
    long_about = "DocIntel Console talks to a document-intelligence HTTP backend that performs \
    OCR, embedding, and vector indexing. The console keeps the authoritative local registry of \
    ingested-document metadata, refines backend-ranked retrieval results before display, and \
    drives OCR-page navigation and RAG question/answer sessions."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/doci.toml`. Backend URL, registry path, and
    /// retrieval defaults are read from this file.
    #[arg(long, global = true, default_value = "./config/doci.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF for OCR and indexing.
    ///
    /// Rejects files without a `.pdf` extension before any network call.
    /// On success the returned metadata is upserted into the local
    /// registry, which is persisted immediately.
    Ingest {
        /// Path to the PDF file to upload.
        file: PathBuf,
    },

    /// List the local document registry.
    ///
    /// The registry is the authoritative local record of what has been
    /// ingested; it survives restarts and degrades to empty (never an
    /// error) when its file is missing or corrupt.
    Docs {
        /// Case-insensitive substring filter on doc id or filename.
        #[arg(long)]
        filter: Option<String>,

        /// Pull the backend's document listing first and merge it in.
        #[arg(long)]
        sync: bool,
    },

    /// Search indexed documents.
    ///
    /// Sends the query to the backend, then applies the client-side
    /// refinement pipeline (confidence threshold, recency window,
    /// document-type filter) before printing. Backend ranking order is
    /// preserved among survivors.
    Search {
        /// The search query string.
        query: String,

        /// Number of results to request from the backend.
        #[arg(long)]
        top_k: Option<u32>,

        /// Minimum relevance score; results below it are hidden.
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Recency window in days: 7, 30, 90, or all.
        #[arg(long)]
        days: Option<String>,

        /// Document types to keep: legal, sops, financial, other.
        /// May be repeated; omitting it keeps every type.
        #[arg(long = "types", value_delimiter = ',')]
        types: Vec<DocCategory>,
    },

    /// Ask an extractive question over the document corpus.
    ///
    /// Returns a grounded answer; the supporting contexts stay collapsed
    /// unless `--contexts` is passed.
    Qa {
        /// The question to ask.
        question: String,

        /// Number of supporting chunks to retrieve.
        #[arg(long)]
        top_k: Option<u32>,

        /// Show the retrieved supporting contexts under the answer.
        #[arg(long)]
        contexts: bool,
    },

    /// Inspect a document's OCR pages.
    ///
    /// Fetches the OCR payload and prints one page plus its detected
    /// entities and the document's extraction metadata. Page requests
    /// outside the document are clamped to the nearest valid page.
    View {
        /// Document id (as listed by `doci docs`).
        doc_id: String,

        /// 0-based page to show (default 0). Clamped to the document.
        #[arg(long)]
        page: Option<usize>,

        /// Page through the document with n/p/g/q commands on stdin.
        #[arg(long)]
        interactive: bool,
    },

    /// Backend health and registry overview.
    ///
    /// Probes `GET /health` and summarizes the registry: document, page,
    /// and chunk totals plus the most recent ingest.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { file } => {
            ingest::run_ingest(&cfg, &file).await?;
        }
        Commands::Docs { filter, sync } => {
            docs::run_docs(&cfg, filter, sync).await?;
        }
        Commands::Search {
            query,
            top_k,
            min_confidence,
            days,
            types,
        } => {
            search::run_search(
                &cfg,
                &query,
                search::SearchOptions {
                    top_k,
                    min_confidence,
                    days,
                    types,
                },
            )
            .await?;
        }
        Commands::Qa {
            question,
            top_k,
            contexts,
        } => {
            qa::run_qa(&cfg, &question, top_k, contexts).await?;
        }
        Commands::View {
            doc_id,
            page,
            interactive,
        } => {
            view::run_view(&cfg, &doc_id, page, interactive).await?;
        }
        Commands::Status => {
            status::run_status(&cfg).await?;
        }
    }

    Ok(())
}
