//! OCR page viewer command.
//!
//! Drives the [`DocViewer`] state machine for one document: select,
//! fetch, then either print the requested page or enter an interactive
//! pager. Page requests outside the document are clamped, matching the
//! machine's own navigation rules.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::models::IngestedDocument;
use crate::registry;
use crate::viewer::{DocViewer, ViewerState};

pub async fn run_view(
    config: &Config,
    doc_id: &str,
    page: Option<usize>,
    interactive: bool,
) -> Result<()> {
    if interactive && !atty::is(atty::Stream::Stdin) {
        eprintln!("Error: --interactive requires a terminal on stdin.");
        std::process::exit(1);
    }

    let documents = registry::load(&config.registry.path);
    let doc = match registry::find(&documents, doc_id) {
        Some(doc) => doc.clone(),
        None => {
            eprintln!("Error: document not in registry: {}", doc_id);
            eprintln!("Run `doci docs` to list known documents.");
            std::process::exit(1);
        }
    };

    let mut viewer = DocViewer::new();
    let ticket = viewer.select(&doc);
    let client = BackendClient::new(config)?;
    let result = client.fetch_document(ticket.doc_id()).await;
    viewer.complete(ticket, result);

    if let ViewerState::LoadFailed { message, .. } = viewer.state() {
        eprintln!("{}", message);
        std::process::exit(1);
    }

    if let Some(index) = page {
        viewer.goto_page(index, &documents);
    }

    print_document_header(&doc);
    print_current_page(&viewer, &documents);

    if interactive {
        pager_loop(&mut viewer, &documents)?;
    }

    Ok(())
}

fn print_document_header(doc: &IngestedDocument) {
    println!("--- Document ---");
    println!("id:         {}", doc.doc_id);
    println!("filename:   {}", doc.original_filename);
    println!("ingested:   {}", doc.created_at);
    println!("pages:      {}", doc.page_count);
    println!("ocr engine: {}", doc.ocr_engine);
    println!("render dpi: {}", doc.pdf_render_dpi);
    println!(
        "deskew:     {}",
        if doc.preprocess_deskew { "enabled" } else { "disabled" }
    );
    println!("block gap:  {}", doc.block_y_gap);
    println!(
        "chunks:     {} added / {} total",
        doc.index.chunks_added, doc.index.total_chunks
    );
    println!();
}

fn print_current_page(viewer: &DocViewer, documents: &[IngestedDocument]) {
    let total = viewer.page_count(documents);
    let index = viewer.page_index().unwrap_or(0);
    println!("--- Page {} of {} ---", index + 1, total.max(1));

    match viewer.current_page() {
        Some(page) => {
            if page.text.trim().is_empty() {
                println!("No OCR text available for this page.");
            } else {
                println!("{}", page.text);
            }
            if !page.entities.is_empty() {
                println!();
                println!("Detected entities:");
                for entity in &page.entities {
                    println!("  [{}] {}", entity.label, entity.text);
                }
            }
        }
        None => println!("No OCR text available for this page."),
    }
    println!();
}

/// Read navigation commands from stdin: `n` next, `p` previous,
/// `g <page>` jump (1-based), `q` quit.
fn pager_loop(viewer: &mut DocViewer, documents: &[IngestedDocument]) -> Result<()> {
    let stdin = std::io::stdin();
    loop {
        print!("page> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("n") => viewer.next_page(documents),
            Some("p") => viewer.prev_page(),
            Some("g") => match parts.next().and_then(|arg| arg.parse::<usize>().ok()) {
                Some(page) if page > 0 => viewer.goto_page(page - 1, documents),
                _ => {
                    println!("usage: g <page>");
                    continue;
                }
            },
            Some("q") => break,
            Some(other) => {
                println!("unknown command: {} (n, p, g <page>, q)", other);
                continue;
            }
            None => continue,
        }
        print_current_page(viewer, documents);
    }
    Ok(())
}
