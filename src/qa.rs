//! Extractive question-answering command.
//!
//! Drives one [`RagSession`] exchange against the backend's `/qa`
//! endpoint: submit the question, apply the outcome, print the grounded
//! answer. Supporting contexts stay collapsed unless `--contexts` toggles
//! disclosure on.

use anyhow::Result;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::rag::RagSession;

pub async fn run_qa(
    config: &Config,
    question: &str,
    top_k: Option<u32>,
    show_contexts: bool,
) -> Result<()> {
    let mut session = RagSession::new();
    let ticket = match session.begin_ask(question) {
        Some(ticket) => ticket,
        None => {
            eprintln!("Enter a question to begin contextual research.");
            std::process::exit(1);
        }
    };

    let top_k = top_k.unwrap_or(config.retrieval.qa_top_k);
    let client = BackendClient::new(config)?;
    let result = client.qa(session.question(), top_k).await;
    session.complete(ticket, result);

    if let Some(error) = session.error() {
        eprintln!("{}", error);
        std::process::exit(1);
    }

    if show_contexts {
        session.toggle_disclosure();
    }

    println!("--- Grounded Answer ---");
    println!("{}", session.answer().unwrap_or(""));
    println!();

    if session.disclosure_expanded() {
        println!("--- Retrieved Contexts ({}) ---", session.contexts().len());
        for ctx in session.contexts() {
            println!(
                "[{} // pg.{}] score: {:.4}",
                ctx.doc_id, ctx.page, ctx.score
            );
            println!("\"{}\"", ctx.text.trim());
            println!();
        }
    } else {
        println!(
            "({} supporting contexts hidden; pass --contexts to show them)",
            session.contexts().len()
        );
    }

    Ok(())
}
