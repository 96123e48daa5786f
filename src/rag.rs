//! RAG question/answer session state.
//!
//! One [`RagSession`] holds exactly one exchange: the submitted question,
//! the grounded answer once it arrives, its supporting contexts, and the
//! disclosure flag controlling whether contexts are shown. Submitting a
//! new question replaces the previous exchange wholesale; answers and
//! contexts from different asks never mix.
//!
//! Overlapping asks follow the same last-request-wins rule as the document
//! viewer: each `begin_ask` bumps a generation counter, and a completion
//! only applies while its [`AskTicket`] is still current.

use crate::models::{QaResponse, RetrievalItem};

/// Shown when the QA request fails.
pub const QA_FAILED_MESSAGE: &str = "Failed to retrieve a grounded answer from the backend.";

/// Identifies one in-flight QA request.
#[derive(Debug, Clone)]
pub struct AskTicket {
    generation: u64,
}

/// State for a single question/answer exchange.
#[derive(Debug, Default)]
pub struct RagSession {
    question: String,
    answer: Option<String>,
    contexts: Vec<RetrievalItem>,
    error: Option<String>,
    pending: bool,
    disclosure_expanded: bool,
    generation: u64,
}

impl RagSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a question. Returns `None` (a no-op, prior state untouched)
    /// when the question trims to empty; otherwise clears the previous
    /// answer, contexts, and error, enters the pending state, and returns
    /// the ticket for the one QA request the caller must issue.
    pub fn begin_ask(&mut self, question: &str) -> Option<AskTicket> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.generation += 1;
        self.question = trimmed.to_string();
        self.answer = None;
        self.contexts.clear();
        self.error = None;
        self.pending = true;
        Some(AskTicket {
            generation: self.generation,
        })
    }

    /// Apply a QA outcome. Returns `true` if applied, `false` if the
    /// ticket was stale and the outcome discarded.
    pub fn complete(
        &mut self,
        ticket: AskTicket,
        result: Result<QaResponse, anyhow::Error>,
    ) -> bool {
        if ticket.generation != self.generation || !self.pending {
            return false;
        }
        match result {
            Ok(response) => {
                self.answer = Some(response.answer);
                // Contexts keep the backend's order; the client never
                // re-sorts them.
                self.contexts = response.contexts;
                self.error = None;
            }
            Err(_) => {
                self.answer = None;
                self.contexts.clear();
                self.error = Some(QA_FAILED_MESSAGE.to_string());
            }
        }
        self.pending = false;
        true
    }

    /// Flip context visibility. Purely a display flag; the contexts
    /// themselves are untouched.
    pub fn toggle_disclosure(&mut self) {
        self.disclosure_expanded = !self.disclosure_expanded;
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn contexts(&self) -> &[RetrievalItem] {
        &self.contexts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn disclosure_expanded(&self) -> bool {
        self.disclosure_expanded
    }
}
