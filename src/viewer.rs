//! Document/page navigation state machine.
//!
//! Manages the transient lifecycle of viewing one document's OCR output:
//! `NoSelection → Loading → (Loaded | LoadFailed)`, with `deselect`
//! returning to `NoSelection` from anywhere. The machine is an explicit
//! struct plus transition functions; the caller performs the actual
//! payload fetch and feeds the outcome back through [`DocViewer::complete`].
//!
//! Stale responses are rejected with a generation counter: every `select`
//! bumps the generation and stamps it into the returned [`LoadTicket`], and
//! a completion only applies while its ticket's generation is still
//! current. If a second `select` lands while the first fetch is in flight,
//! the first fetch's eventual resolution is discarded (last-request-wins).

use crate::models::{DocumentPayload, IngestedDocument, OcrPage};
use crate::registry;

/// Shown when a document payload fetch fails.
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load OCR output for this document.";

/// The viewer's lifecycle state.
#[derive(Debug, Clone, Default)]
pub enum ViewerState {
    #[default]
    NoSelection,
    Loading { doc_id: String },
    Loaded { payload: DocumentPayload, page_index: usize },
    LoadFailed { doc_id: String, message: String },
}

/// Identifies one in-flight payload fetch. Completions carrying a ticket
/// from a superseded `select` are ignored.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    doc_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

/// The navigation state machine for a single document view.
#[derive(Debug, Default)]
pub struct DocViewer {
    state: ViewerState,
    generation: u64,
}

impl DocViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Select a document: from any state, enter `Loading`, discard any
    /// previous payload, and hand back the ticket for the one fetch the
    /// caller must issue.
    pub fn select(&mut self, doc: &IngestedDocument) -> LoadTicket {
        self.generation += 1;
        self.state = ViewerState::Loading {
            doc_id: doc.doc_id.clone(),
        };
        LoadTicket {
            doc_id: doc.doc_id.clone(),
            generation: self.generation,
        }
    }

    /// Apply a fetch outcome. Returns `true` if the outcome was applied,
    /// `false` if the ticket was stale and the outcome discarded.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<DocumentPayload, anyhow::Error>,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        // A completion can also arrive after deselect; only a Loading
        // state accepts one.
        if !matches!(self.state, ViewerState::Loading { .. }) {
            return false;
        }
        self.state = match result {
            Ok(payload) => ViewerState::Loaded {
                payload,
                page_index: 0,
            },
            Err(_) => ViewerState::LoadFailed {
                doc_id: ticket.doc_id,
                message: LOAD_FAILED_MESSAGE.to_string(),
            },
        };
        true
    }

    /// Drop the selection and any payload or error it carried.
    pub fn deselect(&mut self) {
        self.generation += 1;
        self.state = ViewerState::NoSelection;
    }

    /// Page count used for clamping: the loaded payload's count, else the
    /// registry's last-known count for the selected document, else 0.
    pub fn page_count(&self, documents: &[IngestedDocument]) -> usize {
        match &self.state {
            ViewerState::Loaded { payload, .. } => payload.page_count as usize,
            ViewerState::Loading { doc_id } | ViewerState::LoadFailed { doc_id, .. } => {
                registry::find(documents, doc_id)
                    .map(|doc| doc.page_count as usize)
                    .unwrap_or(0)
            }
            ViewerState::NoSelection => 0,
        }
    }

    /// Advance one page. Valid only in `Loaded`; clamps at the last page.
    pub fn next_page(&mut self, documents: &[IngestedDocument]) {
        let count = self.page_count(documents);
        if let ViewerState::Loaded { page_index, .. } = &mut self.state {
            *page_index = (*page_index + 1).min(count.saturating_sub(1));
        }
    }

    /// Step back one page. Valid only in `Loaded`; clamps at page 0.
    pub fn prev_page(&mut self) {
        if let ViewerState::Loaded { page_index, .. } = &mut self.state {
            *page_index = page_index.saturating_sub(1);
        }
    }

    /// Jump to a page. Valid only in `Loaded`; out-of-range requests are
    /// clamped, never rejected.
    pub fn goto_page(&mut self, index: usize, documents: &[IngestedDocument]) {
        let count = self.page_count(documents);
        if let ViewerState::Loaded { page_index, .. } = &mut self.state {
            *page_index = index.min(count.saturating_sub(1));
        }
    }

    pub fn page_index(&self) -> Option<usize> {
        match &self.state {
            ViewerState::Loaded { page_index, .. } => Some(*page_index),
            _ => None,
        }
    }

    /// The page currently in view, when a payload is loaded and the index
    /// is in range.
    pub fn current_page(&self) -> Option<&OcrPage> {
        match &self.state {
            ViewerState::Loaded { payload, page_index } => payload.pages.get(*page_index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexStats, IngestedDocument};
    use anyhow::anyhow;

    fn make_doc(doc_id: &str, page_count: u32) -> IngestedDocument {
        IngestedDocument {
            doc_id: doc_id.to_string(),
            original_filename: format!("{}.pdf", doc_id),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            page_count,
            ocr_engine: "paddleocr".to_string(),
            pdf_render_dpi: 200,
            preprocess_deskew: false,
            block_y_gap: 12.0,
            index: IndexStats::default(),
        }
    }

    fn make_payload(doc_id: &str, page_count: u32) -> DocumentPayload {
        DocumentPayload {
            doc_id: doc_id.to_string(),
            page_count,
            pages: (0..page_count)
                .map(|page| OcrPage {
                    page,
                    text: format!("page {} text", page),
                    lines: Vec::new(),
                    blocks: Vec::new(),
                    entities: Vec::new(),
                    image_path: String::new(),
                    preprocessed_image_path: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_enters_loading() {
        let mut viewer = DocViewer::new();
        let ticket = viewer.select(&make_doc("d1", 3));
        assert_eq!(ticket.doc_id(), "d1");
        assert!(matches!(viewer.state(), ViewerState::Loading { .. }));
        assert!(viewer.current_page().is_none());
    }

    #[test]
    fn test_successful_load_starts_at_page_zero() {
        let mut viewer = DocViewer::new();
        let ticket = viewer.select(&make_doc("d1", 3));
        assert!(viewer.complete(ticket, Ok(make_payload("d1", 3))));
        assert_eq!(viewer.page_index(), Some(0));
        assert_eq!(viewer.current_page().unwrap().text, "page 0 text");
    }

    #[test]
    fn test_failed_load_carries_fixed_message() {
        let mut viewer = DocViewer::new();
        let ticket = viewer.select(&make_doc("d1", 3));
        assert!(viewer.complete(ticket, Err(anyhow!("connection refused"))));
        match viewer.state() {
            ViewerState::LoadFailed { message, .. } => {
                assert_eq!(message, LOAD_FAILED_MESSAGE);
            }
            other => panic!("expected LoadFailed, got {:?}", other),
        }
        assert!(viewer.page_index().is_none());
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut viewer = DocViewer::new();
        let ticket_a = viewer.select(&make_doc("a", 2));
        let ticket_b = viewer.select(&make_doc("b", 4));

        // A's slow fetch resolves after B was selected: ignored.
        assert!(!viewer.complete(ticket_a, Ok(make_payload("a", 2))));
        assert!(matches!(
            viewer.state(),
            ViewerState::Loading { doc_id } if doc_id == "b"
        ));

        // B's own resolution still applies.
        assert!(viewer.complete(ticket_b, Ok(make_payload("b", 4))));
        match viewer.state() {
            ViewerState::Loaded { payload, .. } => assert_eq!(payload.doc_id, "b"),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut viewer = DocViewer::new();
        let ticket_a = viewer.select(&make_doc("a", 2));
        let ticket_b = viewer.select(&make_doc("b", 4));
        assert!(!viewer.complete(ticket_a, Err(anyhow!("timed out"))));
        assert!(viewer.complete(ticket_b, Ok(make_payload("b", 4))));
        assert!(matches!(viewer.state(), ViewerState::Loaded { .. }));
    }

    #[test]
    fn test_completion_after_deselect_is_discarded() {
        let mut viewer = DocViewer::new();
        let ticket = viewer.select(&make_doc("a", 2));
        viewer.deselect();
        assert!(!viewer.complete(ticket, Ok(make_payload("a", 2))));
        assert!(matches!(viewer.state(), ViewerState::NoSelection));
    }

    #[test]
    fn test_deselect_from_every_state() {
        let docs = [make_doc("d1", 3)];

        let mut viewer = DocViewer::new();
        viewer.deselect();
        assert!(matches!(viewer.state(), ViewerState::NoSelection));

        let ticket = viewer.select(&docs[0]);
        viewer.deselect();
        assert!(matches!(viewer.state(), ViewerState::NoSelection));
        drop(ticket);

        let ticket = viewer.select(&docs[0]);
        viewer.complete(ticket, Ok(make_payload("d1", 3)));
        viewer.deselect();
        assert!(matches!(viewer.state(), ViewerState::NoSelection));

        let ticket = viewer.select(&docs[0]);
        viewer.complete(ticket, Err(anyhow!("boom")));
        viewer.deselect();
        assert!(matches!(viewer.state(), ViewerState::NoSelection));
    }

    #[test]
    fn test_page_clamping() {
        let docs = [make_doc("d1", 3)];
        let mut viewer = DocViewer::new();
        let ticket = viewer.select(&docs[0]);
        viewer.complete(ticket, Ok(make_payload("d1", 3)));

        viewer.prev_page();
        assert_eq!(viewer.page_index(), Some(0));

        viewer.next_page(&docs);
        viewer.next_page(&docs);
        assert_eq!(viewer.page_index(), Some(2));
        viewer.next_page(&docs);
        assert_eq!(viewer.page_index(), Some(2));

        viewer.goto_page(99, &docs);
        assert_eq!(viewer.page_index(), Some(2));
        viewer.goto_page(1, &docs);
        assert_eq!(viewer.page_index(), Some(1));
    }

    #[test]
    fn test_navigation_noop_outside_loaded() {
        let docs = [make_doc("d1", 3)];
        let mut viewer = DocViewer::new();
        viewer.next_page(&docs);
        viewer.prev_page();
        assert!(viewer.page_index().is_none());

        viewer.select(&docs[0]);
        viewer.next_page(&docs);
        assert!(viewer.page_index().is_none());
        assert!(matches!(viewer.state(), ViewerState::Loading { .. }));
    }

    #[test]
    fn test_page_count_fallback_chain() {
        let docs = [make_doc("d1", 7)];
        let mut viewer = DocViewer::new();
        assert_eq!(viewer.page_count(&docs), 0);

        viewer.select(&docs[0]);
        // Not loaded yet: registry metadata answers.
        assert_eq!(viewer.page_count(&docs), 7);
        // Unknown to the registry too: 0.
        assert_eq!(viewer.page_count(&[]), 0);

        let ticket = viewer.select(&docs[0]);
        viewer.complete(ticket, Ok(make_payload("d1", 5)));
        // Loaded: the payload's count wins over the registry's.
        assert_eq!(viewer.page_count(&docs), 5);
    }
}
