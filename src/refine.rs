//! Retrieval result refinement.
//!
//! The backend returns ranked [`RetrievalItem`]s; this module decides which
//! of them are shown. It applies three predicates — confidence threshold,
//! recency window, inferred document category — and keeps survivors in
//! their backend-assigned order. It performs no I/O and no re-sorting:
//! given the same results, filters, and registry snapshot it always
//! produces the same output sequence.

use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;

use crate::models::{IngestedDocument, RetrievalItem};
use crate::registry;

/// Default minimum relevance score.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;

/// The four fixed document categories inferred from display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocCategory {
    LegalContracts,
    InternalSops,
    FinancialReports,
    Other,
}

impl DocCategory {
    /// All categories, in classification priority order.
    pub const ALL: [DocCategory; 4] = [
        DocCategory::LegalContracts,
        DocCategory::InternalSops,
        DocCategory::FinancialReports,
        DocCategory::Other,
    ];

    /// The display label shown in filter listings and results.
    pub fn label(&self) -> &'static str {
        match self {
            DocCategory::LegalContracts => "Legal Contracts",
            DocCategory::InternalSops => "Internal SOPs",
            DocCategory::FinancialReports => "Financial Reports",
            DocCategory::Other => "Other",
        }
    }

    fn index(&self) -> usize {
        match self {
            DocCategory::LegalContracts => 0,
            DocCategory::InternalSops => 1,
            DocCategory::FinancialReports => 2,
            DocCategory::Other => 3,
        }
    }
}

impl FromStr for DocCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legal" | "legal-contracts" => Ok(DocCategory::LegalContracts),
            "sops" | "internal-sops" => Ok(DocCategory::InternalSops),
            "financial" | "financial-reports" => Ok(DocCategory::FinancialReports),
            "other" => Ok(DocCategory::Other),
            other => Err(format!(
                "Unknown document type: '{}'. Use legal, sops, financial, or other.",
                other
            )),
        }
    }
}

/// Classify a document display name into one of the four categories.
///
/// Case-insensitive substring matching in fixed priority order; the first
/// matching rule wins and lower-priority rules are never evaluated.
pub fn classify_doc_type(name: &str) -> DocCategory {
    let name = name.to_lowercase();
    const LEGAL: [&str; 3] = ["contract", "agreement", "legal"];
    const SOPS: [&str; 4] = ["sop", "procedure", "policy", "manual"];
    const FINANCIAL: [&str; 5] = ["report", "financial", "statement", "balance", "income"];

    if LEGAL.iter().any(|kw| name.contains(kw)) {
        DocCategory::LegalContracts
    } else if SOPS.iter().any(|kw| name.contains(kw)) {
        DocCategory::InternalSops
    } else if FINANCIAL.iter().any(|kw| name.contains(kw)) {
        DocCategory::FinancialReports
    } else {
        DocCategory::Other
    }
}

/// Recency window for the date predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecencyWindow {
    Days7,
    #[default]
    Days30,
    Days90,
    All,
}

impl RecencyWindow {
    /// Window length in days; `None` means no cutoff.
    pub fn days(&self) -> Option<i64> {
        match self {
            RecencyWindow::Days7 => Some(7),
            RecencyWindow::Days30 => Some(30),
            RecencyWindow::Days90 => Some(90),
            RecencyWindow::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecencyWindow::Days7 => "Last 7 Days",
            RecencyWindow::Days30 => "Last 30 Days",
            RecencyWindow::Days90 => "Last 90 Days",
            RecencyWindow::All => "All Time",
        }
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7" => Ok(RecencyWindow::Days7),
            "30" => Ok(RecencyWindow::Days30),
            "90" => Ok(RecencyWindow::Days90),
            "all" => Ok(RecencyWindow::All),
            other => Err(format!(
                "Unknown recency window: '{}'. Use 7, 30, 90, or all.",
                other
            )),
        }
    }
}

/// The user-adjustable filter settings owned by the refinement pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub min_confidence: f64,
    pub recency: RecencyWindow,
    enabled: [bool; 4],
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            recency: RecencyWindow::Days30,
            enabled: [true; 4],
        }
    }
}

impl FilterState {
    pub fn is_enabled(&self, category: DocCategory) -> bool {
        self.enabled[category.index()]
    }

    pub fn set_enabled(&mut self, category: DocCategory, enabled: bool) {
        self.enabled[category.index()] = enabled;
    }

    /// Whether any category has been switched off. When false the category
    /// predicate is skipped entirely.
    pub fn any_category_disabled(&self) -> bool {
        self.enabled.iter().any(|on| !on)
    }

    /// Restore every field to its documented default at once.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }
}

/// Apply the three-predicate filter to a raw result sequence.
///
/// Survivors keep their original relative order; ranking is the backend's
/// job. `now` is passed in so the recency cutoff is deterministic under
/// test.
pub fn refine_results(
    results: &[RetrievalItem],
    filters: &FilterState,
    documents: &[IngestedDocument],
    now: DateTime<Utc>,
) -> Vec<RetrievalItem> {
    results
        .iter()
        .filter(|item| keep_item(item, filters, documents, now))
        .cloned()
        .collect()
}

fn keep_item(
    item: &RetrievalItem,
    filters: &FilterState,
    documents: &[IngestedDocument],
    now: DateTime<Utc>,
) -> bool {
    if item.score < filters.min_confidence {
        return false;
    }

    let meta = registry::find(documents, &item.doc_id);

    // Recency: fail-open when metadata is missing or the timestamp does
    // not parse.
    if let Some(days) = filters.recency.days() {
        if let Some(meta) = meta {
            if let Ok(created_at) = DateTime::parse_from_rfc3339(&meta.created_at) {
                let cutoff = now - Duration::days(days);
                if created_at.with_timezone(&Utc) < cutoff {
                    return false;
                }
            }
        }
    }

    if filters.any_category_disabled() {
        let name = meta
            .map(|m| m.original_filename.as_str())
            .unwrap_or(item.doc_id.as_str());
        if !filters.is_enabled(classify_doc_type(name)) {
            return false;
        }
    }

    true
}
