//! Highlighter - Destroy-and-recreate highlight pass
//!
//! One pass = unmark everything, re-mark keywords, then the numeric
//! post-pass over the same root. Marks are a pure function of (text, query
//! set), so the pass is idempotent by construction: no diffing, no
//! incremental state, redundant runs are merely wasted work.

use serde::{Deserialize, Serialize};

use super::document::{MarkKind, PanelDocument};
use super::matcher::KeywordMatcher;
use super::numeric::NumericHighlighter;

// ==================== TYPE DEFINITIONS ====================

/// Outcome of one highlight pass over one panel
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HighlightStats {
    pub keyword_marks: usize,
    pub number_marks: usize,
    pub text_length: usize,
    pub pass_time_us: u64,
    pub was_skipped: bool,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Keyword + numeric highlight pass runner
pub struct Highlighter {
    numeric: NumericHighlighter,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            numeric: NumericHighlighter::new(),
        }
    }

    /// Remove all existing marks under `doc` (restoring the exact original
    /// text), mark every non-overlapping case-insensitive occurrence of any
    /// query, then run the numeric post-pass so digit runs are highlighted
    /// even inside or around keyword marks.
    ///
    /// An empty or whitespace-only query set skips the keyword half; the
    /// numeric half always runs.
    pub fn apply_highlights(
        &self,
        doc: &mut PanelDocument,
        queries: &[String],
    ) -> Result<HighlightStats, String> {
        let start = instant::Instant::now();

        doc.flatten_marks();
        if let Some(matcher) = KeywordMatcher::new(queries)? {
            matcher.mark_leaves(doc);
        }
        self.numeric.highlight_numbers(doc);

        Ok(HighlightStats {
            keyword_marks: doc.mark_count(MarkKind::Keyword),
            number_marks: doc.mark_count(MarkKind::Number),
            text_length: doc.visible_len(),
            pass_time_us: start.elapsed().as_micros() as u64,
            was_skipped: false,
        })
    }
}

// ==================== TESTS ====================
