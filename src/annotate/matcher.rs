//! KeywordMatcher - Multi-keyword matching via Aho-Corasick
//!
//! The matching capability behind the keyword highlight pass. One automaton
//! is built per query set and discarded with the pass (marks are re-derived
//! from scratch every time, so there is no incremental state to keep).
//!
//! # Semantics
//! - LeftmostLongest matching: earliest match in document order wins, a
//!   character consumed by a match is never rematched
//! - Hybrid case-insensitivity (ASCII fast path via the automaton)
//! - Queries are trimmed and deduplicated; empty queries match nothing

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashSet;

use super::document::{Node, PanelDocument};

// ==================== TYPE DEFINITIONS ====================

/// Byte range of one keyword occurrence within a text leaf
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Per-pass keyword matcher
pub struct KeywordMatcher {
    automaton: AhoCorasick,
}

impl KeywordMatcher {
    /// Build a matcher for the given query set.
    ///
    /// Entries are trimmed; empty entries (tolerated in the keyword list) are
    /// dropped, and duplicates collapse to one pattern. Returns `Ok(None)`
    /// when no usable query remains, in which case the keyword pass is a
    /// no-op.
    pub fn new(queries: &[String]) -> Result<Option<Self>, String> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::new();
        for query in queries {
            let trimmed = query.trim();
            if trimmed.is_empty() {
                continue;
            }
            let normalized = trimmed.to_lowercase();
            if seen.insert(normalized.clone()) {
                patterns.push(normalized);
            }
        }
        if patterns.is_empty() {
            return Ok(None);
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| format!("KeywordMatcher build error: {}", e))?;

        Ok(Some(Self { automaton }))
    }

    /// Non-overlapping, case-insensitive matches in document order
    pub fn find(&self, text: &str) -> Vec<MatchSpan> {
        self.automaton
            .find_iter(text)
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    /// The mark half of the highlight pass: split every text leaf into
    /// plain/keyword-marked runs. Expects a mark-flattened tree (leaves are
    /// maximal plain text runs). Redaction masks are never scanned.
    pub fn mark_leaves(&self, doc: &mut PanelDocument) {
        doc.rewrite_text_leaves(&mut |text| {
            let mut out = Vec::new();
            let mut last = 0;
            for span in self.find(text) {
                if span.start > last {
                    out.push(Node::text(&text[last..span.start]));
                }
                out.push(Node::keyword(vec![Node::text(&text[span.start..span.end])]));
                last = span.end;
            }
            if last < text.len() {
                out.push(Node::text(&text[last..]));
            }
            out
        });
    }
}

// ==================== TESTS ====================
