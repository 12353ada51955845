//! RedactionEngine - Reversible masking of selected spans
//!
//! Toggles a selected range between plain text and a fixed-glyph mask of
//! equal character length. Original text lives in a side table keyed by span
//! id, never in the rendered tree, so recovery is exact regardless of what
//! the highlight passes do to the tree in between.
//!
//! Marks under the selection are flattened before splicing: mark structure
//! is derived state and the next highlight pass re-creates it from the
//! post-redaction text. A selection that intersects an existing redaction
//! span is ignored rather than producing malformed nesting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::document::PanelDocument;

/// Mask placeholder, one glyph per original character
const MASK_GLYPH: char = 'x';

// ==================== TYPE DEFINITIONS ====================

/// What a toggle call did
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RedactionOutcome {
    /// A new span was created over the selection
    Redacted { id: u64, length: usize },
    /// The span under the selection anchor was restored
    Restored { id: u64 },
    /// Degenerate or conflicting selection; nothing changed
    Ignored,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Redaction span lifecycle + payload side table
///
/// One engine serves all panels of a session; span ids are unique across
/// panels, so each payload is keyed unambiguously.
#[derive(Debug, Default)]
pub struct RedactionEngine {
    payloads: HashMap<u64, String>,
    next_id: u64,
}

impl RedactionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the selection `[start, end)` (visible-text byte offsets).
    ///
    /// If the anchor (`start`) lies inside an existing span, that span is
    /// restored from the side table. Otherwise the selected text is captured
    /// verbatim as the payload and replaced by a mask of equal character
    /// length. Empty selections, offsets off a char boundary, and selections
    /// intersecting an existing span are no-ops.
    pub fn toggle_redaction(
        &mut self,
        doc: &mut PanelDocument,
        start: usize,
        end: usize,
    ) -> RedactionOutcome {
        if let Some(id) = doc.redaction_at(start) {
            let payload = match self.payloads.remove(&id) {
                Some(payload) => payload,
                None => return RedactionOutcome::Ignored,
            };
            if doc.replace_redaction(id, &payload) {
                return RedactionOutcome::Restored { id };
            }
            self.payloads.insert(id, payload);
            return RedactionOutcome::Ignored;
        }

        // Validate before flattening: a rejected selection must leave the
        // tree, marks included, exactly as it was.
        if !doc.can_redact(start, end) {
            return RedactionOutcome::Ignored;
        }

        // Splicing works on the flat text/redaction list; the next highlight
        // pass re-derives the marks from the masked text.
        doc.flatten_marks();

        let id = self.next_id;
        match doc.splice_redaction(start, end, id, MASK_GLYPH) {
            Some(payload) => {
                self.next_id += 1;
                let length = payload.chars().count();
                self.payloads.insert(id, payload);
                RedactionOutcome::Redacted { id, length }
            }
            None => RedactionOutcome::Ignored,
        }
    }

    /// Restore every redaction span under `doc` from the side table. Order is
    /// not observable since spans never interact. Returns the number of spans
    /// restored; afterwards the document holds none.
    pub fn restore_all(&mut self, doc: &mut PanelDocument) -> usize {
        let mut restored = 0;
        for id in doc.redaction_ids() {
            if let Some(payload) = self.payloads.remove(&id) {
                if doc.replace_redaction(id, &payload) {
                    restored += 1;
                }
            }
        }
        restored
    }

    /// Number of payloads currently held (spans outstanding across panels)
    pub fn span_count(&self) -> usize {
        self.payloads.len()
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::document::MarkKind;
    use crate::annotate::highlight::Highlighter;

    #[test]
    fn test_redact_then_restore_round_trips() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("Order 42 placed by Alice ipsum 7");

        let outcome = engine.toggle_redaction(&mut doc, 19, 24);
        assert_eq!(outcome, RedactionOutcome::Redacted { id: 0, length: 5 });
        assert_eq!(doc.visible_text(), "Order 42 placed by xxxxx ipsum 7");

        // Anchor anywhere inside the span toggles it back
        let outcome = engine.toggle_redaction(&mut doc, 21, 22);
        assert_eq!(outcome, RedactionOutcome::Restored { id: 0 });
        assert_eq!(doc.visible_text(), "Order 42 placed by Alice ipsum 7");
        assert_eq!(engine.span_count(), 0);
    }

    #[test]
    fn test_mask_shape() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("secret: héllo!");

        engine.toggle_redaction(&mut doc, 8, 15);

        let visible = doc.visible_text();
        let mask: String = visible.chars().skip(8).take(6).collect();
        assert_eq!(mask.chars().count(), 6, "one glyph per original character");
        assert!(mask.chars().all(|c| c == 'x'));
    }

    #[test]
    fn test_empty_selection_is_ignored() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("hello");

        assert_eq!(
            engine.toggle_redaction(&mut doc, 2, 2),
            RedactionOutcome::Ignored
        );
        assert_eq!(doc.visible_text(), "hello");
    }

    #[test]
    fn test_selection_intersecting_existing_span_is_ignored() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("one two three");
        engine.toggle_redaction(&mut doc, 4, 7);
        assert_eq!(doc.visible_text(), "one xxx three");

        // Starts in plain text, ends inside the span
        assert_eq!(
            engine.toggle_redaction(&mut doc, 2, 6),
            RedactionOutcome::Ignored
        );
        // Fully contains the span (payload would be unrecoverable)
        assert_eq!(
            engine.toggle_redaction(&mut doc, 0, 13),
            RedactionOutcome::Ignored
        );
        assert_eq!(doc.visible_text(), "one xxx three");
        assert_eq!(engine.span_count(), 1);
    }

    #[test]
    fn test_rejected_selection_leaves_marks_intact() {
        let highlighter = Highlighter::new();
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("Order 42 placed by Alice ipsum 7");
        engine.toggle_redaction(&mut doc, 19, 24);
        highlighter
            .apply_highlights(&mut doc, &["ipsum".to_string()])
            .unwrap();
        assert_eq!(doc.mark_count(MarkKind::Keyword), 1);
        assert_eq!(doc.mark_count(MarkKind::Number), 2);

        // Crosses the existing span: rejected without touching the marks
        let outcome = engine.toggle_redaction(&mut doc, 15, 21);
        assert_eq!(outcome, RedactionOutcome::Ignored);
        assert_eq!(doc.mark_count(MarkKind::Keyword), 1);
        assert_eq!(doc.mark_count(MarkKind::Number), 2);
        assert_eq!(doc.visible_text(), "Order 42 placed by xxxxx ipsum 7");
    }

    #[test]
    fn test_off_boundary_selection_leaves_marks_intact() {
        let highlighter = Highlighter::new();
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("héllo 42");
        highlighter.apply_highlights(&mut doc, &[]).unwrap();
        assert_eq!(doc.mark_count(MarkKind::Number), 1);

        // Byte 2 falls inside the two-byte 'é'
        let outcome = engine.toggle_redaction(&mut doc, 2, 6);
        assert_eq!(outcome, RedactionOutcome::Ignored);
        assert_eq!(doc.mark_count(MarkKind::Number), 1);
        assert_eq!(doc.visible_text(), "héllo 42");
    }

    #[test]
    fn test_redaction_over_marked_text_flattens_marks() {
        let highlighter = Highlighter::new();
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("Order 42 placed by Alice");
        highlighter
            .apply_highlights(&mut doc, &["alice".to_string()])
            .unwrap();
        assert_eq!(doc.mark_count(MarkKind::Keyword), 1);

        // Selection covers the marked "Alice"; payload is plain text
        let outcome = engine.toggle_redaction(&mut doc, 19, 24);
        assert!(matches!(outcome, RedactionOutcome::Redacted { .. }));
        assert_eq!(doc.visible_text(), "Order 42 placed by xxxxx");

        engine.restore_all(&mut doc);
        assert_eq!(doc.visible_text(), "Order 42 placed by Alice");
    }

    #[test]
    fn test_restore_all_leaves_no_spans() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("aaa bbb ccc ddd");
        engine.toggle_redaction(&mut doc, 0, 3);
        engine.toggle_redaction(&mut doc, 8, 11);
        assert_eq!(doc.visible_text(), "xxx bbb xxx ddd");

        let restored = engine.restore_all(&mut doc);

        assert_eq!(restored, 2);
        assert!(doc.redaction_ids().is_empty());
        assert_eq!(doc.visible_text(), "aaa bbb ccc ddd");
        assert_eq!(engine.span_count(), 0);
    }

    #[test]
    fn test_restore_all_on_clean_document() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("nothing redacted");

        assert_eq!(engine.restore_all(&mut doc), 0);
        assert_eq!(doc.visible_text(), "nothing redacted");
    }

    #[test]
    fn test_adjacent_spans_restore_independently() {
        let mut engine = RedactionEngine::new();
        let mut doc = PanelDocument::new();
        doc.set_content("abcdef");
        engine.toggle_redaction(&mut doc, 0, 2);
        engine.toggle_redaction(&mut doc, 4, 6);
        assert_eq!(doc.visible_text(), "xxcdxx");

        engine.toggle_redaction(&mut doc, 0, 1);
        assert_eq!(doc.visible_text(), "abcdxx");

        engine.toggle_redaction(&mut doc, 4, 5);
        assert_eq!(doc.visible_text(), "abcdef");
    }
}
