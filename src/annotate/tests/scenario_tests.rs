//! End-to-end scenarios over the annotation core: coverage, idempotence,
//! and the interplay of keyword marks, number marks, and redaction spans.

use crate::annotate::document::{MarkKind, PanelDocument};
use crate::annotate::highlight::Highlighter;
use crate::annotate::redact::{RedactionEngine, RedactionOutcome};

fn queries(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_order_scenario_marks() {
    // Document "Order 42 placed by Alice ipsum 7", predefined ["ipsum"],
    // search box empty: "ipsum" keyword-marked, "42" and "7" number-marked,
    // everything else untouched.
    let highlighter = Highlighter::new();
    let mut doc = PanelDocument::new();
    doc.set_content("Order 42 placed by Alice ipsum 7");

    let stats = highlighter
        .apply_highlights(&mut doc, &queries(&["ipsum"]))
        .unwrap();

    assert_eq!(stats.keyword_marks, 1);
    assert_eq!(stats.number_marks, 2);
    assert_eq!(doc.marked_texts(MarkKind::Keyword), vec!["ipsum"]);
    assert_eq!(doc.marked_texts(MarkKind::Number), vec!["42", "7"]);
    assert_eq!(doc.visible_text(), "Order 42 placed by Alice ipsum 7");
}

#[test]
fn test_order_scenario_redaction_toggle() {
    let highlighter = Highlighter::new();
    let mut engine = RedactionEngine::new();
    let mut doc = PanelDocument::new();
    doc.set_content("Order 42 placed by Alice ipsum 7");
    highlighter
        .apply_highlights(&mut doc, &queries(&["ipsum"]))
        .unwrap();

    // Select "Alice", toggle
    let outcome = engine.toggle_redaction(&mut doc, 19, 24);
    assert!(matches!(outcome, RedactionOutcome::Redacted { .. }));
    assert_eq!(doc.visible_text(), "Order 42 placed by xxxxx ipsum 7");

    // Toggle again on the same span
    let outcome = engine.toggle_redaction(&mut doc, 19, 24);
    assert!(matches!(outcome, RedactionOutcome::Restored { .. }));
    assert_eq!(doc.visible_text(), "Order 42 placed by Alice ipsum 7");
}

#[test]
fn test_coverage_no_text_outside_occurrences_is_marked() {
    let highlighter = Highlighter::new();
    let mut doc = PanelDocument::new();
    doc.set_content("cat catalog concatenate");

    highlighter
        .apply_highlights(&mut doc, &queries(&["cat"]))
        .unwrap();

    // Substring occurrences count too; marked text is exactly "cat" each time
    let marked = doc.marked_texts(MarkKind::Keyword);
    assert_eq!(marked, vec!["cat", "cat", "cat"]);

    let unmarked: String = {
        let mut doc = doc.clone();
        doc.flatten_marks();
        doc.visible_text()
    };
    assert_eq!(unmarked, "cat catalog concatenate");
}

#[test]
fn test_multi_keyword_coverage_in_document_order() {
    let highlighter = Highlighter::new();
    let mut doc = PanelDocument::new();
    doc.set_content("Dolor and elit, then dolor again");

    highlighter
        .apply_highlights(&mut doc, &queries(&["dolor", "elit"]))
        .unwrap();

    assert_eq!(
        doc.marked_texts(MarkKind::Keyword),
        vec!["Dolor", "elit", "dolor"]
    );
}

#[test]
fn test_highlight_pass_is_idempotent_with_redactions_present() {
    let highlighter = Highlighter::new();
    let mut engine = RedactionEngine::new();
    let mut doc = PanelDocument::new();
    doc.set_content("id 007 belongs to Bond, James Bond");
    engine.toggle_redaction(&mut doc, 18, 22);
    assert_eq!(doc.visible_text(), "id 007 belongs to xxxx, James Bond");

    let q = queries(&["bond"]);
    highlighter.apply_highlights(&mut doc, &q).unwrap();
    let once = doc.clone();
    highlighter.apply_highlights(&mut doc, &q).unwrap();

    assert_eq!(doc, once);
    assert_eq!(doc.marked_texts(MarkKind::Keyword), vec!["Bond"]);
    assert_eq!(doc.marked_texts(MarkKind::Number), vec!["007"]);
}

#[test]
fn test_keyword_spanning_redaction_boundary_does_not_match() {
    let highlighter = Highlighter::new();
    let mut engine = RedactionEngine::new();
    let mut doc = PanelDocument::new();
    doc.set_content("foobar");
    engine.toggle_redaction(&mut doc, 2, 4);
    assert_eq!(doc.visible_text(), "foxxar");

    highlighter
        .apply_highlights(&mut doc, &queries(&["foxxar"]))
        .unwrap();

    // The span splits the text into separate leaves; no match crosses it
    assert_eq!(doc.mark_count(MarkKind::Keyword), 0);
}

#[test]
fn test_restore_all_then_highlight_recovers_keyword() {
    let highlighter = Highlighter::new();
    let mut engine = RedactionEngine::new();
    let mut doc = PanelDocument::new();
    doc.set_content("classified dossier");
    highlighter
        .apply_highlights(&mut doc, &queries(&["dossier"]))
        .unwrap();

    engine.toggle_redaction(&mut doc, 11, 18);
    highlighter
        .apply_highlights(&mut doc, &queries(&["dossier"]))
        .unwrap();
    assert_eq!(doc.mark_count(MarkKind::Keyword), 0, "masked text never matches");

    engine.restore_all(&mut doc);
    highlighter
        .apply_highlights(&mut doc, &queries(&["dossier"]))
        .unwrap();
    assert_eq!(doc.marked_texts(MarkKind::Keyword), vec!["dossier"]);
}
