//! NumericHighlighter - Digit-run detection via Regex
//!
//! Post-pass of every highlight run: splits each text leaf on maximal digit
//! runs (`[0-9]+`) and rebuilds it as an ordered sequence of plain and
//! number-marked fragments. Operates per leaf; recurses into keyword marks
//! (digits inside a keyword still get their own mark) but never into the
//! number marks it creates or into redaction masks.
//!
//! Safe to call repeatedly: it always runs right after marks were flattened
//! and re-derived, so leaves are plain text.

use regex::Regex;

use super::document::{Node, PanelDocument};

// ==================== MAIN IMPLEMENTATION ====================

/// Digit-run highlighter
pub struct NumericHighlighter {
    digits_re: Regex,
}

impl Default for NumericHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl NumericHighlighter {
    pub fn new() -> Self {
        // Maximal digit runs, ASCII only
        let digits_re = Regex::new(r"[0-9]+").unwrap();
        Self { digits_re }
    }

    /// Wrap every maximal digit run under `doc` in a number mark.
    ///
    /// Fragment order and character content are preserved exactly: in-order
    /// concatenation of the produced fragments reproduces each leaf. Leaves
    /// without digits are left as a single equivalent fragment.
    pub fn highlight_numbers(&self, doc: &mut PanelDocument) {
        doc.rewrite_text_leaves(&mut |text| {
            let mut out = Vec::new();
            let mut last = 0;
            for m in self.digits_re.find_iter(text) {
                if m.start() > last {
                    out.push(Node::text(&text[last..m.start()]));
                }
                out.push(Node::number(m.as_str()));
                last = m.end();
            }
            if last < text.len() {
                out.push(Node::text(&text[last..]));
            }
            out
        });
    }
}

// ==================== TESTS ====================
