//! PanelDocument - Mutable document tree for one annotation panel
//!
//! The unit the highlight and redaction passes operate on. A panel holds an
//! ordered list of nodes:
//! - `Text` - plain leaf text
//! - `Mark` - transient highlight wrapper (keyword or number)
//! - `Redaction` - masked span; the recoverable payload lives in the
//!   RedactionEngine's side table, keyed by span id
//!
//! # Invariants
//! - `visible_text()` is unchanged by `flatten_marks()` (marks are derived view
//!   state, never content)
//! - `splice_redaction()` never drops, duplicates, or reorders a byte outside
//!   the spliced range

use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// The two transient mark flavors
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Keyword,
    Number,
}

/// One node of the panel tree
///
/// Number marks wrap exactly one `Text` child. Keyword marks may contain
/// `Text` children and nested `Number` marks produced by the numeric
/// post-pass. Redaction spans only ever appear at the top level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text { text: String },
    Mark { kind: MarkKind, children: Vec<Node> },
    Redaction { id: u64, mask: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn keyword(children: Vec<Node>) -> Self {
        Node::Mark {
            kind: MarkKind::Keyword,
            children,
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Node::Mark {
            kind: MarkKind::Number,
            children: vec![Node::text(text)],
        }
    }

    /// Length in bytes of the node's visible text
    fn visible_len(&self) -> usize {
        match self {
            Node::Text { text } => text.len(),
            Node::Mark { children, .. } => children.iter().map(Node::visible_len).sum(),
            Node::Redaction { mask, .. } => mask.len(),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Mark { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Node::Redaction { mask, .. } => out.push_str(mask),
        }
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Mutable document tree for one panel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PanelDocument {
    nodes: Vec<Node>,
}

impl PanelDocument {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Replace the whole tree with a single plain text leaf.
    ///
    /// Used at panel init, for init-time content mirroring, and for live
    /// edits (an edit replaces the panel's raw content; marks are re-derived
    /// by the next highlight pass).
    pub fn set_content(&mut self, text: &str) {
        self.nodes.clear();
        if !text.is_empty() {
            self.nodes.push(Node::text(text));
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Document-order concatenation of all visible text. Redaction spans
    /// contribute their mask, not their payload.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.collect_text(&mut out);
        }
        out
    }

    /// Length in bytes of the visible text
    pub fn visible_len(&self) -> usize {
        self.nodes.iter().map(Node::visible_len).sum()
    }

    /// Flatten every mark (both kinds) back to plain text and merge adjacent
    /// text leaves. The unmark half of a highlight pass; redaction spans are
    /// untouched. Visible text is identical before and after.
    pub fn flatten_marks(&mut self) {
        let old = std::mem::take(&mut self.nodes);
        for node in old {
            match node {
                Node::Text { text } => push_text_merged(&mut self.nodes, text),
                Node::Mark { .. } => {
                    let mut text = String::new();
                    node.collect_text(&mut text);
                    push_text_merged(&mut self.nodes, text);
                }
                redaction @ Node::Redaction { .. } => self.nodes.push(redaction),
            }
        }
    }

    /// Replace every `Text` leaf with the nodes `f` derives from it.
    ///
    /// Recurses into keyword marks (so the numeric pass can split inside
    /// them) but never into number marks or redaction spans. `f` must
    /// preserve the leaf's text exactly across its output fragments.
    pub fn rewrite_text_leaves(&mut self, f: &mut dyn FnMut(&str) -> Vec<Node>) {
        rewrite_nodes(&mut self.nodes, f);
    }

    /// Remove the visible-text byte `range` from a mark-flattened tree and
    /// insert a redaction span in its place. The mask is one `glyph` per
    /// removed character. Returns the removed text as the payload.
    ///
    /// Returns `None` (leaving the tree untouched) when the range is
    /// degenerate, out of bounds, off a char boundary, or intersects an
    /// existing redaction span.
    pub fn splice_redaction(
        &mut self,
        start: usize,
        end: usize,
        id: u64,
        glyph: char,
    ) -> Option<String> {
        if start >= end {
            return None;
        }

        let mut offset = 0;
        for idx in 0..self.nodes.len() {
            let node_end = offset + self.nodes[idx].visible_len();
            if let Node::Text { text } = &self.nodes[idx] {
                if start >= offset && start < node_end {
                    if end > node_end {
                        // Crosses a node boundary: the only separators on a
                        // flattened tree are redaction spans, which a new
                        // redaction must not intersect.
                        return None;
                    }
                    let s = start - offset;
                    let e = end - offset;
                    if !text.is_char_boundary(s) || !text.is_char_boundary(e) {
                        return None;
                    }

                    let payload = text[s..e].to_string();
                    let before = text[..s].to_string();
                    let after = text[e..].to_string();
                    let mask: String = payload.chars().map(|_| glyph).collect();

                    let mut replacement = Vec::with_capacity(3);
                    if !before.is_empty() {
                        replacement.push(Node::text(before));
                    }
                    replacement.push(Node::Redaction { id, mask });
                    if !after.is_empty() {
                        replacement.push(Node::text(after));
                    }
                    self.nodes.splice(idx..=idx, replacement);
                    return Some(payload);
                }
            }
            offset = node_end;
        }
        None
    }

    /// Whether the visible-text byte `range` can become a new redaction
    /// span: non-degenerate, in bounds, on char boundaries, and not
    /// intersecting an existing span. Checked against the tree as it stands,
    /// so a rejected selection is a true no-op (marks included).
    pub fn can_redact(&self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        let text = self.visible_text();
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return false;
        }
        let mut pos = 0;
        for node in &self.nodes {
            let node_end = pos + node.visible_len();
            if matches!(node, Node::Redaction { .. }) && start < node_end && pos < end {
                return false;
            }
            pos = node_end;
        }
        true
    }

    /// Id of the redaction span whose visible range contains `offset`
    pub fn redaction_at(&self, offset: usize) -> Option<u64> {
        let mut pos = 0;
        for node in &self.nodes {
            let node_end = pos + node.visible_len();
            if let Node::Redaction { id, .. } = node {
                if offset >= pos && offset < node_end {
                    return Some(*id);
                }
            }
            pos = node_end;
        }
        None
    }

    /// Swap the redaction span `id` for a plain text leaf carrying `payload`
    /// and merge it with its neighbors. Returns false when no such span
    /// exists.
    pub fn replace_redaction(&mut self, id: u64, payload: &str) -> bool {
        let idx = self.nodes.iter().position(
            |node| matches!(node, Node::Redaction { id: span_id, .. } if *span_id == id),
        );
        match idx {
            Some(idx) => {
                self.nodes[idx] = Node::text(payload);
                self.normalize();
                true
            }
            None => false,
        }
    }

    /// Ids of all redaction spans, in document order
    pub fn redaction_ids(&self) -> Vec<u64> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Redaction { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of marks of the given kind, including nested number marks
    pub fn mark_count(&self, kind: MarkKind) -> usize {
        fn count(nodes: &[Node], kind: MarkKind) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Mark {
                        kind: node_kind,
                        children,
                    } => (*node_kind == kind) as usize + count(children, kind),
                    _ => 0,
                })
                .sum()
        }
        count(&self.nodes, kind)
    }

    /// Visible text of every mark of the given kind, in document order
    pub fn marked_texts(&self, kind: MarkKind) -> Vec<String> {
        fn collect(nodes: &[Node], kind: MarkKind, out: &mut Vec<String>) {
            for node in nodes {
                if let Node::Mark {
                    kind: node_kind,
                    children,
                } = node
                {
                    if *node_kind == kind {
                        let mut text = String::new();
                        node.collect_text(&mut text);
                        out.push(text);
                    }
                    collect(children, kind, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, kind, &mut out);
        out
    }

    /// Merge adjacent text leaves and drop empty ones (DOM `normalize()`)
    fn normalize(&mut self) {
        let old = std::mem::take(&mut self.nodes);
        for node in old {
            match node {
                Node::Text { text } => push_text_merged(&mut self.nodes, text),
                other => self.nodes.push(other),
            }
        }
    }
}

fn push_text_merged(nodes: &mut Vec<Node>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text { text: last }) = nodes.last_mut() {
        last.push_str(&text);
    } else {
        nodes.push(Node::Text { text });
    }
}

fn rewrite_nodes(nodes: &mut Vec<Node>, f: &mut dyn FnMut(&str) -> Vec<Node>) {
    let old = std::mem::take(nodes);
    for node in old {
        match node {
            Node::Text { text } => nodes.extend(f(&text)),
            Node::Mark {
                kind: MarkKind::Keyword,
                mut children,
            } => {
                rewrite_nodes(&mut children, f);
                nodes.push(Node::Mark {
                    kind: MarkKind::Keyword,
                    children,
                });
            }
            other => nodes.push(other),
        }
    }
}

// ==================== TESTS ====================
