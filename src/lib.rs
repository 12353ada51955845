//! MarkCore: Dual-Panel Annotation Engine
//!
//! A Rust/WASM implementation of the annotation/redaction engine behind a
//! two-panel text annotation UI.
//!
//! # Architecture
//!
//! ## Annotation core (`annotate/`)
//! - `document.rs` - PanelDocument: mutable document tree per panel
//! - `matcher.rs` - KeywordMatcher: case-insensitive multi-keyword matching (Aho-Corasick)
//! - `numeric.rs` - NumericHighlighter: digit-run marks per text leaf
//! - `highlight.rs` - Highlighter: destroy-and-recreate highlight pass
//! - `redact.rs` - RedactionEngine: reversible masking, payload side table
//!
//! ## Session layer (`session/`)
//! - `controller.rs` - AnnotationSession: **orchestrator** - one call per UI event
//! - `change.rs` - PassCache: content-addressable skip of redundant passes
//! - `sync.rs` - ScrollSync: single-permit scroll mirror guard
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AnnotationSession } from 'markcore';
//!
//! await init();
//!
//! const session = new AnnotationSession();
//! session.init("Order 42 placed by Alice ipsum 7");
//!
//! // Search input wins over the predefined keyword list while non-empty
//! session.setSearch("alice");
//!
//! // Selection offsets come from the DOM boundary
//! session.toggleRedaction(0, 19, 24);   // -> { action: "redacted", ... }
//! session.restoreAll();
//!
//! // Scroll handler: write the returned offset to the opposite panel
//! const directive = session.onScroll(0, el.scrollTop);
//! if (directive) panels[directive.target].scrollTop = directive.offset;
//!
//! // Re-render from the serialized tree
//! render(session.panelNodes(0));
//! ```

pub mod annotate;
pub mod session;

pub use annotate::*;
pub use session::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("markcore v{}", env!("CARGO_PKG_VERSION"))
}
