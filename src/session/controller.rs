//! AnnotationSession - Dual-panel orchestrator
//!
//! Owns the two panel documents, the predefined keyword list, the live
//! search string, and the engines. UI events map onto its methods:
//! - search input / keyword-list update -> immediate highlight pass
//! - panel edit -> highlight pass deferred by one tick (the triggering
//!   edit's own mutation settles first)
//! - selection + redact button -> toggle, then re-highlight that panel
//! - scroll -> mirror directive for the opposite panel, guarded
//!
//! Designed for WASM with one cross-boundary call per UI event.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::annotate::{
    HighlightStats, Highlighter, MarkKind, Node, PanelDocument, RedactionEngine,
    RedactionOutcome,
};
use crate::session::change::PassCache;
use crate::session::sync::ScrollSync;

use instant::Instant;

// ==================== TYPE DEFINITIONS ====================

/// The two panels of a session
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Source,
    Mirror,
}

impl PanelId {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(PanelId::Source),
            1 => Some(PanelId::Mirror),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PanelId::Source => 0,
            PanelId::Mirror => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            PanelId::Source => PanelId::Mirror,
            PanelId::Mirror => PanelId::Source,
        }
    }
}

/// Outcome of one highlight pass over both panels
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PassReport {
    pub source: HighlightStats,
    pub mirror: HighlightStats,
}

/// Scroll offset to write to the opposite panel
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MirrorDirective {
    pub target: PanelId,
    pub offset: f64,
}

/// Predefined keyword list of a fresh session
const DEFAULT_KEYWORDS: [&str; 4] = ["lorem ipsum", "dolor", "elit", "consectetur"];

// ==================== MAIN IMPLEMENTATION ====================

/// Dual-panel annotation session
#[wasm_bindgen]
pub struct AnnotationSession {
    panels: [PanelDocument; 2],
    caches: [PassCache; 2],
    highlighter: Highlighter,
    redaction: RedactionEngine,
    scroll: ScrollSync,
    keywords: Vec<String>,
    search: String,
    remark_pending: bool,
    last_report: Option<PassReport>,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSession {
    /// Set the source panel's content, mirror it into the other panel
    /// (init-time mirroring only; the panels diverge under later edits), and
    /// run the first highlight pass.
    pub fn init(&mut self, source_text: &str) -> Result<PassReport, String> {
        self.panels[PanelId::Source.index()].set_content(source_text);
        self.panels[PanelId::Mirror.index()].set_content(source_text);
        self.perform_mark()
    }

    /// The query set for the next pass: a trimmed non-empty search string is
    /// the sole query, otherwise the predefined keyword list.
    pub fn resolved_queries(&self) -> Vec<String> {
        let search = self.search.trim();
        if search.is_empty() {
            self.keywords.clone()
        } else {
            vec![search.to_string()]
        }
    }

    /// Store the live search string and re-highlight both panels
    pub fn set_search(&mut self, text: &str) -> Result<PassReport, String> {
        self.search = text.to_string();
        self.perform_mark()
    }

    /// Replace the predefined keyword list from its comma-separated editor
    /// value. Entries are trimmed; empties are tolerated (they match
    /// nothing). Re-highlights both panels.
    pub fn update_keywords(&mut self, csv: &str) -> Result<PassReport, String> {
        self.keywords = csv.split(',').map(|k| k.trim().to_string()).collect();
        self.perform_mark()
    }

    /// Replace a panel's raw content. The highlight pass is deferred by one
    /// tick so the triggering edit's own mutation settles first.
    pub fn edit_panel(&mut self, panel: PanelId, text: &str) {
        self.panels[panel.index()].set_content(text);
        self.remark_pending = true;
    }

    /// Run any pass a prior edit deferred. Redundant runs are harmless (the
    /// pass is idempotent and the cache skips unchanged inputs).
    pub fn tick(&mut self) -> Result<Option<PassReport>, String> {
        if !self.remark_pending {
            return Ok(None);
        }
        self.remark_pending = false;
        self.perform_mark().map(Some)
    }

    /// Highlight pass over both panels with the resolved query set. Panels
    /// whose (text, queries) pair is unchanged since their last completed
    /// pass are skipped.
    pub fn perform_mark(&mut self) -> Result<PassReport, String> {
        let queries = self.resolved_queries();
        let mut report = PassReport::default();

        for panel in [PanelId::Source, PanelId::Mirror] {
            let idx = panel.index();
            let text = self.panels[idx].visible_text();
            let stats = if self.caches[idx].should_run(&text, &queries) {
                match self.highlighter.apply_highlights(&mut self.panels[idx], &queries) {
                    Ok(stats) => stats,
                    Err(e) => {
                        self.caches[idx].invalidate();
                        return Err(e);
                    }
                }
            } else {
                HighlightStats {
                    keyword_marks: self.panels[idx].mark_count(MarkKind::Keyword),
                    number_marks: self.panels[idx].mark_count(MarkKind::Number),
                    text_length: self.panels[idx].visible_len(),
                    pass_time_us: 0,
                    was_skipped: true,
                }
            };
            match panel {
                PanelId::Source => report.source = stats,
                PanelId::Mirror => report.mirror = stats,
            }
        }

        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Toggle redaction of `[start, end)` (visible-text byte offsets) on the
    /// addressed panel, then re-highlight it so marks are re-derived from the
    /// post-toggle text.
    pub fn toggle_redaction(
        &mut self,
        panel: PanelId,
        start: usize,
        end: usize,
    ) -> Result<RedactionOutcome, String> {
        let outcome =
            self.redaction
                .toggle_redaction(&mut self.panels[panel.index()], start, end);
        if outcome != RedactionOutcome::Ignored {
            self.perform_mark()?;
        }
        Ok(outcome)
    }

    /// Restore every redaction span in both panels, then re-highlight.
    /// Returns the number of spans restored.
    pub fn restore_all(&mut self) -> Result<usize, String> {
        let mut restored = 0;
        for panel in [PanelId::Source, PanelId::Mirror] {
            restored += self
                .redaction
                .restore_all(&mut self.panels[panel.index()]);
        }
        if restored > 0 {
            self.perform_mark()?;
        }
        Ok(restored)
    }

    /// Scroll handler: returns the offset to write to the opposite panel, or
    /// `None` while the mirror guard is held.
    pub fn on_scroll(&mut self, panel: PanelId, offset: f64) -> Option<MirrorDirective> {
        self.on_scroll_at(panel, offset, Instant::now())
    }

    /// Clock-explicit variant of `on_scroll`
    pub fn on_scroll_at(
        &mut self,
        panel: PanelId,
        offset: f64,
        now: Instant,
    ) -> Option<MirrorDirective> {
        self.scroll.mirror(offset, now).map(|offset| MirrorDirective {
            target: panel.opposite(),
            offset,
        })
    }

    pub fn panel(&self, panel: PanelId) -> &PanelDocument {
        &self.panels[panel.index()]
    }

    pub fn panel_text(&self, panel: PanelId) -> String {
        self.panels[panel.index()].visible_text()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }
}

// ==================== WASM BINDINGS ====================

#[wasm_bindgen]
impl AnnotationSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            panels: [PanelDocument::new(), PanelDocument::new()],
            caches: [PassCache::new(), PassCache::new()],
            highlighter: Highlighter::new(),
            redaction: RedactionEngine::new(),
            scroll: ScrollSync::new(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            search: String::new(),
            remark_pending: false,
            last_report: None,
        }
    }

    #[wasm_bindgen(js_name = init)]
    pub fn js_init(&mut self, source_text: &str) -> Result<JsValue, JsValue> {
        let report = self.init(source_text).map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = setSearch)]
    pub fn js_set_search(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let report = self.set_search(text).map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = updateKeywords)]
    pub fn js_update_keywords(&mut self, csv: &str) -> Result<JsValue, JsValue> {
        let report = self.update_keywords(csv).map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = editPanel)]
    pub fn js_edit_panel(&mut self, panel: u32, text: &str) -> Result<(), JsValue> {
        self.edit_panel(parse_panel(panel)?, text);
        Ok(())
    }

    /// Runs any deferred highlight pass; returns the report or null
    #[wasm_bindgen(js_name = tick)]
    pub fn js_tick(&mut self) -> Result<JsValue, JsValue> {
        match self.tick().map_err(|e| JsValue::from_str(&e))? {
            Some(report) => to_js(&report),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = performMark)]
    pub fn js_perform_mark(&mut self) -> Result<JsValue, JsValue> {
        let report = self.perform_mark().map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = toggleRedaction)]
    pub fn js_toggle_redaction(
        &mut self,
        panel: u32,
        start: usize,
        end: usize,
    ) -> Result<JsValue, JsValue> {
        let outcome = self
            .toggle_redaction(parse_panel(panel)?, start, end)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = restoreAll)]
    pub fn js_restore_all(&mut self) -> Result<usize, JsValue> {
        self.restore_all().map_err(|e| JsValue::from_str(&e))
    }

    /// Returns `{ target, offset }` or null while the mirror guard is held
    #[wasm_bindgen(js_name = onScroll)]
    pub fn js_on_scroll(&mut self, panel: u32, offset: f64) -> Result<JsValue, JsValue> {
        match self.on_scroll(parse_panel(panel)?, offset) {
            Some(directive) => to_js(&directive),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = panelText)]
    pub fn js_panel_text(&self, panel: u32) -> Result<String, JsValue> {
        Ok(self.panel_text(parse_panel(panel)?))
    }

    /// Serialized panel tree for the renderer
    #[wasm_bindgen(js_name = panelNodes)]
    pub fn js_panel_nodes(&self, panel: u32) -> Result<JsValue, JsValue> {
        let nodes: &[Node] = self.panels[parse_panel(panel)?.index()].nodes();
        match serde_wasm_bindgen::to_value(nodes) {
            Ok(value) => Ok(value),
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[AnnotationSession] Serialization failed: {:?}", e).into(),
                );
                Ok(JsValue::NULL)
            }
        }
    }

    /// Session status snapshot
    #[wasm_bindgen(js_name = getStats)]
    pub fn js_get_stats(&self) -> JsValue {
        let stats = serde_json::json!({
            "keywords": self.keywords,
            "search": self.search,
            "remark_pending": self.remark_pending,
            "redaction_spans": self.redaction.span_count(),
            "source_skip_rate": self.caches[0].skip_rate(),
            "mirror_skip_rate": self.caches[1].skip_rate(),
        });
        JsValue::from_str(&stats.to_string())
    }
}

fn parse_panel(index: u32) -> Result<PanelId, JsValue> {
    PanelId::from_index(index)
        .ok_or_else(|| JsValue::from_str("Invalid panel: expected 0 (source) or 1 (mirror)"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ==================== TESTS ====================
