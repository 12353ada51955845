//! PassCache - Content-addressable skip detection for highlight passes
//!
//! A highlight pass is a pure function of (panel text, resolved query set);
//! re-running it with unchanged inputs is idempotent but wasted work, and
//! deferred edit handlers schedule such redundant passes freely. The cache
//! hashes both inputs and lets the controller skip a pass whose inputs are
//! unchanged since the last completed one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// ==================== MAIN IMPLEMENTATION ====================

/// Per-panel pass skip detector
#[derive(Debug, Default)]
pub struct PassCache {
    last_hash: Option<u64>,
    check_count: u64,
    skip_count: u64,
}

impl PassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a pass over (`text`, `queries`) would change anything.
    ///
    /// The first check always runs. A `true` result records the new input
    /// hash, so the caller is expected to actually run the pass.
    pub fn should_run(&mut self, text: &str, queries: &[String]) -> bool {
        self.check_count += 1;

        let current = Self::compute_hash(text, queries);
        let changed = match self.last_hash {
            None => true,
            Some(prev) => prev != current,
        };

        if !changed {
            self.skip_count += 1;
        }
        self.last_hash = Some(current);
        changed
    }

    /// Force the next check to run (e.g. after external tree surgery)
    pub fn invalidate(&mut self) {
        self.last_hash = None;
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }

    /// Share of checks that were skipped, as a percentage
    pub fn skip_rate(&self) -> f64 {
        if self.check_count == 0 {
            return 0.0;
        }
        (self.skip_count as f64 / self.check_count as f64) * 100.0
    }

    fn compute_hash(text: &str, queries: &[String]) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        queries.hash(&mut hasher);
        hasher.finish()
    }
}

// ==================== TESTS ====================
