//! ScrollSync - Feedback-free scroll mirroring between two panels
//!
//! Mirroring a scroll offset onto the other panel triggers a scroll event of
//! its own; an unguarded handler would bounce the offset back forever. The
//! guard is a single-permit token: acquired when a mirror is issued, released
//! by the clock after a short settle window that absorbs the echo event.
//!
//! Best-effort only: rapid opposing scrolls inside the settle window can drop
//! one event. That is an accepted limitation of the debounce.

use instant::{Duration, Instant};

/// Settle window absorbing the echo of a programmatic scroll write
const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

// ==================== MAIN IMPLEMENTATION ====================

/// Single-permit scroll mirror guard
#[derive(Debug)]
pub struct ScrollSync {
    busy_until: Option<Instant>,
    settle: Duration,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::with_settle(DEFAULT_SETTLE)
    }

    pub fn with_settle(settle: Duration) -> Self {
        Self {
            busy_until: None,
            settle,
        }
    }

    /// Decide whether a scroll to `offset` should be mirrored at `now`.
    ///
    /// Returns the offset to write to the opposite panel, or `None` while the
    /// permit is held. Issuing a mirror holds the permit until `now + settle`;
    /// release is purely clock-driven, so the permit frees itself even when
    /// the echo event never fires.
    pub fn mirror(&mut self, offset: f64, now: Instant) -> Option<f64> {
        if self.is_guarded(now) {
            return None;
        }
        self.busy_until = Some(now + self.settle);
        Some(offset)
    }

    /// True while a mirror is in flight or inside its settle window
    pub fn is_guarded(&self, now: Instant) -> bool {
        matches!(self.busy_until, Some(until) if now < until)
    }
}

// ==================== TESTS ====================
