//! Cooldown gate for edge-triggered gestures.
//!
//! One latch is shared by every edge-triggered gesture: a swipe blocks an
//! erase and vice versa until the cooldown runs out.

use tracing::trace;

/// Default cooldown, frames.
pub const DEFAULT_COOLDOWN: u32 = 30;

#[derive(Debug, Clone)]
pub struct DebounceGate {
    cooldown: u32,
    latched: bool,
    /// Frames counted since the latch closed.
    elapsed: u32,
}

impl DebounceGate {
    pub fn new(cooldown: u32) -> Self {
        DebounceGate { cooldown, latched: false, elapsed: 0 }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn is_blocked(&self) -> bool {
        self.latched
    }

    /// Claim the gate.  Returns `false` while a previous gesture's cooldown
    /// is still running.
    pub fn try_fire(&mut self) -> bool {
        if self.latched {
            return false;
        }
        self.latched = true;
        self.elapsed = 0;
        true
    }

    /// Advance one frame.  Call exactly once per processed frame, after the
    /// frame's gesture was applied, whether or not a hand was seen.
    pub fn tick(&mut self) {
        if !self.latched {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed > self.cooldown {
            self.latched = false;
            self.elapsed = 0;
            trace!("debounce gate reopened");
        }
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        DebounceGate::new(DEFAULT_COOLDOWN)
    }
}
