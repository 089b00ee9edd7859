//! Slide index state machine.

use tracing::debug;

use crate::error::{ConfigError, GestureError};

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// Already at the first/last slide; nothing changes.
    AtBoundary { index: usize },
}

impl Transition {
    pub fn moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    index: usize,
    count: usize,
}

impl NavigationState {
    pub fn new(count: usize) -> Result<Self, GestureError> {
        if count == 0 {
            return Err(ConfigError::NoSlides.into());
        }
        Ok(NavigationState { index: 0, count })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    pub fn back(&mut self) -> Transition {
        if self.is_first() {
            return Transition::AtBoundary { index: self.index };
        }
        self.move_to(self.index - 1)
    }

    pub fn forward(&mut self) -> Transition {
        if self.is_last() {
            return Transition::AtBoundary { index: self.index };
        }
        self.move_to(self.index + 1)
    }

    /// Jump straight to `index`.  Out-of-range targets clamp to the last
    /// slide; jumping to the current slide is a boundary no-op.
    pub fn jump_to(&mut self, index: usize) -> Transition {
        let target = index.min(self.count - 1);
        if target == self.index {
            return Transition::AtBoundary { index: self.index };
        }
        self.move_to(target)
    }

    fn move_to(&mut self, to: usize) -> Transition {
        let from = self.index;
        self.index = to;
        debug!(from, to, count = self.count, "slide changed");
        Transition::Moved { from, to }
    }
}
