//! Finger state → gesture symbol.
//!
//! | Pose (thumb..pinky) | Hand at/above threshold | Symbol |
//! |---|---|---|
//! | `10000` | yes | [`GestureSymbol::SwipeLeft`] |
//! | `00001` | yes | [`GestureSymbol::SwipeRight`] |
//! | `01100` | any | [`GestureSymbol::PointerMove`] |
//! | `01000` | any | [`GestureSymbol::DrawContinue`] |
//! | `01110` | any | [`GestureSymbol::EraseLastStroke`] |
//! | anything else | any | [`GestureSymbol::None`] |

use crate::landmark::FingerState;

/// Default height of the activation line, frame pixels from the top.
pub const DEFAULT_THRESHOLD: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSymbol {
    None,
    SwipeLeft,
    SwipeRight,
    PointerMove,
    DrawContinue,
    EraseLastStroke,
}

/// What an edge-triggered gesture acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectClass {
    SlideChange,
    StrokeRemoval,
}

impl GestureSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureSymbol::None => "none",
            GestureSymbol::SwipeLeft => "swipe-left",
            GestureSymbol::SwipeRight => "swipe-right",
            GestureSymbol::PointerMove => "pointer",
            GestureSymbol::DrawContinue => "draw",
            GestureSymbol::EraseLastStroke => "erase",
        }
    }

    /// `Some` for gestures that fire once per intent and go through the gate.
    pub fn effect_class(&self) -> Option<EffectClass> {
        match self {
            GestureSymbol::SwipeLeft | GestureSymbol::SwipeRight => Some(EffectClass::SlideChange),
            GestureSymbol::EraseLastStroke => Some(EffectClass::StrokeRemoval),
            _ => None,
        }
    }

    pub fn is_edge_triggered(&self) -> bool {
        self.effect_class().is_some()
    }

    /// Gestures that show the pointer on the canvas.
    pub fn shows_pointer(&self) -> bool {
        matches!(self, GestureSymbol::PointerMove | GestureSymbol::DrawContinue)
    }
}

/// Pick the one symbol for this frame.
///
/// `center_y` is the hand center in frame pixels; swipes only count when it
/// is at or above (numerically ≤) `threshold`.
pub fn recognize(fingers: FingerState, center_y: f32, threshold: i32) -> GestureSymbol {
    let raised = center_y <= threshold as f32;
    match fingers {
        FingerState::THUMB if raised => GestureSymbol::SwipeLeft,
        FingerState::PINKY if raised => GestureSymbol::SwipeRight,
        FingerState::INDEX_MIDDLE => GestureSymbol::PointerMove,
        FingerState::INDEX => GestureSymbol::DrawContinue,
        FingerState::INDEX_MIDDLE_RING => GestureSymbol::EraseLastStroke,
        _ => GestureSymbol::None,
    }
}
