//! # gesture_core
//!
//! Turns a stream of per-frame hand observations into slide navigation and
//! freehand annotation.
//!
//! ## Gesture → Action mapping
//!
//! | Pose | Hand above threshold | Action |
//! |---|---|---|
//! | Thumb only | required | Previous slide (debounced) |
//! | Pinky only | required | Next slide (debounced) |
//! | Index + middle | — | Show pointer |
//! | Index only | — | Draw (append to open stroke) |
//! | Index + middle + ring | — | Erase last stroke (debounced) |
//! | Anything else / no hand | — | Close open stroke |
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_core::{FingerState, Handedness, HandObservation, Session, SessionConfig};
//!
//! let mut session = Session::start(SessionConfig::new(5)).unwrap();
//! let hand = HandObservation::synthetic(FingerState::PINKY, Handedness::Right, (900.0, 300.0), 100.0);
//! let out = session.process_frame(Some(&hand));
//! assert_eq!(out.slide_index, 1);
//! let summary = session.end();
//! assert_eq!(summary.slide_changes, 1);
//! ```

pub mod annotation;
pub mod debounce;
pub mod error;
pub mod landmark;
pub mod navigation;
pub mod pointer;
pub mod recognizer;
pub mod session;

pub use annotation::{AnnotationStore, Stroke};
pub use debounce::{DebounceGate, DEFAULT_COOLDOWN};
pub use error::{ConfigError, GestureError, MalformedReason};
pub use landmark::{
    classify, ClassifierConfig, Finger, FingerState, HandObservation, Handedness, Landmark,
    LANDMARK_COUNT,
};
pub use navigation::{NavigationState, Transition};
pub use pointer::{Dimensions, Point, PointerMap, VERTICAL_MARGIN};
pub use recognizer::{recognize, EffectClass, GestureSymbol, DEFAULT_THRESHOLD};
pub use session::{FrameOutput, Session, SessionConfig, SessionSummary};
