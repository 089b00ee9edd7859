//! The per-presentation session: owns navigation, annotations and the
//! debounce gate, and turns one hand observation into one [`FrameOutput`].
//!
//! Each call to [`Session::process_frame`] runs to completion:
//! classify → remap → recognize → gate → mutate → tick → snapshot.
//! Nothing in here blocks or spawns; the caller decides where frames come
//! from and where snapshots go.

use tracing::{debug, info, trace};

use crate::annotation::{AnnotationStore, Stroke};
use crate::debounce::{DebounceGate, DEFAULT_COOLDOWN};
use crate::error::{ConfigError, GestureError};
use crate::landmark::{classify, ClassifierConfig, FingerState, HandObservation};
use crate::navigation::{NavigationState, Transition};
use crate::pointer::{Dimensions, Point, PointerMap};
use crate::recognizer::{recognize, EffectClass, GestureSymbol, DEFAULT_THRESHOLD};

// ════════════════════════════════════════════════════════════════════════════
// SessionConfig
// ════════════════════════════════════════════════════════════════════════════

/// Everything fixed at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub slide_count: usize,
    /// Camera frame size, pixels.
    pub frame: Dimensions,
    /// Slide canvas size, pixels.
    pub canvas: Dimensions,
    /// Initial activation line, frame pixels from the top.
    pub threshold: i32,
    /// Inclusive slider range for the threshold.
    pub threshold_bounds: (i32, i32),
    pub cooldown_frames: u32,
    pub classifier: ClassifierConfig,
    /// Pin out-of-domain fingertips to the canvas edges.
    pub clamp_pointer: bool,
}

impl SessionConfig {
    pub fn new(slide_count: usize) -> Self {
        SessionConfig { slide_count, ..Self::default() }
    }

    fn check_threshold(&self, value: i32) -> Result<(), ConfigError> {
        let (min, max) = self.threshold_bounds;
        if min > max {
            return Err(ConfigError::EmptyThresholdBounds { min, max });
        }
        if value < min || value > max {
            return Err(ConfigError::ThresholdOutOfBounds { value, min, max });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            slide_count: 1,
            frame: Dimensions::new(1280, 720),
            canvas: Dimensions::new(1280, 720),
            threshold: DEFAULT_THRESHOLD,
            threshold_bounds: (100, 500),
            cooldown_frames: DEFAULT_COOLDOWN,
            classifier: ClassifierConfig::default(),
            clamp_pointer: true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameOutput / SessionSummary
// ════════════════════════════════════════════════════════════════════════════

/// Immutable per-frame snapshot for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// 1-based frame counter.
    pub frame: u64,
    pub slide_index: usize,
    pub slide_count: usize,
    pub gesture: GestureSymbol,
    /// `None` when no usable hand was seen.
    pub fingers: Option<FingerState>,
    /// Set only while a pointer or drawing gesture is active.
    pub pointer: Option<Point>,
    /// Strokes of the current slide, draw order.
    pub strokes: Vec<Stroke>,
    /// Set when a swipe fired this frame.
    pub transition: Option<Transition>,
    pub threshold: i32,
    pub gate_blocked: bool,
}

/// Delivered by [`Session::end`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub final_slide: usize,
    pub slide_count: usize,
    pub slide_changes: u64,
    pub strokes_drawn: u64,
    pub strokes_erased: u64,
    /// Frames whose observation failed classification.
    pub skipped_frames: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    config: SessionConfig,
    pointer_map: PointerMap,
    nav: NavigationState,
    store: AnnotationStore,
    gate: DebounceGate,
    threshold: i32,
    stats: SessionSummary,
}

impl Session {
    /// Validate `config` and start at slide 0 with no annotations.
    pub fn start(config: SessionConfig) -> Result<Self, GestureError> {
        let nav = NavigationState::new(config.slide_count)?;
        config.check_threshold(config.threshold)?;
        let mut pointer_map = PointerMap::new(config.frame, config.canvas)?;
        if !config.clamp_pointer {
            pointer_map = pointer_map.unclamped();
        }

        info!(
            slides = config.slide_count,
            threshold = config.threshold,
            cooldown = config.cooldown_frames,
            "gesture session started"
        );

        Ok(Session {
            pointer_map,
            nav,
            store: AnnotationStore::new(),
            gate: DebounceGate::new(config.cooldown_frames),
            threshold: config.threshold,
            stats: SessionSummary { slide_count: config.slide_count, ..SessionSummary::default() },
            config,
        })
    }

    pub fn pointer_map(&self) -> &PointerMap {
        &self.pointer_map
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Move the activation line.  Takes effect on the next frame; values
    /// outside the slider range are rejected and the old value kept.
    pub fn set_threshold(&mut self, value: i32) -> Result<(), GestureError> {
        self.config.check_threshold(value)?;
        if value != self.threshold {
            debug!(from = self.threshold, to = value, "gesture threshold changed");
            self.threshold = value;
        }
        Ok(())
    }

    pub fn threshold_bounds(&self) -> (i32, i32) {
        self.config.threshold_bounds
    }

    pub fn slide_index(&self) -> usize {
        self.nav.index()
    }

    pub fn slide_count(&self) -> usize {
        self.nav.count()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.store.render(self.nav.index())
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    /// Jump to a slide outside the gesture path (keyboard shortcuts).
    /// Not debounced; clears annotations like a swipe does.
    pub fn jump_to(&mut self, index: usize) -> Transition {
        let slide = self.nav.index();
        self.store.close_stroke(slide);
        let transition = self.nav.jump_to(index);
        self.after_transition(transition);
        transition
    }

    /// Process one frame.  `None` means the tracker saw no hand.
    pub fn process_frame(&mut self, obs: Option<&HandObservation>) -> FrameOutput {
        self.stats.frames += 1;
        let slide = self.nav.index();

        let reading = obs.and_then(|o| self.read_hand(o));
        let (gesture, fingers, pointer) = match reading {
            Some((fingers, symbol, pointer)) => (symbol, Some(fingers), Some(pointer)),
            None => (GestureSymbol::None, None, None),
        };

        if gesture != GestureSymbol::DrawContinue {
            self.store.close_stroke(slide);
        }

        let mut transition = None;
        match gesture.effect_class() {
            Some(EffectClass::SlideChange) => {
                if self.gate.try_fire() {
                    let t = if gesture == GestureSymbol::SwipeLeft {
                        self.nav.back()
                    } else {
                        self.nav.forward()
                    };
                    self.after_transition(t);
                    transition = Some(t);
                }
            }
            Some(EffectClass::StrokeRemoval) => {
                // An empty slide has nothing to erase and does not latch the gate.
                if self.store.stroke_count(slide) > 0 && self.gate.try_fire() {
                    self.store.undo(slide);
                    self.stats.strokes_erased += 1;
                }
            }
            None => {
                if let (GestureSymbol::DrawContinue, Some(point)) = (gesture, pointer) {
                    if !self.store.is_open(slide) {
                        self.stats.strokes_drawn += 1;
                    }
                    self.store.begin_or_continue_stroke(slide, point);
                }
            }
        }

        self.gate.tick();

        trace!(
            frame = self.stats.frames,
            gesture = gesture.as_str(),
            slide = self.nav.index(),
            "frame processed"
        );

        FrameOutput {
            frame: self.stats.frames,
            slide_index: self.nav.index(),
            slide_count: self.nav.count(),
            gesture,
            fingers,
            pointer: pointer.filter(|_| gesture.shows_pointer()),
            strokes: self.strokes().to_vec(),
            transition,
            threshold: self.threshold,
            gate_blocked: self.gate.is_blocked(),
        }
    }

    /// Finish the session.  This is the point where callers release
    /// per-session resources; nothing here relies on `Drop`.
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary { final_slide: self.nav.index(), ..self.stats };
        info!(
            frames = summary.frames,
            final_slide = summary.final_slide,
            slide_changes = summary.slide_changes,
            "gesture session ended"
        );
        summary
    }

    fn read_hand(&mut self, obs: &HandObservation) -> Option<(FingerState, GestureSymbol, Point)> {
        let fingers = match classify(obs, &self.config.classifier) {
            Ok(f) => f,
            Err(err) => {
                self.stats.skipped_frames += 1;
                debug!(error = %err, "observation skipped");
                return None;
            }
        };
        let tip = obs.index_tip()?;
        let pointer = self.pointer_map.remap(tip.x, tip.y);
        let symbol = recognize(fingers, obs.center.1, self.threshold);
        Some((fingers, symbol, pointer))
    }

    fn after_transition(&mut self, transition: Transition) {
        if let Transition::Moved { from, to } = transition {
            // Strokes never survive leaving a slide.
            self.store.clear(from);
            self.store.clear(to);
            self.stats.slide_changes += 1;
            info!(slide = to + 1, of = self.nav.count(), "showing slide");
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Handedness;

    const RAISED: f32 = 200.0;
    const LOWERED: f32 = 600.0;

    /// Hand with its bounding-box center at `(900, center_y)`.
    fn hand(fingers: FingerState, center_y: f32) -> HandObservation {
        let base = HandObservation::synthetic(fingers, Handedness::Right, (0.0, 0.0), 100.0);
        base.translated(900.0 - base.center.0, center_y - base.center.1)
    }

    /// Hand whose index fingertip sits at `tip` (frame pixels).
    fn hand_at_tip(fingers: FingerState, tip: (f32, f32)) -> HandObservation {
        let base = HandObservation::synthetic(fingers, Handedness::Right, (0.0, 0.0), 100.0);
        let t = *base.index_tip().unwrap();
        base.translated(tip.0 - t.x, tip.1 - t.y)
    }

    fn session(slides: usize) -> Session {
        Session::start(SessionConfig::new(slides)).unwrap()
    }

    fn idle(s: &mut Session, frames: u32) {
        for _ in 0..frames {
            s.process_frame(None);
        }
    }

    fn swipe(s: &mut Session, fingers: FingerState) -> FrameOutput {
        s.process_frame(Some(&hand(fingers, RAISED)))
    }

    #[test]
    fn start_rejects_bad_configuration() {
        assert!(matches!(
            Session::start(SessionConfig::new(0)),
            Err(GestureError::Configuration(ConfigError::NoSlides))
        ));
        let cfg = SessionConfig { threshold: 50, ..SessionConfig::new(3) };
        assert!(matches!(
            Session::start(cfg),
            Err(GestureError::Configuration(ConfigError::ThresholdOutOfBounds { value: 50, .. }))
        ));
        let cfg = SessionConfig { threshold_bounds: (400, 200), ..SessionConfig::new(3) };
        assert!(Session::start(cfg).is_err());
    }

    #[test]
    fn right_right_left_lands_on_slide_one() {
        let mut s = session(5);
        for fingers in [FingerState::PINKY, FingerState::PINKY, FingerState::THUMB] {
            swipe(&mut s, fingers);
            idle(&mut s, DEFAULT_COOLDOWN + 1);
        }
        assert_eq!(s.slide_index(), 1);
    }

    #[test]
    fn spaced_right_swipes_saturate_at_last_slide() {
        for n in 1..=4usize {
            let mut s = session(n);
            for k in 1..=6usize {
                swipe(&mut s, FingerState::PINKY);
                idle(&mut s, DEFAULT_COOLDOWN);
                assert_eq!(s.slide_index(), k.min(n - 1));
            }
        }
    }

    #[test]
    fn double_swipe_within_cooldown_moves_once() {
        let mut s = session(5);
        s.jump_to(3);
        let first = swipe(&mut s, FingerState::THUMB);
        assert_eq!(first.transition, Some(Transition::Moved { from: 3, to: 2 }));
        idle(&mut s, 5);
        let second = swipe(&mut s, FingerState::THUMB);
        assert_eq!(second.transition, None);
        assert_eq!(s.slide_index(), 2);
    }

    #[test]
    fn holding_a_swipe_repeats_only_after_cooldown() {
        let mut s = session(10);
        for _ in 0..=DEFAULT_COOLDOWN {
            swipe(&mut s, FingerState::PINKY);
        }
        assert_eq!(s.slide_index(), 1);
        swipe(&mut s, FingerState::PINKY);
        assert_eq!(s.slide_index(), 2);
    }

    #[test]
    fn swipe_below_threshold_is_ignored() {
        let mut s = session(3);
        let out = s.process_frame(Some(&hand(FingerState::PINKY, LOWERED)));
        assert_eq!(out.gesture, GestureSymbol::None);
        assert_eq!(s.slide_index(), 0);
    }

    #[test]
    fn threshold_change_applies_next_frame() {
        let mut s = session(3);
        let lowered = hand(FingerState::PINKY, 420.0);
        assert_eq!(s.process_frame(Some(&lowered)).gesture, GestureSymbol::None);
        s.set_threshold(450).unwrap();
        let out = s.process_frame(Some(&lowered));
        assert_eq!(out.gesture, GestureSymbol::SwipeRight);
        assert_eq!(out.threshold, 450);
        assert_eq!(s.slide_index(), 1);
    }

    #[test]
    fn threshold_outside_slider_is_rejected() {
        let mut s = session(3);
        assert!(s.set_threshold(501).is_err());
        assert!(s.set_threshold(99).is_err());
        assert_eq!(s.threshold(), DEFAULT_THRESHOLD);
        assert!(s.set_threshold(100).is_ok());
    }

    #[test]
    fn three_draw_frames_make_one_stroke() {
        let mut s = session(2);
        let hands: Vec<HandObservation> = [(800.0, 255.0), (880.0, 360.0), (960.0, 465.0)]
            .into_iter()
            .map(|tip| hand_at_tip(FingerState::INDEX, tip))
            .collect();
        let expected: Vec<Point> = hands
            .iter()
            .map(|h| {
                let tip = h.index_tip().unwrap();
                s.pointer_map().remap(tip.x, tip.y)
            })
            .collect();

        for (h, p) in hands.iter().zip(&expected) {
            let out = s.process_frame(Some(h));
            assert_eq!(out.gesture, GestureSymbol::DrawContinue);
            assert_eq!(out.pointer, Some(*p));
        }
        assert!(s.annotations().is_open(0));

        let out = s.process_frame(Some(&hand(FingerState::FIST, LOWERED)));
        assert_eq!(out.pointer, None);
        assert!(!s.annotations().is_open(0));
        assert_eq!(out.strokes.len(), 1);
        assert_eq!(out.strokes[0].points(), expected.as_slice());
    }

    #[test]
    fn pointer_gesture_shows_pointer_without_drawing() {
        let mut s = session(1);
        let obs = hand_at_tip(FingerState::INDEX_MIDDLE, (960.0, 360.0));
        let out = s.process_frame(Some(&obs));
        assert_eq!(out.gesture, GestureSymbol::PointerMove);
        let p = out.pointer.unwrap();
        // Within a pixel of the canvas center; the tip is only float-close to (960, 360).
        assert!((p.x - 640).abs() <= 1 && (p.y - 360).abs() <= 1, "{:?}", p);
        assert!(out.strokes.is_empty());
    }

    #[test]
    fn unclamped_pointer_extrapolates_past_the_left_edge() {
        // x = 480 lies in the left-half dead zone of the frame.
        let obs = hand_at_tip(FingerState::INDEX, (480.0, 360.0));

        let cfg = SessionConfig { clamp_pointer: false, ..SessionConfig::new(1) };
        let mut s = Session::start(cfg).unwrap();
        let out = s.process_frame(Some(&obs));
        s.process_frame(None);
        let p = out.pointer.unwrap();
        assert!(p.x < 0 && (p.x + 320).abs() <= 1, "{:?}", p);
        assert_eq!(s.strokes()[0].points(), &[p]);

        let mut clamped = session(1);
        let out = clamped.process_frame(Some(&obs));
        assert_eq!(out.pointer.map(|p| p.x), Some(0));
    }

    #[test]
    fn lost_hand_closes_stroke() {
        let mut s = session(1);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        s.process_frame(None);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (950.0, 300.0))));
        assert_eq!(s.strokes().len(), 2);
    }

    #[test]
    fn malformed_observation_is_a_none_frame() {
        let mut s = session(1);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        let mut broken = hand(FingerState::INDEX, 300.0);
        broken.landmarks.pop();
        let out = s.process_frame(Some(&broken));
        assert_eq!(out.gesture, GestureSymbol::None);
        assert_eq!(out.fingers, None);
        assert!(!s.annotations().is_open(0));
        assert_eq!(s.end().skipped_frames, 1);
    }

    #[test]
    fn erase_removes_last_stroke_once_per_cooldown() {
        let mut s = session(1);
        for x in [700.0, 800.0, 900.0] {
            s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (x, 300.0))));
            s.process_frame(None);
        }
        assert_eq!(s.strokes().len(), 3);

        let eraser = hand(FingerState::INDEX_MIDDLE_RING, LOWERED);
        for _ in 0..10 {
            s.process_frame(Some(&eraser));
        }
        assert_eq!(s.strokes().len(), 2);
        idle(&mut s, DEFAULT_COOLDOWN);
        s.process_frame(Some(&eraser));
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn erase_blocks_swipes_and_swipes_block_erase() {
        let mut s = session(3);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        s.process_frame(Some(&hand(FingerState::INDEX_MIDDLE_RING, LOWERED)));
        assert!(s.strokes().is_empty());
        assert_eq!(swipe(&mut s, FingerState::PINKY).transition, None);
        assert_eq!(s.slide_index(), 0);

        idle(&mut s, DEFAULT_COOLDOWN);
        swipe(&mut s, FingerState::PINKY);
        assert_eq!(s.slide_index(), 1);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        s.process_frame(Some(&hand(FingerState::INDEX_MIDDLE_RING, LOWERED)));
        assert_eq!(s.strokes().len(), 1, "erase must wait for the swipe cooldown");
    }

    #[test]
    fn erase_on_empty_slide_does_not_latch() {
        let mut s = session(3);
        let out = s.process_frame(Some(&hand(FingerState::INDEX_MIDDLE_RING, LOWERED)));
        assert!(!out.gate_blocked);
        assert!(swipe(&mut s, FingerState::PINKY).transition.is_some());
    }

    #[test]
    fn boundary_swipe_still_consumes_cooldown() {
        let mut s = session(2);
        let out = swipe(&mut s, FingerState::THUMB);
        assert_eq!(out.transition, Some(Transition::AtBoundary { index: 0 }));
        assert!(out.gate_blocked);
        assert_eq!(swipe(&mut s, FingerState::PINKY).transition, None);
    }

    #[test]
    fn drawing_is_not_debounced() {
        let mut s = session(3);
        swipe(&mut s, FingerState::PINKY);
        let out = s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        assert!(out.gate_blocked);
        assert_eq!(out.strokes.len(), 1);
    }

    #[test]
    fn returning_to_a_slide_shows_no_strokes() {
        let mut s = session(3);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        assert_eq!(s.strokes().len(), 1);
        swipe(&mut s, FingerState::PINKY);
        idle(&mut s, DEFAULT_COOLDOWN);
        swipe(&mut s, FingerState::THUMB);
        assert_eq!(s.slide_index(), 0);
        assert!(s.strokes().is_empty());
        assert_eq!(s.annotations().stroke_count(1), 0);
    }

    #[test]
    fn jump_clears_annotations() {
        let mut s = session(4);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        assert!(s.jump_to(3).moved());
        assert!(s.jump_to(0).moved());
        assert!(s.strokes().is_empty());
    }

    #[test]
    fn end_reports_activity() {
        let mut s = session(4);
        swipe(&mut s, FingerState::PINKY);
        idle(&mut s, DEFAULT_COOLDOWN);
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (900.0, 300.0))));
        s.process_frame(Some(&hand_at_tip(FingerState::INDEX, (910.0, 300.0))));
        let summary = s.end();
        assert_eq!(summary.frames, 1 + DEFAULT_COOLDOWN as u64 + 2);
        assert_eq!(summary.final_slide, 1);
        assert_eq!(summary.slide_count, 4);
        assert_eq!(summary.slide_changes, 1);
        assert_eq!(summary.strokes_drawn, 1);
    }
}
