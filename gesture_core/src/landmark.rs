//! Hand observations and the landmark classifier.
//!
//! A [`HandObservation`] is what the tracker delivers each frame: 21 landmark
//! points in camera-frame pixels (MediaPipe ordering, y grows downward), the
//! handedness label and the bounding-box center.  [`classify`] reduces it to
//! a [`FingerState`], one up/down flag per finger.

use std::fmt;

use crate::error::{GestureError, MalformedReason};

/// Landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand model).
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Handedness as labelled in the displayed (mirrored) camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }

    /// +1 when the thumb points toward +x, −1 otherwise.
    fn thumb_side(&self) -> f32 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// One tracked hand for one frame.  Never mutated by the core.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    pub handedness: Handedness,
    /// Center of the landmark bounding box, frame pixels.
    pub center: (f32, f32),
}

impl HandObservation {
    /// Build an observation, deriving the center from the bounding box.
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        let center = bounding_center(&landmarks);
        HandObservation { landmarks, handedness, center }
    }

    /// Build an observation with a tracker-supplied center.
    pub fn with_center(landmarks: Vec<Landmark>, handedness: Handedness, center: (f32, f32)) -> Self {
        HandObservation { landmarks, handedness, center }
    }

    pub fn index_tip(&self) -> Option<&Landmark> {
        self.landmarks.get(landmarks::INDEX_TIP)
    }

    /// Wrist to middle-finger MCP distance, the scale all finger tests use.
    pub fn hand_size(&self) -> Option<f32> {
        let wrist = self.landmarks.get(landmarks::WRIST)?;
        let mcp = self.landmarks.get(landmarks::MIDDLE_MCP)?;
        Some(wrist.distance_2d(mcp))
    }

    /// Shift every landmark and the center by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        HandObservation {
            landmarks: self
                .landmarks
                .iter()
                .map(|l| Landmark { x: l.x + dx, y: l.y + dy, z: l.z })
                .collect(),
            handedness: self.handedness,
            center: (self.center.0 + dx, self.center.1 + dy),
        }
    }

    /// A plausible upright hand whose classification is `fingers`.
    ///
    /// `wrist` is in frame pixels; `scale` is roughly the palm length in
    /// pixels.  Used by the keyboard simulator and by tests.
    pub fn synthetic(
        fingers: FingerState,
        handedness: Handedness,
        wrist: (f32, f32),
        scale: f32,
    ) -> Self {
        let side = handedness.thumb_side();
        let at = |dx: f32, dy: f32| Landmark::new(wrist.0 + dx * scale, wrist.1 + dy * scale);

        let mut points = Vec::with_capacity(LANDMARK_COUNT);
        points.push(at(0.0, 0.0));

        // Thumb: CMC, MCP, IP, tip.  Extended tip sits outboard of the IP joint.
        points.push(at(side * 0.30, -0.30));
        points.push(at(side * 0.50, -0.50));
        points.push(at(side * 0.65, -0.65));
        if fingers.is_up(Finger::Thumb) {
            points.push(at(side * 0.85, -0.75));
        } else {
            points.push(at(side * 0.45, -0.70));
        }

        // Index..pinky: MCP, PIP, DIP, tip.  A curled tip folds back below PIP.
        for (j, finger) in Finger::ALL[1..].iter().enumerate() {
            let bx = side * (0.30 - 0.20 * j as f32);
            points.push(at(bx, -0.90));
            if fingers.is_up(*finger) {
                points.push(at(bx, -1.20));
                points.push(at(bx, -1.40));
                points.push(at(bx, -1.60));
            } else {
                points.push(at(bx, -1.15));
                points.push(at(bx, -1.00));
                points.push(at(bx, -0.90));
            }
        }

        HandObservation::new(points, handedness)
    }
}

fn bounding_center(points: &[Landmark]) -> (f32, f32) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (min_x + (max_x - min_x) / 2.0, min_y + (max_y - min_y) / 2.0)
}

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(&self) -> usize {
        match self {
            Finger::Thumb => landmarks::THUMB_TIP,
            Finger::Index => landmarks::INDEX_TIP,
            Finger::Middle => landmarks::MIDDLE_TIP,
            Finger::Ring => landmarks::RING_TIP,
            Finger::Pinky => landmarks::PINKY_TIP,
        }
    }

    /// Joint the tip is compared against: the IP joint for the thumb,
    /// the PIP joint for the others.
    pub fn reference(&self) -> usize {
        match self {
            Finger::Thumb => landmarks::THUMB_IP,
            _ => self.tip() - 2,
        }
    }
}

/// Up/down flag per finger, thumb first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub const FIST: FingerState = FingerState([false; 5]);
    pub const THUMB: FingerState = FingerState([true, false, false, false, false]);
    pub const INDEX: FingerState = FingerState([false, true, false, false, false]);
    pub const PINKY: FingerState = FingerState([false, false, false, false, true]);
    pub const INDEX_MIDDLE: FingerState = FingerState([false, true, true, false, false]);
    pub const INDEX_MIDDLE_RING: FingerState = FingerState([false, true, true, true, false]);
    pub const OPEN: FingerState = FingerState([true; 5]);

    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        FingerState([thumb, index, middle, ring, pinky])
    }

    pub const fn from_array(flags: [bool; 5]) -> Self {
        FingerState(flags)
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// All 32 combinations, in binary order.
    pub fn all() -> impl Iterator<Item = FingerState> {
        (0u8..32).map(|bits| {
            FingerState([
                bits & 0b10000 != 0,
                bits & 0b01000 != 0,
                bits & 0b00100 != 0,
                bits & 0b00010 != 0,
                bits & 0b00001 != 0,
            ])
        })
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Fraction of hand size a tip must clear its reference joint by.
    pub tolerance: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig { tolerance: 0.05 }
    }
}

/// Reduce an observation to its finger state.
pub fn classify(obs: &HandObservation, cfg: &ClassifierConfig) -> Result<FingerState, GestureError> {
    if obs.landmarks.len() != LANDMARK_COUNT {
        return Err(MalformedReason::LandmarkCount { found: obs.landmarks.len() }.into());
    }
    if let Some(index) = obs.landmarks.iter().position(|l| !l.is_finite()) {
        return Err(MalformedReason::NonFinite { index }.into());
    }
    let size = obs.hand_size().unwrap_or(0.0);
    if size <= f32::EPSILON {
        return Err(MalformedReason::Degenerate.into());
    }
    let margin = cfg.tolerance.max(0.0) * size;
    let side = obs.handedness.thumb_side();

    let mut flags = [false; 5];
    for finger in Finger::ALL {
        let tip = obs.landmarks[finger.tip()];
        let reference = obs.landmarks[finger.reference()];
        flags[finger as usize] = match finger {
            // The thumb folds across the palm, not toward it.
            Finger::Thumb => side * (tip.x - reference.x) > margin,
            _ => reference.y - tip.y > margin,
        };
    }
    Ok(FingerState(flags))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn synthetic_hand_classifies_as_built() {
        for handedness in [Handedness::Left, Handedness::Right] {
            for fingers in FingerState::all() {
                let obs = HandObservation::synthetic(fingers, handedness, (640.0, 500.0), 100.0);
                assert_eq!(
                    classify(&obs, &cfg()).unwrap(),
                    fingers,
                    "{} hand, pose {}",
                    handedness.as_str(),
                    fingers
                );
            }
        }
    }

    #[test]
    fn thumb_direction_depends_on_handedness() {
        let right = HandObservation::synthetic(FingerState::THUMB, Handedness::Right, (600.0, 400.0), 80.0);
        // Same geometry relabelled as a left hand: the thumb now points inward.
        let relabelled = HandObservation { handedness: Handedness::Left, ..right.clone() };
        assert!(classify(&right, &cfg()).unwrap().is_up(Finger::Thumb));
        assert!(!classify(&relabelled, &cfg()).unwrap().is_up(Finger::Thumb));
    }

    #[test]
    fn wrong_landmark_count_is_malformed() {
        let mut obs = HandObservation::synthetic(FingerState::INDEX, Handedness::Right, (0.0, 0.0), 50.0);
        obs.landmarks.truncate(20);
        assert_eq!(
            classify(&obs, &cfg()),
            Err(GestureError::MalformedObservation(MalformedReason::LandmarkCount { found: 20 }))
        );
    }

    #[test]
    fn nan_landmark_is_malformed() {
        let mut obs = HandObservation::synthetic(FingerState::INDEX, Handedness::Right, (0.0, 0.0), 50.0);
        obs.landmarks[7].y = f32::NAN;
        assert_eq!(
            classify(&obs, &cfg()),
            Err(GestureError::MalformedObservation(MalformedReason::NonFinite { index: 7 }))
        );
    }

    #[test]
    fn collapsed_hand_is_degenerate() {
        let obs = HandObservation::new(vec![Landmark::new(5.0, 5.0); LANDMARK_COUNT], Handedness::Left);
        assert_eq!(
            classify(&obs, &cfg()),
            Err(GestureError::MalformedObservation(MalformedReason::Degenerate))
        );
    }

    #[test]
    fn tolerance_suppresses_marginal_extension() {
        let mut obs = HandObservation::synthetic(FingerState::FIST, Handedness::Right, (300.0, 300.0), 100.0);
        // Lift the index tip just above its PIP joint.
        let pip_y = obs.landmarks[landmarks::INDEX_PIP].y;
        obs.landmarks[landmarks::INDEX_TIP].y = pip_y - 1.0;
        assert!(!classify(&obs, &cfg()).unwrap().is_up(Finger::Index));
        let loose = ClassifierConfig { tolerance: 0.0 };
        assert!(classify(&obs, &loose).unwrap().is_up(Finger::Index));
    }

    #[test]
    fn center_is_bounding_box_middle() {
        let obs = HandObservation::new(
            vec![Landmark::new(10.0, 20.0), Landmark::new(30.0, 60.0)],
            Handedness::Right,
        );
        assert_eq!(obs.center, (20.0, 40.0));
    }

    #[test]
    fn translation_moves_center_and_tip() {
        let obs = HandObservation::synthetic(FingerState::INDEX, Handedness::Right, (100.0, 100.0), 50.0);
        let moved = obs.translated(10.0, -5.0);
        assert_eq!(moved.center, (obs.center.0 + 10.0, obs.center.1 - 5.0));
        assert_eq!(moved.index_tip().unwrap().x, obs.index_tip().unwrap().x + 10.0);
        assert_eq!(classify(&moved, &cfg()).unwrap(), FingerState::INDEX);
    }

    #[test]
    fn finger_state_display() {
        assert_eq!(FingerState::THUMB.to_string(), "10000");
        assert_eq!(FingerState::INDEX_MIDDLE_RING.to_string(), "01110");
        assert_eq!(FingerState::all().count(), 32);
    }

    #[test]
    fn tracker_center_overrides_bounding_box() {
        let base = HandObservation::synthetic(FingerState::PINKY, Handedness::Right, (900.0, 500.0), 100.0);
        let obs = HandObservation::with_center(base.landmarks.clone(), Handedness::Right, (900.0, 120.0));
        assert_eq!(obs.center, (900.0, 120.0));
        assert_ne!(obs.center, base.center);
        assert_eq!(classify(&obs, &cfg()).unwrap(), FingerState::PINKY);
    }
}
