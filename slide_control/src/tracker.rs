//! Hand tracking from LeapMotion hardware or keyboard/mouse simulation.
//!
//! The public interface is a stream of `Option<HandObservation>` delivered
//! over an `mpsc` channel, one item per tracker frame (`None` = no hand).
//! The presentation loop doesn't need to know whether observations came
//! from real hardware or the simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use gesture_core::{FingerState, HandObservation, Handedness, Point, PointerMap};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver hand observations over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Option<HandObservation>>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<Option<HandObservation>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The controller looks up at a palm-down hand, so joints are projected
/// top-down into the camera frame: Leap x → frame x, Leap z (toward the
/// user) → frame y.  Reaching forward therefore "raises" the hand above the
/// threshold line.  Seen from above, a right hand's thumb lies on the −x
/// side, which the classifier calls a left hand.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub frame: gesture_core::Dimensions,
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<Option<HandObservation>>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        tracing::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                // Only the first hand is tracked.
                let obs = frame.hands().next().map(|hand| project_hand(&hand, self.frame));
                if tx.send(obs).is_err() {
                    return;
                }
            }
        }
    }
}

/// Half-width of the tracked volume along x, mm.
#[cfg(feature = "leap")]
const LEAP_RANGE_X: f32 = 200.0;
/// Half-depth of the tracked volume along z, mm.
#[cfg(feature = "leap")]
const LEAP_RANGE_Z: f32 = 150.0;

#[cfg(feature = "leap")]
fn project_hand(hand: &leaprs::Hand, frame: gesture_core::Dimensions) -> HandObservation {
    use gesture_core::Landmark;

    let project = |x: f32, z: f32| {
        let px = (x + LEAP_RANGE_X) / (2.0 * LEAP_RANGE_X) * frame.width as f32;
        let py = (z + LEAP_RANGE_Z) / (2.0 * LEAP_RANGE_Z) * frame.height as f32;
        Landmark::new(px, py)
    };

    let digits: Vec<_> = hand.digits().collect();

    // The carpal ends of the metacarpals stand in for the wrist.
    let (mut wx, mut wz) = (0.0, 0.0);
    for digit in &digits {
        let base = digit.metacarpal().prev_joint();
        wx += base.x;
        wz += base.z;
    }
    let n = digits.len().max(1) as f32;
    let mut points = vec![project(wx / n, wz / n)];

    // Per digit: metacarpal head, proximal head, intermediate head, tip.
    // For the thumb these land on CMC, MCP, IP and tip.
    for digit in &digits {
        for joint in [
            digit.metacarpal().next_joint(),
            digit.proximal().next_joint(),
            digit.intermediate().next_joint(),
            digit.distal().next_joint(),
        ] {
            points.push(project(joint.x, joint.z));
        }
    }

    let handedness = match hand.hand_type() {
        leaprs::HandType::Left => Handedness::Right,
        _ => Handedness::Left,
    };
    // The palm is a steadier hand center than the joint bounding box.
    let palm = hand.palm().position();
    let center = project(palm.x, palm.z);
    HandObservation::with_center(points, handedness, (center.x, center.y))
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Hand pose chosen with the keyboard in simulation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Fist,      // no key
    Draw,      // 1
    Pointer,   // 2
    Erase,     // 3
    ThumbOut,  // Left arrow
    PinkyOut,  // Right arrow
}

impl SimPose {
    pub fn fingers(&self) -> FingerState {
        match self {
            SimPose::Fist => FingerState::FIST,
            SimPose::Draw => FingerState::INDEX,
            SimPose::Pointer => FingerState::INDEX_MIDDLE,
            SimPose::Erase => FingerState::INDEX_MIDDLE_RING,
            SimPose::ThumbOut => FingerState::THUMB,
            SimPose::PinkyOut => FingerState::PINKY,
        }
    }
}

/// Raw input event from the presentation window.
#[derive(Clone, Debug)]
pub enum SimInput {
    /// One window frame: the held pose and the mouse position on the canvas
    /// (`None` when the mouse is outside the window, i.e. no hand).
    Frame { pose: SimPose, cursor: Option<Point> },
    Quit,
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// The mouse plays the index fingertip: each frame's cursor is mapped back
/// through the pointer remap into camera-frame pixels and a synthetic hand
/// is placed with its fingertip there.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
    pub pointer_map: PointerMap,
    pub handedness: Handedness,
    /// Palm length of the synthetic hand, frame pixels.
    pub hand_scale: f32,
}

impl SimHandSource {
    fn observe(&self, pose: SimPose, cursor: Point) -> HandObservation {
        simulate_hand(pose, cursor, &self.pointer_map, self.handedness, self.hand_scale)
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<Option<HandObservation>>) {
        for input in self.rx.iter() {
            let obs = match input {
                SimInput::Frame { pose, cursor } => cursor.map(|c| self.observe(pose, c)),
                SimInput::Quit => {
                    debug!("simulated tracker stopped");
                    return;
                }
            };
            if tx.send(obs).is_err() {
                return;
            }
        }
    }
}

/// Synthetic hand whose index fingertip remaps onto `cursor`.
pub fn simulate_hand(
    pose: SimPose,
    cursor: Point,
    map: &PointerMap,
    handedness: Handedness,
    scale: f32,
) -> HandObservation {
    let (fx, fy) = map.inverse(cursor);
    let base = HandObservation::synthetic(pose.fingers(), handedness, (0.0, 0.0), scale);
    let tip = base.index_tip().copied().unwrap_or_default();
    base.translated(fx - tip.x, fy - tip.y)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
