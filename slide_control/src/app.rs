//! Top-level presentation loop.
//!
//! `AppState` owns the gesture `Session` and the status line.  `run` stages
//! the slide deck, drives the tracker → session → visualizer loop at the
//! window's frame rate, and tears everything down again on quit.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use anyhow::{Context, Result};
use gesture_core::{
    FrameOutput, GestureSymbol, HandObservation, Handedness, PointerMap, Session, SessionConfig,
    SessionSummary, Transition,
};
use tracing::{debug, info, warn};

use crate::slides::SlideDeck;
use crate::tracker::{spawn_hand_source, SimInput};
use crate::visualizer::{Jump, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Folder of PNG slides.
    pub slides:         PathBuf,
    /// Copy the slides into a per-session folder (removed on exit).
    pub stage:          bool,
    /// Where staged session folders are created.
    pub output_folder:  PathBuf,
    /// Session parameters.  `slide_count` is taken from the deck.
    pub session:        SessionConfig,
    /// Threshold change per Up/Down press, frame pixels.
    pub threshold_step: i32,
    /// Simulated hand only.
    pub handedness:     Handedness,
    /// Simulated palm length, frame pixels.
    pub hand_scale:     f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            slides:         PathBuf::from("Slides"),
            stage:          true,
            output_folder:  PathBuf::from("SlideImages"),
            session:        SessionConfig::default(),
            threshold_step: 10,
            handedness:     Handedness::Right,
            hand_scale:     90.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session: Session,
    threshold_step: i32,
    pub status: String,
}

impl AppState {
    pub fn new(session: SessionConfig, threshold_step: i32) -> Result<Self> {
        let slides = session.slide_count;
        let session = Session::start(session).context("starting gesture session")?;
        Ok(AppState {
            session,
            threshold_step,
            status: format!("Ready, {} slides", slides),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── process one tracker frame ─────────────────────────────────────────

    pub fn handle_frame(&mut self, obs: Option<&HandObservation>) -> FrameOutput {
        let slide = self.session.slide_index();
        let strokes_before = self.session.annotations().stroke_count(slide);
        let out = self.session.process_frame(obs);

        match out.transition {
            Some(Transition::Moved { to, .. }) => {
                self.status = format!("Slide {}/{}", to + 1, out.slide_count);
            }
            Some(Transition::AtBoundary { .. }) => {
                self.status = if out.gesture == GestureSymbol::SwipeLeft {
                    "Already at the first slide".to_string()
                } else {
                    "Already at the last slide".to_string()
                };
            }
            None if out.gesture == GestureSymbol::EraseLastStroke
                && out.strokes.len() < strokes_before =>
            {
                self.status = format!("Stroke erased ({} left)", out.strokes.len());
            }
            None => {}
        }
        out
    }

    // ── keyboard controls ─────────────────────────────────────────────────

    /// Move the threshold line by `steps` slider steps, clamped to the
    /// configured bounds.  Returns the new threshold.
    pub fn adjust_threshold(&mut self, steps: i32) -> i32 {
        let (min, max) = self.session.threshold_bounds();
        let target = (self.session.threshold() + steps * self.threshold_step).clamp(min, max);
        match self.session.set_threshold(target) {
            Ok(()) => self.status = format!("Threshold {}", target),
            Err(e) => warn!(error = %e, "threshold rejected"),
        }
        self.session.threshold()
    }

    pub fn jump(&mut self, jump: Jump) {
        let index = match jump {
            Jump::First => 0,
            Jump::Last => self.session.slide_count().saturating_sub(1),
        };
        if let Transition::Moved { to, .. } = self.session.jump_to(index) {
            self.status = format!("Slide {}/{}", to + 1, self.session.slide_count());
        }
    }

    pub fn finish(self) -> SessionSummary {
        self.session.end()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run a full presentation.
///
/// This is the entry point called from `main.rs`.  The staged slide folder
/// is removed on every exit path, including errors raised mid-presentation.
pub fn run(cfg: AppConfig) -> Result<SessionSummary> {
    let deck = if cfg.stage {
        SlideDeck::stage(&cfg.slides, &cfg.output_folder)?
    } else {
        SlideDeck::open(&cfg.slides)?
    };

    let presented = present(&cfg, &deck);
    let cleaned = deck.cleanup();

    let summary = presented?;
    cleaned?;
    Ok(summary)
}

fn present(cfg: &AppConfig, deck: &SlideDeck) -> Result<SessionSummary> {
    let session_cfg = SessionConfig { slide_count: deck.len(), ..cfg.session.clone() };
    let canvas = session_cfg.canvas;
    let frame = session_cfg.frame;

    let mut app = AppState::new(session_cfg, cfg.threshold_step)?;
    let slides = deck.load_all(canvas)?;
    info!(slides = slides.len(), "slides decoded");

    // ── Tracker thread + window ───────────────────────────────────────────
    let (hand_rx, sim_tx) = spawn_tracker(cfg, app.session().pointer_map());
    let mut vis = Visualizer::new(canvas, frame, sim_tx)?;

    // ── Main loop ─────────────────────────────────────────────────────────
    // One session frame per window frame; tracker frames arriving faster
    // than that are coalesced to the latest.
    let mut hand: Option<HandObservation> = None;
    let mut tracker_alive = true;
    while vis.is_open() {
        // 1. Keyboard controls (and simulated hand input)
        let controls = vis.poll_input();
        if controls.quit {
            debug!("quit requested");
            break;
        }
        if controls.threshold_steps != 0 {
            app.adjust_threshold(controls.threshold_steps);
        }
        if let Some(jump) = controls.jump {
            app.jump(jump);
        }

        // 2. Drain hand observations
        while tracker_alive {
            match hand_rx.try_recv() {
                Ok(obs) => hand = obs,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("hand tracker stopped; continuing without a hand");
                    tracker_alive = false;
                    hand = None;
                }
            }
        }

        // 3. Gesture session
        let out = app.handle_frame(hand.as_ref());

        // 4. Render
        vis.render(slides.get(out.slide_index), &out, hand.as_ref(), &app.status);
    }

    Ok(app.finish())
}

#[cfg(not(feature = "leap"))]
fn spawn_tracker(
    cfg: &AppConfig,
    pointer_map: &PointerMap,
) -> (Receiver<Option<HandObservation>>, Option<Sender<SimInput>>) {
    use crate::tracker::SimHandSource;

    let (sim_tx, sim_rx) = std::sync::mpsc::channel();
    let hand_rx = spawn_hand_source(SimHandSource {
        rx: sim_rx,
        pointer_map: *pointer_map,
        handedness: cfg.handedness,
        hand_scale: cfg.hand_scale,
    });
    (hand_rx, Some(sim_tx))
}

#[cfg(feature = "leap")]
fn spawn_tracker(
    cfg: &AppConfig,
    _pointer_map: &PointerMap,
) -> (Receiver<Option<HandObservation>>, Option<Sender<SimInput>>) {
    use crate::tracker::LeapHandSource;

    (spawn_hand_source(LeapHandSource { frame: cfg.session.frame }), None)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
