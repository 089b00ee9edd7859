//! # slide_control
//!
//! Hands-free slide presenter.  A hand in front of the camera flips slides
//! and draws freehand annotations over them, rendered in a software
//! framebuffer window.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand above threshold | Action |
//! |---|---|---|
//! | Thumb out | required | Previous slide |
//! | Pinky out | required | Next slide |
//! | Index + middle | — | Red pointer at the fingertip |
//! | Index only | — | Draw |
//! | Index + middle + ring | — | Erase the last stroke |
//!
//! Changing slides wipes the annotations of both slides involved.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: mouse and keyboard play the hand.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | mouse | Index fingertip position |
//! | `1` / hold | Index only (draw) |
//! | `2` / hold | Index + middle (pointer) |
//! | `3` / hold | Index + middle + ring (erase) |
//! | `Left` / hold | Thumb out (previous) |
//! | `Right` / hold | Pinky out (next) |
//!
//! ### Keys in every mode
//!
//! | Key | Action |
//! |---|---|
//! | `Up` / `Down` | Move the threshold line |
//! | `Home` / `End` | First / last slide |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod slides;
pub mod tracker;
pub mod visualizer;
