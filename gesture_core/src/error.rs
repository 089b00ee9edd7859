//! Error taxonomy for the gesture core.
//!
//! Per-frame failures ([`GestureError::MalformedObservation`]) are recovered
//! inside [`Session::process_frame`](crate::session::Session::process_frame)
//! and never leave the frame.  Configuration failures are returned to the
//! caller at session start (or when the threshold slider is moved out of
//! range) and are never clamped silently.

use std::fmt;

/// Why an observation could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedReason {
    /// The tracker did not deliver exactly 21 landmarks.
    LandmarkCount { found: usize },
    /// A landmark coordinate is NaN or infinite.
    NonFinite { index: usize },
    /// Wrist and middle-finger MCP coincide; the hand has no size.
    Degenerate,
}

/// Invalid session parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoSlides,
    ThresholdOutOfBounds { value: i32, min: i32, max: i32 },
    EmptyThresholdBounds { min: i32, max: i32 },
    /// Frame or canvas has a zero dimension.
    ZeroDimension { what: &'static str },
    /// Frame height leaves no room for the vertical pointer margins.
    FrameTooShort { height: u32, margin: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureError {
    MalformedObservation(MalformedReason),
    Configuration(ConfigError),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::LandmarkCount { found } => {
                write!(f, "expected 21 landmarks, found {found}")
            }
            MalformedReason::NonFinite { index } => {
                write!(f, "landmark {index} has a non-finite coordinate")
            }
            MalformedReason::Degenerate => write!(f, "hand has zero size"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoSlides => write!(f, "presentation has no slides"),
            ConfigError::ThresholdOutOfBounds { value, min, max } => {
                write!(f, "gesture threshold {value} outside {min}..={max}")
            }
            ConfigError::EmptyThresholdBounds { min, max } => {
                write!(f, "threshold bounds {min}..={max} are empty")
            }
            ConfigError::ZeroDimension { what } => write!(f, "{what} has a zero dimension"),
            ConfigError::FrameTooShort { height, margin } => write!(
                f,
                "frame height {height} must exceed twice the pointer margin ({margin})"
            ),
        }
    }
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureError::MalformedObservation(reason) => {
                write!(f, "malformed observation: {reason}")
            }
            GestureError::Configuration(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl std::error::Error for GestureError {}

impl From<ConfigError> for GestureError {
    fn from(err: ConfigError) -> Self {
        GestureError::Configuration(err)
    }
}

impl From<MalformedReason> for GestureError {
    fn from(reason: MalformedReason) -> Self {
        GestureError::MalformedObservation(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_bounds() {
        let err = GestureError::from(ConfigError::ThresholdOutOfBounds {
            value: 900,
            min: 100,
            max: 500,
        });
        let text = err.to_string();
        assert!(text.contains("900"));
        assert!(text.contains("100..=500"));
    }

    #[test]
    fn malformed_reason_converts() {
        let err: GestureError = MalformedReason::LandmarkCount { found: 3 }.into();
        assert!(matches!(
            err,
            GestureError::MalformedObservation(MalformedReason::LandmarkCount { found: 3 })
        ));
    }
}
