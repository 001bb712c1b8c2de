//! Normalized payloads delivered by input producers.
//!
//! Producers are trusted but may deliver partial events, so most fields are
//! optional. Missing data never raises an error inside the simulator.

use crate::palette::InkColor;
use glam::Vec2;

/// Pointer drag or press. `speed` is in normalized units per second and is
/// clamped to \[0, 1\] on injection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerForce {
    pub position: Option<Vec2>,
    pub speed: Option<f32>,
    pub color: Option<InkColor>,
    /// True for the press that starts a stroke; spawns an ink drop.
    pub is_injection: bool,
}

/// Key press mapped onto the pool surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyRipple {
    pub position: Option<Vec2>,
    pub strength: Option<f32>,
}

/// One microphone analysis frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioSample {
    /// Loudness in \[0, 1\].
    pub amplitude: f32,
    /// Spectral centroid as a fraction of the analysed band. Informational.
    pub frequency: f32,
}

/// Recognized utterance with the time it reached the simulator.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEntry {
    pub text: String,
    pub timestamp_ms: f64,
}
