//! Per-frame snapshot handed to renderers and overlays.
//!
//! This is the whole contract between the simulator and its consumers. The
//! simulator rewrites the same snapshot in place on every advance, so
//! consumers that need it beyond the current frame must clone it.

use crate::color::Rgb;
use crate::constants::{DEFAULT_BASE_COLOR, DEFAULT_HIGHLIGHT_COLOR, INK_MAX};
use glam::Vec2;
use smallvec::SmallVec;

/// Renderer-facing view of a live ink drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InkDropView {
    pub position: Vec2,
    pub color: Rgb,
    pub age: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub ripple_center: Vec2,
    pub delete_mix: f32,
    pub energy: f32,
    pub pointer_energy: f32,
    pub base_color: Rgb,
    pub highlight_color: Rgb,
    pub purify_progress: f32,
    pub ink_drops: SmallVec<[InkDropView; INK_MAX]>,
    pub audio_amplitude: f32,
    pub audio_peak: f32,
    pub audio_frequency: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            ripple_center: Vec2::splat(0.5),
            delete_mix: 0.0,
            energy: 0.0,
            pointer_energy: 0.0,
            base_color: DEFAULT_BASE_COLOR,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            purify_progress: 0.0,
            ink_drops: SmallVec::new(),
            audio_amplitude: 0.0,
            audio_peak: 0.0,
            audio_frequency: 0.0,
        }
    }
}

impl RenderState {
    /// Loudness to size recognized text by. Speech results land after the
    /// words were spoken, so this reads the peak hold rather than the
    /// instantaneous amplitude.
    pub fn voice_intensity(&self) -> f32 {
        self.audio_peak
    }
}
