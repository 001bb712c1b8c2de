//! Fluid state simulator.
//!
//! Producers push pointer, keyboard, speech and microphone signals through the
//! `inject_*`/`apply_*` methods. Once per frame the host calls
//! [`FluidSimulator::advance`] and then reads [`FluidSimulator::render_state`].
//! Every injection is a quick in-place mutation that takes effect no later
//! than the next advance.

use crate::clock::{SystemClock, TimeSource};
use crate::color::Rgb;
use crate::constants::*;
use crate::ink::{InkDrop, InkField, Swirl};
use crate::signals::{AudioSample, KeyRipple, PointerForce, TextEntry};
use crate::state::{InkDropView, RenderState};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Tuning knobs. `Default` reproduces the installation's behaviour.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    pub purify_idle_delay_sec: f32,
    pub purify_duration_sec: f32,
    pub ink_lifetime_sec: f32,
    /// Clamped to `1..=INK_MAX`.
    pub ink_capacity: usize,
    pub ink_jitter: f32,
    pub swirl_gain: f32,
    pub swirl_falloff: f32,
    pub energy_decay_base: f32,
    pub energy_weights: [f32; 3], // pointer, keyboard, audio
    pub energy_smoothing: f32,
    pub delete_smoothing: f32,
    pub purify_smoothing: f32,
    pub text_energy_floor: f32,
    pub audio_peak_decay: f32,
    pub text_log_capacity: usize,
    pub default_base_color: Rgb,
    pub default_highlight_color: Rgb,
    pub default_ink_color: Rgb,
    /// Whether microphone samples count as activity for the idle timer.
    /// Front-ends that sample the microphone continuously turn this off,
    /// otherwise room noise would hold purification off forever.
    pub audio_marks_input: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            purify_idle_delay_sec: PURIFY_IDLE_DELAY_SEC,
            purify_duration_sec: PURIFY_DURATION_SEC,
            ink_lifetime_sec: INK_LIFETIME_SEC,
            ink_capacity: INK_MAX,
            ink_jitter: INK_JITTER,
            swirl_gain: SWIRL_GAIN,
            swirl_falloff: SWIRL_FALLOFF,
            energy_decay_base: ENERGY_DECAY_BASE,
            energy_weights: [
                POINTER_ENERGY_WEIGHT,
                KEYBOARD_ENERGY_WEIGHT,
                AUDIO_ENERGY_WEIGHT,
            ],
            energy_smoothing: ENERGY_SMOOTHING,
            delete_smoothing: DELETE_SMOOTHING,
            purify_smoothing: PURIFY_SMOOTHING,
            text_energy_floor: TEXT_ENERGY_FLOOR,
            audio_peak_decay: AUDIO_PEAK_DECAY,
            text_log_capacity: TEXT_LOG_CAPACITY,
            default_base_color: DEFAULT_BASE_COLOR,
            default_highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            default_ink_color: DEFAULT_INK_COLOR,
            audio_marks_input: true,
        }
    }
}

pub struct FluidSimulator {
    config: SimulatorConfig,
    clock: Box<dyn TimeSource>,
    rng: StdRng,
    state: RenderState,

    pointer_energy: f32,
    keyboard_energy: f32,
    audio_energy: f32,
    delete_active: bool,
    // Palette drift runs on fractional channels; `state` holds the rounded export.
    base_channels: Vec3,
    highlight_channels: Vec3,

    last_input_ms: f64,
    purify_target: f32,
    purifying: bool,

    ink: InkField,
    text_entries: VecDeque<TextEntry>,
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

impl FluidSimulator {
    /// Real clock and an entropy-seeded jitter source.
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_parts(config, Box::new(SystemClock::new()), StdRng::from_entropy())
    }

    /// Explicit clock and random source, for deterministic runs.
    pub fn with_parts(config: SimulatorConfig, clock: Box<dyn TimeSource>, rng: StdRng) -> Self {
        let now = clock.now_ms();
        let state = RenderState {
            base_color: config.default_base_color,
            highlight_color: config.default_highlight_color,
            ..RenderState::default()
        };
        let ink = InkField::with_capacity(config.ink_capacity);
        let base_channels = config.default_base_color.to_channels();
        let highlight_channels = config.default_highlight_color.to_channels();
        Self {
            config,
            clock,
            rng,
            state,
            pointer_energy: 0.0,
            keyboard_energy: 0.0,
            audio_energy: 0.0,
            delete_active: false,
            base_channels,
            highlight_channels,
            last_input_ms: now,
            purify_target: 0.0,
            purifying: false,
            ink,
            text_entries: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Current reading of the simulator's clock, for producers that need
    /// timestamps on the same time base.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    fn mark_input(&mut self) {
        self.last_input_ms = self.clock.now_ms();
        self.purify_target = 0.0;
    }

    fn set_ripple_center(&mut self, position: Vec2) {
        self.state.ripple_center = position.clamp(Vec2::ZERO, Vec2::ONE);
    }

    // ---------------- Injection ----------------

    /// Pointer press or drag. Without a position the event is dropped.
    pub fn inject_pointer_force(&mut self, force: PointerForce) {
        let Some(position) = force.position else {
            return;
        };
        self.mark_input();
        self.set_ripple_center(position);
        self.pointer_energy = unit(force.speed.unwrap_or(DEFAULT_POINTER_SPEED));
        if force.is_injection {
            let color = force
                .color
                .map(|c| c.base)
                .unwrap_or(self.config.default_ink_color);
            self.add_ink_drop(position, color);
        }
    }

    /// Key press. A missing position keeps the current ripple center.
    pub fn inject_key_ripple(&mut self, ripple: KeyRipple) {
        self.mark_input();
        if let Some(position) = ripple.position {
            self.set_ripple_center(position);
        }
        self.keyboard_energy = unit(ripple.strength.unwrap_or(DEFAULT_KEY_STRENGTH));
    }

    /// Log a recognized utterance and give the surface a small nudge.
    /// Blank text is ignored.
    pub fn handle_recognized_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.mark_input();
        let entry = TextEntry {
            text: text.to_owned(),
            timestamp_ms: self.clock.now_ms(),
        };
        self.text_entries.push_back(entry);
        while self.text_entries.len() > self.config.text_log_capacity.max(1) {
            self.text_entries.pop_front();
        }
        self.keyboard_energy = self.keyboard_energy.max(self.config.text_energy_floor);
    }

    /// Microphone frame. The peak hold falls by `audio_peak_decay` per call
    /// and jumps straight up on louder samples.
    pub fn apply_audio_energy(&mut self, sample: AudioSample) {
        if self.config.audio_marks_input {
            self.mark_input();
        }
        self.audio_energy = unit(sample.amplitude);
        self.state.audio_amplitude = self.audio_energy;
        self.state.audio_peak =
            unit((self.state.audio_peak * self.config.audio_peak_decay).max(self.audio_energy));
        self.state.audio_frequency = if sample.frequency.is_finite() {
            sample.frequency
        } else {
            0.0
        };
    }

    /// Toggle delete mode. Repeating the current value changes nothing and
    /// does not count as input.
    pub fn set_delete_mode(&mut self, active: bool) {
        if self.delete_active == active {
            return;
        }
        self.delete_active = active;
        self.mark_input();
    }

    /// Replace the water palette. Purification drifts it back to the
    /// configured defaults. Does not count as input.
    pub fn set_palette(&mut self, base: Rgb, highlight: Rgb) {
        self.base_channels = base.to_channels();
        self.highlight_channels = highlight.to_channels();
        self.state.base_color = base;
        self.state.highlight_color = highlight;
    }

    fn add_ink_drop(&mut self, position: Vec2, color: Rgb) {
        let now = self.clock.now_ms();
        let lifetime_ms = self.config.ink_lifetime_sec as f64 * 1000.0;
        if let Some(evicted) = self.ink.push(InkDrop::new(position, color, now, lifetime_ms)) {
            log::debug!(
                "[ink] evicted drop born at {:.0}ms to make room",
                evicted.born_at_ms
            );
        }
    }

    // ---------------- Frame step ----------------

    /// Advance by `dt` seconds. Non-finite or negative steps count as zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let now = self.clock.now_ms();

        self.update_purify_target(now);

        // Continuous-time decay: 0.4^dt leaves 40% after one second at any frame rate.
        let decay = self.config.energy_decay_base.powf(dt);
        self.pointer_energy = unit(self.pointer_energy * decay);
        self.keyboard_energy = unit(self.keyboard_energy * decay);
        self.audio_energy = unit(self.audio_energy * decay);

        // The smoothing factors below apply once per call regardless of dt.
        let [wp, wk, wa] = self.config.energy_weights;
        let blended = self.pointer_energy * wp + self.keyboard_energy * wk + self.audio_energy * wa;
        self.state.energy = unit(lerp(
            self.state.energy,
            unit(blended),
            self.config.energy_smoothing,
        ));
        self.state.pointer_energy = self.pointer_energy;

        let delete_target = if self.delete_active { 1.0 } else { 0.0 };
        self.state.delete_mix = unit(lerp(
            self.state.delete_mix,
            delete_target,
            self.config.delete_smoothing,
        ));

        self.state.purify_progress = unit(lerp(
            self.state.purify_progress,
            self.purify_target,
            self.config.purify_smoothing,
        ));

        if self.purify_target > PURIFY_COLOR_EPSILON {
            let t = (self.purify_target * dt).clamp(0.0, 1.0);
            self.base_channels = self
                .base_channels
                .lerp(self.config.default_base_color.to_channels(), t);
            self.highlight_channels = self
                .highlight_channels
                .lerp(self.config.default_highlight_color.to_channels(), t);
            self.state.base_color = Rgb::from_channels(self.base_channels);
            self.state.highlight_color = Rgb::from_channels(self.highlight_channels);
        }

        self.update_ink(now, dt);
    }

    fn update_purify_target(&mut self, now: f64) {
        let idle_sec = ((now - self.last_input_ms) / 1000.0) as f32;
        let delay = self.config.purify_idle_delay_sec;
        self.purify_target = if idle_sec > delay {
            let duration = self.config.purify_duration_sec.max(f32::EPSILON);
            unit((idle_sec - delay) / duration)
        } else {
            0.0
        };
        let purifying = self.purify_target > 0.0;
        if purifying != self.purifying {
            self.purifying = purifying;
            if purifying {
                log::debug!("[purify] idle for {:.1}s, purifying", idle_sec);
            } else {
                log::debug!("[purify] input resumed");
            }
        }
    }

    fn update_ink(&mut self, now: f64, dt: f32) {
        let swirl = Swirl {
            center: self.state.ripple_center,
            pointer_energy: self.pointer_energy,
            gain: self.config.swirl_gain,
            falloff: self.config.swirl_falloff,
        };
        self.ink
            .step(now, dt, &swirl, self.config.ink_jitter, &mut self.rng);
        self.state.ink_drops.clear();
        self.state
            .ink_drops
            .extend(self.ink.iter().map(|d| InkDropView {
                position: d.position,
                color: d.color,
                age: d.age,
            }));
    }

    // ---------------- Export ----------------

    /// Snapshot for the current frame. Rewritten in place on every advance.
    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn ink_drops(&self) -> impl Iterator<Item = &InkDrop> + '_ {
        self.ink.iter()
    }

    pub fn text_entries(&self) -> impl Iterator<Item = &TextEntry> + '_ {
        self.text_entries.iter()
    }

    pub fn delete_active(&self) -> bool {
        self.delete_active
    }

    /// Unsmoothed purification target computed by the last advance.
    pub fn purify_target(&self) -> f32 {
        self.purify_target
    }

    pub fn seconds_since_input(&self) -> f64 {
        (self.clock.now_ms() - self.last_input_ms) / 1000.0
    }

    /// Raw per-channel accumulators: pointer, keyboard, audio.
    pub fn channel_energies(&self) -> [f32; 3] {
        [self.pointer_energy, self.keyboard_energy, self.audio_energy]
    }
}
