use crate::color::Rgb;

// Shared tuning constants for the water simulation and both front-ends.

// Idle purification
pub const PURIFY_IDLE_DELAY_SEC: f32 = 20.0; // quiet time before the pool starts cleaning itself
pub const PURIFY_DURATION_SEC: f32 = 40.0; // ramp length from 0 to fully purified
pub const PURIFY_COLOR_EPSILON: f32 = 0.01; // palette only drifts above this progress

// Energy accumulators
pub const ENERGY_DECAY_BASE: f32 = 0.4; // fraction of energy left after one second
pub const POINTER_ENERGY_WEIGHT: f32 = 0.5;
pub const KEYBOARD_ENERGY_WEIGHT: f32 = 0.3;
pub const AUDIO_ENERGY_WEIGHT: f32 = 0.2;
pub const TEXT_ENERGY_FLOOR: f32 = 0.3; // keyboard energy bump on recognized speech
pub const AUDIO_PEAK_DECAY: f32 = 0.9; // peak hold falloff per audio sample

// Per-advance smoothing factors (applied once per call, not scaled by dt)
pub const ENERGY_SMOOTHING: f32 = 0.15;
pub const DELETE_SMOOTHING: f32 = 0.08;
pub const PURIFY_SMOOTHING: f32 = 0.1;

// Ink drops
pub const INK_MAX: usize = 16; // hard capacity, also the shader array length
pub const INK_LIFETIME_SEC: f32 = 14.0;
pub const INK_JITTER: f32 = 0.02; // jitter span for a newborn drop
pub const SWIRL_GAIN: f32 = 2.5; // radians per second at the ripple center, full energy
pub const SWIRL_FALLOFF: f32 = 6.0; // exponential falloff per normalized unit of distance
pub const SWIRL_DIST_EPSILON: f32 = 1e-5;

// Recognized text log
pub const TEXT_LOG_CAPACITY: usize = 256;

// Producer defaults
pub const DEFAULT_POINTER_SPEED: f32 = 0.2; // speed reported for a fresh press
pub const MAX_POINTER_SPEED: f32 = 3.0; // normalized units per second
pub const DEFAULT_KEY_STRENGTH: f32 = 0.5;
pub const SHIFT_KEY_STRENGTH: f32 = 0.9;
pub const AUDIO_RMS_GAIN: f32 = 10.0; // rms of ~0.1 already reads as full amplitude

// Default palette
pub const DEFAULT_BASE_COLOR: Rgb = Rgb::new(0x6f, 0xdc, 0xff);
pub const DEFAULT_HIGHLIGHT_COLOR: Rgb = Rgb::new(0xf7, 0xfe, 0xff);
pub const DEFAULT_INK_COLOR: Rgb = Rgb::new(0xff, 0xa5, 0x00);

// Pool rectangle in normalized screen space (shared by the shader and text overlay)
pub const POOL_MIN: [f32; 2] = [0.08, 0.16];
pub const POOL_MAX: [f32; 2] = [0.92, 0.88];
