//! Layout model for recognized text floating on the pool.
//!
//! Front-ends own the actual text nodes; this module decides which phrases
//! appear, how large and bold they are, where they sit, how long they live,
//! and how the water pushes them around each frame.

use crate::constants::{POOL_MAX, POOL_MIN};
use crate::state::RenderState;
use fnv::FnvHashMap;
use glam::Vec2;
use rand::Rng;

const REPEAT_SUPPRESS_MS: f64 = 4000.0;
const RECENT_FORGET_MS: f64 = 15_000.0;
const BASE_LIFE_MS: f64 = 9000.0;
const MIN_LIFE_MS: f64 = 3500.0;
const DISSOLVE_AT: f64 = 0.35; // fraction of life before the dissolve starts
const REMOVE_GRACE_MS: f64 = 2000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayItem {
    pub text: String,
    /// Font size in surface pixels.
    pub font_px: f32,
    /// CSS-style weight, 200..=900.
    pub weight: u16,
    /// Resting center in surface pixels, origin top-left.
    pub anchor: Vec2,
    pub seed: f32,
    pub created_ms: f64,
    pub dissolve_at_ms: f64,
    pub remove_at_ms: f64,
}

/// Where to draw an item this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub center: Vec2,
    pub scale: Vec2,
    pub skew_deg: f32,
    pub float_y: f32,
    pub dissolving: bool,
}

#[derive(Clone, Debug)]
pub struct TextOverlay {
    surface: Vec2,
    recent: FnvHashMap<String, f64>,
    items: Vec<OverlayItem>,
}

impl TextOverlay {
    pub fn new(surface_px: Vec2) -> Self {
        Self {
            surface: surface_px,
            recent: FnvHashMap::default(),
            items: Vec::new(),
        }
    }

    pub fn resize(&mut self, surface_px: Vec2) {
        self.surface = surface_px;
    }

    pub fn items(&self) -> &[OverlayItem] {
        &self.items
    }

    /// Place a new phrase. `intensity` is the voice loudness in \[0, 1\] and
    /// `energy` the current water energy, which shortens the phrase's life.
    /// Returns `None` for blank text or a phrase repeated within 4 s.
    pub fn add_text<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        intensity: f32,
        energy: f32,
        now_ms: f64,
        rng: &mut R,
    ) -> Option<&OverlayItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(&last) = self.recent.get(text) {
            if now_ms - last < REPEAT_SUPPRESS_MS {
                return None;
            }
        }
        self.recent.insert(text.to_owned(), now_ms);
        self.recent.retain(|_, &mut ts| now_ms - ts <= RECENT_FORGET_MS);

        let level = if intensity.is_finite() {
            (intensity * 1.6).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let width = self.surface.x.max(0.0);
        let height = self.surface.y.max(0.0);
        let font_px = (width * (0.18 + level * 0.4)).clamp(width * 0.08, width / 4.2);
        let weight = 200 + (level * 700.0).round() as u16;

        // Center drawn from the middle half of the surface, kept inside the pool.
        let x = width * rng.gen_range(0.25..=0.75);
        let y = height * rng.gen_range(0.25..=0.75);
        let anchor = Vec2::new(
            x.clamp(width * POOL_MIN[0], width * POOL_MAX[0]),
            y.clamp(height * POOL_MIN[1], height * POOL_MAX[1]),
        );

        let energy = if energy.is_finite() {
            energy.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let life_ms = (BASE_LIFE_MS * (1.0 - energy as f64)).max(MIN_LIFE_MS);

        self.items.push(OverlayItem {
            text: text.to_owned(),
            font_px,
            weight,
            anchor,
            seed: rng.gen_range(0.0..1000.0),
            created_ms: now_ms,
            dissolve_at_ms: now_ms + life_ms * DISSOLVE_AT,
            remove_at_ms: now_ms + life_ms + REMOVE_GRACE_MS,
        });
        self.items.last()
    }

    /// Take back the most recently added item.
    pub fn pop(&mut self) -> Option<OverlayItem> {
        self.items.pop()
    }

    /// Drop items whose removal time has passed.
    pub fn retain_live(&mut self, now_ms: f64) {
        self.items.retain(|item| now_ms < item.remove_at_ms);
    }

    /// Per-item placement for this frame: a slow wobble scaled by water
    /// energy, plus a swirl about the ripple center while the pointer stirs.
    pub fn layout(&self, time_sec: f32, now_ms: f64, state: &RenderState) -> Vec<OverlayPlacement> {
        let energy = state.energy;
        let center = Vec2::new(
            state.ripple_center.x * self.surface.x,
            (1.0 - state.ripple_center.y) * self.surface.y,
        );
        let wave_amp = 4.0 + energy * 20.0;
        let wobble = 0.06 + energy * 0.14;

        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let seed = item.seed;
                let age_sec = ((now_ms - item.created_ms) / 1000.0) as f32;
                let wave = Vec2::new(
                    (time_sec * 1.3 + seed + index as f32 * 0.2).sin() * wave_amp,
                    (time_sec * 0.9 + seed * 1.3).cos() * wave_amp * 0.7,
                );

                let mut position = item.anchor + wave;
                if state.pointer_energy > 0.05 {
                    let offset = item.anchor - center;
                    let dist = offset.length() + 1e-5;
                    let falloff = (-dist / (220.0 + energy * 180.0)).exp();
                    let angle =
                        state.pointer_energy * falloff * (1.4 + 0.4 * (time_sec + seed).sin());
                    position = center + Vec2::from_angle(angle).rotate(offset) + wave;
                }

                OverlayPlacement {
                    center: position,
                    scale: Vec2::new(
                        1.0 + wobble * (time_sec * 2.0 + seed * 1.7).sin(),
                        1.0 + wobble * (time_sec * 1.6 + seed * 1.1).cos(),
                    ),
                    skew_deg: wobble * 20.0 * (time_sec * 1.1 + seed).sin(),
                    float_y: 4.0 * (time_sec * 0.7 + seed + age_sec * 0.4).sin(),
                    dissolving: now_ms >= item.dissolve_at_ms,
                }
            })
            .collect()
    }
}
