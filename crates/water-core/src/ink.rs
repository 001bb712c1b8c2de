//! Ink drop particles and the swirl that stirs them.

use crate::color::Rgb;
use crate::constants::{INK_MAX, SWIRL_DIST_EPSILON};
use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct InkDrop {
    pub position: Vec2,
    pub color: Rgb,
    pub born_at_ms: f64,
    pub lifetime_ms: f64,
    /// Elapsed fraction of the lifetime, refreshed on every step.
    pub age: f32,
}

impl InkDrop {
    pub fn new(position: Vec2, color: Rgb, born_at_ms: f64, lifetime_ms: f64) -> Self {
        Self {
            position: position.clamp(Vec2::ZERO, Vec2::ONE),
            color,
            born_at_ms,
            lifetime_ms,
            age: 0.0,
        }
    }

    #[inline]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_at_ms > self.lifetime_ms
    }
}

/// Rotational stirring around the ripple center, strongest near the center
/// and scaled by live pointer energy.
#[derive(Clone, Copy, Debug)]
pub struct Swirl {
    pub center: Vec2,
    pub pointer_energy: f32,
    pub gain: f32,
    pub falloff: f32,
}

impl Swirl {
    /// Angular velocity in radians per second at distance `dist`.
    #[inline]
    pub fn angular_velocity(&self, dist: f32) -> f32 {
        self.pointer_energy * (-dist * self.falloff).exp() * self.gain
    }

    /// Rotate `position` about the center for `dt` seconds, clamped to the unit square.
    pub fn rotate(&self, position: Vec2, dt: f32) -> Vec2 {
        let offset = position - self.center;
        let dist = offset.length() + SWIRL_DIST_EPSILON;
        let angle = self.angular_velocity(dist) * dt;
        let rotated = Vec2::from_angle(angle).rotate(offset);
        (self.center + rotated).clamp(Vec2::ZERO, Vec2::ONE)
    }
}

/// Insertion-ordered drop queue with a fixed capacity; the oldest drop is
/// evicted when a push overflows it.
#[derive(Clone, Debug)]
pub struct InkField {
    drops: VecDeque<InkDrop>,
    capacity: usize,
}

impl InkField {
    /// Capacity is held within `1..=INK_MAX`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, INK_MAX);
        Self {
            drops: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a drop, returning the evicted one if the field was full.
    pub fn push(&mut self, drop: InkDrop) -> Option<InkDrop> {
        self.drops.push_back(drop);
        if self.drops.len() > self.capacity {
            self.drops.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &InkDrop> + '_ {
        self.drops.iter()
    }

    /// Cull expired drops, then age, swirl and jitter the survivors.
    /// Jitter spans `jitter * (1 - age)` on each axis.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        dt: f32,
        swirl: &Swirl,
        jitter: f32,
        rng: &mut R,
    ) {
        self.drops.retain(|d| !d.is_expired(now_ms));
        for drop in self.drops.iter_mut() {
            let elapsed = (now_ms - drop.born_at_ms).max(0.0);
            drop.age = if drop.lifetime_ms > 0.0 {
                (elapsed / drop.lifetime_ms).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };
            let swirled = swirl.rotate(drop.position, dt);
            let span = jitter * (1.0 - drop.age);
            let offset = if span > 0.0 {
                Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * span
            } else {
                Vec2::ZERO
            };
            drop.position = (swirled + offset).clamp(Vec2::ZERO, Vec2::ONE);
        }
    }
}
