use crate::constants::{DEFAULT_KEY_STRENGTH, SHIFT_KEY_STRENGTH};
use crate::signals::KeyRipple;
use crate::simulator::FluidSimulator;
use glam::Vec2;

const KEY_ROWS: [&str; 4] = ["1234567890", "QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

pub const DELETE_KEY: &str = "Delete";

/// Position of a key on a QWERTY layout, top row at the top of the pool.
/// Anything outside the letter/digit block lands in the center.
pub fn key_position(key: &str) -> Vec2 {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let upper = c.to_ascii_uppercase();
        for (row_index, row) in KEY_ROWS.iter().enumerate() {
            if let Some(col_index) = row.find(upper) {
                let x = (col_index as f32 + 0.5) / row.len() as f32;
                let y = 1.0 - (row_index as f32 + 0.5) / KEY_ROWS.len() as f32;
                return Vec2::new(x, y);
            }
        }
    }
    Vec2::splat(0.5)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    Ripple(KeyRipple),
    DeleteMode(bool),
}

impl KeyAction {
    pub fn apply(self, sim: &mut FluidSimulator) {
        match self {
            KeyAction::Ripple(ripple) => sim.inject_key_ripple(ripple),
            KeyAction::DeleteMode(active) => sim.set_delete_mode(active),
        }
    }
}

/// Tracks the held Delete key so that delete mode follows press/release and
/// ignores auto-repeat.
#[derive(Clone, Debug, Default)]
pub struct KeyboardTracker {
    delete_held: bool,
}

impl KeyboardTracker {
    pub fn key_down(&mut self, key: &str, shift: bool, repeat: bool) -> Option<KeyAction> {
        if key == DELETE_KEY {
            if self.delete_held {
                return None;
            }
            self.delete_held = true;
            return Some(KeyAction::DeleteMode(true));
        }
        if repeat {
            return None;
        }
        let strength = if shift {
            SHIFT_KEY_STRENGTH
        } else {
            DEFAULT_KEY_STRENGTH
        };
        Some(KeyAction::Ripple(KeyRipple {
            position: Some(key_position(key)),
            strength: Some(strength),
        }))
    }

    pub fn key_up(&mut self, key: &str) -> Option<KeyAction> {
        if key == DELETE_KEY && self.delete_held {
            self.delete_held = false;
            return Some(KeyAction::DeleteMode(false));
        }
        None
    }

    pub fn delete_held(&self) -> bool {
        self.delete_held
    }
}
