use crate::constants::{DEFAULT_POINTER_SPEED, MAX_POINTER_SPEED};
use crate::palette::Palette;
use crate::signals::PointerForce;
use glam::Vec2;

/// Map a point in surface pixels (origin top-left) to normalized pool
/// coordinates with the origin bottom-left. `None` for an empty surface.
#[inline]
pub fn normalize_canvas_point(x_px: f32, y_px: f32, width: f32, height: f32) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) || !x_px.is_finite() || !y_px.is_finite() {
        return None;
    }
    let u = (x_px / width).clamp(0.0, 1.0);
    let v = 1.0 - (y_px / height).clamp(0.0, 1.0);
    Some(Vec2::new(u, v))
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    position: Vec2,
    t_ms: f64,
}

/// Turns raw press/move/release events into [`PointerForce`] payloads.
///
/// A press starts a stroke and injects ink; moves while pressed report drag
/// speed from the previous sample; release forgets the stroke.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    down: bool,
    previous: Option<Sample>,
    palette: Palette,
}

impl PointerTracker {
    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn down(&mut self, position: Vec2, t_ms: f64) -> PointerForce {
        self.down = true;
        self.previous = Some(Sample { position, t_ms });
        PointerForce {
            position: Some(position),
            speed: Some(DEFAULT_POINTER_SPEED),
            color: Some(self.palette.current()),
            is_injection: true,
        }
    }

    /// Drag sample. Hover movement (not pressed) yields nothing.
    pub fn moved(&mut self, position: Vec2, t_ms: f64) -> Option<PointerForce> {
        if !self.down {
            return None;
        }
        let speed = match self.previous {
            Some(prev) => {
                let dt_sec = (t_ms - prev.t_ms) / 1000.0;
                if dt_sec > 0.0 {
                    (position - prev.position).length() / dt_sec as f32
                } else {
                    0.0
                }
            }
            None => DEFAULT_POINTER_SPEED,
        };
        self.previous = Some(Sample { position, t_ms });
        Some(PointerForce {
            position: Some(position),
            speed: Some(speed.min(MAX_POINTER_SPEED)),
            color: Some(self.palette.current()),
            is_injection: false,
        })
    }

    pub fn up(&mut self) {
        self.down = false;
        self.previous = None;
    }
}
