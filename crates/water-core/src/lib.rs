pub mod audio;
pub mod clock;
pub mod color;
pub mod constants;
pub mod ink;
pub mod keyboard;
pub mod overlay;
pub mod palette;
pub mod pointer;
pub mod signals;
pub mod simulator;
pub mod state;
pub mod uniforms;
pub mod voice;

pub static WATER_WGSL: &str = include_str!("../shaders/water.wgsl");

pub use audio::analyse_frame;
pub use clock::{ManualClock, SystemClock, TimeSource};
pub use color::{ColorError, Rgb};
pub use constants::*;
pub use ink::{InkDrop, InkField, Swirl};
pub use keyboard::{key_position, KeyAction, KeyboardTracker};
pub use overlay::{OverlayItem, OverlayPlacement, TextOverlay};
pub use palette::{InkColor, Palette, COLOR_POOL};
pub use pointer::{normalize_canvas_point, PointerTracker};
pub use signals::{AudioSample, KeyRipple, PointerForce, TextEntry};
pub use simulator::{FluidSimulator, SimulatorConfig};
pub use state::{InkDropView, RenderState};
pub use uniforms::RenderUniforms;
pub use voice::TranscriptFilter;
