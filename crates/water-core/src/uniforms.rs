use crate::constants::INK_MAX;
use crate::state::RenderState;

/// GPU layout of a [`RenderState`] for `water.wgsl`. Every field is a vec4
/// so the struct has the same layout under WGSL uniform rules and as a flat
/// `Float32Array` on the JS side.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderUniforms {
    pub ripple: [f32; 4],          // center.xy, energy, pointer energy
    pub mixes: [f32; 4],           // delete mix, purify progress, audio amplitude, audio peak
    pub base_color: [f32; 4],      // rgb, unused
    pub highlight_color: [f32; 4], // rgb, unused
    pub frame: [f32; 4],           // time seconds, width px, height px, live ink count
    pub ink_pos: [[f32; 4]; INK_MAX], // xy, age, alive flag
    pub ink_color: [[f32; 4]; INK_MAX],
}

impl RenderUniforms {
    pub fn pack(state: &RenderState, time_sec: f32, size_px: [f32; 2]) -> Self {
        let mut u: RenderUniforms = bytemuck::Zeroable::zeroed();
        u.ripple = [
            state.ripple_center.x,
            state.ripple_center.y,
            state.energy,
            state.pointer_energy,
        ];
        u.mixes = [
            state.delete_mix,
            state.purify_progress,
            state.audio_amplitude,
            state.audio_peak,
        ];
        let [r, g, b] = state.base_color.to_unit();
        u.base_color = [r, g, b, 1.0];
        let [r, g, b] = state.highlight_color.to_unit();
        u.highlight_color = [r, g, b, 1.0];

        let count = state.ink_drops.len().min(INK_MAX);
        u.frame = [time_sec, size_px[0], size_px[1], count as f32];
        for (i, drop) in state.ink_drops.iter().take(INK_MAX).enumerate() {
            u.ink_pos[i] = [drop.position.x, drop.position.y, drop.age, 1.0];
            let [r, g, b] = drop.color.to_unit();
            u.ink_color[i] = [r, g, b, 1.0];
        }
        u
    }

    /// Flat float view, e.g. for `Float32Array::from`.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}
