mod mic;
mod render;

use glam::Vec2;
use std::time::Instant;
use water_core::{
    normalize_canvas_point, FluidSimulator, KeyboardTracker, PointerTracker, RenderUniforms,
    SimulatorConfig,
};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

/// Map a winit key to the producer's key name. Only printable keys and
/// Delete reach the simulator.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::Delete) => Some(water_core::keyboard::DELETE_KEY),
        Key::Character(s) => Some(s.as_str()),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Water (native)")
        .build(&event_loop)?;
    let mut gpu = pollster::block_on(render::GpuState::new(&window))?;

    // The microphone streams continuously, so it must not hold off purification.
    let mut sim = FluidSimulator::new(SimulatorConfig {
        audio_marks_input: false,
        ..SimulatorConfig::default()
    });
    let mut pointer = PointerTracker::default();
    let mut keyboard = KeyboardTracker::default();
    let microphone = match mic::MicInput::open() {
        Ok(m) => Some(m),
        Err(e) => {
            log::warn!("[mic] disabled: {e:#}");
            None
        }
    };

    let mut cursor: Option<Vec2> = None;
    let mut shift = false;
    let started = Instant::now();
    let mut last_frame = started;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::ModifiersChanged(modifiers) => shift = modifiers.state().shift_key(),
            WindowEvent::CursorMoved { position, .. } => {
                let size = gpu.window.inner_size();
                let at = normalize_canvas_point(
                    position.x as f32,
                    position.y as f32,
                    size.width as f32,
                    size.height as f32,
                );
                cursor = at;
                if let Some(force) = at.and_then(|p| pointer.moved(p, sim.now_ms())) {
                    sim.inject_pointer_force(force);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                cursor = None;
                pointer.up();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    if let Some(p) = cursor {
                        let force = pointer.down(p, sim.now_ms());
                        sim.inject_pointer_force(force);
                    }
                }
                ElementState::Released => pointer.up(),
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    elwt.exit();
                    return;
                }
                let Some(name) = key_name(&event.logical_key) else {
                    return;
                };
                let action = match event.state {
                    ElementState::Pressed => keyboard.key_down(name, shift, event.repeat),
                    ElementState::Released => keyboard.key_up(name),
                };
                if let Some(action) = action {
                    action.apply(&mut sim);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32();
                last_frame = now;

                if let Some(sample) = microphone.as_ref().and_then(|m| m.take()) {
                    sim.apply_audio_energy(sample);
                }
                sim.advance(dt);
                let uniforms = RenderUniforms::pack(
                    sim.render_state(),
                    (now - started).as_secs_f32(),
                    gpu.size(),
                );
                match gpu.render(&uniforms) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.resize(gpu.window.inner_size())
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }
            _ => {}
        },
        Event::AboutToWait => gpu.window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
