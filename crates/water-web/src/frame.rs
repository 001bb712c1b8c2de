use crate::js;
use crate::render::GpuState;
use crate::App;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use water_core::RenderUniforms;
use web_sys as web;

pub(crate) struct FrameContext<'a> {
    pub app: Rc<RefCell<App>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState<'a>>,
    /// Optional host callback, invoked as `on_frame(state, uniforms)`.
    pub on_frame: Option<js_sys::Function>,

    pub started: Instant,
    pub last_instant: Instant,
    pub callback_failed: bool,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let time_sec = (now - self.started).as_secs_f32();

        let mut guard = self.app.borrow_mut();
        let app = &mut *guard;
        if let Some(mic) = app.mic.as_mut() {
            app.sim.apply_audio_energy(mic.sample());
        }
        app.sim.advance(dt_sec);
        let now_ms = app.sim.now_ms();
        let state = app.sim.render_state();
        app.overlay.update(time_sec, now_ms, state);

        let size = match self.gpu.as_mut() {
            Some(gpu) => {
                gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
                gpu.size()
            }
            None => [self.canvas.width() as f32, self.canvas.height() as f32],
        };
        let uniforms = RenderUniforms::pack(state, time_sec, size);

        if let Some(gpu) = self.gpu.as_mut() {
            match gpu.render(&uniforms) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                Err(e) => log::error!("render error: {:?}", e),
            }
        }

        let state_js = self
            .on_frame
            .as_ref()
            .map(|_| js::render_state_to_js(state));
        // The callback may call back into the handle.
        drop(guard);

        if let (Some(cb), Some(state_js)) = (&self.on_frame, state_js) {
            let floats = js_sys::Float32Array::from(uniforms.as_floats());
            if let Err(e) = cb.call2(&JsValue::NULL, &state_js, &floats) {
                // Report once; a broken callback would otherwise flood the console.
                if !self.callback_failed {
                    self.callback_failed = true;
                    log::error!("on_frame callback failed: {:?}", e);
                }
            }
        }
    }
}

pub(crate) fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
