#![cfg(target_arch = "wasm32")]
mod audio;
mod dom;
mod events;
mod frame;
mod js;
mod overlay;
mod render;

use audio::Microphone;
use instant::Instant;
use overlay::DomOverlay;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use water_core::{
    FluidSimulator, KeyboardTracker, PointerTracker, Rgb, SimulatorConfig, TranscriptFilter,
};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("water-web loaded");
    Ok(())
}

/// Everything the event handlers and the frame loop share.
pub(crate) struct App {
    pub sim: FluidSimulator,
    pub pointer: PointerTracker,
    pub keyboard: KeyboardTracker,
    pub transcripts: TranscriptFilter,
    pub overlay: DomOverlay,
    pub rng: StdRng,
    pub mic: Option<Microphone>,
}

impl App {
    fn submit_text(&mut self, raw: &str) {
        let Some(text) = self.transcripts.accept(raw) else {
            return;
        };
        log::info!("[voice] {}", text);
        self.sim.handle_recognized_text(&text);
        let now_ms = self.sim.now_ms();
        let state = self.sim.render_state();
        let (intensity, energy) = (state.voice_intensity(), state.energy);
        self.overlay
            .add_text(&text, intensity, energy, now_ms, &mut self.rng);
    }
}

fn to_js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

fn parse_color(hex: &str) -> Result<Rgb, JsValue> {
    hex.parse::<Rgb>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Handle returned to the host page. Speech recognition lives on the JS
/// side and feeds transcripts in through [`WaterHandle::submit_text`].
#[wasm_bindgen]
pub struct WaterHandle {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl WaterHandle {
    #[wasm_bindgen(js_name = submitText)]
    pub fn submit_text(&self, text: &str) {
        self.app.borrow_mut().submit_text(text);
    }

    #[wasm_bindgen(js_name = setColorIndex)]
    pub fn set_color_index(&self, index: i32) {
        self.app
            .borrow_mut()
            .pointer
            .palette_mut()
            .set_color_index(index);
    }

    /// `None` (or `undefined`) clears the custom color.
    #[wasm_bindgen(js_name = setCustomColor)]
    pub fn set_custom_color(&self, hex: Option<String>) -> Result<(), JsValue> {
        let color = hex.as_deref().map(parse_color).transpose()?;
        self.app
            .borrow_mut()
            .pointer
            .palette_mut()
            .set_custom_color(color);
        Ok(())
    }

    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&self, base: &str, highlight: &str) -> Result<(), JsValue> {
        let (base, highlight) = (parse_color(base)?, parse_color(highlight)?);
        self.app.borrow_mut().sim.set_palette(base, highlight);
        Ok(())
    }

    #[wasm_bindgen(js_name = setDeleteMode)]
    pub fn set_delete_mode(&self, active: bool) {
        self.app.borrow_mut().sim.set_delete_mode(active);
    }

    /// Resolves once the analyser is running; rejects if access is denied.
    #[wasm_bindgen(js_name = enableMicrophone)]
    pub fn enable_microphone(&self) -> js_sys::Promise {
        let app = self.app.clone();
        future_to_promise(async move {
            if app.borrow().mic.is_some() {
                return Ok(JsValue::TRUE);
            }
            let mic = Microphone::open().await.map_err(to_js_error)?;
            app.borrow_mut().mic = Some(mic);
            log::info!("[mic] enabled");
            Ok(JsValue::TRUE)
        })
    }

    #[wasm_bindgen(js_name = renderState)]
    pub fn render_state(&self) -> JsValue {
        js::render_state_to_js(self.app.borrow().sim.render_state())
    }
}

/// Attach the water to `canvas_id` and start animating. `on_frame`, if
/// given, receives the render state and the packed uniforms every frame.
#[wasm_bindgen(js_name = startApp)]
pub async fn start_app(
    canvas_id: String,
    on_frame: Option<js_sys::Function>,
) -> Result<WaterHandle, JsValue> {
    init(&canvas_id, on_frame).await.map_err(to_js_error)
}

async fn init(canvas_id: &str, on_frame: Option<js_sys::Function>) -> anyhow::Result<WaterHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::find_canvas(&document, canvas_id)?;
    dom::sync_canvas_backing_size(&canvas);
    let layer = dom::create_text_layer(&document, &canvas)?;

    // The microphone is sampled every frame, so it must not hold off purification.
    let sim = FluidSimulator::new(SimulatorConfig {
        audio_marks_input: false,
        ..SimulatorConfig::default()
    });
    let app = Rc::new(RefCell::new(App {
        sim,
        pointer: PointerTracker::default(),
        keyboard: KeyboardTracker::default(),
        transcripts: TranscriptFilter::default(),
        overlay: DomOverlay::new(layer, dom::css_size(&canvas)),
        rng: StdRng::from_entropy(),
        mic: None,
    }));

    events::wire_resize(&canvas, &app);
    events::wire_pointer(&canvas, &app);
    events::wire_keyboard(&app);

    // Leak a canvas clone to satisfy the 'static lifetime of the surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let gpu = match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    };

    let now = Instant::now();
    frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
        app: app.clone(),
        canvas,
        gpu,
        on_frame,
        started: now,
        last_instant: now,
        callback_failed: false,
    })));
    log::info!("[app] started on #{}", canvas_id);
    Ok(WaterHandle { app })
}
