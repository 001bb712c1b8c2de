use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use water_core::{analyse_frame, AudioSample};
use web_sys as web;

const FFT_SIZE: u32 = 1024;

/// Microphone routed into an analyser node, sampled once per frame.
pub struct Microphone {
    // Kept alive for as long as the analyser is sampled.
    _ctx: web::AudioContext,
    _source: web::MediaStreamAudioSourceNode,
    analyser: web::AnalyserNode,
    time_domain: Vec<f32>,
    spectrum: Vec<u8>,
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

impl Microphone {
    /// Ask for microphone access. Must follow a user gesture in most browsers.
    pub async fn open() -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let devices = window.navigator().media_devices().map_err(js_err)?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_err)?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;

        let ctx = web::AudioContext::new().map_err(js_err)?;
        let _ = ctx.resume();
        let source = ctx.create_media_stream_source(&stream).map_err(js_err)?;
        let analyser = ctx.create_analyser().map_err(js_err)?;
        analyser.set_fft_size(FFT_SIZE);
        source
            .connect_with_audio_node(&analyser)
            .map_err(js_err)?;

        let bins = analyser.frequency_bin_count() as usize;
        log::info!(
            "[mic] analyser ready: fft={} bins={} rate={}",
            FFT_SIZE,
            bins,
            ctx.sample_rate()
        );
        Ok(Self {
            _ctx: ctx,
            _source: source,
            analyser,
            time_domain: vec![0.0; FFT_SIZE as usize],
            spectrum: vec![0; bins],
        })
    }

    pub fn sample(&mut self) -> AudioSample {
        self.analyser
            .get_float_time_domain_data(&mut self.time_domain);
        self.analyser.get_byte_frequency_data(&mut self.spectrum);
        analyse_frame(&self.time_domain, &self.spectrum)
    }
}
