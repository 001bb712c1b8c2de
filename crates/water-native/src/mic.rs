// ---------------- Native microphone (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use water_core::{analyse_frame, AudioSample};

/// Loudest analysed buffer since the render loop last looked.
type Levels = Arc<Mutex<Option<AudioSample>>>;

pub struct MicInput {
    _stream: cpal::Stream,
    levels: Levels,
}

impl MicInput {
    /// Open the default input device and start streaming.
    pub fn open() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("no default input device"))?;
        let supported = device.default_input_config()?;
        let config: cpal::StreamConfig = supported.config();
        log::info!(
            "[mic] {} @ {} Hz, {} ch, {:?}",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.sample_rate.0,
            config.channels,
            supported.sample_format()
        );

        let levels: Levels = Arc::new(Mutex::new(None));
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_input::<f32>(&device, &config, Arc::clone(&levels))?,
            cpal::SampleFormat::I16 => build_input::<i16>(&device, &config, Arc::clone(&levels))?,
            cpal::SampleFormat::U16 => build_input::<u16>(&device, &config, Arc::clone(&levels))?,
            other => anyhow::bail!("unsupported input sample format {:?}", other),
        };
        stream.play()?;
        Ok(Self {
            _stream: stream,
            levels,
        })
    }

    pub fn take(&self) -> Option<AudioSample> {
        take_level(&self.levels)
    }
}

/// A panic on the audio thread poisons the lock; the slot itself is still a
/// plain `Option`, so keep using it.
fn lock_levels(levels: &Levels) -> MutexGuard<'_, Option<AudioSample>> {
    levels.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take_level(levels: &Levels) -> Option<AudioSample> {
    lock_levels(levels).take()
}

/// Keep the louder of the pending sample and `sample`.
fn store_louder(levels: &Levels, sample: AudioSample) {
    let mut slot = lock_levels(levels);
    match slot.as_ref() {
        Some(prev) if prev.amplitude >= sample.amplitude => {}
        _ => *slot = Some(sample),
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    levels: Levels,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = (config.channels as usize).max(1);
    let mut mono: Vec<f32> = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            mono.clear();
            mono.extend(data.chunks(channels).map(|frame| {
                frame.iter().map(|s| (*s).to_sample::<f32>()).sum::<f32>() / frame.len() as f32
            }));
            // No FFT on this path; frequency stays at zero.
            let sample = analyse_frame(&mono, &[]);
            store_louder(&levels, sample);
        },
        |err| log::error!("[mic] stream error: {err}"),
        None,
    )
}
