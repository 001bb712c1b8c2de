use crate::constants::AUDIO_RMS_GAIN;
use crate::signals::AudioSample;

/// Reduce one analyser frame to an [`AudioSample`].
///
/// `time_domain` holds samples in \[-1, 1\]; amplitude is the boosted RMS
/// capped at 1. `spectrum` holds byte magnitudes per bin; frequency is the
/// magnitude-weighted mean bin index as a fraction of the bin count. Either
/// slice may be empty.
pub fn analyse_frame(time_domain: &[f32], spectrum: &[u8]) -> AudioSample {
    let amplitude = if time_domain.is_empty() {
        0.0
    } else {
        let sum_sq: f32 = time_domain
            .iter()
            .filter(|s| s.is_finite())
            .map(|s| s * s)
            .sum();
        let rms = (sum_sq / time_domain.len() as f32).sqrt();
        (rms * AUDIO_RMS_GAIN).min(1.0)
    };

    let (weighted, total) = spectrum
        .iter()
        .enumerate()
        .fold((0.0f32, 0.0f32), |(w, t), (i, &v)| {
            (w + v as f32 * i as f32, t + v as f32)
        });
    let frequency = if total > 0.0 {
        weighted / total / spectrum.len() as f32
    } else {
        0.0
    };

    AudioSample {
        amplitude,
        frequency,
    }
}
