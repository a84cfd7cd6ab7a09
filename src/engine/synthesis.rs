//! Spectrogram to signal.
//!
//! Each image row is read back as an amplitude envelope and drives a
//! carrier placed at the row's band. Sine synthesis builds one spectrum and
//! transforms it once; noise synthesis modulates band-filtered pink noise
//! in the time domain.

use std::f64::consts::{FRAC_PI_2, PI};

use rand::Rng;
use rustfft::num_complex::Complex;

use super::progress::{report_band, CancelToken, Progress};
use crate::audio::noise::{pink_noise_spectrum, NOISE_LOOP_SECS};
use crate::audio::window::blackman_integral;
use crate::audio::{resample, FftTransform, Resampler, SincResampler, Transform};
use crate::canvas::SpectrogramImage;
use crate::error::{Result, SpectrogramError};
use crate::filterbank::Filterbank;
use crate::palette::Palette;
use crate::params::{ParameterSet, SynthesisMode};

/// Phase steps of a carrier at a quarter of its sample rate
const CARRIER_PHASES: usize = 4;

/// Scale `signal` so its largest absolute sample is 1.
///
/// A silent signal is left untouched.
pub fn normalize_peak(signal: &mut [f32]) {
    let peak = signal.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    if peak == 0.0 {
        return;
    }
    for s in signal.iter_mut() {
        *s /= peak;
    }
}

/// Turns spectrogram images back into signals.
pub struct SynthesisEngine<T = FftTransform, R = SincResampler> {
    params: ParameterSet,
    palette: Palette,
    transform: T,
    resampler: R,
}

impl SynthesisEngine {
    pub fn new(params: ParameterSet, palette: Palette) -> Self {
        Self::with_services(params, palette, FftTransform::new(), SincResampler::new())
    }
}

impl<T: Transform, R: Resampler> SynthesisEngine<T, R> {
    pub fn with_services(params: ParameterSet, palette: Palette, transform: T, resampler: R) -> Self {
        Self {
            params,
            palette,
            transform,
            resampler,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn set_params(&mut self, params: ParameterSet) {
        self.params = params;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Synthesize a signal from `image`, peak-normalized to 1.
    ///
    /// `rng` supplies carrier phases and noise; a seeded generator makes
    /// the output reproducible. Returns `Ok(None)` if cancelled.
    pub fn synthesize<G: Rng>(
        &mut self,
        image: &SpectrogramImage,
        samplerate: u32,
        mode: SynthesisMode,
        rng: &mut G,
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<Option<Vec<f32>>> {
        let params = self.params.clone();
        if samplerate == 0 {
            return Err(SpectrogramError::InvalidSampleRate);
        }
        params.validate_shape()?;
        if image.canvas.is_empty() {
            return Err(SpectrogramError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }

        log::info!(
            "{} synthesis of {} x {} image at {} Hz",
            mode,
            image.width(),
            image.height(),
            samplerate
        );
        progress.on_progress(0);
        let signal = match mode {
            SynthesisMode::Sine => self.synthesize_sine(&params, image, samplerate, rng, progress, cancel)?,
            SynthesisMode::Noise => self.synthesize_noise(&params, image, samplerate, rng, progress, cancel)?,
        };
        let Some(mut signal) = signal else {
            log::info!("Synthesis cancelled");
            return Ok(None);
        };

        normalize_peak(&mut signal);
        progress.on_progress(100);
        Ok(Some(signal))
    }

    /// Linear amplitudes of band `band`, one per column.
    fn envelope_from_image(&self, params: &ParameterSet, image: &SpectrogramImage, band: u32) -> Vec<f32> {
        let y = image.height() - 1 - band;
        (0..image.width())
            .map(|x| {
                let intensity = self.palette.get_intensity(image.canvas.pixel(x, y));
                params.intensity_axis.from_intensity(intensity)
            })
            .collect()
    }

    /// Every band becomes a tone at its center frequency, amplitude
    /// modulated by the row. All tones share one output spectrum.
    fn synthesize_sine<G: Rng>(
        &mut self,
        params: &ParameterSet,
        image: &SpectrogramImage,
        samplerate: u32,
        rng: &mut G,
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<Option<Vec<f32>>> {
        let samples = params.synthesis_len(image.width(), samplerate);
        let mut spectrum = vec![Complex::new(0.0f32, 0.0); samples / 2 + 1];
        let scale = 2.0 * spectrum.len() as f64 / samplerate as f64;
        let filterbank = Filterbank::new(params, scale);
        let height = image.height() as usize;

        for band in 0..height {
            if cancel.take() {
                return Ok(None);
            }
            report_band(progress, band, height - 1, 0, 100);

            let envelope = self.envelope_from_image(params, image, band as u32);
            let phase = rng.gen_range(-PI..=PI);
            if envelope.iter().all(|&a| a == 0.0) {
                continue;
            }

            // Carrier at a quarter of the sample rate, two samples per pixel
            let mut carrier = vec![0.0f32; envelope.len() * 2];
            for step in 0..CARRIER_PHASES {
                let level = (step as f64 * FRAC_PI_2 + phase).cos() as f32;
                for i in (step..carrier.len()).step_by(CARRIER_PHASES) {
                    carrier[i] = envelope[i / 2] * level;
                }
            }

            // Taper the band edges so neighbouring bands crossfade
            let mut band_spectrum = self.transform.forward(&carrier)?;
            let last = (band_spectrum.len() - 1).max(1) as f64;
            for (i, bin) in band_spectrum.iter_mut().enumerate() {
                *bin *= blackman_integral(i as f64 / last) as f32;
            }

            let offset = filterbank.center(band) as isize - (band_spectrum.len() / 2) as isize;
            for (i, bin) in band_spectrum.iter().enumerate() {
                let target = offset + i as isize;
                if target > 0 && (target as usize) < spectrum.len() {
                    spectrum[target as usize] += *bin;
                }
            }
        }

        // An odd length loses one sample to the half spectrum
        let mut signal = self.transform.inverse(&spectrum)?;
        signal.resize(samples, 0.0);
        Ok(Some(signal))
    }

    /// Every band becomes a slice of one shared pink noise loop, amplitude
    /// modulated by the row.
    fn synthesize_noise<G: Rng>(
        &mut self,
        params: &ParameterSet,
        image: &SpectrogramImage,
        samplerate: u32,
        rng: &mut G,
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<Option<Vec<f32>>> {
        let samples = params.synthesis_len(image.width(), samplerate);
        let noise = pink_noise_spectrum((samplerate * NOISE_LOOP_SECS) as usize, rng);
        let scale = 2.0 * noise.len() as f64 / samplerate as f64;
        let filterbank = Filterbank::new(params, scale);
        let top_index = ((params.maxfreq * scale) as usize).min(noise.len());
        let height = image.height() as usize;

        let mut output = vec![0.0f32; samples];
        for band in 0..height {
            if cancel.take() {
                return Ok(None);
            }
            report_band(progress, band, height - 1, 0, 100);

            let envelope = self.envelope_from_image(params, image, band as u32);
            if envelope.iter().all(|&a| a == 0.0) {
                continue;
            }

            // Rectangular band cut, no window
            let range = filterbank.band(band);
            let start = range.start.min(noise.len());
            let end = range.end.min(top_index).max(start);
            let mut filtered = vec![Complex::new(0.0f32, 0.0); noise.len()];
            filtered[start..end].copy_from_slice(&noise[start..end]);

            let carrier = self.transform.inverse(&filtered)?;
            if carrier.is_empty() {
                continue;
            }
            let envelope = resample(&mut self.resampler, &envelope, samples)?;
            for (i, (out, amplitude)) in output.iter_mut().zip(&envelope).enumerate() {
                *out += amplitude * carrier[i % carrier.len()];
            }
        }

        Ok(Some(output))
    }
}
