//! Signal to spectrogram.
//!
//! The whole signal is transformed once. Each filterbank band is cut out of
//! the spectrum, windowed, and turned into an amplitude envelope by
//! quadrature detection; the envelope, resampled to the image width,
//! becomes one row.

use std::ops::Range;

use rustfft::num_complex::Complex;

use super::progress::{report_band, CancelToken, Progress};
use crate::audio::{resample, FftTransform, Resampler, SincResampler, Transform};
use crate::canvas::SpectrogramImage;
use crate::error::{Result, SpectrogramError};
use crate::filterbank::{freq_to_cents, Filterbank};
use crate::palette::Palette;
use crate::params::{AxisScale, ParameterSet, Window};

/// Progress at the end of the transform phase
const TRANSFORM_DONE_PERCENT: u32 = 5;
/// Progress at the end of band processing
const BANDS_DONE_PERCENT: u32 = 93;

/// Normalized band magnitudes, one row per band, lowest band first.
///
/// Values lie in [0, 1] and the loudest cell of a non-silent grid is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGrid {
    rows: Vec<Vec<f32>>,
}

impl BandGrid {
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    /// Number of bands
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn max(&self) -> f32 {
        self.rows
            .iter()
            .flatten()
            .fold(0.0f32, |max, &v| max.max(v.abs()))
    }

    /// Band with the largest value in `column`
    pub fn loudest_band_at(&self, column: usize) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(band, row)| row.get(column).map(|&v| (band, v)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(band, _)| band)
    }

    /// Band with the largest sum over all columns
    pub fn loudest_band(&self) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .map(|(band, row)| (band, row.iter().sum::<f32>()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(band, _)| band)
    }

    /// Scale every cell by one global maximum.
    ///
    /// Rows share the divisor so relative loudness between bands survives.
    fn normalize(&mut self) {
        let max = self.max();
        if max == 0.0 {
            return;
        }
        for v in self.rows.iter_mut().flatten() {
            *v = v.abs() / max;
        }
    }
}

/// Turns signals into spectrogram images.
///
/// Holds the parameters and palette used for every call until replaced.
/// One call at a time per engine; use separate engines for parallel work.
pub struct AnalysisEngine<T = FftTransform, R = SincResampler> {
    params: ParameterSet,
    palette: Palette,
    transform: T,
    resampler: R,
}

impl AnalysisEngine {
    pub fn new(params: ParameterSet, palette: Palette) -> Self {
        Self::with_services(params, palette, FftTransform::new(), SincResampler::new())
    }
}

impl<T: Transform, R: Resampler> AnalysisEngine<T, R> {
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

    /// Analyze `signal` and draw the spectrogram.
    ///
    /// Returns `Ok(None)` if `cancel` was triggered before the last band.
    pub fn to_image(
        &mut self,
        signal: &[f32],
        samplerate: u32,
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<Option<SpectrogramImage>> {
        let Some(grid) = self.analyze(signal, samplerate, progress, cancel)? else {
            return Ok(None);
        };
        progress.on_status("Generating image");
        progress.on_progress(99);
        let image = self.render(&grid)?;
        progress.on_progress(100);
        Ok(Some(image))
    }

    /// Compute the normalized band magnitudes of `signal`.
    pub fn analyze(
        &mut self,
        signal: &[f32],
        samplerate: u32,
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<Option<BandGrid>> {
        let params = self.params.clone();
        params.validate(samplerate)?;

        progress.on_status("Transforming input");
        progress.on_progress(0);
        let spectrum = self.transform.forward(signal)?;

        let width = params.image_width(spectrum.len(), samplerate);
        if width == 0 {
            return Err(SpectrogramError::SignalTooShort {
                samples: signal.len(),
            });
        }

        // Spectrum bins per Hz
        let scale = 2.0 * spectrum.len() as f64 / samplerate as f64;
        let filterbank = Filterbank::new(&params, scale);
        let estimate = filterbank.num_bands_est(params.maxfreq);
        let top_index = ((params.maxfreq * scale) as usize).min(spectrum.len());
        progress.on_progress(TRANSFORM_DONE_PERCENT);

        let mut rows = Vec::with_capacity(estimate);
        for index in 0usize.. {
            if cancel.take() {
                log::info!("Analysis cancelled at band {}", index);
                return Ok(None);
            }
            report_band(
                progress,
                index,
                estimate,
                TRANSFORM_DONE_PERCENT,
                BANDS_DONE_PERCENT,
            );

            let band = filterbank.band(index);
            if band.start > top_index {
                break;
            }

            let mut filtered = extract_band(&spectrum, band.clone(), top_index);
            apply_window(
                &mut filtered,
                band.start,
                scale,
                params.window,
                params.frequency_axis,
            );
            let envelope = detect_envelope(&mut self.transform, &filtered)?;
            rows.push(resample(&mut self.resampler, &envelope, width)?);
        }

        if rows.is_empty() {
            return Err(SpectrogramError::NoBands);
        }
        log::info!("Spectrogram size: {} x {}", width, rows.len());

        let mut grid = BandGrid { rows };
        grid.normalize();
        Ok(Some(grid))
    }

    /// Draw a normalized grid with the current palette and parameters.
    ///
    /// The lowest band ends up in the bottom image row.
    pub fn render(&self, grid: &BandGrid) -> Result<SpectrogramImage> {
        let params = &self.params;
        let (width, height) = (grid.width() as u32, grid.height() as u32);
        let mut canvas = self.palette.make_canvas(width, height);

        for (band, row) in grid.rows().iter().enumerate() {
            let y = height - 1 - band as u32;
            for (x, &magnitude) in row.iter().enumerate() {
                let intensity = params
                    .correction
                    .apply(params.intensity_axis.to_intensity(magnitude));
                canvas.put_pixel(x as u32, y, self.palette.get_color(intensity))?;
            }
        }

        Ok(SpectrogramImage::new(canvas, Some(params.serialize())))
    }
}

/// Copy `band` out of the spectrum, zero above `top_index`.
fn extract_band(spectrum: &[Complex<f32>], band: Range<usize>, top_index: usize) -> Vec<Complex<f32>> {
    let mut filtered = vec![Complex::new(0.0, 0.0); band.len()];
    let end = band.end.min(top_index).min(spectrum.len());
    if end > band.start {
        filtered[..end - band.start].copy_from_slice(&spectrum[band.start..end]);
    }
    filtered
}

/// Window a band in place. `low` is the spectrum index of its first bin.
///
/// On a logarithmic axis positions are measured in cents so the window is
/// symmetric in pitch rather than in bins.
fn apply_window(band: &mut [Complex<f32>], low: usize, scale: f64, window: Window, axis: AxisScale) {
    let n = band.len();
    if n < 2 || window == Window::Rectangular {
        return;
    }

    // Cents are undefined at 0 Hz
    if axis == AxisScale::Linear || low == 0 {
        for (i, bin) in band.iter_mut().enumerate() {
            *bin *= window.coefficient(i as f64 / (n - 1) as f64) as f32;
        }
        return;
    }

    let log_low = freq_to_cents(low as f64 / scale);
    let log_high = freq_to_cents((low + n - 1) as f64 / scale);
    for (i, bin) in band.iter_mut().enumerate() {
        let position = (freq_to_cents((low + i) as f64 / scale) - log_low) / (log_high - log_low);
        *bin *= window.coefficient(position) as f32;
    }
}

/// Amplitude envelope of a frequency-isolated band.
///
/// The band and a copy rotated by 90 degrees are both brought back to the
/// time domain; their pointwise magnitude is the envelope.
fn detect_envelope<T: Transform + ?Sized>(transform: &mut T, band: &[Complex<f32>]) -> Result<Vec<f32>> {
    if band.len() < 2 {
        return Ok(vec![0.0]);
    }
    let shifted: Vec<Complex<f32>> = band.iter().map(|c| Complex::new(c.im, -c.re)).collect();

    let in_phase = transform.inverse(band)?;
    let quadrature = transform.inverse(&shifted)?;
    Ok(in_phase
        .iter()
        .zip(&quadrature)
        .map(|(a, b)| (a * a + b * b).sqrt())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use std::f32::consts::PI;

    fn sine(freq: f32, samplerate: u32, secs: f32) -> Vec<f32> {
        let n = (samplerate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / samplerate as f32).sin())
            .collect()
    }

    fn small_params() -> ParameterSet {
        ParameterSet {
            maxfreq: 4000.0,
            pixpersec: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_is_normalized() {
        let mut engine = AnalysisEngine::new(small_params(), Palette::default());
        let signal = sine(1000.0, 8000, 0.5);
        let grid = engine
            .analyze(&signal, 8000, &mut (), &CancelToken::new())
            .unwrap()
            .unwrap();

        assert!(grid.height() > 0);
        assert_eq!(grid.width(), 25);
        assert_eq!(grid.max(), 1.0);
        assert!(grid.rows().iter().all(|row| row.len() == grid.width()));
        assert!(grid.rows().iter().flatten().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_silence_stays_zero() {
        let mut engine = AnalysisEngine::new(small_params(), Palette::default());
        let grid = engine
            .analyze(&vec![0.0; 4000], 8000, &mut (), &CancelToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(grid.max(), 0.0);
    }

    #[test]
    fn test_invalid_overlap_rejected_before_transform() {
        /// Fails the test if the transform is ever reached
        struct Untouchable;
        impl Transform for Untouchable {
            fn forward(&mut self, _: &[f32]) -> Result<Vec<Complex<f32>>> {
                panic!("transform reached")
            }
            fn inverse(&mut self, _: &[Complex<f32>]) -> Result<Vec<f32>> {
                panic!("transform reached")
            }
        }

        let params = ParameterSet {
            overlap: 1.0,
            ..small_params()
        };
        let mut engine =
            AnalysisEngine::with_services(params, Palette::default(), Untouchable, SincResampler::new());
        let result = engine.to_image(&[0.0; 100], 8000, &mut (), &CancelToken::new());
        assert!(matches!(result, Err(SpectrogramError::InvalidOverlap(_))));
    }

    #[test]
    fn test_cancel_returns_nothing() {
        let mut engine = AnalysisEngine::new(small_params(), Palette::default());
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = engine
            .to_image(&sine(440.0, 8000, 0.5), 8000, &mut (), &cancel)
            .unwrap();
        assert!(result.is_none());
        // Request consumed: the next call runs to completion
        assert!(engine
            .to_image(&sine(440.0, 8000, 0.5), 8000, &mut (), &cancel)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_short_signal_rejected() {
        let mut engine = AnalysisEngine::new(small_params(), Palette::default());
        let result = engine.analyze(&[0.5; 10], 8000, &mut (), &CancelToken::new());
        assert!(matches!(result, Err(SpectrogramError::SignalTooShort { .. })));
    }

    #[test]
    fn test_render_orientation_and_metadata() {
        let engine = AnalysisEngine::new(
            ParameterSet {
                intensity_axis: AxisScale::Linear,
                ..small_params()
            },
            Palette::default(),
        );
        let grid = BandGrid {
            rows: vec![vec![1.0, 0.0], vec![0.0, 0.5]],
        };
        let image = engine.render(&grid).unwrap();

        assert_eq!((image.width(), image.height()), (2, 2));
        assert!(matches!(image.canvas, Canvas::Indexed { .. }));
        // Band 0 is the bottom row
        assert_eq!(image.canvas.pixel(0, 1).0, [255, 255, 255]);
        assert_eq!(image.canvas.pixel(1, 0).0, [128, 128, 128]);
        assert_eq!(image.metadata, Some(engine.params().serialize()));
    }

    #[test]
    fn test_progress_is_monotonic() {
        #[derive(Default)]
        struct Recorder {
            percents: Vec<u32>,
        }
        impl Progress for Recorder {
            fn on_progress(&mut self, percent: u32) {
                self.percents.push(percent);
            }
        }

        let mut engine = AnalysisEngine::new(small_params(), Palette::default());
        let mut recorder = Recorder::default();
        engine
            .to_image(&sine(300.0, 8000, 0.25), 8000, &mut recorder, &CancelToken::new())
            .unwrap();

        assert_eq!(recorder.percents.first(), Some(&0));
        assert_eq!(recorder.percents.last(), Some(&100));
        assert!(recorder.percents.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_log_window_is_symmetric_in_cents() {
        let mut band = vec![Complex::new(1.0f32, 0.0); 41];
        apply_window(&mut band, 100, 1.0, Window::Hann, AxisScale::Logarithmic);
        assert!(band[0].re.abs() < 1e-6);
        assert!(band[40].re.abs() < 1e-6);
        // Peak sits below the bin midpoint: the geometric center of 100..140
        let peak = band
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.re.total_cmp(&b.1.re))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak < 20);
    }

    #[test]
    fn test_envelope_of_single_bin_is_flat() {
        let mut transform = FftTransform::new();
        let mut band = vec![Complex::new(0.0f32, 0.0); 9];
        band[3] = Complex::new(2.0, 1.0);
        let envelope = detect_envelope(&mut transform, &band).unwrap();

        assert_eq!(envelope.len(), 16);
        let expected = 2.0 * band[3].norm();
        for v in envelope {
            assert!((v - expected).abs() < 1e-4);
        }
    }
}
