//! Real-signal transform service backed by realfft.

use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;

use crate::error::Result;

/// Forward and inverse transform between real signals and half spectra.
///
/// Neither direction is normalized.
pub trait Transform {
    /// Spectrum of `floor(n/2) + 1` bins from `n` real samples.
    fn forward(&mut self, signal: &[f32]) -> Result<Vec<Complex<f32>>>;

    /// Real signal of `2 * (m - 1)` samples from a half spectrum of `m` bins.
    fn inverse(&mut self, spectrum: &[Complex<f32>]) -> Result<Vec<f32>>;
}

/// Transform built on a cached realfft planner
pub struct FftTransform {
    planner: RealFftPlanner<f32>,
}

impl FftTransform {
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }
}

impl Default for FftTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for FftTransform {
    fn forward(&mut self, signal: &[f32]) -> Result<Vec<Complex<f32>>> {
        if signal.is_empty() {
            return Ok(vec![Complex::new(0.0, 0.0)]);
        }

        let fft = self.planner.plan_fft_forward(signal.len());
        let mut input = signal.to_vec();
        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum)?;
        Ok(spectrum)
    }

    fn inverse(&mut self, spectrum: &[Complex<f32>]) -> Result<Vec<f32>> {
        if spectrum.len() < 2 {
            return Ok(Vec::new());
        }
        let size = 2 * (spectrum.len() - 1);

        // DC and Nyquist of a real signal are real; only their real parts count
        let mut input = spectrum.to_vec();
        input[0].im = 0.0;
        input[size / 2].im = 0.0;

        let ifft = self.planner.plan_fft_inverse(size);
        let mut output = ifft.make_output_vec();
        ifft.process(&mut input, &mut output)?;
        Ok(output)
    }
}
