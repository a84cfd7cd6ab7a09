//! Spectrogram parameter set.

use super::scales::{AxisScale, BrightnessCorrection, Window};
use crate::error::{Result, SpectrogramError};

/// Base frequency substituted when a logarithmic axis is given 0 Hz
pub const FALLBACK_BASEFREQ_HZ: f64 = 27.5;

/// Overlap below which a tapering window leaves gaps between bands
pub const MIN_WINDOWED_OVERLAP: f64 = 0.4;

/// Image width above which viewers tend to struggle (pixels)
pub const MAX_COMFORTABLE_WIDTH_PX: usize = 30000;

/// Parameters shared by analysis and synthesis.
///
/// Engines take a copy at call start, so changing a value never affects a
/// call that is already running.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Width of each filter band.
    /// Hz for a linear frequency axis, cents (octave/1200) for a logarithmic one
    pub bandwidth: f64,

    /// Base frequency (Hz).
    /// Logarithmic axis: center of the first band. Linear axis: its start
    pub basefreq: f64,

    /// Highest frequency shown (Hz), at most Nyquist
    pub maxfreq: f64,

    /// Overlap of neighbouring bands, 0 = none, must stay below 1
    pub overlap: f64,

    /// Time resolution (pixels per second)
    pub pixpersec: f64,

    pub window: Window,
    pub intensity_axis: AxisScale,
    pub frequency_axis: AxisScale,

    /// Not serialized; lossy, so synthesis never inverts it
    pub correction: BrightnessCorrection,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            bandwidth: 100.0,
            basefreq: 55.0,
            maxfreq: 22050.0,
            overlap: 0.8,
            pixpersec: 100.0,
            window: Window::Hann,
            intensity_axis: AxisScale::Logarithmic,
            frequency_axis: AxisScale::Logarithmic,
            correction: BrightnessCorrection::None,
        }
    }
}

impl ParameterSet {
    /// Check the parameters against a sample rate.
    ///
    /// Engines call this before touching the signal, so a bad configuration
    /// never reaches the transform.
    pub fn validate(&self, samplerate: u32) -> Result<()> {
        if samplerate == 0 {
            return Err(SpectrogramError::InvalidSampleRate);
        }
        self.validate_shape()?;
        let nyquist = samplerate as f64 / 2.0;
        if self.maxfreq > nyquist {
            return Err(SpectrogramError::MaxFreqAboveNyquist {
                maxfreq: self.maxfreq,
                nyquist,
            });
        }
        Ok(())
    }

    /// Checks that do not depend on the sample rate.
    pub fn validate_shape(&self) -> Result<()> {
        // Step between bands is (1 - overlap) * bandwidth and must be positive
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(SpectrogramError::InvalidOverlap(self.overlap));
        }
        if !(self.bandwidth > 0.0) {
            return Err(SpectrogramError::InvalidBandwidth(self.bandwidth));
        }
        if !(self.pixpersec > 0.0) {
            return Err(SpectrogramError::InvalidPixPerSec(self.pixpersec));
        }
        if !(self.maxfreq > 0.0) {
            return Err(SpectrogramError::InvalidMaxFrequency(self.maxfreq));
        }
        if self.frequency_axis == AxisScale::Logarithmic && !(self.basefreq > 0.0) {
            return Err(SpectrogramError::InvalidBaseFrequency(self.basefreq));
        }
        Ok(())
    }

    /// Apply the automatic fixes a front end offers before analysis.
    ///
    /// Clamps maxfreq to Nyquist and replaces a zero base frequency on a
    /// logarithmic axis. Returns true if anything changed.
    pub fn sanitize_for(&mut self, samplerate: u32) -> bool {
        let mut changed = false;
        let nyquist = samplerate as f64 / 2.0;
        if self.maxfreq > nyquist {
            self.maxfreq = nyquist;
            changed = true;
        }
        if self.frequency_axis == AxisScale::Logarithmic && self.basefreq <= 0.0 {
            self.basefreq = FALLBACK_BASEFREQ_HZ;
            changed = true;
        }
        changed
    }

    /// Human-readable notes about questionable but legal settings.
    pub fn analysis_warnings(&self, samplerate: u32, duration_secs: f64) -> Vec<String> {
        let mut warnings = Vec::new();
        let nyquist = samplerate as f64 / 2.0;
        if self.maxfreq > nyquist {
            warnings.push(format!(
                "Maximum frequency {} Hz is above the Nyquist frequency {} Hz and will be clamped",
                self.maxfreq, nyquist
            ));
        }
        if self.frequency_axis == AxisScale::Logarithmic && self.basefreq <= 0.0 {
            warnings.push(format!(
                "Base frequency of a logarithmic spectrogram has to be larger than zero, using {} Hz",
                FALLBACK_BASEFREQ_HZ
            ));
        }
        if self.window != Window::Rectangular && self.overlap < MIN_WINDOWED_OVERLAP {
            warnings.push(
                "The specified overlap is likely insufficient for use with the selected window function"
                    .to_string(),
            );
        }
        let width = (duration_secs * self.pixpersec) as usize;
        if width > MAX_COMFORTABLE_WIDTH_PX {
            warnings.push(format!(
                "The resulting spectrogram will be very large ({} px), try a lower pixels per second value or a shorter sound",
                width
            ));
        }
        warnings
    }

    /// Image width for a spectrum of `bins` bins.
    pub fn image_width(&self, bins: usize, samplerate: u32) -> usize {
        (bins as f64 * 2.0 * self.pixpersec / samplerate as f64) as usize
    }

    /// Number of output samples synthesized from an image `width` pixels wide.
    pub fn synthesis_len(&self, width: u32, samplerate: u32) -> usize {
        (width as f64 * samplerate as f64 / self.pixpersec) as usize
    }
}
