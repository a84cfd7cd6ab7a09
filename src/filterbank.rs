//! Division of the spectrum into overlapping bands.
//!
//! Each band becomes one row of the spectrogram. Bands are half-open ranges
//! of spectrum bin indices. The `scale` of a filterbank is the number of
//! bins per Hz of the spectrum it is applied to.

use std::ops::Range;

use crate::params::{AxisScale, ParameterSet};

/// Cents per octave
const CENTS_PER_OCTAVE: f64 = 1200.0;

/// Extra bands added to the logarithmic estimate
const LOG_ESTIMATE_SLACK: usize = 4;

pub fn freq_to_cents(freq: f64) -> f64 {
    freq.log2() * CENTS_PER_OCTAVE
}

pub fn cents_to_freq(cents: f64) -> f64 {
    2f64.powf(cents / CENTS_PER_OCTAVE)
}

/// Bands of constant width in Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFilterbank {
    scale: f64,
    /// Band width in bins
    bandwidth: f64,
    start: usize,
    step: f64,
}

impl LinearFilterbank {
    pub fn new(scale: f64, basefreq: f64, bandwidth_hz: f64, overlap: f64) -> Self {
        let bandwidth = bandwidth_hz * scale;
        let start = (scale * basefreq - bandwidth / 2.0).max(0.0) as usize;
        let step = (1.0 - overlap) * bandwidth;
        debug_assert!(step > 0.0);
        Self {
            scale,
            bandwidth,
            start,
            step,
        }
    }

    pub fn band(&self, i: usize) -> Range<usize> {
        let low = self.start as f64 + i as f64 * self.step;
        low as usize..(low as usize as f64 + self.bandwidth) as usize
    }

    pub fn center(&self, i: usize) -> usize {
        (self.start as f64 + i as f64 * self.step + self.bandwidth / 2.0) as usize
    }

    pub fn num_bands_est(&self, maxfreq: f64) -> usize {
        ((maxfreq * self.scale - self.start as f64) / self.step).max(0.0) as usize
    }
}

/// Bands of constant width in cents (constant Q).
#[derive(Debug, Clone, PartialEq)]
pub struct LogFilterbank {
    scale: f64,
    cents_per_band: f64,
    log_start: f64,
    log_step: f64,
}

impl LogFilterbank {
    pub fn new(scale: f64, basefreq: f64, cents_per_band: f64, overlap: f64) -> Self {
        let log_step = (1.0 - overlap) * cents_per_band;
        debug_assert!(log_step > 0.0);
        Self {
            scale,
            cents_per_band,
            log_start: freq_to_cents(basefreq),
            log_step,
        }
    }

    /// Center of band `i` in cents
    pub fn log_center(&self, i: usize) -> f64 {
        self.log_start + i as f64 * self.log_step
    }

    pub fn band(&self, i: usize) -> Range<usize> {
        let low = self.log_center(i) - self.cents_per_band / 2.0;
        let high = low + self.cents_per_band;
        (cents_to_freq(low) * self.scale) as usize..(cents_to_freq(high) * self.scale) as usize
    }

    pub fn center(&self, i: usize) -> usize {
        (cents_to_freq(self.log_center(i)) * self.scale) as usize
    }

    pub fn num_bands_est(&self, maxfreq: f64) -> usize {
        ((freq_to_cents(maxfreq) - self.log_start) / self.log_step).max(0.0) as usize
            + LOG_ESTIMATE_SLACK
    }
}

/// Filterbank chosen once from the frequency axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Filterbank {
    Linear(LinearFilterbank),
    Logarithmic(LogFilterbank),
}

impl Filterbank {
    /// Build the filterbank for `params` over a spectrum with `scale` bins per Hz.
    ///
    /// `params` must have passed validation.
    pub fn new(params: &ParameterSet, scale: f64) -> Self {
        match params.frequency_axis {
            AxisScale::Linear => Filterbank::Linear(LinearFilterbank::new(
                scale,
                params.basefreq,
                params.bandwidth,
                params.overlap,
            )),
            AxisScale::Logarithmic => Filterbank::Logarithmic(LogFilterbank::new(
                scale,
                params.basefreq,
                params.bandwidth,
                params.overlap,
            )),
        }
    }

    /// Bin range `[low, high)` of band `i`
    pub fn band(&self, i: usize) -> Range<usize> {
        match self {
            Filterbank::Linear(fb) => fb.band(i),
            Filterbank::Logarithmic(fb) => fb.band(i),
        }
    }

    /// Bin index of the center of band `i`
    pub fn center(&self, i: usize) -> usize {
        match self {
            Filterbank::Linear(fb) => fb.center(i),
            Filterbank::Logarithmic(fb) => fb.center(i),
        }
    }

    /// Rough band count up to `maxfreq`. Only a sizing and progress hint.
    pub fn num_bands_est(&self, maxfreq: f64) -> usize {
        match self {
            Filterbank::Linear(fb) => fb.num_bands_est(maxfreq),
            Filterbank::Logarithmic(fb) => fb.num_bands_est(maxfreq),
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            Filterbank::Linear(fb) => fb.scale,
            Filterbank::Logarithmic(fb) => fb.scale,
        }
    }
}
