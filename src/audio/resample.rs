//! Band-limited resampling to an exact target length.

use rubato::{
    Resampler as _, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::error::Result;

/// Largest ratio handled in a single pass
const MAX_SINGLE_PASS_RATIO: f64 = 256.0;

/// Length factor of the intermediate pass for extreme ratios
const CHAIN_FACTOR: usize = 50;

/// Sinc interpolation settings
const SINC_LEN: usize = 64;
const SINC_CUTOFF: f32 = 0.95;
const OVERSAMPLING: usize = 256;

/// Resampling service: any real sequence to exactly `len` samples.
pub trait Resampler {
    fn resample_once(&mut self, input: &[f32], len: usize) -> Result<Vec<f32>>;
}

/// Resample `input` to `len` samples.
///
/// Ratios of 256 or more (or 1/256 or less) go through an intermediate
/// length scaled by 50 first, so each pass stays within the supported range.
pub fn resample<R: Resampler + ?Sized>(resampler: &mut R, input: &[f32], len: usize) -> Result<Vec<f32>> {
    if input.len() == len {
        return Ok(input.to_vec());
    }
    if input.is_empty() || len == 0 {
        return Ok(vec![0.0; len]);
    }

    let ratio = len as f64 / input.len() as f64;
    if ratio >= MAX_SINGLE_PASS_RATIO {
        let mid = resample(resampler, input, input.len() * CHAIN_FACTOR)?;
        return resample(resampler, &mid, len);
    }
    if ratio <= 1.0 / MAX_SINGLE_PASS_RATIO {
        let mid = resample(resampler, input, input.len() / CHAIN_FACTOR)?;
        return resample(resampler, &mid, len);
    }

    let mut output = resampler.resample_once(input, len)?;
    output.resize(len, 0.0);
    Ok(output)
}

/// Windowed-sinc resampler built on rubato.
///
/// The whole input is one chunk. Zeros are fed after it until the filter
/// delay has drained, then the delay is cut off so output sample 0 lines up
/// with input sample 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SincResampler;

impl SincResampler {
    pub fn new() -> Self {
        Self
    }

    fn parameters() -> SincInterpolationParameters {
        SincInterpolationParameters {
            sinc_len: SINC_LEN,
            f_cutoff: SINC_CUTOFF,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: OVERSAMPLING,
            window: WindowFunction::BlackmanHarris2,
        }
    }
}

impl Resampler for SincResampler {
    fn resample_once(&mut self, input: &[f32], len: usize) -> Result<Vec<f32>> {
        let ratio = len as f64 / input.len() as f64;
        let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, Self::parameters(), input.len(), 1)?;
        let delay = resampler.output_delay();

        let wave_in = [input];
        let mut output = resampler.process(&wave_in[..], None)?.remove(0);
        while output.len() < delay + len {
            let tail = resampler.process_partial(None::<&[&[f32]]>, None)?;
            match tail.first() {
                Some(frames) if !frames.is_empty() => output.extend_from_slice(frames),
                _ => break,
            }
        }

        output.resize(delay + len, 0.0);
        Ok(output.split_off(delay))
    }
}
