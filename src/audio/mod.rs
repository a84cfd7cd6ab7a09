//! Signal-level building blocks: transform and resampling services,
//! window functions, pink noise, and WAV file access.

pub mod fft;
pub mod noise;
pub mod resample;
pub mod wav;
pub mod window;

// Re-export public types
pub use fft::{FftTransform, Transform};
pub use resample::{resample, Resampler, SincResampler};
pub use wav::WavInfo;
