//! Spectrogram library - sound to image and back
//!
//! Analysis splits a signal into frequency bands and draws each band's
//! amplitude envelope as a row of pixels. Synthesis reads the rows back and
//! drives sine or noise carriers with them. Images carry their parameters
//! as text so they can be resynthesized with the settings that made them.

pub mod audio;
pub mod canvas;
pub mod engine;
pub mod error;
pub mod filterbank;
pub mod palette;
pub mod params;

pub use canvas::{Canvas, SpectrogramImage};
pub use engine::{AnalysisEngine, CancelToken, LogProgress, Progress, SynthesisEngine};
pub use error::{ParseError, Result, SpectrogramError};
pub use palette::Palette;
pub use params::{AxisScale, BrightnessCorrection, ParameterSet, SynthesisMode, Window};
