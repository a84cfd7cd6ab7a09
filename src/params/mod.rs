//! Parameter definitions with physical units and documented semantics.
//!
//! - Frequencies in Hz, bandwidth in Hz or cents depending on the axis
//! - Validation separates hard errors from front-end warnings
//! - A text form travels with generated images

mod scales;
mod serialize;
mod spectrogram;

// Re-export all types
pub use scales::{AxisScale, BrightnessCorrection, SynthesisMode, Window};
pub use serialize::HEADER;
pub use spectrogram::{
    ParameterSet, FALLBACK_BASEFREQ_HZ, MAX_COMFORTABLE_WIDTH_PX, MIN_WINDOWED_OVERLAP,
};
