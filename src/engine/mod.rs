//! Analysis and synthesis engines.
//!
//! Both engines own a parameter set and a palette, take a snapshot of the
//! parameters at call start, report through a [`Progress`] observer, and
//! poll a [`CancelToken`] once per band.

pub mod analysis;
pub mod progress;
pub mod synthesis;

// Re-export public types
pub use analysis::{AnalysisEngine, BandGrid};
pub use progress::{CancelToken, LogProgress, Progress};
pub use synthesis::{normalize_peak, SynthesisEngine};
