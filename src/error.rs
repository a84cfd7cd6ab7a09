//! Error types for spectrogram analysis and synthesis.

use thiserror::Error;

/// Failure to read a serialized parameter string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("missing 'Spectrogram' header, found '{0}'")]
    BadHeader(String),

    #[error("invalid number in field {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("overlap must be in [0, 1), got {0}")]
    InvalidOverlap(f64),

    #[error("bandwidth must be positive, got {0}")]
    InvalidBandwidth(f64),

    #[error("pixels per second must be positive, got {0}")]
    InvalidPixPerSec(f64),

    #[error("base frequency of a logarithmic frequency axis must be positive, got {0} Hz")]
    InvalidBaseFrequency(f64),

    #[error("maximum frequency must be positive, got {0} Hz")]
    InvalidMaxFrequency(f64),

    #[error("maximum frequency {maxfreq} Hz exceeds the Nyquist frequency {nyquist} Hz")]
    MaxFreqAboveNyquist { maxfreq: f64, nyquist: f64 },

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("signal of {samples} samples is too short to produce a single column")]
    SignalTooShort { samples: usize },

    #[error("image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("no filter band starts below the maximum frequency")]
    NoBands,

    #[error("{value} cannot be written to {canvas} canvas")]
    PixelModeMismatch {
        value: &'static str,
        canvas: &'static str,
    },

    #[error("palette image has no pixels")]
    EmptyPalette,

    #[error("channel {channel} out of range, file has {channels}")]
    ChannelOutOfRange { channel: usize, channels: usize },

    #[error("invalid spectrogram metadata: {0}")]
    Parse(#[from] ParseError),

    #[error("fft error: {0}")]
    Fft(#[from] realfft::FftError),

    #[error("resampler setup failed: {0}")]
    ResamplerSetup(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("png encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    #[error("png decoding error: {0}")]
    PngDecoding(#[from] png::DecodingError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpectrogramError>;
