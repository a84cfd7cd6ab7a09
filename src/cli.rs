//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use spectrogram::{AxisScale, BrightnessCorrection, ParameterSet, SynthesisMode, Window};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectrogram")]
#[command(about = "Turn sound into spectrogram images and images back into sound", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the spectrogram of a WAV file
    Analyze {
        /// Input WAV file
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Channel to analyze (0 = first)
        #[arg(long, default_value = "0")]
        channel: usize,

        /// Image whose first pixel row is the palette (default: grayscale)
        #[arg(long, value_name = "IMAGE")]
        palette: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Turn a spectrogram image back into sound
    Synthesize {
        /// Input image
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Carrier: sine or noise
        #[arg(long, default_value = "sine")]
        mode: SynthesisMode,

        #[arg(long, value_name = "HZ", default_value = "44100")]
        sample_rate: u32,

        /// Seed for carrier phases and noise
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Image whose first pixel row is the palette (default: grayscale)
        #[arg(long, value_name = "IMAGE")]
        palette: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Write a preview strip of a palette
    Palette {
        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Image whose first pixel row is the palette (default: grayscale)
        #[arg(long, value_name = "IMAGE")]
        palette: Option<PathBuf>,

        #[arg(long, default_value = "256")]
        width: u32,

        #[arg(long, default_value = "32")]
        height: u32,
    },
}

/// Parameter overrides. Unset flags keep the underlying value.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Band width (Hz on a linear axis, cents on a logarithmic one)
    #[arg(long)]
    pub bandwidth: Option<f64>,

    /// Base frequency (Hz)
    #[arg(long, value_name = "HZ")]
    pub basefreq: Option<f64>,

    /// Highest frequency (Hz)
    #[arg(long, value_name = "HZ")]
    pub maxfreq: Option<f64>,

    /// Band overlap in percent
    #[arg(long, value_name = "PERCENT")]
    pub overlap: Option<f64>,

    /// Time resolution (pixels per second)
    #[arg(long)]
    pub pixpersec: Option<f64>,

    /// hann, blackman, rectangular, triangular
    #[arg(long)]
    pub window: Option<Window>,

    /// linear or log
    #[arg(long)]
    pub intensity_axis: Option<AxisScale>,

    /// linear or log
    #[arg(long)]
    pub frequency_axis: Option<AxisScale>,

    /// none or sqrt
    #[arg(long)]
    pub correction: Option<BrightnessCorrection>,
}

impl ParamArgs {
    /// Overwrite the fields of `params` that were given on the command line.
    pub fn apply_to(&self, params: &mut ParameterSet) {
        if let Some(v) = self.bandwidth {
            params.bandwidth = v;
        }
        if let Some(v) = self.basefreq {
            params.basefreq = v;
        }
        if let Some(v) = self.maxfreq {
            params.maxfreq = v;
        }
        if let Some(v) = self.overlap {
            params.overlap = v / 100.0;
        }
        if let Some(v) = self.pixpersec {
            params.pixpersec = v;
        }
        if let Some(v) = self.window {
            params.window = v;
        }
        if let Some(v) = self.intensity_axis {
            params.intensity_axis = v;
        }
        if let Some(v) = self.frequency_axis {
            params.frequency_axis = v;
        }
        if let Some(v) = self.correction {
            params.correction = v;
        }
    }
}
