//! Spectrogram - sound to image and back
//!
//! `analyze` draws a WAV file as a spectrogram PNG, `synthesize` turns an
//! image back into a WAV file, `palette` previews a colour palette.

mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cli::{Cli, Command, ParamArgs};
use spectrogram::audio::wav;
use spectrogram::canvas::{load_image, save_png};
use spectrogram::{
    AnalysisEngine, CancelToken, LogProgress, Palette, ParameterSet, SpectrogramImage,
    SynthesisEngine, SynthesisMode,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            input,
            output,
            channel,
            palette,
            params,
        } => analyze(&input, &output, channel, palette.as_deref(), &params),
        Command::Synthesize {
            input,
            output,
            mode,
            sample_rate,
            seed,
            palette,
            params,
        } => synthesize(
            &input,
            &output,
            mode,
            sample_rate,
            seed,
            palette.as_deref(),
            &params,
        ),
        Command::Palette {
            output,
            palette,
            width,
            height,
        } => {
            let palette = load_palette(palette.as_deref())?;
            let preview = SpectrogramImage::new(palette.preview(width, height)?, None);
            save_png(&output, &preview)
                .with_context(|| format!("Failed to write {}", output.display()))
        }
    }
}

/// Palette from the first row of an image, grayscale if none is given
fn load_palette(path: Option<&Path>) -> Result<Palette> {
    let Some(path) = path else {
        return Ok(Palette::default());
    };
    let image = load_image(path)
        .with_context(|| format!("Failed to load palette image {}", path.display()))?;
    let palette = Palette::from_image(&image.canvas.to_rgb_image())?;
    log::info!("Palette: {} colors from {}", palette.len(), path.display());
    Ok(palette)
}

fn analyze(
    input: &Path,
    output: &Path,
    channel: usize,
    palette: Option<&Path>,
    overrides: &ParamArgs,
) -> Result<()> {
    let palette = load_palette(palette)?;
    let (signal, info) = wav::read_channel(input, channel)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!(
        "Loaded {}: {} Hz, {} channels, {:.2} s",
        input.display(),
        info.sample_rate,
        info.channels,
        info.duration_secs()
    );

    let mut params = ParameterSet::default();
    overrides.apply_to(&mut params);
    for warning in params.analysis_warnings(info.sample_rate, info.duration_secs()) {
        log::warn!("{}", warning);
    }
    params.sanitize_for(info.sample_rate);

    let mut engine = AnalysisEngine::new(params, palette);
    let image = engine
        .to_image(&signal, info.sample_rate, &mut LogProgress::default(), &CancelToken::new())
        .context("Analysis failed")?;
    let Some(image) = image else {
        bail!("Analysis was cancelled");
    };

    save_png(output, &image).with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn synthesize(
    input: &Path,
    output: &Path,
    mode: SynthesisMode,
    sample_rate: u32,
    seed: u64,
    palette: Option<&Path>,
    overrides: &ParamArgs,
) -> Result<()> {
    let palette = load_palette(palette)?;
    let image =
        load_image(input).with_context(|| format!("Failed to load {}", input.display()))?;

    // Defaults < image metadata < command line
    let mut params = ParameterSet::default();
    match &image.metadata {
        Some(text) => match params.apply_serialized(text) {
            Ok(()) => log::info!("Using parameters stored in {}", input.display()),
            Err(e) => log::warn!("Ignoring unreadable image metadata: {}", e),
        },
        None => log::info!("No stored parameters in {}, using defaults", input.display()),
    }
    overrides.apply_to(&mut params);

    let unknown = palette.count_unknown(&image.canvas);
    if unknown > 0 {
        log::warn!(
            "{} pixels have colors outside the palette. Unknown colors are assumed to be zero intensity",
            unknown
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut engine = SynthesisEngine::new(params, palette);
    let signal = engine
        .synthesize(
            &image,
            sample_rate,
            mode,
            &mut rng,
            &mut LogProgress::default(),
            &CancelToken::new(),
        )
        .context("Synthesis failed")?;
    let Some(signal) = signal else {
        bail!("Synthesis was cancelled");
    };

    wav::write_mono(output, &signal, sample_rate)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!(
        "Wrote {} ({:.2} s)",
        output.display(),
        signal.len() as f64 / sample_rate as f64
    );
    Ok(())
}
