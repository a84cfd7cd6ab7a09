//! Spectrogram pixel grids and their PNG form.
//!
//! A canvas is either indexed (up to 256 colours, one byte per pixel plus
//! a colour table) or direct RGB, whichever the palette needs. Generated
//! images carry the serialized parameters in a `Spectrogram` text chunk.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::error::{Result, SpectrogramError};
use crate::params::HEADER;

/// Text chunk keyword holding the serialized parameters
pub const METADATA_KEY: &str = HEADER;

/// Value written into a canvas cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelValue {
    Index(u8),
    Color(Rgb<u8>),
}

/// Pixel surface in the smallest colour mode a palette needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    Indexed {
        colors: Vec<Rgb<u8>>,
        indices: GrayImage,
    },
    Direct(RgbImage),
}

impl Canvas {
    pub fn width(&self) -> u32 {
        match self {
            Canvas::Indexed { indices, .. } => indices.width(),
            Canvas::Direct(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Canvas::Indexed { indices, .. } => indices.height(),
            Canvas::Direct(img) => img.height(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Write one pixel. The value must match the canvas mode.
    pub fn put_pixel(&mut self, x: u32, y: u32, value: PixelValue) -> Result<()> {
        match (self, value) {
            (Canvas::Indexed { indices, .. }, PixelValue::Index(i)) => {
                indices.put_pixel(x, y, Luma([i]));
                Ok(())
            }
            (Canvas::Direct(img), PixelValue::Color(c)) => {
                img.put_pixel(x, y, c);
                Ok(())
            }
            (Canvas::Indexed { .. }, PixelValue::Color(_)) => Err(SpectrogramError::PixelModeMismatch {
                value: "color",
                canvas: "an indexed",
            }),
            (Canvas::Direct(_), PixelValue::Index(_)) => Err(SpectrogramError::PixelModeMismatch {
                value: "index",
                canvas: "a direct",
            }),
        }
    }

    /// Resolved colour at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        match self {
            Canvas::Indexed { colors, indices } => {
                let i = indices.get_pixel(x, y)[0] as usize;
                colors.get(i).copied().unwrap_or(Rgb([0, 0, 0]))
            }
            Canvas::Direct(img) => *img.get_pixel(x, y),
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        match self {
            Canvas::Indexed { .. } => {
                RgbImage::from_fn(self.width(), self.height(), |x, y| self.pixel(x, y))
            }
            Canvas::Direct(img) => img.clone(),
        }
    }
}

/// A spectrogram: pixel grid plus the metadata slot.
///
/// Row 0 of the canvas is the highest band.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramImage {
    pub canvas: Canvas,
    /// Serialized parameters, if known
    pub metadata: Option<String>,
}

impl SpectrogramImage {
    pub fn new(canvas: Canvas, metadata: Option<String>) -> Self {
        Self { canvas, metadata }
    }

    pub fn from_rgb(img: RgbImage) -> Self {
        Self::new(Canvas::Direct(img), None)
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

/// Write a spectrogram as PNG with its metadata in a text chunk.
pub fn save_png(path: impl AsRef<Path>, image: &SpectrogramImage) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    if image.canvas.is_empty() {
        return Err(SpectrogramError::EmptyImage { width, height });
    }

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_depth(png::BitDepth::Eight);

    let data = match &image.canvas {
        Canvas::Indexed { colors, indices } => {
            encoder.set_color(png::ColorType::Indexed);
            let table: Vec<u8> = colors.iter().flat_map(|c| c.0).collect();
            encoder.set_palette(table);
            indices.as_raw().clone()
        }
        Canvas::Direct(img) => {
            encoder.set_color(png::ColorType::Rgb);
            img.as_raw().clone()
        }
    };

    if let Some(text) = &image.metadata {
        encoder.add_text_chunk(METADATA_KEY.to_string(), text.clone())?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

/// Load an image file as a direct colour spectrogram.
///
/// For PNG files the `Spectrogram` text chunk, if present, fills the
/// metadata slot.
pub fn load_image(path: impl AsRef<Path>) -> Result<SpectrogramImage> {
    let path = path.as_ref();
    let pixels = image::open(path)?.to_rgb8();
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    let metadata = if is_png { read_png_metadata(path)? } else { None };
    Ok(SpectrogramImage::new(Canvas::Direct(pixels), metadata))
}

fn read_png_metadata(path: &Path) -> Result<Option<String>> {
    let decoder = png::Decoder::new(File::open(path)?);
    let reader = decoder.read_info()?;
    let info = reader.info();
    let text = info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == METADATA_KEY)
        .map(|chunk| chunk.text.clone())
        .or_else(|| {
            info.utf8_text
                .iter()
                .find(|chunk| chunk.keyword == METADATA_KEY)
                .and_then(|chunk| chunk.get_text().ok())
        });
    Ok(text)
}
