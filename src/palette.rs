//! Intensity to colour mapping.
//!
//! A palette is an ordered list of colours; intensity 0 maps to the first
//! and 1 to the last. Synthesis inverts the mapping by exact colour lookup,
//! so repeated colours make the inverse ambiguous and lower its quality.
//! Palettes of 256 colours or fewer are indexable and paint indexed
//! canvases.

use std::collections::HashMap;

use image::{GrayImage, Rgb, RgbImage};

use crate::canvas::{Canvas, PixelValue};
use crate::error::{Result, SpectrogramError};

/// Largest palette that still fits an 8-bit index
pub const MAX_INDEXED_COLORS: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
    /// First position of each colour
    lookup: HashMap<[u8; 3], usize>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl Palette {
    /// Palette from an ordered colour list.
    pub fn new(colors: Vec<Rgb<u8>>) -> Result<Self> {
        if colors.is_empty() {
            return Err(SpectrogramError::EmptyPalette);
        }
        Ok(Self::build(colors))
    }

    /// 256-level black to white ramp
    pub fn grayscale() -> Self {
        Self::build((0..=255u8).map(|v| Rgb([v, v, v])).collect())
    }

    fn build(colors: Vec<Rgb<u8>>) -> Self {
        let mut lookup = HashMap::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            lookup.entry(color.0).or_insert(i);
        }
        Self { colors, lookup }
    }

    /// Palette taken from the first pixel row of an image.
    pub fn from_image(img: &RgbImage) -> Result<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(SpectrogramError::EmptyPalette);
        }
        Self::new((0..img.width()).map(|x| *img.get_pixel(x, 0)).collect())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_indexable(&self) -> bool {
        self.colors.len() <= MAX_INDEXED_COLORS
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// Position of intensity `value` in the palette
    fn position(&self, value: f32) -> usize {
        let last = (self.colors.len() - 1) as f32;
        (last * value.clamp(0.0, 1.0)).round() as usize
    }

    /// Colour at intensity `value`
    pub fn color_at(&self, value: f32) -> Rgb<u8> {
        self.colors[self.position(value)]
    }

    /// Canvas value for intensity `value` in [0, 1]: an index for indexable
    /// palettes, the colour itself otherwise.
    pub fn get_color(&self, value: f32) -> PixelValue {
        let position = self.position(value);
        if self.is_indexable() {
            PixelValue::Index(position as u8)
        } else {
            PixelValue::Color(self.colors[position])
        }
    }

    /// Intensity of `color`, 0 if it is not in the palette.
    pub fn get_intensity(&self, color: Rgb<u8>) -> f32 {
        match self.lookup.get(&color.0) {
            Some(&i) if self.colors.len() > 1 => i as f32 / (self.colors.len() - 1) as f32,
            _ => 0.0,
        }
    }

    pub fn has_color(&self, color: Rgb<u8>) -> bool {
        self.lookup.contains_key(&color.0)
    }

    /// Number of canvas pixels whose colour is missing from the palette
    pub fn count_unknown(&self, canvas: &Canvas) -> usize {
        let mut unknown = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if !self.has_color(canvas.pixel(x, y)) {
                    unknown += 1;
                }
            }
        }
        unknown
    }

    /// Blank canvas in the smallest colour mode, filled with the first colour.
    pub fn make_canvas(&self, width: u32, height: u32) -> Canvas {
        if self.is_indexable() {
            Canvas::Indexed {
                colors: self.colors.clone(),
                indices: GrayImage::new(width, height),
            }
        } else {
            Canvas::Direct(RgbImage::from_pixel(width, height, self.colors[0]))
        }
    }

    /// Horizontal sweep from intensity 0 on the left to 1 on the right.
    pub fn preview(&self, width: u32, height: u32) -> Result<Canvas> {
        let mut canvas = self.make_canvas(width, height);
        let span = width.saturating_sub(1).max(1) as f32;
        for x in 0..width {
            let value = self.get_color(x as f32 / span);
            for y in 0..height {
                canvas.put_pixel(x, y, value)?;
            }
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rainbow(n: usize) -> Palette {
        let colors = (0..n)
            .map(|i| Rgb([(i % 256) as u8, (i / 256) as u8, 7]))
            .collect();
        Palette::new(colors).unwrap()
    }

    #[test]
    fn test_default_is_grayscale() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 256);
        assert!(palette.is_indexable());
        assert_eq!(palette.get_color(0.0), PixelValue::Index(0));
        assert_eq!(palette.get_color(1.0), PixelValue::Index(255));
        assert_eq!(palette.color_at(1.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_round_trip_within_one_step() {
        for n in [2, 17, 256, 1000] {
            let palette = rainbow(n);
            let tolerance = 1.0 / (n - 1) as f32;
            for i in 0..=100 {
                let v = i as f32 / 100.0;
                let back = palette.get_intensity(palette.color_at(v));
                assert!((back - v).abs() <= tolerance, "n={} v={} back={}", n, v, back);
            }
        }
    }

    #[test]
    fn test_large_palette_is_direct() {
        let palette = rainbow(300);
        assert!(!palette.is_indexable());
        assert!(matches!(palette.get_color(0.5), PixelValue::Color(_)));
        assert!(matches!(palette.make_canvas(2, 2), Canvas::Direct(_)));
    }

    #[test]
    fn test_unknown_color_is_zero() {
        let palette = Palette::grayscale();
        assert!(!palette.has_color(Rgb([1, 2, 3])));
        assert_eq!(palette.get_intensity(Rgb([1, 2, 3])), 0.0);
    }

    #[test]
    fn test_duplicates_map_to_first() {
        let palette =
            Palette::new(vec![Rgb([0, 0, 0]), Rgb([9, 9, 9]), Rgb([9, 9, 9]), Rgb([1, 1, 1])])
                .unwrap();
        assert!((palette.get_intensity(Rgb([9, 9, 9])) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_image_first_row() {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([50, 50, 50]));
        img.put_pixel(0, 0, Rgb([1, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 1]));
        let palette = Palette::from_image(&img).unwrap();
        assert_eq!(
            palette.colors(),
            &[Rgb([1, 0, 0]), Rgb([50, 50, 50]), Rgb([0, 0, 1])]
        );
        assert!(Palette::from_image(&RgbImage::new(0, 0)).is_err());
    }

    #[test]
    fn test_count_unknown() {
        let palette = Palette::grayscale();
        let mut img = RgbImage::from_pixel(4, 3, Rgb([10, 10, 10]));
        img.put_pixel(1, 1, Rgb([10, 0, 0]));
        img.put_pixel(3, 2, Rgb([0, 10, 0]));
        assert_eq!(palette.count_unknown(&Canvas::Direct(img)), 2);
    }

    #[test]
    fn test_preview_sweeps() {
        let preview = Palette::grayscale().preview(256, 4).unwrap();
        assert_eq!(preview.pixel(0, 3), Rgb([0, 0, 0]));
        assert_eq!(preview.pixel(255, 0), Rgb([255, 255, 255]));
        assert_eq!(preview.pixel(128, 2), Rgb([128, 128, 128]));
    }
}
