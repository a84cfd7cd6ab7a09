//! Enumerated settings: window kind, axis scales, brightness correction,
//! synthesis mode.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Window function applied to each frequency-domain band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    #[default]
    Hann,
    Blackman,
    /// Leaves the band untouched
    Rectangular,
    /// Non-zero end-points variant
    Triangular,
}

/// Linear or logarithmic mapping for the frequency and intensity axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    Linear,
    #[default]
    Logarithmic,
}

/// Display-only brightness boost applied after the intensity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrightnessCorrection {
    #[default]
    None,
    Sqrt,
}

/// Image to sound reconstruction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisMode {
    /// Amplitude-modulated carrier per band (fast)
    #[default]
    Sine,
    /// Band-filtered pink noise per band (slower, better for busy images)
    Noise,
}

impl Window {
    /// Integer code used in serialized parameters
    pub fn code(self) -> i32 {
        match self {
            Window::Hann => 0,
            Window::Blackman => 1,
            Window::Rectangular => 2,
            Window::Triangular => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Window::Hann),
            1 => Some(Window::Blackman),
            2 => Some(Window::Rectangular),
            3 => Some(Window::Triangular),
            _ => None,
        }
    }
}

impl AxisScale {
    pub fn code(self) -> i32 {
        match self {
            AxisScale::Linear => 0,
            AxisScale::Logarithmic => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(AxisScale::Linear),
            1 => Some(AxisScale::Logarithmic),
            _ => None,
        }
    }

    /// Map a normalized magnitude to an intensity, both in [0, 1].
    ///
    /// The logarithmic curve is `log10(1 + 9x)`, which fixes 0 and 1.
    pub fn to_intensity(self, magnitude: f32) -> f32 {
        let magnitude = magnitude.clamp(0.0, 1.0);
        match self {
            AxisScale::Linear => magnitude,
            AxisScale::Logarithmic => (1.0 + 9.0 * magnitude).log10().clamp(0.0, 1.0),
        }
    }

    /// Inverse of [`AxisScale::to_intensity`].
    pub fn from_intensity(self, intensity: f32) -> f32 {
        let intensity = intensity.clamp(0.0, 1.0);
        match self {
            AxisScale::Linear => intensity,
            AxisScale::Logarithmic => ((10f32.powf(intensity) - 1.0) / 9.0).clamp(0.0, 1.0),
        }
    }
}

impl BrightnessCorrection {
    pub fn apply(self, intensity: f32) -> f32 {
        match self {
            BrightnessCorrection::None => intensity,
            BrightnessCorrection::Sqrt => intensity.sqrt(),
        }
    }
}

impl FromStr for Window {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hann" => Ok(Window::Hann),
            "blackman" => Ok(Window::Blackman),
            "rectangular" | "rect" | "none" => Ok(Window::Rectangular),
            "triangular" | "triangle" => Ok(Window::Triangular),
            other => Err(ParseError::UnknownVariant {
                kind: "window",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for AxisScale {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "lin" => Ok(AxisScale::Linear),
            "logarithmic" | "log" => Ok(AxisScale::Logarithmic),
            other => Err(ParseError::UnknownVariant {
                kind: "axis scale",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for BrightnessCorrection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BrightnessCorrection::None),
            "sqrt" => Ok(BrightnessCorrection::Sqrt),
            other => Err(ParseError::UnknownVariant {
                kind: "brightness correction",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for SynthesisMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sine" => Ok(SynthesisMode::Sine),
            "noise" => Ok(SynthesisMode::Noise),
            other => Err(ParseError::UnknownVariant {
                kind: "synthesis mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisMode::Sine => write!(f, "sine"),
            SynthesisMode::Noise => write!(f, "noise"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_intensity_fixes_endpoints() {
        let axis = AxisScale::Logarithmic;
        assert!((axis.to_intensity(0.0) - 0.0).abs() < 1e-6);
        assert!((axis.to_intensity(1.0) - 1.0).abs() < 1e-6);
        // Log curve brightens quiet values
        assert!(axis.to_intensity(0.1) > 0.1);
    }

    #[test]
    fn test_intensity_inverse() {
        for axis in [AxisScale::Linear, AxisScale::Logarithmic] {
            for i in 0..=20 {
                let v = i as f32 / 20.0;
                let back = axis.from_intensity(axis.to_intensity(v));
                assert!((back - v).abs() < 1e-5, "{:?} {} -> {}", axis, v, back);
            }
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for w in [
            Window::Hann,
            Window::Blackman,
            Window::Rectangular,
            Window::Triangular,
        ] {
            assert_eq!(Window::from_code(w.code()), Some(w));
        }
        assert_eq!(Window::from_code(4), None);
        assert_eq!(AxisScale::from_code(1), Some(AxisScale::Logarithmic));
        assert_eq!(AxisScale::from_code(-1), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Blackman".parse::<Window>(), Ok(Window::Blackman));
        assert_eq!("log".parse::<AxisScale>(), Ok(AxisScale::Logarithmic));
        assert_eq!("noise".parse::<SynthesisMode>(), Ok(SynthesisMode::Noise));
        assert!("kaiser".parse::<Window>().is_err());
    }

    #[test]
    fn test_sqrt_correction() {
        assert!((BrightnessCorrection::Sqrt.apply(0.25) - 0.5).abs() < 1e-6);
        assert_eq!(BrightnessCorrection::None.apply(0.25), 0.25);
    }
}
