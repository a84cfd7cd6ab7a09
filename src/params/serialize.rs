//! Text form of the parameters, stored in image metadata.
//!
//! Layout (fixed positions, `;`-terminated, reals with 4 decimals):
//! `Spectrogram;bandwidth;basefreq;maxfreq;overlap*100;pixpersec;window;intensity_axis;frequency_axis;`
//!
//! Brightness correction and the palette are not part of the text.

use super::scales::{AxisScale, Window};
use super::spectrogram::ParameterSet;
use crate::error::ParseError;

/// Metadata key and leading token of the serialized form
pub const HEADER: &str = "Spectrogram";

const DELIMITER: char = ';';
const FIELD_COUNT: usize = 9;

impl ParameterSet {
    pub fn serialize(&self) -> String {
        let mut out = String::from(HEADER);
        out.push(DELIMITER);
        for value in [
            self.bandwidth,
            self.basefreq,
            self.maxfreq,
            self.overlap * 100.0,
            self.pixpersec,
        ] {
            out.push_str(&format!("{:.4}{}", value, DELIMITER));
        }
        for code in [
            self.window.code(),
            self.intensity_axis.code(),
            self.frequency_axis.code(),
        ] {
            out.push_str(&format!("{}{}", code, DELIMITER));
        }
        out
    }

    /// Parse a serialized parameter string.
    ///
    /// Fields absent from the text (brightness correction) take defaults.
    pub fn deserialize(text: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = text.trim().split(DELIMITER).collect();
        if tokens.len() < FIELD_COUNT {
            return Err(ParseError::TooFewFields {
                expected: FIELD_COUNT,
                found: tokens.len(),
            });
        }

        let header = tokens[0].trim();
        // Older files wrote the header with a trailing colon
        if header.trim_end_matches(':') != HEADER {
            return Err(ParseError::BadHeader(header.to_string()));
        }

        Ok(Self {
            bandwidth: parse_real("bandwidth", tokens[1])?,
            basefreq: parse_real("basefreq", tokens[2])?,
            maxfreq: parse_real("maxfreq", tokens[3])?,
            overlap: parse_real("overlap", tokens[4])? / 100.0,
            pixpersec: parse_real("pixpersec", tokens[5])?,
            window: parse_code("window", tokens[6], Window::from_code)?,
            intensity_axis: parse_code("intensity axis", tokens[7], AxisScale::from_code)?,
            frequency_axis: parse_code("frequency axis", tokens[8], AxisScale::from_code)?,
            ..Default::default()
        })
    }

    /// Load serialized values into `self`, keeping brightness correction.
    ///
    /// On error `self` is left untouched.
    pub fn apply_serialized(&mut self, text: &str) -> Result<(), ParseError> {
        let parsed = Self::deserialize(text)?;
        *self = Self {
            correction: self.correction,
            ..parsed
        };
        Ok(())
    }
}

fn parse_real(field: &'static str, token: &str) -> Result<f64, ParseError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            field,
            value: token.to_string(),
        })
}

fn parse_code<T>(
    field: &'static str,
    token: &str,
    from_code: fn(i32) -> Option<T>,
) -> Result<T, ParseError> {
    let code = token
        .trim()
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: token.to_string(),
        })?;
    from_code(code).ok_or_else(|| ParseError::UnknownVariant {
        kind: field,
        value: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BrightnessCorrection;

    #[test]
    fn test_serialize_default() {
        let text = ParameterSet::default().serialize();
        assert_eq!(
            text,
            "Spectrogram;100.0000;55.0000;22050.0000;80.0000;100.0000;0;1;1;"
        );
    }

    #[test]
    fn test_round_trip_excludes_correction() {
        let params = ParameterSet {
            bandwidth: 40.5,
            basefreq: 0.0,
            maxfreq: 8000.0,
            overlap: 0.65,
            pixpersec: 250.0,
            window: Window::Triangular,
            intensity_axis: AxisScale::Linear,
            frequency_axis: AxisScale::Linear,
            correction: BrightnessCorrection::Sqrt,
        };
        let back = ParameterSet::deserialize(&params.serialize()).unwrap();

        assert_eq!(back.bandwidth, params.bandwidth);
        assert_eq!(back.basefreq, params.basefreq);
        assert_eq!(back.maxfreq, params.maxfreq);
        assert!((back.overlap - params.overlap).abs() < 1e-9);
        assert_eq!(back.pixpersec, params.pixpersec);
        assert_eq!(back.window, params.window);
        assert_eq!(back.intensity_axis, params.intensity_axis);
        assert_eq!(back.frequency_axis, params.frequency_axis);
        // Not carried by the text form
        assert_eq!(back.correction, BrightnessCorrection::None);
    }

    #[test]
    fn test_accepts_colon_header() {
        let text = "Spectrogram:;100.0000;55.0000;22050.0000;80.0000;100.0000;1;0;1;";
        let params = ParameterSet::deserialize(text).unwrap();
        assert_eq!(params.window, Window::Blackman);
        assert_eq!(params.intensity_axis, AxisScale::Linear);
    }

    #[test]
    fn test_short_input_fails() {
        let err = ParameterSet::deserialize("Spectrogram;100;55;").unwrap_err();
        assert!(matches!(err, ParseError::TooFewFields { .. }));
    }

    #[test]
    fn test_bad_fields_fail() {
        assert!(matches!(
            ParameterSet::deserialize("Picture;1;2;3;4;5;0;0;0;"),
            Err(ParseError::BadHeader(_))
        ));
        assert!(matches!(
            ParameterSet::deserialize("Spectrogram;abc;2;3;4;5;0;0;0;"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            ParameterSet::deserialize("Spectrogram;1;2;3;4;5;9;0;0;"),
            Err(ParseError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_failed_apply_leaves_params_untouched() {
        let mut params = ParameterSet {
            bandwidth: 12.0,
            correction: BrightnessCorrection::Sqrt,
            ..Default::default()
        };
        let before = params.clone();
        assert!(params.apply_serialized("Spectrogram;1;2;3;4;5;0;0;").is_err());
        assert_eq!(params, before);

        params
            .apply_serialized("Spectrogram;200.0000;30.0000;8000.0000;50.0000;60.0000;2;1;0;")
            .unwrap();
        assert_eq!(params.bandwidth, 200.0);
        assert_eq!(params.window, Window::Rectangular);
        assert_eq!(params.correction, BrightnessCorrection::Sqrt);
    }
}
