//! Window functions over a normalized position in [0, 1].

use std::f64::consts::PI;

use crate::params::Window;

impl Window {
    /// Window coefficient at normalized position `x`.
    ///
    /// Positions outside [0, 1] are clamped.
    pub fn coefficient(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Window::Hann => hann_window(x),
            Window::Blackman => blackman_window(x),
            Window::Rectangular => 1.0,
            Window::Triangular => triangular_window(x),
        }
    }
}

/// Hann window, 0 at both edges and 1 at the center
pub fn hann_window(x: f64) -> f64 {
    0.5 * (1.0 - (2.0 * PI * x).cos())
}

/// Blackman window, clipped at zero to absorb rounding at the edges
pub fn blackman_window(x: f64) -> f64 {
    (0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()).max(0.0)
}

pub fn triangular_window(x: f64) -> f64 {
    1.0 - (2.0 * (x - 0.5)).abs()
}

/// Normalized antiderivative of the Blackman window.
///
/// Rises from 0 at `x = 0` to 1 at `x = 1`.
pub fn blackman_integral(x: f64) -> f64 {
    x - (0.5 / (2.0 * PI * 0.42)) * (2.0 * PI * x).sin()
        + (0.08 / (4.0 * PI * 0.42)) * (4.0 * PI * x).sin()
}
