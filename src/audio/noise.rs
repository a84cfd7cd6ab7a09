//! Pink noise generation for noise synthesis.
//!
//! Noise is built directly in the frequency domain: magnitude falls off as
//! frequency^-0.5 and every bin gets an independent uniform phase.

use rand::Rng;
use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Length of the shared noise loop (seconds)
pub const NOISE_LOOP_SECS: u32 = 10;

/// Half spectrum of a pink noise signal of `size` samples.
///
/// Returns `(size + 1) / 2` bins. The DC bin is zero.
pub fn pink_noise_spectrum<G: Rng>(size: usize, rng: &mut G) -> Vec<Complex<f32>> {
    (0..(size + 1) / 2)
        .map(|i| {
            if i == 0 {
                return Complex::new(0.0, 0.0);
            }
            let magnitude = (i as f32).powf(-0.5);
            let phase = rng.gen_range(-PI..=PI);
            Complex::from_polar(magnitude, phase)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pink_noise_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let noise = pink_noise_spectrum(1001, &mut rng);
        assert_eq!(noise.len(), 501);
        assert_eq!(noise[0].norm(), 0.0);
        assert!((noise[1].norm() - 1.0).abs() < 1e-5);
        assert!((noise[4].norm() - 0.5).abs() < 1e-5);
        assert!((noise[100].norm() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_pink_noise_deterministic() {
        let a = pink_noise_spectrum(64, &mut ChaCha8Rng::seed_from_u64(3));
        let b = pink_noise_spectrum(64, &mut ChaCha8Rng::seed_from_u64(3));
        let c = pink_noise_spectrum(64, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
