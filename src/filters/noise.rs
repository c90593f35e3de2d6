//! Noise filter: salt noise.
//!
//! Each pixel independently turns full white with probability
//! [`NOISE_PROBABILITY`]. All channels of a hit pixel (alpha included) are
//! set to 255.
//!
//! ## Supported Formats
//!
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! The frame is modified in place and returned; its shape never changes.

use std::time::{SystemTime, UNIX_EPOCH};

use ndarray::Axis;

use super::Filter;
use crate::config::{Descriptor, Params};
use crate::error::Result;
use crate::frame::{self, Frame, FrameContext};

/// Probability that a pixel is whitened.
pub const NOISE_PROBABILITY: f32 = 0.05;

// ============================================================================
// Simple RNG (deterministic when seeded)
// ============================================================================

/// Simple linear congruential generator.
/// Uses MINSTD parameters.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: (seed % 2147483647).wrapping_add(1), // Avoid zero
        }
    }

    /// Generate next random u32.
    fn next_u32(&mut self) -> u32 {
        // MINSTD LCG
        self.state = self.state.wrapping_mul(48271).wrapping_add(1) % 2147483647;
        self.state as u32
    }

    /// Generate uniform random f32 in [0, 1).
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (2147483647.0f32)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Noise
// ============================================================================

/// Salt noise filter. Generator state carries over between frames.
pub struct Noise {
    rng: SimpleRng,
}

impl Noise {
    /// Noise seeded from the system clock.
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Noise with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Noise {
            rng: SimpleRng::new(seed),
        }
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for Noise {
    fn config() -> Descriptor {
        Descriptor::new()
    }

    fn from_params(params: &Params) -> Result<Self> {
        Self::config().resolve(params)?;
        Ok(Self::new())
    }

    fn name(&self) -> &'static str {
        "noise"
    }

    fn apply(&mut self, mut frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        for mut row in frame.axis_iter_mut(Axis(0)) {
            for mut pixel in row.axis_iter_mut(Axis(0)) {
                if self.rng.next_f32() < NOISE_PROBABILITY {
                    pixel.fill(frame::OPAQUE);
                }
            }
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn white_pixels(frame: &Frame) -> usize {
        frame
            .lanes(Axis(2))
            .into_iter()
            .filter(|px| px.iter().all(|&v| v == 255))
            .count()
    }

    #[test]
    fn test_noise_fraction_converges() {
        let img = Array3::<u8>::zeros((1000, 1000, 3));
        let mut noise = Noise::with_seed(12345);

        let result = noise.apply(img, &FrameContext::default()).unwrap();

        let fraction = white_pixels(&result) as f64 / 1_000_000.0;
        assert!((fraction - 0.05).abs() < 0.01, "fraction was {fraction}");
    }

    #[test]
    fn test_noise_whole_pixel_or_nothing() {
        let img = Array3::<u8>::from_elem((50, 50, 4), 10);
        let mut noise = Noise::with_seed(7);

        let result = noise.apply(img, &FrameContext::default()).unwrap();

        for px in result.lanes(Axis(2)) {
            let all_white = px.iter().all(|&v| v == 255);
            let untouched = px.iter().all(|&v| v == 10);
            assert!(all_white || untouched);
        }
        assert!(white_pixels(&result) > 0);
    }

    #[test]
    fn test_noise_deterministic() {
        let img = Array3::<u8>::zeros((20, 20, 3));

        let result1 = Noise::with_seed(42)
            .apply(img.clone(), &FrameContext::default())
            .unwrap();
        let result2 = Noise::with_seed(42)
            .apply(img, &FrameContext::default())
            .unwrap();

        assert_eq!(result1, result2);
    }

    #[test]
    fn test_noise_keeps_shape_and_empty() {
        let mut noise = Noise::with_seed(1);
        let result = noise
            .apply(Array3::<u8>::zeros((0, 8, 3)), &FrameContext::default())
            .unwrap();
        assert_eq!(result.dim(), (0, 8, 3));
    }

    #[test]
    fn test_noise_rejects_grayscale() {
        let mut noise = Noise::with_seed(1);
        assert!(noise
            .apply(Array3::<u8>::zeros((2, 2, 1)), &FrameContext::default())
            .is_err());
    }

    #[test]
    fn test_noise_config_empty() {
        assert!(Noise::config().is_empty());
        assert!(Noise::from_params(&Params::new()).is_ok());
    }
}
