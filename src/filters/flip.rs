//! Flip filter: mirror left-right and/or top-bottom.
//!
//! Flips commute, so applying both is a 180° rotation regardless of order.
//! Channel count is preserved.

use ndarray::{s, Array3, ArrayView3};
use serde::Deserialize;

use super::Filter;
use crate::config::{Descriptor, ParamSpec, Params};
use crate::error::Result;
use crate::frame::{self, Frame, FrameContext};

/// Flip parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlipParams {
    /// Reverse column order.
    pub horizontal: bool,
    /// Reverse row order.
    pub vertical: bool,
}

impl Default for FlipParams {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: false,
        }
    }
}

/// Mirror filter.
#[derive(Debug, Clone)]
pub struct Flip {
    params: FlipParams,
}

impl Flip {
    pub fn new(params: FlipParams) -> Self {
        Flip { params }
    }

    pub fn params(&self) -> &FlipParams {
        &self.params
    }
}

/// Flip image horizontally (mirror left-right).
pub fn flip_horizontal(image: ArrayView3<u8>) -> Array3<u8> {
    image.slice(s![.., ..;-1, ..]).to_owned()
}

/// Flip image vertically (mirror top-bottom).
pub fn flip_vertical(image: ArrayView3<u8>) -> Array3<u8> {
    image.slice(s![..;-1, .., ..]).to_owned()
}

impl Filter for Flip {
    fn config() -> Descriptor {
        let defaults = FlipParams::default();
        Descriptor::new()
            .with("Horizontal", ParamSpec::boolean(defaults.horizontal))
            .with("Vertical", ParamSpec::boolean(defaults.vertical))
    }

    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(Self::config().resolve_into(params)?))
    }

    fn name(&self) -> &'static str {
        "flip"
    }

    fn apply(&mut self, mut frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        if self.params.horizontal {
            frame = flip_horizontal(frame.view());
        }
        if self.params.vertical {
            frame = flip_vertical(frame.view());
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image() -> Array3<u8> {
        // 2x3 RGB image with distinct column values
        let mut img = Array3::<u8>::zeros((2, 3, 3));
        for y in 0..2 {
            for x in 0..3 {
                img[[y, x, 0]] = (y * 3 + x) as u8 * 10;
                img[[y, x, 1]] = x as u8;
                img[[y, x, 2]] = y as u8;
            }
        }
        img
    }

    fn ctx() -> FrameContext {
        FrameContext::default()
    }

    #[test]
    fn test_flip_horizontal() {
        let img = create_test_image();
        let mut flip = Flip::new(FlipParams::default());

        let result = flip.apply(img.clone(), &ctx()).unwrap();

        assert_eq!(result.dim(), img.dim());
        assert_eq!(result[[0, 0, 0]], img[[0, 2, 0]]);
        assert_eq!(result[[1, 2, 0]], img[[1, 0, 0]]);
    }

    #[test]
    fn test_flip_vertical() {
        let img = create_test_image();
        let mut flip = Flip::new(FlipParams {
            horizontal: false,
            vertical: true,
        });

        let result = flip.apply(img.clone(), &ctx()).unwrap();

        assert_eq!(result[[0, 1, 0]], img[[1, 1, 0]]);
        assert_eq!(result[[1, 1, 0]], img[[0, 1, 0]]);
    }

    #[test]
    fn test_flip_both_is_rotate_180() {
        let img = create_test_image();
        let mut flip = Flip::new(FlipParams {
            horizontal: true,
            vertical: true,
        });

        let result = flip.apply(img.clone(), &ctx()).unwrap();

        assert_eq!(result[[0, 0, 0]], img[[1, 2, 0]]);
        assert_eq!(result[[1, 2, 0]], img[[0, 0, 0]]);
    }

    #[test]
    fn test_flip_disabled_is_identity() {
        let img = create_test_image();
        let mut flip = Flip::new(FlipParams {
            horizontal: false,
            vertical: false,
        });

        assert_eq!(flip.apply(img.clone(), &ctx()).unwrap(), img);
    }

    #[test]
    fn test_flip_involution() {
        let img = create_test_image();
        for params in [
            FlipParams { horizontal: true, vertical: false },
            FlipParams { horizontal: false, vertical: true },
        ] {
            let mut flip = Flip::new(params);
            let once = flip.apply(img.clone(), &ctx()).unwrap();
            let twice = flip.apply(once, &ctx()).unwrap();
            assert_eq!(twice, img);
        }
    }

    #[test]
    fn test_flip_keeps_channels() {
        let img = Array3::<u8>::zeros((4, 4, 3));
        let mut flip = Flip::new(FlipParams::default());
        assert_eq!(flip.apply(img, &ctx()).unwrap().dim(), (4, 4, 3));
    }

    #[test]
    fn test_flip_from_params_defaults() {
        let flip = Flip::from_params(&Params::new()).unwrap();
        assert_eq!(*flip.params(), FlipParams::default());

        let flip = Flip::from_params(&Params::new().with("Vertical", true)).unwrap();
        assert!(flip.params().horizontal && flip.params().vertical);
    }

    #[test]
    fn test_flip_empty_frame() {
        let mut flip = Flip::new(FlipParams::default());
        let result = flip.apply(Array3::<u8>::zeros((0, 3, 4)), &ctx()).unwrap();
        assert_eq!(result.dim(), (0, 3, 4));
    }
}
