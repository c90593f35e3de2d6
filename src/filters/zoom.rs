//! Zoom filter: nearest-neighbor scaling with optional pad-and-crop.
//!
//! The frame is resampled to `round(height * vertical) x round(width * horizontal)`
//! and promoted to RGBA. With pad-and-crop the result is placed top-left on a
//! transparent canvas of the original size, so zooming in crops and zooming
//! out leaves transparent borders on the right and bottom.

use ndarray::{s, Array3};
use serde::Deserialize;

use super::core::resize_nearest;
use super::Filter;
use crate::config::{Descriptor, ParamSpec, Params};
use crate::error::Result;
use crate::frame::{self, Frame, FrameContext};

const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 10.0;
const SCALE_STEP: f64 = 0.1;

/// Zoom parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomParams {
    /// Horizontal scale factor.
    pub horizontal: f64,
    /// Vertical scale factor; follows `horizontal` when unset.
    pub vertical: Option<f64>,
    /// Keep the original canvas size.
    pub pad_and_crop: bool,
}

impl Default for ZoomParams {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: None,
            pad_and_crop: true,
        }
    }
}

impl ZoomParams {
    /// Uniform zoom by `factor` on both axes.
    pub fn uniform(factor: f64) -> Self {
        Self {
            horizontal: factor,
            ..Self::default()
        }
    }
}

/// Scaling filter.
#[derive(Debug, Clone)]
pub struct Zoom {
    horizontal: f64,
    vertical: f64,
    pad_and_crop: bool,
}

impl Zoom {
    pub fn new(params: ZoomParams) -> Result<Self> {
        let vertical = params.vertical.unwrap_or(params.horizontal);
        let config = Self::config();
        config.check_number("horizontal", params.horizontal)?;
        config.check_number("vertical", vertical)?;

        Ok(Zoom {
            horizontal: params.horizontal,
            vertical,
            pad_and_crop: params.pad_and_crop,
        })
    }

    /// Effective (horizontal, vertical) scale factors.
    pub fn factors(&self) -> (f64, f64) {
        (self.horizontal, self.vertical)
    }

    pub fn pad_and_crop(&self) -> bool {
        self.pad_and_crop
    }
}

impl Filter for Zoom {
    fn config() -> Descriptor {
        Descriptor::new()
            .with("Horizontal", ParamSpec::double(1.0, MIN_SCALE, MAX_SCALE, SCALE_STEP))
            .with("Vertical", ParamSpec::double(1.0, MIN_SCALE, MAX_SCALE, SCALE_STEP))
            .with("Pad and Crop", ParamSpec::constant(true))
    }

    fn from_params(params: &Params) -> Result<Self> {
        let mut params = params.clone();
        if !params.contains("vertical") {
            if let Some(horizontal) = params.get("horizontal").cloned() {
                params.insert("vertical", horizontal);
            }
        }
        Self::new(Self::config().resolve_into(&params)?)
    }

    fn name(&self) -> &'static str {
        "zoom"
    }

    fn apply(&mut self, frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        let (height, width, _) = frame.dim();
        let zoomed_height = (height as f64 * self.vertical).round() as usize;
        let zoomed_width = (width as f64 * self.horizontal).round() as usize;

        let zoomed = frame::promote_alpha(resize_nearest(frame.view(), zoomed_height, zoomed_width));
        if !self.pad_and_crop {
            return Ok(zoomed);
        }

        let rows = height.min(zoomed_height);
        let cols = width.min(zoomed_width);
        let mut output = Array3::<u8>::zeros((height, width, 4));
        output
            .slice_mut(s![..rows, ..cols, ..])
            .assign(&zoomed.slice(s![..rows, ..cols, ..]));

        Ok(output)
    }
}
