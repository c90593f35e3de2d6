//! Move filter: translate frame content.
//!
//! Offsets are whole pixels, truncated toward zero. With `relative` the
//! offsets are fractions of the frame width/height.
//!
//! - **Periodic**: circular shift, content leaving one edge re-enters on the
//!   opposite edge.
//! - **Non-periodic**: content shifted off the frame is dropped and the
//!   vacated region is zero (transparent black).
//!
//! Shape and channel count are preserved in both modes.

use serde::Deserialize;

use super::core::{affine_nearest, roll, IDENTITY};
use super::Filter;
use crate::config::{Descriptor, ParamSpec, Params};
use crate::error::Result;
use crate::frame::{self, Frame, FrameContext};

const MAX_OFFSET: f64 = 1024.0;
const OFFSET_STEP: f64 = 0.1;

/// Move parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoveParams {
    /// Column offset (pixels, or fraction of width when relative).
    pub horizontal: f64,
    /// Row offset (pixels, or fraction of height when relative).
    pub vertical: f64,
    pub relative: bool,
    pub periodic: bool,
}

impl Default for MoveParams {
    fn default() -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
            relative: false,
            periodic: true,
        }
    }
}

impl MoveParams {
    /// Absolute periodic shift by `(horizontal, vertical)` pixels.
    pub fn pixels(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
            ..Self::default()
        }
    }
}

/// Translation filter.
#[derive(Debug, Clone)]
pub struct Move {
    params: MoveParams,
}

impl Move {
    pub fn new(params: MoveParams) -> Result<Self> {
        let config = Self::config();
        config.check_number("horizontal", params.horizontal)?;
        config.check_number("vertical", params.vertical)?;
        Ok(Move { params })
    }

    pub fn params(&self) -> &MoveParams {
        &self.params
    }

    /// Pixel offsets `(rows, cols)` for a frame of the given size.
    pub fn pixel_offsets(&self, height: usize, width: usize) -> (i64, i64) {
        let (mut horizontal, mut vertical) = (self.params.horizontal, self.params.vertical);
        if self.params.relative {
            horizontal *= width as f64;
            vertical *= height as f64;
        }
        (vertical.trunc() as i64, horizontal.trunc() as i64)
    }
}

impl Filter for Move {
    fn config() -> Descriptor {
        let defaults = MoveParams::default();
        Descriptor::new()
            .with("Horizontal", ParamSpec::double(defaults.horizontal, -MAX_OFFSET, MAX_OFFSET, OFFSET_STEP))
            .with("Vertical", ParamSpec::double(defaults.vertical, -MAX_OFFSET, MAX_OFFSET, OFFSET_STEP))
            .with("Relative", ParamSpec::boolean(defaults.relative))
            .with("Periodic", ParamSpec::boolean(defaults.periodic))
    }

    fn from_params(params: &Params) -> Result<Self> {
        Self::new(Self::config().resolve_into(params)?)
    }

    fn name(&self) -> &'static str {
        "move"
    }

    fn apply(&mut self, frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        let (height, width, _) = frame.dim();
        let (rows, cols) = self.pixel_offsets(height, width);
        if rows == 0 && cols == 0 {
            return Ok(frame);
        }

        if self.params.periodic {
            Ok(roll(frame.view(), rows, cols))
        } else {
            Ok(affine_nearest(frame.view(), &IDENTITY, [rows as f64, cols as f64]))
        }
    }
}
