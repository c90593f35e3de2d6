//! Frame layout shared by every filter.
//!
//! A frame is a dense `(height, width, channels)` array of `u8` values:
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! Any other channel count is rejected with [`FilterError::ShapeMismatch`].

use ndarray::{s, Array3, ArrayView3};

use crate::error::{FilterError, Result};

/// One pipeline frame, `(height, width, channels)`.
pub type Frame = Array3<u8>;

/// Fully opaque alpha value.
pub const OPAQUE: u8 = 255;

/// Ambient values handed to every `apply` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameContext {
    /// Index of the current pipeline tick.
    pub tick: u64,
}

impl FrameContext {
    pub fn new(tick: u64) -> Self {
        FrameContext { tick }
    }
}

/// Check that a frame is RGB or RGBA and return its channel count.
pub fn channels(frame: &ArrayView3<u8>) -> Result<usize> {
    match frame.dim().2 {
        c @ (3 | 4) => Ok(c),
        c => Err(FilterError::shape(format!(
            "expected 3 or 4 channels, got {c} (shape {:?})",
            frame.shape()
        ))),
    }
}

/// Promote an RGB frame to RGBA by appending an opaque alpha channel.
///
/// RGBA frames are returned untouched. Every filter that may hand back a
/// 4-channel frame for 3-channel input goes through here.
pub fn promote_alpha(frame: Frame) -> Frame {
    let (height, width, channels) = frame.dim();
    if channels != 3 {
        return frame;
    }

    let mut output = Array3::<u8>::from_elem((height, width, 4), OPAQUE);
    output.slice_mut(s![.., .., ..3]).assign(&frame);
    output
}
