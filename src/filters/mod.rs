//! Filter units for the per-frame pipeline.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! ## Architecture
//!
//! Every filter follows these rules:
//! - **Self-describing** - `config()` returns the parameter [`Descriptor`]
//! - **Validated construction** - out-of-range values are rejected, never clamped
//! - **Alpha promotion** - filters that emit RGBA for RGB input add an opaque
//!   alpha channel through [`crate::frame::promote_alpha`]
//! - **Degenerate frames** - zero height or width yields an empty frame
//!
//! ## Filter Units
//!
//! - **Geometric**: flip, zoom, move, affine
//! - **Compositing**: noise
//! - **Sources**: webcam

pub mod core;

pub mod affine;
pub mod flip;
pub mod noise;
pub mod translate;
pub mod webcam;
pub mod zoom;

pub use affine::{Affine, AffineParams};
pub use flip::{Flip, FlipParams};
pub use noise::Noise;
pub use translate::{Move, MoveParams};
pub use webcam::{Webcam, WebcamParams};
pub use zoom::{Zoom, ZoomParams};

use crate::config::{Descriptor, Params};
use crate::error::Result;
use crate::frame::{Frame, FrameContext};

/// Contract implemented by every filter unit.
pub trait Filter: Send {
    /// Parameter schema of this filter type.
    fn config() -> Descriptor
    where
        Self: Sized;

    /// Build from caller-supplied parameters resolved against [`Filter::config`].
    fn from_params(params: &Params) -> Result<Self>
    where
        Self: Sized;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Transform one frame into the next frame of the pipeline.
    fn apply(&mut self, frame: Frame, ctx: &FrameContext) -> Result<Frame>;
}
