//! Webcam filter: replace the running frame with a captured one.
//!
//! Each `apply` reads one frame from the device, converts it from the
//! device's BGR(A) order to RGB(A) and resizes it to the incoming frame's
//! height and width. An RGBA incoming frame yields RGBA output, with opaque
//! alpha when the device delivers RGB. The incoming pixels are discarded.
//! When the read fails the incoming frame passes through untouched.
//!
//! The device is owned exclusively and released when the filter is dropped.

use ndarray::{s, Array3, Zip};
use serde::Deserialize;
use tracing::{debug, warn};

use super::core::resize_nearest;
use super::Filter;
use crate::capture::{default_backend, CaptureBackend, CaptureDevice, DeviceId};
use crate::config::{Descriptor, ParamSpec, Params};
use crate::error::{FilterError, Result};
use crate::frame::{self, Frame, FrameContext};

/// Webcam parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebcamParams {
    pub device: DeviceId,
}

/// Capture-source filter.
pub struct Webcam {
    device_id: DeviceId,
    device: Box<dyn CaptureDevice>,
}

impl Webcam {
    /// Acquire the device through `backend`.
    pub fn open(params: WebcamParams, backend: &dyn CaptureBackend) -> Result<Self> {
        let device = backend
            .open(&params.device)
            .map_err(|e| FilterError::DeviceUnavailable {
                device: params.device.to_string(),
                reason: e.to_string(),
            })?;
        debug!(device = %params.device, "webcam filter acquired device");

        Ok(Webcam {
            device_id: params.device,
            device,
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }
}

/// Reverse the colour channel order (BGR <-> RGB) in place, leaving alpha
/// untouched. The frame must have at least 3 channels.
pub fn reverse_color_channels(mut frame: Array3<u8>) -> Array3<u8> {
    let (mut first, mut third) = frame.multi_slice_mut((s![.., .., 0], s![.., .., 2]));
    Zip::from(&mut first)
        .and(&mut third)
        .for_each(|a, b| std::mem::swap(a, b));
    frame
}

impl Filter for Webcam {
    fn config() -> Descriptor {
        Descriptor::new().with("Device", ParamSpec::device())
    }

    fn from_params(params: &Params) -> Result<Self> {
        let params: WebcamParams = Self::config().resolve_into(params)?;
        Self::open(params, default_backend().as_ref())
    }

    fn name(&self) -> &'static str {
        "webcam"
    }

    fn apply(&mut self, frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        let captured = match self.device.read_frame() {
            Ok(captured) => captured,
            Err(err) => {
                warn!(device = %self.device_id, error = %err, "capture failed, passing frame through");
                return Ok(frame);
            }
        };
        if let Err(err) = frame::channels(&captured.view()) {
            warn!(device = %self.device_id, error = %err, "unsupported capture layout, passing frame through");
            return Ok(frame);
        }

        let (height, width, channels) = frame.dim();
        let rgb = reverse_color_channels(captured);
        let resized = resize_nearest(rgb.view(), height, width);
        if channels == 4 {
            return Ok(frame::promote_alpha(resized));
        }
        Ok(resized)
    }
}
