//! OpenCV-backed capture devices.

use ndarray::Array3;
use opencv::{
    core::{Mat, MatTraitConst, MatTraitConstManual},
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use tracing::{info, warn};

use super::{CaptureBackend, CaptureDevice, CaptureError, DeviceId};

/// Opens cameras by index (V4L first) or streams/files by URI.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvBackend;

impl OpenCvBackend {
    fn open_capture(device: &DeviceId) -> Result<VideoCapture, CaptureError> {
        let open_err = |reason: String| CaptureError::Open {
            device: device.to_string(),
            reason,
        };

        if let Some(index) = device.index() {
            for backend in [videoio::CAP_V4L, videoio::CAP_ANY] {
                match VideoCapture::new(index, backend) {
                    Ok(cap) if cap.is_opened().map_err(|e| open_err(e.to_string()))? => {
                        return Ok(cap);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%device, backend, error = %err, "failed to open capture device");
                    }
                }
            }
            return Err(open_err("device did not open".to_string()));
        }

        let uri = device.to_string();
        let cap = VideoCapture::from_file(&uri, videoio::CAP_ANY)
            .map_err(|e| open_err(e.to_string()))?;
        if !cap.is_opened().map_err(|e| open_err(e.to_string()))? {
            return Err(open_err("source did not open".to_string()));
        }
        Ok(cap)
    }
}

impl CaptureBackend for OpenCvBackend {
    fn open(&self, device: &DeviceId) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        let capture = Self::open_capture(device)?;
        info!(%device, "opened capture device");
        Ok(Box::new(OpenCvDevice {
            capture,
            device: device.clone(),
            frame: Mat::default(),
        }))
    }
}

/// Exclusive handle to one OpenCV capture; released on drop.
struct OpenCvDevice {
    capture: VideoCapture,
    device: DeviceId,
    frame: Mat,
}

impl CaptureDevice for OpenCvDevice {
    fn read_frame(&mut self) -> Result<Array3<u8>, CaptureError> {
        let read_err = |e: opencv::Error| CaptureError::Read(e.to_string());

        if !self.capture.read(&mut self.frame).map_err(read_err)? {
            return Err(CaptureError::Read("device returned no frame".to_string()));
        }

        let size = self.frame.size().map_err(read_err)?;
        if size.width <= 0 || size.height <= 0 {
            return Err(CaptureError::Read("device returned an empty frame".to_string()));
        }

        let channels = self.frame.channels() as usize;
        let data = self.frame.data_bytes().map_err(read_err)?.to_vec();
        Array3::from_shape_vec((size.height as usize, size.width as usize, channels), data)
            .map_err(|e| CaptureError::Read(e.to_string()))
    }
}

impl Drop for OpenCvDevice {
    fn drop(&mut self) {
        match self.capture.release() {
            Ok(()) => info!(device = %self.device, "released capture device"),
            Err(err) => warn!(device = %self.device, error = %err, "failed to release capture device"),
        }
    }
}
