//! Capture device interface consumed by the webcam filter.
//!
//! A [`CaptureBackend`] opens a [`CaptureDevice`] for a [`DeviceId`]. The
//! device hands out frames in its native channel order (BGR/BGRA) and
//! releases the underlying handle when dropped, so ownership of the device
//! value is ownership of the hardware.
//!
//! The OpenCV backend is available with the `opencv` feature. Without it,
//! [`default_backend`] refuses to open anything.

#[cfg(feature = "opencv")]
mod opencv_backend;

#[cfg(feature = "opencv")]
pub use self::opencv_backend::OpenCvBackend;

use std::fmt;

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capture device identifier: a numeric index or a path/URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Index(i32),
    Path(String),
}

impl DeviceId {
    /// Zero-based device index, parsing `/dev/videoN` style paths.
    pub fn index(&self) -> Option<i32> {
        match self {
            DeviceId::Index(index) => Some(*index),
            DeviceId::Path(path) => {
                if let Ok(index) = path.parse::<i32>() {
                    return Some(index);
                }
                let stripped = path.strip_prefix("/dev/video")?;
                if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
                    stripped.parse::<i32>().ok()
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceId::Index(index) => write!(f, "#{index}"),
            DeviceId::Path(path) => f.write_str(path),
        }
    }
}

impl From<i32> for DeviceId {
    fn from(index: i32) -> Self {
        DeviceId::Index(index)
    }
}

impl From<&str> for DeviceId {
    fn from(path: &str) -> Self {
        DeviceId::Path(path.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open capture device {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("failed to read frame: {0}")]
    Read(String),
}

/// An open capture device. Dropping it releases the device.
pub trait CaptureDevice: Send {
    /// Read one frame, `(height, width, channels)` in native channel order.
    fn read_frame(&mut self) -> Result<Array3<u8>, CaptureError>;
}

/// Opens capture devices.
pub trait CaptureBackend: Send + Sync {
    fn open(&self, device: &DeviceId) -> Result<Box<dyn CaptureDevice>, CaptureError>;
}

/// Backend used when the crate is built without any capture support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCaptureBackend;

impl CaptureBackend for NoCaptureBackend {
    fn open(&self, device: &DeviceId) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        Err(CaptureError::Open {
            device: device.to_string(),
            reason: "built without a capture backend (enable the `opencv` feature)".to_string(),
        })
    }
}

/// Backend selected by enabled features.
pub fn default_backend() -> Box<dyn CaptureBackend> {
    #[cfg(feature = "opencv")]
    {
        Box::new(OpenCvBackend)
    }
    #[cfg(not(feature = "opencv"))]
    {
        Box::new(NoCaptureBackend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_index_parsing() {
        assert_eq!(DeviceId::Index(2).index(), Some(2));
        assert_eq!(DeviceId::from("/dev/video3").index(), Some(3));
        assert_eq!(DeviceId::from("1").index(), Some(1));
        assert_eq!(DeviceId::from("/dev/video").index(), None);
        assert_eq!(DeviceId::from("rtsp://camera/stream").index(), None);
    }

    #[test]
    fn test_device_id_from_json() {
        let index: DeviceId = serde_json::from_str("0").unwrap();
        assert_eq!(index, DeviceId::Index(0));

        let path: DeviceId = serde_json::from_str(r#""/dev/video1""#).unwrap();
        assert_eq!(path, DeviceId::Path("/dev/video1".to_string()));
    }

    #[test]
    fn test_no_backend_refuses() {
        assert!(matches!(
            NoCaptureBackend.open(&DeviceId::Index(0)),
            Err(CaptureError::Open { .. })
        ));
    }
}
