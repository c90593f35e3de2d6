//! Error types for framestag filters.

use thiserror::Error;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors surfaced by filter construction, application and lookup.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Parameter missing, of the wrong type, or outside its declared range.
    #[error("invalid parameter {name:?}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Frame does not have a supported layout.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Capture device could not be acquired.
    #[error("capture device {device} unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    /// A filter with this name is already registered.
    #[error("filter {0:?} is already registered")]
    AlreadyRegistered(String),

    /// No filter is registered under this name.
    #[error("no filter registered under {0:?}")]
    NotFound(String),
}

impl FilterError {
    /// Create an invalid parameter error
    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        FilterError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        FilterError::ShapeMismatch(msg.into())
    }
}
