//! framestag
//!
//! Per-frame video/image filter units with typed, self-describing
//! configuration, and Python bindings via PyO3.
//!
//! ## Frame Format
//! Frames are `ndarray::Array3<u8>` in (height, width, channels) layout:
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! Filters that produce RGBA from RGB input synthesize an opaque alpha
//! channel before any resampling. Geometric filters sample with
//! nearest-neighbor interpolation and fill out-of-bounds pixels with
//! transparent black.
//!
//! ## Filter Architecture
//! Each unit implements [`filters::Filter`]: `config()` publishes a
//! [`config::Descriptor`], `from_params` validates caller values against it,
//! and `apply` maps one frame to the next. A [`registry::FilterRegistry`]
//! maps names to factories, and [`chain::FilterChain`] runs a sequence of
//! filters once per tick.
//!
//! ```
//! use framestag::config::Params;
//! use framestag::frame::FrameContext;
//! use framestag::registry;
//! use ndarray::Array3;
//!
//! let mut zoom = registry::global()
//!     .build("zoom", &Params::new().with("horizontal", 2.0))
//!     .unwrap();
//! let frame = Array3::<u8>::zeros((48, 64, 3));
//! let out = zoom.apply(frame, &FrameContext::default()).unwrap();
//! assert_eq!(out.dim(), (48, 64, 4));
//! ```

pub mod capture;
pub mod chain;
pub mod config;
pub mod error;
pub mod filters;
pub mod frame;
pub mod registry;

pub use chain::{FilterChain, FilterSpec};
pub use config::{Descriptor, ParamSpec, ParamType, Params};
pub use error::{FilterError, Result};
pub use filters::Filter;
pub use frame::{Frame, FrameContext};
pub use registry::{FilterEntry, FilterRegistry};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::config::Params;
    use crate::error::FilterError;
    use crate::filters::{
        Affine, AffineParams, Filter, Flip, FlipParams, Move, MoveParams, Noise, Zoom, ZoomParams,
    };
    use crate::frame::FrameContext;
    use crate::registry;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::NotFound(_) => PyKeyError::new_err(err.to_string()),
                FilterError::DeviceUnavailable { .. } => PyRuntimeError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    fn run<'py, F: Filter>(
        py: Python<'py>,
        filter: &mut F,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array().to_owned();
        let result = filter.apply(input, &FrameContext::default())?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Geometric Filters
    // ========================================================================

    /// Mirror an RGB/RGBA u8 image left-right and/or top-bottom.
    #[pyfunction]
    #[pyo3(signature = (image, horizontal=true, vertical=false))]
    pub fn flip<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        horizontal: bool,
        vertical: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut filter = Flip::new(FlipParams { horizontal, vertical });
        run(py, &mut filter, image)
    }

    /// Nearest-neighbor zoom. Output is RGBA.
    ///
    /// # Arguments
    /// * `image` - Input image (3 or 4 channels)
    /// * `horizontal` - Horizontal scale (0.1-10)
    /// * `vertical` - Vertical scale (0.1-10), defaults to `horizontal`
    /// * `pad_and_crop` - Keep the original canvas size
    #[pyfunction]
    #[pyo3(signature = (image, horizontal=1.0, vertical=None, pad_and_crop=true))]
    pub fn zoom<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        horizontal: f64,
        vertical: Option<f64>,
        pad_and_crop: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut filter = Zoom::new(ZoomParams {
            horizontal,
            vertical,
            pad_and_crop,
        })?;
        run(py, &mut filter, image)
    }

    /// Translate frame content, wrapping around when `periodic`.
    #[pyfunction]
    #[pyo3(signature = (image, horizontal=0.0, vertical=0.0, relative=false, periodic=true))]
    pub fn move_frame<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        horizontal: f64,
        vertical: f64,
        relative: bool,
        periodic: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut filter = Move::new(MoveParams {
            horizontal,
            vertical,
            relative,
            periodic,
        })?;
        run(py, &mut filter, image)
    }

    /// General affine transform in (row, column) coordinates. Output is RGBA.
    #[pyfunction]
    #[pyo3(signature = (image, matrix=None, offset=None))]
    pub fn affine<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        matrix: Option<Vec<Vec<f64>>>,
        offset: Option<Vec<f64>>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let defaults = AffineParams::default();
        let params = AffineParams {
            matrix: matrix.unwrap_or(defaults.matrix),
            offset: offset.unwrap_or(defaults.offset),
        };
        if params.matrix.len() != 2
            || params.matrix.iter().any(|row| row.len() != 2)
            || params.offset.len() != 2
        {
            return Err(PyValueError::new_err(
                "matrix must be 2x2 and offset must have 2 elements",
            ));
        }
        let mut filter = Affine::new(params)?;
        run(py, &mut filter, image)
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Whiten 5% of pixels at random.
    #[pyfunction]
    #[pyo3(signature = (image, seed=None))]
    pub fn noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut filter = match seed {
            Some(seed) => Noise::with_seed(seed),
            None => Noise::new(),
        };
        run(py, &mut filter, image)
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Names of all registered filters.
    #[pyfunction]
    pub fn filter_names() -> Vec<String> {
        registry::global()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Parameter descriptor of a filter as a JSON string.
    #[pyfunction]
    pub fn filter_config(name: &str) -> PyResult<String> {
        let descriptor = registry::global().resolve(name)?.config();
        serde_json::to_string(&descriptor).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Apply a registered filter once, with parameters given as a JSON object.
    #[pyfunction]
    #[pyo3(signature = (name, image, params_json="{}"))]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        name: &str,
        image: PyReadonlyArray3<'py, u8>,
        params_json: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = Params::from_json(params_json)?;
        let mut filter = registry::global().build(name, &params)?;
        let input = image.as_array().to_owned();
        let result = filter.apply(input, &FrameContext::default())?;
        Ok(result.into_pyarray(py))
    }

    #[pymodule]
    pub fn framestag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Geometric filters
        m.add_function(wrap_pyfunction!(flip, m)?)?;
        m.add_function(wrap_pyfunction!(zoom, m)?)?;
        m.add_function(wrap_pyfunction!(move_frame, m)?)?;
        m.add_function(wrap_pyfunction!(affine, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(noise, m)?)?;

        // Registry
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;
        m.add_function(wrap_pyfunction!(filter_config, m)?)?;
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::framestag;
