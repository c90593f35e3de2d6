//! Affine filter: general 2D linear transform plus translation.
//!
//! Coordinates are `(row, column)`. Each output pixel samples the input at
//! `matrix⁻¹ · ([y, x] - offset)` using nearest-neighbor interpolation;
//! samples falling outside the frame are transparent black.
//!
//! RGB input is promoted to RGBA first, so in-bounds pixels stay opaque and
//! out-of-bounds pixels become fully transparent.

use serde::Deserialize;
use serde_json::json;

use super::core::{affine_nearest, invert, Matrix2};
use super::Filter;
use crate::config::{Descriptor, ParamSpec, Params};
use crate::error::{FilterError, Result};
use crate::frame::{self, Frame, FrameContext};

/// Affine parameters.
///
/// Kept as nested vectors because they arrive from loosely typed callers;
/// [`Affine::new`] asserts the exact shapes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AffineParams {
    /// 2x2 linear transform, row-major.
    pub matrix: Vec<Vec<f64>>,
    /// Translation `[rows, columns]`.
    pub offset: Vec<f64>,
}

impl Default for AffineParams {
    fn default() -> Self {
        Self {
            matrix: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            offset: vec![0.0, 0.0],
        }
    }
}

/// Affine transform filter.
#[derive(Debug, Clone)]
pub struct Affine {
    matrix: Matrix2,
    inverse: Matrix2,
    offset: [f64; 2],
}

impl Affine {
    /// # Panics
    /// If `matrix` is not exactly 2x2 or `offset` is not exactly length 2.
    pub fn new(params: AffineParams) -> Result<Self> {
        assert_eq!(params.matrix.len(), 2, "affine matrix must have 2 rows");
        assert!(
            params.matrix.iter().all(|row| row.len() == 2),
            "affine matrix must have 2 columns"
        );
        assert_eq!(params.offset.len(), 2, "affine offset must have 2 elements");

        let matrix = [
            [params.matrix[0][0], params.matrix[0][1]],
            [params.matrix[1][0], params.matrix[1][1]],
        ];
        let offset = [params.offset[0], params.offset[1]];

        if matrix.iter().flatten().chain(offset.iter()).any(|v| !v.is_finite()) {
            return Err(FilterError::invalid_parameter(
                "matrix",
                "matrix and offset must be finite",
            ));
        }
        let inverse = invert(&matrix).ok_or_else(|| {
            FilterError::invalid_parameter("matrix", format!("{matrix:?} is singular"))
        })?;

        Ok(Affine {
            matrix,
            inverse,
            offset,
        })
    }

    pub fn matrix(&self) -> &Matrix2 {
        &self.matrix
    }

    pub fn offset(&self) -> [f64; 2] {
        self.offset
    }
}

impl Filter for Affine {
    fn config() -> Descriptor {
        Descriptor::new()
            .with("Matrix", ParamSpec::constant(json!([[1.0, 0.0], [0.0, 1.0]])))
            .with("Offset", ParamSpec::constant(json!([0.0, 0.0])))
    }

    fn from_params(params: &Params) -> Result<Self> {
        Self::new(Self::config().resolve_into(params)?)
    }

    fn name(&self) -> &'static str {
        "affine"
    }

    fn apply(&mut self, frame: Frame, _ctx: &FrameContext) -> Result<Frame> {
        frame::channels(&frame.view())?;

        let frame = frame::promote_alpha(frame);
        Ok(affine_nearest(frame.view(), &self.inverse, self.offset))
    }
}
