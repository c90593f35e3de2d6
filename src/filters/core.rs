//! Core resampling utilities shared by the geometric filters.
//!
//! This module provides:
//! - Nearest-neighbor (order-0) resizing
//! - Nearest-neighbor affine resampling with zero fill
//! - Circular shifting
//! - 2x2 matrix inversion
//!
//! All helpers are channel-agnostic: they copy whatever channels the input
//! has. Alpha promotion happens in the calling filter, before resampling.

use ndarray::{Array3, ArrayView3, Axis};
use rayon::prelude::*;

/// 2x2 linear transform in (row, column) order.
pub type Matrix2 = [[f64; 2]; 2];

/// Identity transform.
pub const IDENTITY: Matrix2 = [[1.0, 0.0], [0.0, 1.0]];

/// Map an output index to the nearest source index.
///
/// Corners are aligned: output 0 samples source 0 and the last output
/// samples the last source pixel.
fn source_index(o: usize, in_len: usize, out_len: usize) -> usize {
    if in_len <= 1 || out_len <= 1 {
        return 0;
    }
    let scale = (in_len - 1) as f64 / (out_len - 1) as f64;
    ((o as f64 * scale).round() as usize).min(in_len - 1)
}

/// Resize to `(out_height, out_width)` by nearest-neighbor sampling.
///
/// # Arguments
/// * `input` - Image (height, width, channels)
/// * `out_height` - Output rows
/// * `out_width` - Output columns
///
/// # Returns
/// Resized image with the same channel count
pub fn resize_nearest(input: ArrayView3<u8>, out_height: usize, out_width: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((out_height, out_width, channels));
    if height == 0 || width == 0 {
        return output;
    }

    let rows: Vec<usize> = (0..out_height)
        .map(|y| source_index(y, height, out_height))
        .collect();
    let cols: Vec<usize> = (0..out_width)
        .map(|x| source_index(x, width, out_width))
        .collect();

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let sy = rows[y];
            for (x, &sx) in cols.iter().enumerate() {
                for c in 0..channels {
                    row[[x, c]] = input[[sy, sx, c]];
                }
            }
        });

    output
}

/// Invert a 2x2 matrix. Returns `None` when it is singular.
pub fn invert(matrix: &Matrix2) -> Option<Matrix2> {
    let [[a, b], [c, d]] = *matrix;
    let det = a * d - b * c;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some([[d / det, -b / det], [-c / det, a / det]])
}

/// Nearest-neighbor affine resampling.
///
/// For every output pixel `(y, x)` the source coordinate is
/// `inverse · ([y, x] - offset)`, rounded to the nearest pixel. Source
/// coordinates outside the image produce zero (transparent black).
///
/// # Arguments
/// * `input` - Image (height, width, channels)
/// * `inverse` - Inverse of the forward transform, (row, column) order
/// * `offset` - Forward translation `[rows, columns]`
///
/// # Returns
/// Image of the same shape as `input`
pub fn affine_nearest(input: ArrayView3<u8>, inverse: &Matrix2, offset: [f64; 2]) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let dy = y as f64 - offset[0];
            for x in 0..width {
                let dx = x as f64 - offset[1];
                let sy = (inverse[0][0] * dy + inverse[0][1] * dx).round();
                let sx = (inverse[1][0] * dy + inverse[1][1] * dx).round();

                if sy < 0.0 || sx < 0.0 || sy >= height as f64 || sx >= width as f64 {
                    continue;
                }

                let (sy, sx) = (sy as usize, sx as usize);
                for c in 0..channels {
                    row[[x, c]] = input[[sy, sx, c]];
                }
            }
        });

    output
}

/// Circular shift by `(rows, cols)` pixels; content wraps to the far edge.
pub fn roll(input: ArrayView3<u8>, rows: i64, cols: i64) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));
    if height == 0 || width == 0 {
        return output;
    }

    for y in 0..height {
        let sy = (y as i64 - rows).rem_euclid(height as i64) as usize;
        for x in 0..width {
            let sx = (x as i64 - cols).rem_euclid(width as i64) as usize;
            for c in 0..channels {
                output[[y, x, c]] = input[[sy, sx, c]];
            }
        }
    }

    output
}
