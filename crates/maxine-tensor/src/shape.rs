//! Tensor shapes and row-major stride arithmetic.
//!
//! Stride computation lives here, independent of any storage, so the
//! coordinate-to-offset mapping can be tested on its own.

use std::fmt;

use smallvec::SmallVec;

use crate::error::TensorError;

/// Number of logical axes: (depth, row, column).
pub const MAX_DIMS: usize = 3;

/// Dimension list as parsed from user input, before validation.
pub type Dims = SmallVec<[usize; MAX_DIMS]>;

/// Row-major strides for `dims`: column stride 1, row stride = columns,
/// depth stride = rows * columns.
pub fn row_major_strides(dims: [usize; MAX_DIMS]) -> [usize; MAX_DIMS] {
    [dims[1] * dims[2], dims[2], 1]
}

/// A validated 3-D shape.
///
/// Every axis is at least 1 and the element count fits in `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: [usize; MAX_DIMS],
}

impl Shape {
    /// Create a shape from explicit depth, rows, and columns.
    pub fn new(depth: usize, rows: usize, cols: usize) -> Result<Self, TensorError> {
        let dims = [depth, rows, cols];
        if dims.contains(&0) {
            return Err(TensorError::InvalidShape {
                reason: format!("dimensions must be > 0, got {depth}x{rows}x{cols}"),
            });
        }
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .and_then(|n| n.checked_mul(maxine_arena::ELEMENT_WIDTH))
            .ok_or_else(|| TensorError::InvalidShape {
                reason: format!("{depth}x{rows}x{cols} overflows the address space"),
            })?;
        Ok(Self { dims })
    }

    /// Create a shape from 1 to 3 dimensions. Missing trailing axes
    /// default to 1, so `[5]` becomes `5x1x1`.
    pub fn from_dims(dims: &[usize]) -> Result<Self, TensorError> {
        if dims.is_empty() || dims.len() > MAX_DIMS {
            return Err(TensorError::InvalidShape {
                reason: format!("expected 1 to {MAX_DIMS} dimensions, got {}", dims.len()),
            });
        }
        let mut full = [1usize; MAX_DIMS];
        full[..dims.len()].copy_from_slice(dims);
        Self::new(full[0], full[1], full[2])
    }

    /// A single-element shape, used as the out-of-memory fallback.
    pub fn unit() -> Self {
        Self { dims: [1, 1, 1] }
    }

    /// Number of layers (axis 0).
    pub fn depth(&self) -> usize {
        self.dims[0]
    }

    /// Rows per layer (axis 1).
    pub fn rows(&self) -> usize {
        self.dims[1]
    }

    /// Columns per row (axis 2).
    pub fn cols(&self) -> usize {
        self.dims[2]
    }

    /// All three dimensions.
    pub fn dims(&self) -> [usize; MAX_DIMS] {
        self.dims
    }

    /// Row-major strides for this shape.
    pub fn strides(&self) -> [usize; MAX_DIMS] {
        row_major_strides(self.dims)
    }

    /// Total element count.
    pub fn size(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Elements in one layer.
    pub fn layer_len(&self) -> usize {
        self.dims[1] * self.dims[2]
    }

    /// Total size in bytes when stored as `f32`.
    pub fn byte_len(&self) -> usize {
        self.size() * maxine_arena::ELEMENT_WIDTH
    }

    /// Flat offset of `(layer, row, col)`, or an error if any coordinate is
    /// outside its axis.
    pub fn flat_index(&self, layer: usize, row: usize, col: usize) -> Result<usize, TensorError> {
        let index = [layer, row, col];
        if index.iter().zip(self.dims.iter()).any(|(&i, &d)| i >= d) {
            return Err(TensorError::IndexOutOfBounds {
                index,
                shape: *self,
            });
        }
        let strides = self.strides();
        Ok(layer * strides[0] + row * strides[1] + col * strides[2])
    }

    /// Clamp each coordinate to `[0, dim - 1]`.
    pub fn clamp(&self, layer: usize, row: usize, col: usize) -> [usize; MAX_DIMS] {
        [
            layer.min(self.dims[0] - 1),
            row.min(self.dims[1] - 1),
            col.min(self.dims[2] - 1),
        ]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.dims[0], self.dims[1], self.dims[2])
    }
}
