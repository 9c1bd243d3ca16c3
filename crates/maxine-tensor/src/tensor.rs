//! The tensor view type.

use std::fmt;

use maxine_arena::{Arena, ArenaHandle};

use crate::error::TensorError;
use crate::shape::{Shape, MAX_DIMS};

/// A row-major 3-D view over one arena allocation.
///
/// `Tensor` is `Copy`: it is only a shape and a handle. Its storage lives
/// in the [`Arena`] it was created from and becomes stale when that arena
/// is reset; every accessor then returns
/// [`ArenaError::StaleHandle`](maxine_arena::ArenaError::StaleHandle)
/// wrapped in [`TensorError::Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tensor {
    handle: ArenaHandle,
    shape: Shape,
}

impl Tensor {
    /// Allocate storage for `shape` from `arena`.
    ///
    /// The storage is NOT zeroed; use [`Tensor::zeros`] for a clean tensor.
    /// Fails with [`TensorError::Arena`] if the arena is exhausted, leaving
    /// the arena cursor untouched.
    pub fn create(arena: &mut Arena, shape: Shape) -> Result<Self, TensorError> {
        let handle = arena.alloc_elements(shape.size())?;
        Ok(Self { handle, shape })
    }

    /// Allocate storage for `shape` and fill it with zeros.
    pub fn zeros(arena: &mut Arena, shape: Shape) -> Result<Self, TensorError> {
        let tensor = Self::create(arena, shape)?;
        tensor.data_mut(arena)?.fill(0.0);
        Ok(tensor)
    }

    /// The tensor's shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Row-major strides for the current shape.
    pub fn strides(&self) -> [usize; MAX_DIMS] {
        self.shape.strides()
    }

    /// Total element count.
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Storage size in bytes.
    pub fn byte_len(&self) -> usize {
        self.shape.byte_len()
    }

    /// The arena allocation backing this tensor.
    pub fn handle(&self) -> ArenaHandle {
        self.handle
    }

    /// Whether the storage belongs to the arena's current generation.
    pub fn is_live(&self, arena: &Arena) -> bool {
        self.handle.generation() == arena.generation()
    }

    /// Read the element at `(layer, row, col)`.
    pub fn get(
        &self,
        arena: &Arena,
        layer: usize,
        row: usize,
        col: usize,
    ) -> Result<f32, TensorError> {
        let index = self.shape.flat_index(layer, row, col)?;
        Ok(self.data(arena)?[index])
    }

    /// Mutable reference to the element at `(layer, row, col)`.
    pub fn get_mut<'a>(
        &self,
        arena: &'a mut Arena,
        layer: usize,
        row: usize,
        col: usize,
    ) -> Result<&'a mut f32, TensorError> {
        let index = self.shape.flat_index(layer, row, col)?;
        Ok(&mut self.data_mut(arena)?[index])
    }

    /// Overwrite the element at `(layer, row, col)`.
    pub fn set(
        &self,
        arena: &mut Arena,
        layer: usize,
        row: usize,
        col: usize,
        value: f32,
    ) -> Result<(), TensorError> {
        *self.get_mut(arena, layer, row, col)? = value;
        Ok(())
    }

    /// All elements in row-major order.
    pub fn data<'a>(&self, arena: &'a Arena) -> Result<&'a [f32], TensorError> {
        Ok(arena.slice(self.handle)?)
    }

    /// All elements in row-major order, mutably.
    pub fn data_mut<'a>(&self, arena: &'a mut Arena) -> Result<&'a mut [f32], TensorError> {
        Ok(arena.slice_mut(self.handle)?)
    }

    /// One layer as a contiguous `rows * cols` slice.
    pub fn layer<'a>(&self, arena: &'a Arena, layer: usize) -> Result<&'a [f32], TensorError> {
        let range = self.layer_range(layer)?;
        Ok(&self.data(arena)?[range])
    }

    /// One layer as a contiguous mutable `rows * cols` slice.
    pub fn layer_mut<'a>(
        &self,
        arena: &'a mut Arena,
        layer: usize,
    ) -> Result<&'a mut [f32], TensorError> {
        let range = self.layer_range(layer)?;
        Ok(&mut self.data_mut(arena)?[range])
    }

    fn layer_range(&self, layer: usize) -> Result<std::ops::Range<usize>, TensorError> {
        let start = self.shape.flat_index(layer, 0, 0)?;
        Ok(start..start + self.shape.layer_len())
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor{} ({} elements)", self.shape, self.size())
    }
}
