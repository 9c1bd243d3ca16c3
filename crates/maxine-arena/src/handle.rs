//! Allocation handles.
//!
//! An [`ArenaHandle`] encodes where an allocation lives within the arena.
//! It is generation-scoped: the `generation` field allows O(1) staleness
//! checks after [`Arena::reset`](crate::Arena::reset).

use std::fmt;

use crate::ELEMENT_WIDTH;

/// Location of one allocation within the arena.
///
/// Handles are plain values; they do not borrow the arena. Resolve them
/// through [`Arena::slice`](crate::Arena::slice) and
/// [`Arena::slice_mut`](crate::Arena::slice_mut).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ArenaHandle {
    /// Arena generation when this allocation was made.
    pub(crate) generation: u32,
    /// Byte offset from the region base. Always a multiple of the alignment.
    pub(crate) offset: usize,
    /// Length of the allocation in bytes.
    pub(crate) len: usize,
}

impl ArenaHandle {
    pub(crate) fn new(generation: u32, offset: usize, len: usize) -> Self {
        Self {
            generation,
            offset,
            len,
        }
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Byte offset of the allocation from the region base.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of whole `f32` elements the allocation holds.
    pub fn elements(&self) -> usize {
        self.len / ELEMENT_WIDTH
    }

    /// One-past-the-end byte offset.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

impl fmt::Display for ArenaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArenaHandle(gen={}, off={}, len={})",
            self.generation, self.offset, self.len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_accessors() {
        let h = ArenaHandle::new(3, 64, 40);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.offset(), 64);
        assert_eq!(h.len(), 40);
        assert_eq!(h.elements(), 10);
        assert_eq!(h.end(), 104);
        assert!(!h.is_empty());
    }

    #[test]
    fn partial_element_rounds_down() {
        let h = ArenaHandle::new(0, 0, 7);
        assert_eq!(h.elements(), 1);
    }

    #[test]
    fn empty_handle() {
        assert!(ArenaHandle::new(0, 8, 0).is_empty());
    }
}
