//! The bump-allocated backing region.
//!
//! An [`Arena`] is a single pre-reserved `Vec<f32>` with a byte cursor that
//! advances on each allocation. Allocations are never freed individually;
//! [`Arena::reset`] rewinds the cursor and invalidates every outstanding
//! [`ArenaHandle`].

use std::fmt;
use std::ops::Range;

use tracing::{debug, info, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::ArenaHandle;
use crate::ELEMENT_WIDTH;

/// Kind of memory behind the arena region.
///
/// Informational only; every backing honours the same allocation contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaBacking {
    /// Ordinary host memory from the global allocator.
    Host,
}

impl fmt::Display for ArenaBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "CPU RAM"),
        }
    }
}

/// A fixed-capacity linear allocator.
///
/// The region is reserved and zeroed once in [`Arena::init`]. The byte
/// cursor satisfies `0 <= used() <= capacity()` at all times, and each
/// returned handle starts at a multiple of the configured alignment from
/// the region base.
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<f32>,
    /// Capacity in bytes.
    capacity: usize,
    /// Bump pointer: bytes handed out so far, including padding.
    offset: usize,
    alignment: usize,
    /// Bumped on every reset; handles from older generations are stale.
    generation: u32,
    backing: ArenaBacking,
}

impl Arena {
    /// Reserve the backing region described by `config`.
    ///
    /// Fails with [`ArenaError::BackingAllocationFailed`] if the system
    /// allocator cannot provide the region. Callers treat that as fatal.
    pub fn init(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let len = config.capacity_bytes / ELEMENT_WIDTH;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ArenaError::BackingAllocationFailed {
                bytes: config.capacity_bytes,
            })?;
        data.resize(len, 0.0);

        let backing = ArenaBacking::Host;
        info!(
            megabytes = config.megabytes(),
            bytes = config.capacity_bytes,
            %backing,
            "arena allocated"
        );

        Ok(Self {
            data,
            capacity: config.capacity_bytes,
            offset: 0,
            alignment: config.alignment,
            generation: 0,
            backing,
        })
    }

    /// Shorthand for [`Arena::init`] with the default alignment.
    pub fn with_capacity(capacity_bytes: usize) -> Result<Self, ArenaError> {
        Self::init(ArenaConfig::new(capacity_bytes))
    }

    /// Bump-allocate `size_bytes` bytes.
    ///
    /// Padding is inserted first so the allocation starts on an alignment
    /// boundary. If `padding + size_bytes` does not fit, the cursor is left
    /// untouched and [`ArenaError::CapacityExceeded`] is returned.
    ///
    /// The returned region is NOT zeroed: it may hold bytes from before the
    /// last reset.
    pub fn alloc(&mut self, size_bytes: usize) -> Result<ArenaHandle, ArenaError> {
        let padding = (self.alignment - self.offset % self.alignment) % self.alignment;
        let end = self
            .offset
            .checked_add(padding)
            .and_then(|start| start.checked_add(size_bytes));

        match end {
            Some(end) if end <= self.capacity => {
                let start = self.offset + padding;
                self.offset = end;
                debug!(offset = start, len = size_bytes, padding, "arena alloc");
                Ok(ArenaHandle::new(self.generation, start, size_bytes))
            }
            _ => {
                let err = ArenaError::CapacityExceeded {
                    requested: padding.saturating_add(size_bytes),
                    available: self.remaining(),
                    capacity: self.capacity,
                };
                warn!(%err, "arena allocation refused");
                Err(err)
            }
        }
    }

    /// Allocate room for `count` `f32` elements.
    pub fn alloc_elements(&mut self, count: usize) -> Result<ArenaHandle, ArenaError> {
        match count.checked_mul(ELEMENT_WIDTH) {
            Some(bytes) => self.alloc(bytes),
            None => Err(ArenaError::CapacityExceeded {
                requested: usize::MAX,
                available: self.remaining(),
                capacity: self.capacity,
            }),
        }
    }

    /// Get a shared slice of the elements behind `handle`.
    pub fn slice(&self, handle: ArenaHandle) -> Result<&[f32], ArenaError> {
        let range = self.resolve(handle)?;
        Ok(&self.data[range])
    }

    /// Get a mutable slice of the elements behind `handle`.
    pub fn slice_mut(&mut self, handle: ArenaHandle) -> Result<&mut [f32], ArenaError> {
        let range = self.resolve(handle)?;
        Ok(&mut self.data[range])
    }

    /// Rewind the cursor to zero in O(1).
    ///
    /// Every outstanding handle becomes stale. The backing memory is NOT
    /// zeroed; callers needing a clean buffer must zero after the next
    /// allocation.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.generation = self.generation.wrapping_add(1);
        debug!(generation = self.generation, "arena reset");
    }

    /// Release the backing region.
    ///
    /// Consumes the arena, so no handle can be resolved afterwards.
    pub fn free(self) {
        info!(bytes = self.capacity, "arena released");
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Remaining free capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    /// Alignment applied to every allocation.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Current generation. Starts at 0 and increments on each reset.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The kind of memory behind the region.
    pub fn backing(&self) -> ArenaBacking {
        self.backing
    }

    /// Check a handle against this arena and map it to an element range.
    fn resolve(&self, handle: ArenaHandle) -> Result<Range<usize>, ArenaError> {
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: handle.generation,
                current_generation: self.generation,
            });
        }
        if handle.end() > self.offset {
            return Err(ArenaError::OutOfBounds {
                offset: handle.offset,
                len: handle.len,
                used: self.offset,
            });
        }
        let start = handle.offset / ELEMENT_WIDTH;
        Ok(start..start + handle.elements())
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("offset", &self.offset)
            .field("alignment", &self.alignment)
            .field("generation", &self.generation)
            .field("backing", &self.backing)
            .finish()
    }
}
