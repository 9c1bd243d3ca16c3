//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing region could not be reserved at startup.
    BackingAllocationFailed {
        /// Number of bytes requested from the system allocator.
        bytes: usize,
    },
    /// The arena configuration is unusable.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The request does not fit in the remaining capacity.
    CapacityExceeded {
        /// Number of bytes requested (including alignment padding).
        requested: usize,
        /// Bytes still free before the request.
        available: usize,
        /// Total arena capacity in bytes.
        capacity: usize,
    },
    /// An [`ArenaHandle`](crate::ArenaHandle) issued before the last reset.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The arena's current generation.
        current_generation: u32,
    },
    /// A handle whose range lies outside this arena's live allocations.
    OutOfBounds {
        /// Byte offset encoded in the handle.
        offset: usize,
        /// Length in bytes encoded in the handle.
        len: usize,
        /// Bytes currently handed out by the arena.
        used: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackingAllocationFailed { bytes } => {
                write!(f, "failed to reserve {bytes} bytes for the arena")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::CapacityExceeded {
                requested,
                available,
                capacity,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes, \
                     {available} of {capacity} bytes available"
                )
            }
            Self::StaleHandle {
                handle_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, arena is at {current_generation}"
                )
            }
            Self::OutOfBounds { offset, len, used } => {
                write!(
                    f,
                    "handle range {offset}..{} exceeds {used} allocated bytes",
                    offset + len
                )
            }
        }
    }
}

impl Error for ArenaError {}
