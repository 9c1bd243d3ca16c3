//! Linear (bump) arena backing all tensor storage in the Maxine editor.
//!
//! One fixed-capacity region is reserved at startup and handed out in
//! 8-byte aligned slices. Nothing is freed individually: the whole arena
//! is rewound with [`Arena::reset`] and released when it is dropped.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── Vec<f32> backing region (capacity_bytes / 4 elements, zeroed once)
//! ├── offset (bytes handed out so far, monotonically advancing)
//! └── generation (bumped on every reset)
//!
//! ArenaHandle { generation, offset, len }   <- returned by alloc()
//! ```
//!
//! # Reset safety
//!
//! Every handle records the generation it was allocated in. After a
//! reset, resolving an older handle yields [`ArenaError::StaleHandle`]
//! instead of reading memory that now belongs to someone else.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;

pub use arena::{Arena, ArenaBacking};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::ArenaHandle;

/// Width in bytes of one stored element (`f32`).
pub const ELEMENT_WIDTH: usize = std::mem::size_of::<f32>();
