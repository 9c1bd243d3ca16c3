//! Maxine: an arena-backed editor for raw `f32` tensor dumps.
//!
//! This facade re-exports the public API of the Maxine sub-crates. The
//! `maxine` binary lives in `maxine-cli`; everything it does goes through
//! the types here.
//!
//! # Quick start
//!
//! ```rust
//! use maxine::prelude::*;
//!
//! let shape = Shape::new(3, 8, 8).unwrap();
//! let mut session = Session::new(EditorConfig::default(), shape).unwrap();
//! session.execute_line(":fill 3.14").unwrap();
//! let outcome = session.execute_line("stats").unwrap();
//! assert!(outcome.to_string().starts_with("Stats (Layer 0): Min=3.14"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `maxine-arena` | Bump allocator and generation-checked handles |
//! | [`tensor`] | `maxine-tensor` | Shapes, tensors, binary dumps and CSV layers |
//! | [`editor`] | `maxine-editor` | Commands, sessions, transforms and diagnostics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Bump allocator (`maxine-arena`).
pub use maxine_arena as arena;

/// Shapes, tensors, and file formats (`maxine-tensor`).
///
/// [`tensor::load_binary`] and [`tensor::save_binary`] read and write the
/// headerless native-endian dump format.
pub use maxine_tensor as tensor;

/// The command processor (`maxine-editor`).
///
/// [`editor::Session`] owns all state; [`editor::Command`] is the parsed
/// form of one command line.
pub use maxine_editor as editor;

/// Common imports for typical Maxine usage.
///
/// ```rust
/// use maxine::prelude::*;
/// ```
pub mod prelude {
    // Storage
    pub use maxine_arena::{Arena, ArenaConfig, ArenaError};

    // Tensors and files
    pub use maxine_tensor::{load_binary, save_binary, LoadError, Shape, Tensor, TensorError};

    // Editing
    pub use maxine_editor::{
        catalog, Command, CommandError, DisplayMode, EditorConfig, Outcome, Session,
        StartupError,
    };
}
