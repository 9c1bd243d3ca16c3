//! Command processor for the Maxine tensor editor.
//!
//! A [`Session`] owns the arena, the primary tensor, an optional ghost
//! tensor used for diffing, and the cursor/viewport state. Text command
//! lines are parsed into a [`Command`] and applied with
//! [`Session::execute`], which returns a typed [`Outcome`] on success or a
//! [`CommandError`] on failure. Nothing in this crate touches the terminal.
//!
//! # Scope of operations
//!
//! - **Layer scope** (current layer only): `zero`, `fill`, `relu`,
//!   `sigmoid`, `stats`, `health`, `hist`, `export`, `import`.
//! - **Global scope** (whole tensor): `clip`, `norm`, `load`, `save`, `diff`.
//! - **Shape changing**: `new`/`resize` and `open` reset the arena, which
//!   also drops the ghost tensor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod session;
pub mod transform;

pub use catalog::{catalog, Capabilities, Capability, Catalog, HelpEntry};
pub use command::Command;
pub use config::{ConfigError, EditorConfig};
pub use diagnostics::{Distribution, HealthReport, HealthThresholds, Histogram, LayerStats};
pub use error::{CommandError, ParseError, StartupError};
pub use session::{Cursor, DisplayMode, Outcome, Session, Viewport};
