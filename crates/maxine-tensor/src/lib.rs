//! Strided 3-D tensor views over arena storage.
//!
//! A [`Tensor`] is a shape plus an [`ArenaHandle`](maxine_arena::ArenaHandle);
//! it owns no memory itself. Element access goes through the owning
//! [`Arena`](maxine_arena::Arena) and is bounds-checked here, so callers
//! cannot reach outside `[0, shape[i])` on any axis.
//!
//! # File formats
//!
//! - **Binary dump** ([`io`]): headerless native-endian `f32`s, row-major
//!   over (depth, row, column). Shape is never stored in the file.
//! - **CSV layer** ([`csv`]): one 2-D layer as comma-separated text with a
//!   `#` comment header and a column-letter row.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod csv;
pub mod error;
pub mod io;
pub mod shape;
pub mod tensor;

pub use csv::{column_label, export_layer, import_layer, ImportSummary};
pub use error::{LoadError, TensorError};
pub use io::{file_len, load_binary, read_into, save_binary, FillPolicy};
pub use shape::{row_major_strides, Dims, Shape, MAX_DIMS};
pub use tensor::Tensor;
