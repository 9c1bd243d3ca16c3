//! Test fixtures for Maxine development.
//!
//! Provides deterministic tensor contents ([`gradient_values`]) and helpers
//! for writing raw `f32` dumps and CSV text into temporary directories.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    encode_f32s, gradient_value, gradient_values, write_bytes, write_dump, write_text, DumpDir,
};
