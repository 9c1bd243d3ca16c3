//! Dump-file fixtures.
//!
//! The gradient fixture encodes each cell's coordinate in its value
//! (`layer * 100 + row * 10 + col`), so a misplaced element is obvious in
//! an assertion message.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Value stored at `(layer, row, col)` in a gradient fixture.
pub fn gradient_value(layer: usize, row: usize, col: usize) -> f32 {
    (layer * 100 + row * 10 + col) as f32
}

/// Row-major gradient contents for a `depth x rows x cols` tensor.
pub fn gradient_values(depth: usize, rows: usize, cols: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(depth * rows * cols);
    for z in 0..depth {
        for y in 0..rows {
            for x in 0..cols {
                out.push(gradient_value(z, y, x));
            }
        }
    }
    out
}

/// Native-endian byte encoding of `values`, matching the dump format.
pub fn encode_f32s(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Write raw bytes to `dir/name` and return the full path.
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write fixture bytes");
    path
}

/// Write `values` as a raw dump to `dir/name`.
pub fn write_dump(dir: &Path, name: &str, values: &[f32]) -> PathBuf {
    write_bytes(dir, name, &encode_f32s(values))
}

/// Write UTF-8 text to `dir/name`.
pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    write_bytes(dir, name, text.as_bytes())
}

/// A temporary directory that is removed on drop.
pub struct DumpDir {
    dir: TempDir,
}

impl DumpDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory; the file is not created.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a gradient dump of the given shape and return its path.
    pub fn gradient(&self, name: &str, depth: usize, rows: usize, cols: usize) -> PathBuf {
        write_dump(self.path(), name, &gradient_values(depth, rows, cols))
    }

    pub fn dump(&self, name: &str, values: &[f32]) -> PathBuf {
        write_dump(self.path(), name, values)
    }

    pub fn text(&self, name: &str, text: &str) -> PathBuf {
        write_text(self.path(), name, text)
    }
}

impl Default for DumpDir {
    fn default() -> Self {
        Self::new()
    }
}
