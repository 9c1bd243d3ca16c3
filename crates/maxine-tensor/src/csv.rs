//! CSV export and import of a single tensor layer.
//!
//! Export layout:
//!
//! ```text
//! # Maxine Tensor Dump
//! # Shape: [3, 8, 8]
//! # Layer Index: 0
//! A,B,C,D,E,F,G,H
//! 0,1,2,3,4,5,6,7
//! ...
//! ```
//!
//! Import is lenient: blank lines, `#` comments, and lines starting with a
//! letter (header rows) are skipped; rows and columns beyond the layer are
//! ignored; cells that fail to parse keep their previous value.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use maxine_arena::Arena;
use tracing::debug;

use crate::error::LoadError;
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Spreadsheet-style label for column `x`: `A`..`Z`, wrapping after 26.
pub fn column_label(x: usize) -> char {
    (b'A' + (x % 26) as u8) as char
}

/// Outcome of an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows consumed (at most the layer's row count).
    pub rows: usize,
    /// Cells parsed and written.
    pub written: usize,
    /// Cells inside the layer bounds that failed to parse.
    pub skipped: usize,
}

/// Write one layer (`rows * cols` row-major values) as CSV.
pub fn write_layer<W: Write>(
    mut w: W,
    values: &[f32],
    shape: Shape,
    layer: usize,
) -> io::Result<()> {
    writeln!(w, "# Maxine Tensor Dump")?;
    writeln!(w, "# Shape: {shape}")?;
    writeln!(w, "# Layer Index: {layer}")?;

    let header: Vec<String> = (0..shape.cols()).map(|x| column_label(x).to_string()).collect();
    writeln!(w, "{}", header.join(","))?;

    for row in values.chunks(shape.cols()) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(w, "{}", cells.join(","))?;
    }
    w.flush()
}

/// Parse CSV rows from `r` into `values`, a `rows * cols` layer.
pub fn read_layer<R: BufRead>(r: R, values: &mut [f32], shape: Shape) -> io::Result<ImportSummary> {
    let (rows, cols) = (shape.rows(), shape.cols());
    let mut summary = ImportSummary::default();

    for line in r.lines() {
        if summary.rows >= rows {
            break;
        }
        let line = line?;
        let line = line.trim_end_matches('\r');
        match line.chars().next() {
            None => continue,
            Some('#') => continue,
            Some(_) if line.trim().is_empty() => continue,
            // `NaN` and `inf` rows start with a letter but are data.
            Some(c) if c.is_alphabetic() && !has_number(line) => continue,
            Some(_) => {}
        }

        let base = summary.rows * cols;
        for (col, cell) in line.split(',').take(cols).enumerate() {
            match cell.trim().parse::<f32>() {
                Ok(v) => {
                    values[base + col] = v;
                    summary.written += 1;
                }
                Err(_) => summary.skipped += 1,
            }
        }
        summary.rows += 1;
    }
    Ok(summary)
}

fn has_number(line: &str) -> bool {
    line.split(',').any(|cell| cell.trim().parse::<f32>().is_ok())
}

/// Export `layer` of `tensor` to a CSV file at `path`.
pub fn export_layer(
    arena: &Arena,
    tensor: &Tensor,
    layer: usize,
    path: impl AsRef<Path>,
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let values = tensor.layer(arena, layer)?;
    let file = File::create(path).map_err(|e| LoadError::from_io(path, e))?;
    write_layer(BufWriter::new(file), values, tensor.shape(), layer)
        .map_err(|e| LoadError::from_io(path, e))?;
    debug!(layer, path = %path.display(), "exported layer");
    Ok(())
}

/// Import a CSV file at `path` into `layer` of `tensor`.
pub fn import_layer(
    arena: &mut Arena,
    tensor: &Tensor,
    layer: usize,
    path: impl AsRef<Path>,
) -> Result<ImportSummary, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let values = tensor.layer_mut(arena, layer)?;
    let summary = read_layer(BufReader::new(file), values, tensor.shape())
        .map_err(|e| LoadError::from_io(path, e))?;
    debug!(layer, path = %path.display(), ?summary, "imported layer");
    Ok(summary)
}
