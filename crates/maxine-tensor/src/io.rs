//! Raw binary tensor dumps.
//!
//! The format has no header: a dump is `depth * rows * cols` native-endian
//! `f32`s in row-major order. The shape must be supplied by the caller, so
//! every read path checks the file length against the shape before any
//! byte reaches the arena.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use maxine_arena::{Arena, ELEMENT_WIDTH};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Elements encoded per write call when saving.
const WRITE_CHUNK_ELEMENTS: usize = 4096;

/// How strictly a file's length must match the target tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillPolicy {
    /// File length must equal the tensor's byte size.
    Exact,
    /// File length may be smaller than the tensor; the remainder is left
    /// untouched. Larger files are rejected.
    AtMost,
}

/// Load a dump into a fresh tensor of `shape`, allocated from `arena`.
///
/// The file length must equal `shape.byte_len()` exactly; any mismatch,
/// including a truncated file, returns [`LoadError::SizeMismatch`] before
/// the arena is touched.
pub fn load_binary(
    arena: &mut Arena,
    path: impl AsRef<Path>,
    shape: Shape,
) -> Result<Tensor, LoadError> {
    let path = path.as_ref();
    let (file, actual) = open_with_len(path)?;
    let expected = shape.byte_len() as u64;
    if actual != expected {
        return Err(LoadError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    let tensor = Tensor::create(arena, shape)?;
    info!(bytes = actual, path = %path.display(), "loading dump into arena");
    stream_in(file, tensor.data_mut(arena)?, actual).map_err(|e| LoadError::from_io(path, e))?;
    Ok(tensor)
}

/// Read a dump into an existing tensor's storage.
///
/// Returns the number of bytes read. On a length violation nothing is
/// written and the tensor keeps its previous contents.
pub fn read_into(
    arena: &mut Arena,
    tensor: &Tensor,
    path: impl AsRef<Path>,
    policy: FillPolicy,
) -> Result<u64, LoadError> {
    let path = path.as_ref();
    let (file, actual) = open_with_len(path)?;
    let capacity = tensor.byte_len() as u64;
    match policy {
        FillPolicy::Exact if actual != capacity => {
            return Err(LoadError::SizeMismatch {
                path: path.to_path_buf(),
                expected: capacity,
                actual,
            });
        }
        FillPolicy::AtMost if actual > capacity => {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                capacity,
                actual,
            });
        }
        _ => {}
    }

    stream_in(file, tensor.data_mut(arena)?, actual).map_err(|e| LoadError::from_io(path, e))?;
    debug!(bytes = actual, path = %path.display(), ?policy, "read dump into tensor");
    Ok(actual)
}

/// Write every element of `tensor` to `path`, truncating any existing file.
///
/// Returns the number of bytes written. A write that stalls before all
/// bytes land is reported as [`LoadError::ShortWrite`]; no retry is made.
pub fn save_binary(
    arena: &Arena,
    tensor: &Tensor,
    path: impl AsRef<Path>,
) -> Result<u64, LoadError> {
    let path = path.as_ref();
    let data = tensor.data(arena)?;
    let expected = tensor.byte_len() as u64;
    let mut file = File::create(path).map_err(|e| LoadError::from_io(path, e))?;
    info!(bytes = expected, path = %path.display(), "saving dump");

    let mut written = 0u64;
    let mut buf = Vec::with_capacity(WRITE_CHUNK_ELEMENTS * ELEMENT_WIDTH);
    for chunk in data.chunks(WRITE_CHUNK_ELEMENTS) {
        buf.clear();
        for v in chunk {
            buf.extend_from_slice(&v.to_ne_bytes());
        }
        let mut pos = 0;
        while pos < buf.len() {
            match file.write(&buf[pos..]) {
                Ok(0) => {
                    return Err(LoadError::ShortWrite {
                        path: path.to_path_buf(),
                        expected,
                        written,
                    });
                }
                Ok(n) => {
                    pos += n;
                    written += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(LoadError::from_io(path, e)),
            }
        }
    }
    file.flush().map_err(|e| LoadError::from_io(path, e))?;
    Ok(written)
}

/// Byte length of the file at `path`.
pub fn file_len(path: impl AsRef<Path>) -> Result<u64, LoadError> {
    let path = path.as_ref();
    open_with_len(path).map(|(_, len)| len)
}

fn open_with_len(path: &Path) -> Result<(File, u64), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| LoadError::from_io(path, e))?
        .len();
    Ok((file, len))
}

/// Decode `byte_len` bytes of native-endian `f32`s from `reader` into `out`.
///
/// A trailing partial element is zero-padded in its high bytes. `out` must
/// hold at least `ceil(byte_len / 4)` elements.
fn stream_in<R: Read>(reader: R, out: &mut [f32], byte_len: u64) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let full = (byte_len / ELEMENT_WIDTH as u64) as usize;
    let tail = (byte_len % ELEMENT_WIDTH as u64) as usize;
    let mut buf = [0u8; ELEMENT_WIDTH];
    for slot in &mut out[..full] {
        reader.read_exact(&mut buf)?;
        *slot = f32::from_ne_bytes(buf);
    }
    if tail > 0 {
        let mut partial = [0u8; ELEMENT_WIDTH];
        reader.read_exact(&mut partial[..tail])?;
        out[full] = f32::from_ne_bytes(partial);
    }
    Ok(())
}
