//! Error types for tensor access and tensor file I/O.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use maxine_arena::ArenaError;

use crate::shape::{Shape, MAX_DIMS};

/// Errors from tensor construction and element access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorError {
    /// The requested shape is unusable.
    InvalidShape {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A coordinate lies outside the tensor.
    IndexOutOfBounds {
        /// The offending `(layer, row, col)`.
        index: [usize; MAX_DIMS],
        /// The tensor's shape.
        shape: Shape,
    },
    /// The arena refused the allocation or the storage handle is stale.
    Arena(ArenaError),
}

impl TensorError {
    /// Whether this failure is the arena running out of room.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::Arena(ArenaError::CapacityExceeded { .. }))
    }
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { reason } => write!(f, "invalid shape: {reason}"),
            Self::IndexOutOfBounds { index, shape } => {
                write!(
                    f,
                    "index [{}, {}, {}] out of bounds for shape {shape}",
                    index[0], index[1], index[2]
                )
            }
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for TensorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for TensorError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

/// Errors from reading or writing tensor files.
#[derive(Debug)]
pub enum LoadError {
    /// The file does not exist.
    NotFound {
        /// Path that was opened.
        path: PathBuf,
    },
    /// The file size differs from the byte size the shape requires.
    SizeMismatch {
        /// Path that was opened.
        path: PathBuf,
        /// Bytes required by the shape.
        expected: u64,
        /// Bytes found in the file.
        actual: u64,
    },
    /// The file holds more bytes than the tensor can take.
    TooLarge {
        /// Path that was opened.
        path: PathBuf,
        /// Bytes the tensor can hold.
        capacity: u64,
        /// Bytes found in the file.
        actual: u64,
    },
    /// Fewer bytes reached the file than were requested.
    ShortWrite {
        /// Path being written.
        path: PathBuf,
        /// Bytes that should have been written.
        expected: u64,
        /// Bytes written before the failure.
        written: u64,
    },
    /// Any other I/O failure.
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The tensor could not be allocated or accessed.
    Tensor(TensorError),
}

impl LoadError {
    /// Wrap an `io::Error`, mapping `NotFound` to [`LoadError::NotFound`].
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::SizeMismatch {
                path,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "file size mismatch for {}: expected {expected} bytes based on shape, \
                     found {actual} bytes in file",
                    path.display()
                )
            }
            Self::TooLarge {
                path,
                capacity,
                actual,
            } => {
                write!(
                    f,
                    "file too big for specified shape: {} holds {actual} bytes, \
                     tensor holds {capacity}",
                    path.display()
                )
            }
            Self::ShortWrite {
                path,
                expected,
                written,
            } => {
                write!(
                    f,
                    "write failed for {}: {written} of {expected} bytes written",
                    path.display()
                )
            }
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::Tensor(e) => write!(f, "{e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Tensor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TensorError> for LoadError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

impl From<ArenaError> for LoadError {
    fn from(e: ArenaError) -> Self {
        Self::Tensor(TensorError::Arena(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_mapped() {
        let e = LoadError::from_io("missing.bin", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(e, LoadError::NotFound { .. }));
        assert_eq!(e.to_string(), "file not found: missing.bin");
    }

    #[test]
    fn other_io_errors_keep_source() {
        let e = LoadError::from_io("x.bin", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, LoadError::Io { .. }));
        assert!(e.source().is_some());
    }

    #[test]
    fn size_mismatch_reports_both_counts() {
        let e = LoadError::SizeMismatch {
            path: "w.bin".into(),
            expected: 768,
            actual: 100,
        };
        let msg = e.to_string();
        assert!(msg.contains("768"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn out_of_memory_detection() {
        let oom = TensorError::Arena(ArenaError::CapacityExceeded {
            requested: 10,
            available: 0,
            capacity: 8,
        });
        assert!(oom.is_out_of_memory());
        assert!(!TensorError::InvalidShape { reason: "x".into() }.is_out_of_memory());
    }
}
