//! Error types for command parsing, command execution, and session startup.

use std::error::Error;
use std::fmt;

use maxine_arena::ArenaError;
use maxine_tensor::{LoadError, Shape, TensorError};

use crate::config::ConfigError;

// ── ParseError ─────────────────────────────────────────────────────

/// A command line that could not be turned into a [`Command`](crate::Command).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The line held no verb.
    Empty,
    /// The verb is not in the catalog.
    UnknownCommand {
        /// The verb as typed.
        verb: String,
    },
    /// Missing, extra, or malformed arguments.
    Usage {
        /// Canonical verb name.
        verb: &'static str,
        /// Argument signature from the catalog.
        args: &'static str,
    },
    /// An argument parsed but is not acceptable.
    InvalidArgument {
        /// Canonical verb name.
        verb: &'static str,
        /// What was wrong.
        reason: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::UnknownCommand { verb } => write!(f, "unknown command '{verb}'"),
            Self::Usage { verb, args } if args.is_empty() => write!(f, "usage: :{verb}"),
            Self::Usage { verb, args } => write!(f, "usage: :{verb} {args}"),
            Self::InvalidArgument { verb, reason } => write!(f, ":{verb}: {reason}"),
        }
    }
}

impl Error for ParseError {}

// ── CommandError ───────────────────────────────────────────────────

/// A command that parsed but failed to apply.
///
/// Every variant leaves the session's tensor valid. Two variants report
/// that the tensor was replaced before the failure:
/// [`OutOfMemory`](CommandError::OutOfMemory) and
/// [`ResizedWithoutData`](CommandError::ResizedWithoutData).
#[derive(Debug)]
pub enum CommandError {
    /// The line did not parse.
    Parse(ParseError),
    /// A shape or coordinate was rejected. Nothing was changed.
    Tensor(TensorError),
    /// A file could not be read or written. Nothing was changed.
    Load(LoadError),
    /// The arena could not hold the requested shape; the tensor is now
    /// the 1x1x1 fallback.
    OutOfMemory {
        /// The shape that did not fit.
        requested: Shape,
    },
    /// `open` resized the tensor but could not read the file; the tensor
    /// is zero-filled at the new shape.
    ResizedWithoutData {
        /// The new shape.
        shape: Shape,
        /// Why the file was not read.
        source: LoadError,
    },
    /// `help` was asked about a command that does not exist.
    UnknownTopic {
        /// The topic as typed.
        topic: String,
    },
    /// `save` without a path in a session that has no source file.
    NoSavePath,
    /// The capability document could not be serialized.
    Serialize(serde_json::Error),
}

impl CommandError {
    /// Whether the command replaced the tensor before failing.
    pub fn tensor_replaced(&self) -> bool {
        matches!(
            self,
            Self::OutOfMemory { .. } | Self::ResizedWithoutData { .. }
        )
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Tensor(e) => write!(f, "{e}"),
            Self::Load(e) => write!(f, "{e}"),
            Self::OutOfMemory { requested } => {
                write!(
                    f,
                    "out of memory allocating {requested}; fell back to [1, 1, 1]"
                )
            }
            Self::ResizedWithoutData { shape, source } => {
                write!(f, "resized to {shape} but the file was not read: {source}")
            }
            Self::UnknownTopic { topic } => write!(f, "unknown command '{topic}'"),
            Self::NoSavePath => write!(f, "no file to save to; use :save <file>"),
            Self::Serialize(e) => write!(f, "capability export failed: {e}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Tensor(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::ResizedWithoutData { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<TensorError> for CommandError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

impl From<ArenaError> for CommandError {
    fn from(e: ArenaError) -> Self {
        Self::Tensor(TensorError::Arena(e))
    }
}

impl From<LoadError> for CommandError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

// ── StartupError ───────────────────────────────────────────────────

/// Failures while creating a [`Session`](crate::Session).
///
/// These are the fatal cases: the caller has no valid session to fall
/// back to.
#[derive(Debug)]
pub enum StartupError {
    /// The configuration did not validate.
    Config(ConfigError),
    /// The backing region could not be reserved.
    Arena(ArenaError),
    /// The initial tensor could not be created.
    Tensor(TensorError),
    /// The initial dump could not be loaded.
    Load(LoadError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Arena(e) => write!(f, "arena init failed: {e}"),
            Self::Tensor(e) => write!(f, "initial tensor: {e}"),
            Self::Load(e) => write!(f, "{e}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Arena(e) => Some(e),
            Self::Tensor(e) => Some(e),
            Self::Load(e) => Some(e),
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ArenaError> for StartupError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<TensorError> for StartupError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

impl From<LoadError> for StartupError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}
