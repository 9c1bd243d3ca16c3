//! Command-line tokenization.
//!
//! A command is a whitespace-separated line whose first token is the verb
//! (with or without a leading `:`). Arguments are positional; missing,
//! extra, or malformed arguments produce [`ParseError::Usage`] and the
//! session is not touched.

use std::path::PathBuf;
use std::str::{FromStr, SplitWhitespace};

use maxine_tensor::{Dims, MAX_DIMS};

use crate::catalog::catalog;
use crate::error::ParseError;

/// A parsed command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `new d h w`: reset the arena and create a zeroed tensor.
    New {
        /// One to three dimensions; missing trailing axes default to 1.
        dims: Dims,
    },
    /// `open file d h w`: resize, zero-fill, then read up to the new size.
    Open {
        /// Dump to read.
        path: PathBuf,
        /// One to three dimensions.
        dims: Dims,
    },
    /// `load file`: read a dump of exactly the current size.
    Load {
        /// Dump to read.
        path: PathBuf,
    },
    /// `save [file]`: write the whole tensor.
    Save {
        /// Target, or the session's source file when omitted.
        path: Option<PathBuf>,
    },
    /// `export [file]`: write the current layer as CSV.
    Export {
        /// Target, or `layer_<n>.csv` when omitted.
        path: Option<PathBuf>,
    },
    /// `import file`: read CSV into the current layer.
    Import {
        /// CSV file to read.
        path: PathBuf,
    },
    /// `goto l r c`: move the cursor (clamped) and recenter the view.
    Goto {
        /// Target layer.
        layer: usize,
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },
    /// `clip min max` over the whole tensor.
    Clip {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// `norm`: rescale the whole tensor to `[0, 1]`.
    Norm,
    /// `zero`: current layer to 0.
    Zero,
    /// `fill val`: current layer to `val`.
    Fill {
        /// Value to write.
        value: f32,
    },
    /// `relu` on the current layer.
    Relu,
    /// `sigmoid` on the current layer.
    Sigmoid,
    /// `stats` of the current layer.
    Stats,
    /// `health` scan of the current layer.
    Health,
    /// `hist` of the current layer.
    Hist,
    /// `diff file`: load a comparison dump into the ghost tensor.
    Diff {
        /// Dump to compare against.
        path: PathBuf,
    },
    /// `help [cmd]`.
    Help {
        /// Command to describe, or the full table when omitted.
        topic: Option<String>,
    },
    /// `agent_capabilities`: emit the catalog as JSON.
    AgentCapabilities,
}

impl Command {
    /// Parse one command line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        let raw = tokens.next().ok_or(ParseError::Empty)?;
        let raw = raw.strip_prefix(':').unwrap_or(raw);
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }
        let verb = catalog()
            .canonical(raw)
            .ok_or_else(|| ParseError::UnknownCommand {
                verb: raw.to_string(),
            })?;
        let mut args = Args::new(verb, tokens);

        let command = match verb {
            "new" => Self::New {
                dims: args.dims()?,
            },
            "open" => Self::Open {
                path: args.path()?,
                dims: args.dims()?,
            },
            "load" => Self::Load { path: args.path()? },
            "save" => Self::Save {
                path: args.optional().map(PathBuf::from),
            },
            "export" => Self::Export {
                path: args.optional().map(PathBuf::from),
            },
            "import" => Self::Import { path: args.path()? },
            "goto" => Self::Goto {
                layer: args.number()?,
                row: args.number()?,
                col: args.number()?,
            },
            "clip" => {
                let min: f32 = args.number()?;
                let max: f32 = args.number()?;
                if min.is_nan() || max.is_nan() || min > max {
                    return Err(ParseError::InvalidArgument {
                        verb,
                        reason: format!("min must not exceed max, got {min} > {max}"),
                    });
                }
                Self::Clip { min, max }
            }
            "norm" => Self::Norm,
            "zero" => Self::Zero,
            "fill" => Self::Fill {
                value: args.number()?,
            },
            "relu" => Self::Relu,
            "sigmoid" => Self::Sigmoid,
            "stats" => Self::Stats,
            "health" => Self::Health,
            "hist" => Self::Hist,
            "diff" => Self::Diff { path: args.path()? },
            "help" => Self::Help {
                topic: args.optional().map(str::to_string),
            },
            "agent_capabilities" => Self::AgentCapabilities,
            _ => {
                return Err(ParseError::UnknownCommand {
                    verb: raw.to_string(),
                })
            }
        };
        args.finish()?;
        Ok(command)
    }

    /// Canonical verb of this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::New { .. } => "new",
            Self::Open { .. } => "open",
            Self::Load { .. } => "load",
            Self::Save { .. } => "save",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::Goto { .. } => "goto",
            Self::Clip { .. } => "clip",
            Self::Norm => "norm",
            Self::Zero => "zero",
            Self::Fill { .. } => "fill",
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Stats => "stats",
            Self::Health => "health",
            Self::Hist => "hist",
            Self::Diff { .. } => "diff",
            Self::Help { .. } => "help",
            Self::AgentCapabilities => "agent_capabilities",
        }
    }

    /// Whether this command can change tensor contents or shape.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::New { .. }
                | Self::Open { .. }
                | Self::Load { .. }
                | Self::Import { .. }
                | Self::Clip { .. }
                | Self::Norm
                | Self::Zero
                | Self::Fill { .. }
                | Self::Relu
                | Self::Sigmoid
        )
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Positional argument reader for one verb.
struct Args<'a> {
    verb: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(verb: &'static str, tokens: SplitWhitespace<'a>) -> Self {
        Self { verb, tokens }
    }

    fn usage(&self) -> ParseError {
        usage(self.verb)
    }

    fn required(&mut self) -> Result<&'a str, ParseError> {
        self.tokens.next().ok_or_else(|| self.usage())
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    fn path(&mut self) -> Result<PathBuf, ParseError> {
        self.required().map(PathBuf::from)
    }

    fn number<T: FromStr>(&mut self) -> Result<T, ParseError> {
        let token = self.required()?;
        token.parse().map_err(|_| self.usage())
    }

    /// Remaining tokens as 1 to 3 dimensions.
    fn dims(&mut self) -> Result<Dims, ParseError> {
        let mut dims = Dims::new();
        let verb = self.verb;
        for token in self.tokens.by_ref() {
            if dims.len() == MAX_DIMS {
                return Err(usage(verb));
            }
            dims.push(token.parse().map_err(|_| usage(verb))?);
        }
        if dims.is_empty() {
            return Err(self.usage());
        }
        Ok(dims)
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(_) => Err(self.usage()),
            None => Ok(()),
        }
    }
}

fn usage(verb: &'static str) -> ParseError {
    ParseError::Usage {
        verb,
        args: catalog().lookup(verb).map_or("", |e| e.args),
    }
}
