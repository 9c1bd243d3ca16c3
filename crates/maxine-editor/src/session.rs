//! Editing session: the arena, the tensors, and the cursor/viewport state.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use maxine_arena::Arena;
use maxine_tensor::{
    export_layer, file_len, import_layer, load_binary, read_into, save_binary, FillPolicy,
    LoadError, Shape, Tensor,
};
use tracing::{debug, info, warn};

use crate::catalog::catalog;
use crate::command::Command;
use crate::config::EditorConfig;
use crate::diagnostics::{Distribution, HealthReport, LayerStats};
use crate::error::{CommandError, StartupError};
use crate::transform;

// ── View state ──────────────────────────────────────────────────────

/// Cursor position as (layer, row, column).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Current layer; also selects the layer for layer-scope commands.
    pub layer: usize,
    /// Row within the layer.
    pub row: usize,
    /// Column within the row.
    pub col: usize,
}

/// Top-left corner of the visible window within the current layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub scroll_row: usize,
    /// First visible column.
    pub scroll_col: usize,
}

/// How grid cells are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Fixed-point floats.
    #[default]
    Float,
    /// Each value truncated to a byte and shown as a character.
    Ascii,
    /// `value - ghost` when a ghost tensor is loaded.
    Diff,
}

impl DisplayMode {
    /// The mode after this one in the TAB cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Float => Self::Ascii,
            Self::Ascii => Self::Diff,
            Self::Diff => Self::Float,
        }
    }
}

// ── Outcome ─────────────────────────────────────────────────────────

/// Result of a successful command.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A short confirmation line.
    Message(String),
    /// `stats` of one layer.
    Stats {
        /// Layer scanned.
        layer: usize,
        /// The numbers.
        stats: LayerStats,
    },
    /// `health` of one layer.
    Health {
        /// Layer scanned.
        layer: usize,
        /// The report card.
        report: HealthReport,
    },
    /// `hist` of one layer.
    Histogram {
        /// Layer scanned.
        layer: usize,
        /// Bucket counts, or why there are none.
        distribution: Distribution,
    },
    /// `help` output.
    Help(String),
    /// `agent_capabilities` JSON document.
    Capabilities(String),
}

impl Outcome {
    fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "------------------------------------------------";
        match self {
            Self::Message(m) => write!(f, "{m}"),
            Self::Stats { layer, stats } => write!(f, "Stats (Layer {layer}): {stats}"),
            Self::Health { layer, report } => {
                writeln!(f, "HEALTH REPORT (Layer {layer})")?;
                writeln!(f, "{RULE}")?;
                write!(f, "{report}")?;
                write!(f, "{RULE}")
            }
            Self::Histogram {
                layer,
                distribution,
            } => {
                writeln!(f, "DISTRIBUTION (Layer {layer})")?;
                writeln!(f, "{RULE}")?;
                write!(f, "{distribution}")?;
                write!(f, "{RULE}")
            }
            Self::Help(text) => write!(f, "{}", text.trim_end()),
            Self::Capabilities(json) => write!(f, "{json}"),
        }
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// One editing session.
///
/// Owns the arena and every tensor allocated from it. The primary tensor
/// is always valid: failed commands either leave it untouched or replace
/// it with a defined fallback (see [`CommandError`]).
#[derive(Debug)]
pub struct Session {
    config: EditorConfig,
    arena: Arena,
    tensor: Tensor,
    ghost: Option<Tensor>,
    cursor: Cursor,
    viewport: Viewport,
    mode: DisplayMode,
    source: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    /// Start with a zero-filled tensor of `shape` and no source file.
    pub fn new(config: EditorConfig, shape: Shape) -> Result<Self, StartupError> {
        config.validate()?;
        let mut arena = Arena::init(config.arena.clone())?;
        let tensor = Tensor::zeros(&mut arena, shape)?;
        Ok(Self::from_parts(config, arena, tensor, None))
    }

    /// Start by strictly loading `path` as `shape`.
    ///
    /// The file length must match the shape exactly. Failure here is the
    /// fatal startup case: no session is created.
    pub fn open(
        config: EditorConfig,
        path: impl AsRef<Path>,
        shape: Shape,
    ) -> Result<Self, StartupError> {
        config.validate()?;
        let path = path.as_ref();
        let mut arena = Arena::init(config.arena.clone())?;
        let tensor = load_binary(&mut arena, path, shape)?;
        info!(path = %path.display(), %shape, "session opened");
        Ok(Self::from_parts(
            config,
            arena,
            tensor,
            Some(path.to_path_buf()),
        ))
    }

    fn from_parts(
        config: EditorConfig,
        arena: Arena,
        tensor: Tensor,
        source: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            arena,
            tensor,
            ghost: None,
            cursor: Cursor::default(),
            viewport: Viewport::default(),
            mode: DisplayMode::default(),
            source,
            dirty: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The arena all tensors live in.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The primary tensor.
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// Shape of the primary tensor.
    pub fn shape(&self) -> Shape {
        self.tensor.shape()
    }

    /// The comparison tensor, if a `diff` has loaded one since the last
    /// resize.
    pub fn ghost(&self) -> Option<&Tensor> {
        self.ghost.as_ref()
    }

    /// Cursor position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Viewport origin.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// File the session was opened from, used by a bare `save`.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether the tensor changed since it was created, opened, or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Value of the primary tensor at `(layer, row, col)`.
    pub fn value(&self, layer: usize, row: usize, col: usize) -> Result<f32, CommandError> {
        Ok(self.tensor.get(&self.arena, layer, row, col)?)
    }

    /// `value - ghost` at `(layer, row, col)`, or `None` without a ghost.
    pub fn delta(&self, layer: usize, row: usize, col: usize) -> Result<Option<f32>, CommandError> {
        let Some(ghost) = self.ghost else {
            return Ok(None);
        };
        let v = self.value(layer, row, col)?;
        let g = ghost.get(&self.arena, layer, row, col)?;
        Ok(Some(v - g))
    }

    /// Visible row and column ranges, clipped to the tensor.
    pub fn visible(&self) -> (Range<usize>, Range<usize>) {
        let shape = self.shape();
        let rows = self.viewport.scroll_row
            ..(self.viewport.scroll_row + self.config.view_height).min(shape.rows());
        let cols = self.viewport.scroll_col
            ..(self.viewport.scroll_col + self.config.view_width).min(shape.cols());
        (rows, cols)
    }

    // ── Cursor and view ─────────────────────────────────────────────

    /// Move the cursor `delta` rows, stopping at the edges.
    pub fn move_row(&mut self, delta: isize) {
        self.cursor.row = step(self.cursor.row, delta, self.shape().rows());
        self.follow_cursor();
    }

    /// Move the cursor `delta` columns, stopping at the edges.
    pub fn move_col(&mut self, delta: isize) {
        self.cursor.col = step(self.cursor.col, delta, self.shape().cols());
        self.follow_cursor();
    }

    /// Move `delta` layers, stopping at the first and last layer.
    pub fn move_layer(&mut self, delta: isize) {
        self.cursor.layer = step(self.cursor.layer, delta, self.shape().depth());
    }

    /// Advance the display mode (Float, Ascii, Diff, back to Float).
    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Overwrite the cell under the cursor.
    pub fn set_cell(&mut self, value: f32) -> Result<(), CommandError> {
        let Cursor { layer, row, col } = self.cursor;
        self.tensor.set(&mut self.arena, layer, row, col, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Write the tensor to the source file.
    pub fn save(&mut self) -> Result<Outcome, CommandError> {
        self.execute(Command::Save { path: None })
    }

    /// Scroll the minimum distance that keeps the cursor visible.
    fn follow_cursor(&mut self) {
        let (h, w) = (self.config.view_height, self.config.view_width);
        let (c, v) = (self.cursor, &mut self.viewport);
        if c.row < v.scroll_row {
            v.scroll_row = c.row;
        } else if c.row >= v.scroll_row + h {
            v.scroll_row = c.row + 1 - h;
        }
        if c.col < v.scroll_col {
            v.scroll_col = c.col;
        } else if c.col >= v.scroll_col + w {
            v.scroll_col = c.col + 1 - w;
        }
    }

    fn clamp_cursor(&mut self) {
        let [layer, row, col] = self
            .shape()
            .clamp(self.cursor.layer, self.cursor.row, self.cursor.col);
        self.cursor = Cursor { layer, row, col };
        self.follow_cursor();
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Parse and run one command line.
    ///
    /// The cursor is re-clamped to the tensor afterwards whether the
    /// command succeeded or not.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, CommandError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Run one parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let verb = command.verb();
        let mutates = command.mutates();
        debug!(verb, "dispatching command");
        let result = self.dispatch(command);
        self.clamp_cursor();
        match &result {
            Ok(_) if mutates => {
                self.dirty = true;
                info!(verb, shape = %self.shape(), "tensor modified");
            }
            Ok(_) => {}
            Err(e) => {
                if e.tensor_replaced() {
                    self.dirty = true;
                }
                warn!(error = %e, "command failed");
            }
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let layer = self.cursor.layer;
        match command {
            Command::New { dims } => {
                let shape = Shape::from_dims(&dims)?;
                self.rebuild(shape)?;
                Ok(Outcome::message(format!("Created new tensor {shape}")))
            }
            Command::Open { path, dims } => {
                let shape = Shape::from_dims(&dims)?;
                self.rebuild(shape)?;
                match read_into(&mut self.arena, &self.tensor, &path, FillPolicy::AtMost) {
                    Ok(bytes) => {
                        let msg = format!("Opened {} as {shape} ({bytes} bytes)", path.display());
                        self.source = Some(path);
                        Ok(Outcome::Message(msg))
                    }
                    Err(source) => Err(CommandError::ResizedWithoutData { shape, source }),
                }
            }
            Command::Load { path } => {
                let bytes = read_into(&mut self.arena, &self.tensor, &path, FillPolicy::Exact)?;
                Ok(Outcome::message(format!(
                    "Loaded {} ({bytes} bytes)",
                    path.display()
                )))
            }
            Command::Save { path } => {
                let path = path
                    .or_else(|| self.source.clone())
                    .ok_or(CommandError::NoSavePath)?;
                let bytes = save_binary(&self.arena, &self.tensor, &path)?;
                self.dirty = false;
                Ok(Outcome::message(format!(
                    "Saved {bytes} bytes to {}",
                    path.display()
                )))
            }
            Command::Export { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(format!("layer_{layer}.csv")));
                export_layer(&self.arena, &self.tensor, layer, &path)?;
                Ok(Outcome::message(format!(
                    "Exported layer {layer} to {}",
                    path.display()
                )))
            }
            Command::Import { path } => {
                let summary = import_layer(&mut self.arena, &self.tensor, layer, &path)?;
                Ok(Outcome::message(format!(
                    "Imported {} into layer {layer} ({} cells, {} skipped)",
                    path.display(),
                    summary.written,
                    summary.skipped
                )))
            }
            Command::Goto { layer, row, col } => {
                let [layer, row, col] = self.shape().clamp(layer, row, col);
                self.cursor = Cursor { layer, row, col };
                self.viewport = Viewport {
                    scroll_row: row.saturating_sub(self.config.view_height / 2),
                    scroll_col: col.saturating_sub(self.config.view_width / 2),
                };
                Ok(Outcome::message(format!(
                    "Jumped to [{layer}, {row}, {col}]"
                )))
            }
            Command::Clip { min, max } => {
                transform::clip(self.tensor.data_mut(&mut self.arena)?, min, max);
                Ok(Outcome::message(format!(
                    "Clipped values between {min} and {max}."
                )))
            }
            Command::Norm => {
                transform::normalize(self.tensor.data_mut(&mut self.arena)?);
                Ok(Outcome::message("Normalized to 0.0 - 1.0 range."))
            }
            Command::Zero => {
                transform::fill(self.layer_mut(layer)?, 0.0);
                Ok(Outcome::message(format!("Zeroed layer {layer}.")))
            }
            Command::Fill { value } => {
                transform::fill(self.layer_mut(layer)?, value);
                Ok(Outcome::message(format!("Filled layer {layer} with {value}.")))
            }
            Command::Relu => {
                transform::relu(self.layer_mut(layer)?);
                Ok(Outcome::message(format!("Applied ReLU to layer {layer}.")))
            }
            Command::Sigmoid => {
                transform::sigmoid(self.layer_mut(layer)?);
                Ok(Outcome::message(format!(
                    "Applied sigmoid to layer {layer}."
                )))
            }
            Command::Stats => Ok(Outcome::Stats {
                layer,
                stats: LayerStats::compute(self.layer(layer)?),
            }),
            Command::Health => Ok(Outcome::Health {
                layer,
                report: HealthReport::scan(self.layer(layer)?, self.config.health_thresholds()),
            }),
            Command::Hist => Ok(Outcome::Histogram {
                layer,
                distribution: Distribution::compute(
                    self.layer(layer)?,
                    self.config.histogram_bins,
                    self.config.histogram_bar_width,
                ),
            }),
            Command::Diff { path } => self.load_ghost(&path),
            Command::Help { topic: None } => Ok(Outcome::Help(catalog().overview())),
            Command::Help { topic: Some(topic) } => {
                let name = topic.strip_prefix(':').unwrap_or(&topic);
                catalog()
                    .detail(name)
                    .map(Outcome::Help)
                    .ok_or(CommandError::UnknownTopic { topic })
            }
            Command::AgentCapabilities => {
                Ok(Outcome::Capabilities(catalog().capabilities().to_json()?))
            }
        }
    }

    /// Reset the arena and replace the tensor with a zeroed one of `shape`.
    ///
    /// The ghost is dropped, since its storage is gone. If `shape` does
    /// not fit, the tensor becomes 1x1x1 and `OutOfMemory` is returned.
    fn rebuild(&mut self, shape: Shape) -> Result<(), CommandError> {
        self.arena.reset();
        self.ghost = None;
        if self.mode == DisplayMode::Diff {
            self.mode = DisplayMode::Float;
        }
        self.cursor = Cursor::default();
        self.viewport = Viewport::default();

        match Tensor::zeros(&mut self.arena, shape) {
            Ok(t) => {
                self.tensor = t;
                info!(%shape, used = self.arena.used(), "tensor rebuilt");
                Ok(())
            }
            Err(e) if e.is_out_of_memory() => {
                warn!(%shape, capacity = self.arena.capacity(), "out of memory; using 1x1x1");
                self.tensor = Tensor::zeros(&mut self.arena, Shape::unit())?;
                Err(CommandError::OutOfMemory { requested: shape })
            }
            Err(e) => {
                // Still hand back a valid tensor.
                self.tensor = Tensor::zeros(&mut self.arena, Shape::unit())?;
                Err(e.into())
            }
        }
    }

    /// Read `path` into the ghost tensor, allocating it on first use.
    ///
    /// The size check happens before any allocation, so a mismatched file
    /// leaves the ghost exactly as it was.
    fn load_ghost(&mut self, path: &Path) -> Result<Outcome, CommandError> {
        let actual = file_len(path)?;
        let expected = self.tensor.byte_len() as u64;
        if actual != expected {
            return Err(LoadError::SizeMismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            }
            .into());
        }

        let shape = self.shape();
        let ghost = match self.ghost {
            Some(g) if g.is_live(&self.arena) && g.shape() == shape => g,
            _ => Tensor::create(&mut self.arena, shape)?,
        };
        read_into(&mut self.arena, &ghost, path, FillPolicy::Exact)?;
        self.ghost = Some(ghost);
        self.mode = DisplayMode::Diff;
        Ok(Outcome::message(format!(
            "Loaded comparison file {} (TAB toggles diff view)",
            path.display()
        )))
    }

    fn layer(&self, layer: usize) -> Result<&[f32], CommandError> {
        Ok(self.tensor.layer(&self.arena, layer)?)
    }

    fn layer_mut(&mut self, layer: usize) -> Result<&mut [f32], CommandError> {
        Ok(self.tensor.layer_mut(&mut self.arena, layer)?)
    }
}

/// `pos + delta`, clamped to `[0, len - 1]`.
fn step(pos: usize, delta: isize, len: usize) -> usize {
    pos.saturating_add_signed(delta).min(len.saturating_sub(1))
}
