//! Frame rendering.
//!
//! [`render`] turns a session into one text frame. It never touches the
//! terminal, so it can be tested and reused by the batch runner.

use std::fmt::Write as _;

use crossterm::style::{StyledContent, Stylize};
use maxine_editor::{DisplayMode, Session};

/// Values above this are drawn in bold red.
const HOT: f32 = 100.0;

/// Width of one grid cell, excluding the separator.
const CELL: usize = 8;

const RULE: &str = "--------------------------------------------------------------------------------";

const CONTROLS: &str =
    "[WASD] Move | [Q/E] Layer | [TAB] Float/ASCII/Diff | [S] Save | [Enter] Edit | [:] Command | [x] Quit";

/// Colour class for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    /// Large positive value, or a positive diff.
    Hot,
    /// Positive value.
    Positive,
    /// Negative value, or a negative diff.
    Negative,
    /// Zero, or a diff within epsilon.
    Neutral,
}

impl Tone {
    /// Tone of a plain value.
    pub(crate) fn of_value(v: f32) -> Self {
        if v > HOT {
            Self::Hot
        } else if v > 0.0 {
            Self::Positive
        } else if v < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Tone of `value - ghost`, ignoring differences within `epsilon`.
    pub(crate) fn of_delta(d: f32, epsilon: f32) -> Self {
        if d > epsilon {
            Self::Hot
        } else if d < -epsilon {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    fn paint(self, text: String) -> StyledContent<String> {
        match self {
            Self::Hot => text.red().bold(),
            Self::Positive => text.yellow(),
            Self::Negative => text.cyan(),
            Self::Neutral => text.dark_grey(),
        }
    }
}

/// Text of one cell in ASCII mode: the value truncated to a byte, quoted
/// when printable.
pub(crate) fn ascii_cell(v: f32) -> String {
    // `as u8` saturates and maps NaN to 0.
    let byte = v as u8;
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("{:>width$}", format!("'{}'", byte as char), width = CELL - 2) + "  "
    } else {
        format!("{:>width$}", ".", width = CELL - 4) + "    "
    }
}

/// Draw the session as one frame. Lines are separated by `\n`.
pub(crate) fn render(session: &Session) -> String {
    let mut out = String::new();
    let shape = session.shape();
    let cursor = session.cursor();
    let mode = session.mode();
    let epsilon = session.config().diff_epsilon;
    let (rows, cols) = session.visible();

    let label = if mode == DisplayMode::Ascii {
        "[ASCII]"
    } else {
        "[FLOAT]"
    };
    let _ = write!(
        out,
        "MAXINE TENSOR EDITOR | Layer {}/{} {label}",
        cursor.layer,
        shape.depth() - 1
    );
    if session.is_dirty() {
        let _ = write!(out, " [MODIFIED]");
    }
    if mode == DisplayMode::Diff {
        let _ = write!(out, " [DIFF MODE]");
        if session.ghost().is_none() {
            let _ = write!(out, " (no comparison loaded; use :diff <file>)");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Pos: [{}, {}, {}]  View: {}-{} | {}-{}",
        cursor.layer,
        cursor.row,
        cursor.col,
        rows.start,
        rows.end.saturating_sub(1),
        cols.start,
        cols.end.saturating_sub(1),
    );
    let _ = writeln!(out, "{RULE}");

    let _ = write!(out, "     ");
    for c in cols.clone() {
        let _ = write!(out, "{:>CELL$} ", maxine_tensor::column_label(c));
    }
    let _ = writeln!(out);

    for r in rows {
        let _ = write!(out, "{r:3} |");
        for c in cols.clone() {
            let value = session.value(cursor.layer, r, c).unwrap_or(f32::NAN);
            let delta = match mode {
                DisplayMode::Diff => session.delta(cursor.layer, r, c).ok().flatten(),
                _ => None,
            };
            let (text, tone) = match (mode, delta) {
                (DisplayMode::Ascii, _) => (ascii_cell(value) + " ", Tone::of_value(value)),
                (_, Some(d)) => (format!("{d:CELL$.2} "), Tone::of_delta(d, epsilon)),
                _ => (format!("{value:CELL$.2} "), Tone::of_value(value)),
            };
            let styled = tone.paint(text);
            if r == cursor.row && c == cursor.col {
                let _ = write!(out, "{}", styled.reverse());
            } else {
                let _ = write!(out, "{styled}");
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{CONTROLS}");
    out
}

/// Strip ANSI escape sequences, leaving the visible text.
#[cfg(test)]
fn visible_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}
