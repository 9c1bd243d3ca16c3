//! Interactive key loop.
//!
//! Keys are read in raw mode. Anything that needs a typed line (cell
//! edits and `:` commands) drops back to cooked mode for the prompt and
//! waits for Enter before redrawing, so the result stays readable.

use std::io::{self, BufRead, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use maxine_editor::{CommandError, Outcome, Session};
use tracing::{debug, info};

use crate::error::Result;
use crate::render::render;

/// Restores cooked mode when dropped, including on panic unwind.
pub(crate) struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Switch the terminal to raw mode.
    pub(crate) fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { active: true })
    }

    /// Run `f` in cooked mode, then return to raw mode.
    pub(crate) fn suspend<T>(&mut self, f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
        disable_raw_mode()?;
        self.active = false;
        let result = f();
        enable_raw_mode()?;
        self.active = true;
        result
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
        }
    }
}

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Move the cursor by (rows, cols).
    Move(isize, isize),
    /// Move by this many layers.
    Layer(isize),
    /// Cycle Float, ASCII, Diff.
    ToggleMode,
    /// Save to the source file.
    Save,
    /// Prompt for a new value for the cell under the cursor.
    Edit,
    /// Prompt for a `:` command.
    Command,
    /// Leave the editor.
    Quit,
}

/// Map a key press to an action. Releases and unbound keys give `None`.
pub(crate) fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Char('w') | KeyCode::Up => Action::Move(-1, 0),
        KeyCode::Char('s') | KeyCode::Down => Action::Move(1, 0),
        KeyCode::Char('a') | KeyCode::Left => Action::Move(0, -1),
        KeyCode::Char('d') | KeyCode::Right => Action::Move(0, 1),
        KeyCode::Char('q') | KeyCode::PageUp => Action::Layer(-1),
        KeyCode::Char('e') | KeyCode::PageDown => Action::Layer(1),
        KeyCode::Tab => Action::ToggleMode,
        KeyCode::Char('S') => Action::Save,
        KeyCode::Enter => Action::Edit,
        KeyCode::Char(':') => Action::Command,
        KeyCode::Char('x') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Run the editor until the user quits.
pub(crate) fn run(session: &mut Session) -> Result<()> {
    let mut guard = RawModeGuard::enter()?;
    let mut stdout = io::stdout();
    info!(shape = %session.shape(), "interactive session started");

    loop {
        draw(&mut stdout, session)?;
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(action) = action_for(key) else {
            continue;
        };
        debug!(?action, "key");
        match action {
            Action::Quit => break,
            Action::Move(rows, cols) => {
                session.move_row(rows);
                session.move_col(cols);
            }
            Action::Layer(delta) => session.move_layer(delta),
            Action::ToggleMode => {
                session.toggle_mode();
            }
            Action::Save => {
                let result = session.save();
                guard.suspend(|| acknowledge(&result))?;
            }
            Action::Edit => {
                let line = guard.suspend(|| prompt("Enter new value: "))?;
                // Anything that is not a number leaves the cell alone.
                if let Ok(value) = line.trim().parse::<f32>() {
                    if let Err(e) = session.set_cell(value) {
                        guard.suspend(|| acknowledge(&Err(e)))?;
                    }
                }
            }
            Action::Command => {
                let line = guard.suspend(|| prompt(">> Command: :"))?;
                if !line.trim().is_empty() {
                    let result = session.execute_line(&line);
                    guard.suspend(|| acknowledge(&result))?;
                }
            }
        }
    }

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    stdout.flush()?;
    info!("interactive session ended");
    Ok(())
}

fn draw(out: &mut impl Write, session: &Session) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    // Raw mode disables output newline translation.
    out.write_all(render(session).replace('\n', "\r\n").as_bytes())?;
    out.flush()
}

fn prompt(label: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "\n{label}")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Print a command result and wait for Enter.
fn acknowledge(result: &std::result::Result<Outcome, CommandError>) -> io::Result<()> {
    let mut stdout = io::stdout();
    match result {
        Ok(outcome) => writeln!(stdout, "\n{outcome}")?,
        Err(e) => writeln!(stdout, "\n[ERROR] {e}")?,
    }
    write!(stdout, "(Press Enter)")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
