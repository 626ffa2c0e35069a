//! Terminal session lifecycle and frame presentation over crossterm.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event as cte;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::warn;

use crate::event::Event;
use crate::frame::Frame;
use crate::runtime::{EventSource, Presenter};
use crate::style::{Rgba, Style};

/// RAII guard for raw mode, the alternate screen, and mouse capture.
///
/// Dropping the session restores the terminal; errors during restore are
/// logged and swallowed since they typically mean the terminal is gone.
#[derive(Debug)]
pub struct TerminalSession {
    mouse: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    pub fn new(mouse: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        if mouse {
            execute!(out, cte::EnableMouseCapture)?;
        }
        Ok(Self { mouse })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.mouse && execute!(out, cte::DisableMouseCapture).is_err() {
            warn!("failed to disable mouse capture on teardown");
        }
        if execute!(out, Show, LeaveAlternateScreen).is_err() {
            warn!("failed to leave alternate screen on teardown");
        }
        if disable_raw_mode().is_err() {
            warn!("failed to disable raw mode on teardown");
        }
    }
}

/// Input events from the live terminal.
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if !cte::poll(timeout)? {
            return Ok(None);
        }
        let raw = cte::read()?;
        Ok(Event::from_crossterm(raw))
    }
}

/// Full-frame presenter writing to stdout.
///
/// Repaints every row each frame. The UI is small enough that diffing
/// buys nothing over a batched repaint here.
#[derive(Debug)]
pub struct TerminalPresenter {
    out: Stdout,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self { out: io::stdout() }
    }
}

impl TerminalPresenter {
    /// Create a presenter over stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb {
        r: rgba.r(),
        g: rgba.g(),
        b: rgba.b(),
    }
}

fn apply_style(out: &mut Stdout, style: Style) -> io::Result<()> {
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(to_color(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(to_color(bg)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.reversed {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

impl Presenter for TerminalPresenter {
    fn dimensions(&self) -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let buffer = &frame.buffer;
        let mut current: Option<Style> = None;

        for y in 0..buffer.height() {
            queue!(self.out, MoveTo(0, y))?;
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if cell.is_continuation() {
                    continue;
                }
                if current != Some(cell.style) {
                    apply_style(&mut self.out, cell.style)?;
                    current = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }
}
