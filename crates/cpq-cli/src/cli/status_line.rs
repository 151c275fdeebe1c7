//! Terminal-backed status line: carriage-return rewrite on stderr.

use std::io::{self, Write};

use cpq_core::render::StatusLine;

/// Rewrites a single stderr line in place, padding over the previous
/// content so shorter lines do not leave residue.
#[derive(Debug, Default)]
pub struct TerminalStatusLine {
    last_len: usize,
}

impl TerminalStatusLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusLine for TerminalStatusLine {
    fn width(&self) -> usize {
        terminal_width()
    }

    fn show(&mut self, line: &str) {
        let shown = line.chars().count();
        let pad = self.last_len.saturating_sub(shown);
        let mut err = io::stderr();
        let _ = write!(err, "\r{}{}", line, " ".repeat(pad));
        let _ = err.flush();
        self.last_len = shown;
    }

    fn clear(&mut self) {
        if self.last_len == 0 {
            return;
        }
        let mut err = io::stderr();
        let _ = write!(err, "\r{}\r", " ".repeat(self.last_len));
        let _ = err.flush();
        self.last_len = 0;
    }
}

/// Whether stderr is attached to a terminal.
#[cfg(unix)]
pub fn stderr_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDERR_FILENO) == 1 }
}

#[cfg(not(unix))]
pub fn stderr_is_tty() -> bool {
    false
}

#[cfg(unix)]
fn terminal_width() -> usize {
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(libc::STDERR_FILENO, libc::TIOCGWINSZ, &mut ws) == 0 && ws.ws_col > 0 {
            return ws.ws_col as usize;
        }
    }
    width_from_env()
}

#[cfg(not(unix))]
fn terminal_width() -> usize {
    width_from_env()
}

fn width_from_env() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(80)
}
