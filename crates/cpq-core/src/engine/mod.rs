//! Transfer engines: the components that move bytes and report progress.
//!
//! `TransferEngine` is the contract a `TransferJob` consumes; `FileCopyEngine`
//! is the shipped local-file implementation.

mod ascii;
mod file_copy;

#[cfg(test)]
pub(crate) mod stub;

pub use ascii::AsciiFilter;
pub use file_copy::{CopyError, CopyOptions, FileCopyEngine};

use crate::signal::Signal;

/// One in-progress data transfer.
///
/// Advanced by `poll`, one bounded unit of work per call; every query must
/// return promptly. Terminal states (`is_done`, `is_errored`) are sticky.
pub trait TransferEngine {
    /// Advance one bounded unit of work. Cheap no-op once terminal, and
    /// while a pending write lacks permission.
    fn poll(&mut self);

    /// Whether the transfer ended in error.
    fn is_errored(&self) -> bool;

    /// Human-readable description of the error; empty when not errored.
    fn error_text(&self) -> String;

    /// Whether the transfer completed without error.
    fn is_done(&self) -> bool;

    /// Whether write permission has been granted.
    fn write_allowed(&self) -> bool;

    /// Whether the engine is blocked on the write-allow gate.
    fn write_pending(&self) -> bool;

    /// Grant write permission.
    fn allow_write(&mut self);

    /// Current byte offset in the destination.
    fn position(&self) -> i64;

    /// Percent-complete fragment for status lines, e.g. `"(42%) "`; empty
    /// when unknown.
    fn percent_done_text(&self) -> String;

    /// Rate fragment, e.g. `"3.02MiB/s "`; empty until measurable.
    fn rate_text(&self) -> String;

    /// ETA fragment, e.g. `"eta:3s "`; empty when not computable.
    fn eta_text(&self) -> String;

    /// Engine-specific status word(s); empty once terminal or when there is
    /// nothing meaningful to show.
    fn status_text(&self) -> String;

    /// Process group of the subprocess this engine fronts, if any.
    fn process_group(&self) -> Option<i32>;

    /// Deliver a signal to the engine's subprocess, if any.
    fn send_signal(&mut self, sig: Signal);

    /// Bytes moved by this transfer so far (excludes resumed prefix).
    fn bytes_transferred(&self) -> i64;

    /// Seconds since the transfer started; frozen once terminal.
    fn elapsed_seconds(&self) -> f64;

    /// Switch to ascii/text mode (line-ending normalization).
    fn set_ascii_mode(&mut self);
}
