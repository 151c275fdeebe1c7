//! The generic job contract.

use std::io;

use crate::render::StatusLine;
use crate::signal::Signal;

use super::verdict::{StepContext, StepVerdict};

/// A cooperatively scheduled job.
///
/// Every method must return promptly; "blocking" on readiness is modeled by
/// returning `StepVerdict::Stall` until a later poll observes a state change.
pub trait Job {
    /// One non-blocking poll of the job's scheduling logic.
    fn step(&mut self, cx: &mut StepContext<'_>) -> StepVerdict;

    /// Whether the job has finished. Monotonic: never reverts to false.
    fn done(&self) -> bool;

    /// Deliver a signal to the job subtree, synchronously within a poll
    /// cycle. `WantDie` means the receiver wants to be torn down.
    fn accept_signal(&mut self, sig: Signal) -> StepVerdict;

    /// Process-style exit code once done; 0 while running unless stated
    /// otherwise by the implementation.
    fn exit_code(&self) -> i32 {
        0
    }

    /// Refresh the interactive status display.
    fn show_run_status(&mut self, _status: &mut dyn StatusLine) {}

    /// Write a line-oriented status report, each line prefixed with `prefix`.
    fn print_status(&self, _prefix: &str, _out: &mut dyn io::Write) -> io::Result<()> {
        Ok(())
    }
}
