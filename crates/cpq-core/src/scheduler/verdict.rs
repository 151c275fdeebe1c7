//! Step verdicts and the context a step call runs against.

use std::io;

use crate::render::StatusLine;

/// Result of one poll of a job's scheduling logic.
///
/// The three values are the entire concurrency contract: the caller re-polls
/// promptly on `Moved`, waits for an external readiness event on `Stall`, and
/// tears the job down on `WantDie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    /// No observable progress this call.
    Stall,
    /// State changed; more progress may be available without waiting.
    Moved,
    /// This job (or its whole subtree) requests termination.
    WantDie,
}

/// Sinks a step call may write to.
///
/// Injected per call so nothing in the core touches a global stream; tests
/// capture `Vec<u8>` and pass a `NullStatusLine`.
pub struct StepContext<'a> {
    /// Error stream for one-shot failure lines.
    pub err: &'a mut dyn io::Write,
    /// Interactive status display, for jobs that clear it mid-step.
    pub status: &'a mut dyn StatusLine,
}

impl<'a> StepContext<'a> {
    pub fn new(err: &'a mut dyn io::Write, status: &'a mut dyn StatusLine) -> Self {
        Self { err, status }
    }
}
