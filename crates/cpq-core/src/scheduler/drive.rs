//! The outer poll loop: step a top-level job until it finishes or dies.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::render::StatusLine;

use super::job::Job;
use super::signals::take_pending_signal;
use super::verdict::{StepContext, StepVerdict};

/// Pacing knobs for the drive loop, usually taken from `CpqConfig`.
#[derive(Debug, Clone)]
pub struct DriveOptions {
    /// Sleep while every job stalls.
    pub idle_wait: Duration,
    /// Minimum interval between status line refreshes.
    pub status_interval: Duration,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            idle_wait: Duration::from_millis(20),
            status_interval: Duration::from_millis(250),
        }
    }
}

/// Polls `job` until it is done or requests termination; returns its exit
/// code. Pending OS signals are delivered between polls; a `WantDie` answer
/// tears the job down on return (the caller drops it).
pub fn drive(
    job: &mut dyn Job,
    err: &mut dyn io::Write,
    status: &mut dyn StatusLine,
    opts: &DriveOptions,
) -> i32 {
    let mut last_refresh: Option<Instant> = None;

    loop {
        while let Some(sig) = take_pending_signal() {
            tracing::debug!("delivering {} to top-level job", sig);
            if job.accept_signal(sig) == StepVerdict::WantDie {
                status.clear();
                return job.exit_code();
            }
        }

        let verdict = job.step(&mut StepContext::new(err, status));
        if verdict == StepVerdict::WantDie {
            status.clear();
            return job.exit_code();
        }
        if job.done() {
            status.clear();
            return job.exit_code();
        }

        let refresh_due = last_refresh
            .map(|t| t.elapsed() >= opts.status_interval)
            .unwrap_or(true);
        if refresh_due {
            job.show_run_status(status);
            last_refresh = Some(Instant::now());
        }

        if verdict == StepVerdict::Stall {
            thread::sleep(opts.idle_wait);
        }
    }
}
