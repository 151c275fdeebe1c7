//! Sequencing of requested transfers into live jobs.
//!
//! A `TransferSequencer` owns a waiting set of `TransferJob`s, replenishes it
//! from an injected `TransferSource`, retires finished jobs into running
//! totals, and broadcasts signals across the set.

mod source;
mod stats;
mod summary;


pub use source::{CopyRequest, NextTransferContext, PendingTransfer, QueuedSource, TransferSource};
pub use stats::QueueStats;

use std::env;
use std::io;
use std::path::PathBuf;

use crate::engine::TransferEngine;
use crate::render::StatusLine;
use crate::scheduler::{Job, StepContext, StepVerdict};
use crate::signal::Signal;
use crate::transfer::TransferJob;

/// Behavior knobs for a sequencer.
#[derive(Debug, Clone, Default)]
pub struct SequencerOptions {
    /// Put every engine into ascii/text mode.
    pub ascii: bool,
    /// Keep pulling transfers after a failure.
    pub continue_on_error: bool,
    /// Suppress status display and the final summary.
    pub no_status: bool,
}

/// Drives externally supplied transfer requests to completion, one waiting
/// set at a time, and accumulates statistics over everything it retires.
pub struct TransferSequencer {
    op: String,
    source: Box<dyn TransferSource>,
    cwd: PathBuf,
    ascii: bool,
    continue_on_error: bool,
    no_status: bool,
    waiting: Vec<TransferJob>,
    /// Job id of the member used for primary status display; `None` or a
    /// member of the waiting set.
    current: Option<u64>,
    next_job_id: u64,
    stats: QueueStats,
    done: bool,
}

impl TransferSequencer {
    pub fn new(op: &str, source: Box<dyn TransferSource>, opts: SequencerOptions) -> Self {
        Self {
            op: op.to_string(),
            source,
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            ascii: opts.ascii,
            continue_on_error: opts.continue_on_error,
            no_status: opts.no_status,
            waiting: Vec::new(),
            current: None,
            next_job_id: 1,
            stats: QueueStats::default(),
            done: false,
        }
    }

    /// Wrap `engine` in a job carrying this sequencer's operation label and
    /// append it to the waiting set.
    pub fn add_job(&mut self, mut engine: Box<dyn TransferEngine>, name: &str) {
        if self.ascii {
            engine.set_ascii_mode();
        }
        let mut job = TransferJob::new(engine, name, &self.op);
        job.set_id(self.next_job_id);
        self.next_job_id += 1;
        if self.no_status {
            job.set_no_status(true);
        }
        tracing::debug!("{}: queued '{}'", self.op, job.display_name());
        self.waiting.push(job);
    }

    /// Destroy every pending job, then start over with `engine` if one is
    /// given.
    pub fn replace_all(&mut self, engine: Option<Box<dyn TransferEngine>>, name: &str) {
        self.waiting.clear();
        self.current = None;
        if let Some(engine) = engine {
            self.add_job(engine, name);
        }
    }

    /// End-of-run totals, suppressed while status output is disabled.
    pub fn final_summary(&self, prefix: &str, out: &mut dyn io::Write) -> io::Result<()> {
        if self.no_status {
            return Ok(());
        }
        summary::write_final_summary(&self.stats, prefix, out)
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn current_id(&self) -> Option<u64> {
        self.current
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    fn replenish(&mut self) {
        let cx = NextTransferContext {
            cwd: &self.cwd,
            continue_on_error: self.continue_on_error,
            errors_so_far: self.stats.errors,
        };
        let batch = self.source.next_transfer(&cx);
        for t in batch {
            self.add_job(t.engine, &t.name);
        }
    }

    fn remove_job(&mut self, index: usize) -> TransferJob {
        let job = self.waiting.remove(index);
        if self.current == Some(job.id()) {
            self.current = None;
        }
        job
    }

    fn adopt_current_if_unset(&mut self) {
        if self.current.is_none() {
            self.current = self.waiting.first().map(TransferJob::id);
        }
    }
}

impl Job for TransferSequencer {
    fn step(&mut self, cx: &mut StepContext<'_>) -> StepVerdict {
        if self.done {
            return StepVerdict::Stall;
        }

        if self.waiting.is_empty() {
            self.replenish();
            if self.waiting.is_empty() {
                tracing::debug!("{}: no more transfers", self.op);
                self.done = true;
                return StepVerdict::Moved;
            }
        }
        self.adopt_current_if_unset();

        let mut verdict = StepVerdict::Stall;
        for job in &mut self.waiting {
            if job.step(cx) == StepVerdict::Moved {
                verdict = StepVerdict::Moved;
            }
        }

        if let Some(index) = self.waiting.iter().position(|j| j.done()) {
            let job = self.remove_job(index);
            self.stats
                .record(job.exit_code(), job.bytes_transferred(), job.elapsed_seconds());
            tracing::debug!(
                "{}: retired '{}' (exit {}, {} bytes)",
                self.op,
                job.display_name(),
                job.exit_code(),
                job.bytes_transferred()
            );
            return StepVerdict::Moved;
        }
        verdict
    }

    fn done(&self) -> bool {
        self.done
    }

    fn accept_signal(&mut self, sig: Signal) -> StepVerdict {
        if self.current.is_none() {
            if sig.is_termination() {
                return StepVerdict::WantDie;
            }
            return StepVerdict::Stall;
        }

        let mut total = if sig.is_termination() {
            StepVerdict::WantDie
        } else {
            StepVerdict::Stall
        };

        let mut index = 0;
        while index < self.waiting.len() {
            match self.waiting[index].accept_signal(sig) {
                StepVerdict::WantDie => {
                    let job = self.remove_job(index);
                    tracing::debug!("{}: '{}' killed by {}", self.op, job.display_name(), sig);
                }
                StepVerdict::Moved => {
                    total = StepVerdict::Moved;
                    index += 1;
                }
                StepVerdict::Stall => {
                    // A live sibling survived; the whole is not ready to die.
                    if total == StepVerdict::WantDie {
                        total = StepVerdict::Moved;
                    }
                    index += 1;
                }
            }
        }

        if !self.waiting.is_empty() {
            self.adopt_current_if_unset();
        }
        total
    }

    fn exit_code(&self) -> i32 {
        if self.stats.errors > 0 {
            1
        } else {
            0
        }
    }

    fn show_run_status(&mut self, status: &mut dyn StatusLine) {
        if self.no_status {
            return;
        }
        let current = self.current;
        if let Some(job) = self
            .waiting
            .iter_mut()
            .find(|j| Some(j.id()) == current)
        {
            job.show_run_status(status);
        }
    }

    fn print_status(&self, prefix: &str, out: &mut dyn io::Write) -> io::Result<()> {
        for job in &self.waiting {
            job.print_status(prefix, out)?;
        }
        if self.done {
            self.final_summary(prefix, out)?;
        }
        Ok(())
    }
}
