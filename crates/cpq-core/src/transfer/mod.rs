//! One transfer driven to completion behind the job contract.

pub mod naming;


use std::io::{self, Write};

use crate::engine::TransferEngine;
use crate::render::StatusLine;
use crate::scheduler::{Job, StepContext, StepVerdict};
use crate::signal::Signal;

/// Columns reserved for the numeric tail of a status line; the name is
/// squeezed into whatever remains.
const STATUS_TAIL_WIDTH: usize = 50;

/// Adapts one `TransferEngine` into the scheduler contract: polls it,
/// reports its error once, arbitrates its write gate, formats progress, and
/// relays signals to any subprocess it fronts.
pub struct TransferJob {
    id: u64,
    engine: Box<dyn TransferEngine>,
    source: String,
    display_name: String,
    op: String,
    done: bool,
    no_status: bool,
    no_status_on_write: bool,
    clear_status_on_write: bool,
}

impl TransferJob {
    pub fn new(engine: Box<dyn TransferEngine>, source: &str, op: &str) -> Self {
        Self {
            id: 0,
            engine,
            source: source.to_string(),
            display_name: naming::display_path(source),
            op: op.to_string(),
            done: false,
            no_status: false,
            no_status_on_write: false,
            clear_status_on_write: false,
        }
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Change the source identifier; the display name follows.
    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
        self.display_name = naming::display_path(source);
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    /// Disable status display for this job permanently.
    pub fn set_no_status(&mut self, v: bool) {
        self.no_status = v;
    }

    /// Disable status display once the engine blocks on its write gate.
    pub fn set_no_status_on_write(&mut self, v: bool) {
        self.no_status_on_write = v;
    }

    /// Clear (but keep) the status line when the write gate opens.
    pub fn set_clear_status_on_write(&mut self, v: bool) {
        self.clear_status_on_write = v;
    }

    pub fn bytes_transferred(&self) -> i64 {
        self.engine.bytes_transferred()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.engine.elapsed_seconds()
    }

    /// Formatted progress, empty once the engine is done or errored.
    /// `width` bounds the displayed name, which is left-elided to fit and
    /// optionally reduced to its final path segment.
    pub fn status(&self, width: usize, basename_only: bool) -> String {
        if self.engine.is_done() || self.engine.is_errored() {
            return String::new();
        }
        let name = if basename_only {
            naming::basename(&self.display_name)
        } else {
            &self.display_name
        };
        self.format_line(&naming::squeeze(name, width))
    }

    fn format_line(&self, name: &str) -> String {
        format!(
            "'{}' at {} {}{}{}{}",
            name,
            self.engine.position(),
            self.engine.percent_done_text(),
            self.engine.rate_text(),
            self.engine.eta_text(),
            self.engine.status_text()
        )
    }
}

impl Job for TransferJob {
    fn step(&mut self, cx: &mut StepContext<'_>) -> StepVerdict {
        if self.done {
            return StepVerdict::Stall;
        }
        self.engine.poll();
        if self.engine.is_errored() {
            let _ = writeln!(cx.err, "{}: {}", self.op, self.engine.error_text());
            self.done = true;
            return StepVerdict::Moved;
        }
        if self.engine.is_done() {
            tracing::debug!("{} '{}' done", self.op, self.display_name);
            self.done = true;
            return StepVerdict::Moved;
        }
        if !self.engine.write_allowed() && self.engine.write_pending() {
            if self.no_status_on_write || self.clear_status_on_write {
                cx.status.clear();
            }
            if self.no_status_on_write {
                self.no_status = true;
            }
            self.engine.allow_write();
            return StepVerdict::Moved;
        }
        StepVerdict::Stall
    }

    fn done(&self) -> bool {
        self.done
    }

    fn accept_signal(&mut self, sig: Signal) -> StepVerdict {
        if self.engine.process_group().is_none() {
            if sig.is_termination() {
                return StepVerdict::WantDie;
            }
            return StepVerdict::Stall;
        }
        self.engine.send_signal(sig);
        if sig != Signal::CONT {
            // A stopped subprocess must resume to observe the signal.
            self.engine.send_signal(Signal::CONT);
        }
        StepVerdict::Moved
    }

    fn exit_code(&self) -> i32 {
        if self.engine.is_errored() {
            1
        } else {
            0
        }
    }

    fn show_run_status(&mut self, status: &mut dyn StatusLine) {
        if self.no_status {
            return;
        }
        let width = status.width().saturating_sub(STATUS_TAIL_WIDTH);
        let line = self.status(width, false);
        status.show(&line);
    }

    fn print_status(&self, prefix: &str, out: &mut dyn io::Write) -> io::Result<()> {
        if self.engine.is_done() || self.engine.is_errored() {
            return Ok(());
        }
        // An engine with no status text of its own is a pass-through with
        // nothing meaningful to report.
        if self.engine.status_text().is_empty() {
            return Ok(());
        }
        writeln!(out, "{}{}", prefix, self.format_line(&self.display_name))
    }
}
