//! Scripted engine for scheduler and job tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::signal::Signal;

use super::TransferEngine;

/// Engine whose observable state is set directly by the test. `poll` can be
/// scripted to complete after a fixed number of calls. `sent` and
/// `allow_write_calls` are shared handles so a test can keep observing after
/// the engine is boxed into a job.
pub(crate) struct StubEngine {
    pub done: bool,
    pub error: Option<String>,
    pub write_allowed: bool,
    pub write_pending: bool,
    pub pos: i64,
    pub bytes: i64,
    pub elapsed: f64,
    pub status: String,
    pub percent: String,
    pub rate: String,
    pub eta: String,
    pub pgroup: Option<i32>,
    pub sent: Rc<RefCell<Vec<Signal>>>,
    pub polls: u32,
    pub allow_write_calls: Rc<RefCell<u32>>,
    pub ascii: Rc<RefCell<bool>>,
    pub done_after_polls: Option<u32>,
}

impl Default for StubEngine {
    fn default() -> Self {
        Self {
            done: false,
            error: None,
            write_allowed: false,
            write_pending: false,
            pos: 0,
            bytes: 0,
            elapsed: 0.0,
            status: "busy".to_string(),
            percent: String::new(),
            rate: String::new(),
            eta: String::new(),
            pgroup: None,
            sent: Rc::new(RefCell::new(Vec::new())),
            polls: 0,
            allow_write_calls: Rc::new(RefCell::new(0)),
            ascii: Rc::new(RefCell::new(false)),
            done_after_polls: None,
        }
    }
}

impl StubEngine {
    pub fn running() -> Self {
        Self::default()
    }

    pub fn done_with(bytes: i64, elapsed: f64) -> Self {
        Self {
            done: true,
            bytes,
            pos: bytes,
            elapsed,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn write_gated() -> Self {
        Self {
            write_pending: true,
            ..Self::default()
        }
    }

    pub fn completing_after(polls: u32, bytes: i64, elapsed: f64) -> Self {
        Self {
            bytes,
            pos: bytes,
            elapsed,
            done_after_polls: Some(polls),
            ..Self::default()
        }
    }

    pub fn with_process_group(mut self, pgid: i32) -> Self {
        self.pgroup = Some(pgid);
        self
    }
}

impl TransferEngine for StubEngine {
    fn poll(&mut self) {
        self.polls += 1;
        if let Some(n) = self.done_after_polls {
            if self.polls >= n {
                self.done = true;
            }
        }
    }

    fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    fn error_text(&self) -> String {
        self.error.clone().unwrap_or_default()
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn write_allowed(&self) -> bool {
        self.write_allowed
    }

    fn write_pending(&self) -> bool {
        self.write_pending
    }

    fn allow_write(&mut self) {
        self.write_allowed = true;
        *self.allow_write_calls.borrow_mut() += 1;
    }

    fn position(&self) -> i64 {
        self.pos
    }

    fn percent_done_text(&self) -> String {
        self.percent.clone()
    }

    fn rate_text(&self) -> String {
        self.rate.clone()
    }

    fn eta_text(&self) -> String {
        self.eta.clone()
    }

    fn status_text(&self) -> String {
        self.status.clone()
    }

    fn process_group(&self) -> Option<i32> {
        self.pgroup
    }

    fn send_signal(&mut self, sig: Signal) {
        self.sent.borrow_mut().push(sig);
    }

    fn bytes_transferred(&self) -> i64 {
        self.bytes
    }

    fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    fn set_ascii_mode(&mut self) {
        *self.ascii.borrow_mut() = true;
    }
}
