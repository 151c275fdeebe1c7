//! OS signal identity used across the job tree.
//!
//! Jobs receive signals through `accept_signal` and forward them to any
//! subprocess an engine fronts. The raw number representation keeps the core
//! testable on non-Unix targets while mapping to `libc` constants on Unix.

use std::fmt;

/// A signal by raw number, with named constructors for the ones the
/// scheduler cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal(i32);

#[cfg(unix)]
impl Signal {
    pub const INT: Signal = Signal(libc::SIGINT);
    pub const TERM: Signal = Signal(libc::SIGTERM);
    pub const CONT: Signal = Signal(libc::SIGCONT);
    pub const STOP: Signal = Signal(libc::SIGSTOP);
}

#[cfg(not(unix))]
impl Signal {
    pub const INT: Signal = Signal(2);
    pub const TERM: Signal = Signal(15);
    pub const CONT: Signal = Signal(18);
    pub const STOP: Signal = Signal(19);
}

impl Signal {
    pub const fn from_raw(raw: i32) -> Self {
        Signal(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// True for the signals that request termination of a job subtree
    /// (SIGINT, SIGTERM).
    pub fn is_termination(self) -> bool {
        self == Signal::INT || self == Signal::TERM
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Signal::INT {
            write!(f, "SIGINT")
        } else if *self == Signal::TERM {
            write!(f, "SIGTERM")
        } else if *self == Signal::CONT {
            write!(f, "SIGCONT")
        } else if *self == Signal::STOP {
            write!(f, "SIGSTOP")
        } else {
            write!(f, "signal {}", self.0)
        }
    }
}
