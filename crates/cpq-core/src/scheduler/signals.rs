//! Flag-based capture of termination signals.
//!
//! The handler only records the signal number; `drive` drains the flag
//! between polls and delivers it through `Job::accept_signal`, so jobs never
//! observe a signal mid-step.

#[cfg(unix)]
mod imp {
    use std::io;
    use std::sync::atomic::{AtomicI32, Ordering};

    use crate::signal::Signal;

    static PENDING: AtomicI32 = AtomicI32::new(0);

    extern "C" fn record_signal(sig: libc::c_int) {
        PENDING.store(sig, Ordering::SeqCst);
    }

    /// Install handlers for SIGINT and SIGTERM that record the last signal
    /// received. Call once, before driving jobs.
    pub fn install_termination_flags() -> io::Result<()> {
        unsafe {
            let mut sa: libc::sigaction = std::mem::zeroed();
            sa.sa_sigaction = record_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
            sa.sa_flags = 0;
            libc::sigemptyset(&mut sa.sa_mask);
            for sig in [libc::SIGINT, libc::SIGTERM] {
                if libc::sigaction(sig, &sa, std::ptr::null_mut()) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
        }
        Ok(())
    }

    /// Take the most recently recorded signal, if any.
    pub fn take_pending_signal() -> Option<Signal> {
        match PENDING.swap(0, Ordering::SeqCst) {
            0 => None,
            n => Some(Signal::from_raw(n)),
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    use crate::signal::Signal;

    pub fn install_termination_flags() -> io::Result<()> {
        Ok(())
    }

    pub fn take_pending_signal() -> Option<Signal> {
        None
    }
}

pub use imp::{install_termination_flags, take_pending_signal};
