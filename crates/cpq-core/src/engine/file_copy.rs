//! Non-blocking local file copy engine.
//!
//! A small state machine advanced by `poll`: open both files, wait on the
//! write-allow gate, copy one chunk per poll, then optionally re-read the
//! destination to verify a streaming SHA-256. Terminal states are sticky.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::checksum::Sha256Stream;
use crate::human;
use crate::signal::Signal;

use super::ascii::AsciiFilter;
use super::TransferEngine;

/// Why a copy failed. Converted to display text through `error_text`.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read error on {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write error on {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: destination already exists", path.display())]
    DestinationExists { path: PathBuf },
    #[error("{}: existing file is larger than the source", path.display())]
    ResumePastEnd { path: PathBuf },
    #[error("checksum mismatch: wrote {expected}, destination has {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Per-transfer knobs, usually derived from `CpqConfig` plus CLI flags.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Bytes copied per poll.
    pub chunk_bytes: usize,
    /// Replace an existing destination instead of failing.
    pub overwrite: bool,
    /// Append to an existing destination, skipping that many source bytes.
    pub resume: bool,
    /// Re-read the destination after the copy and compare SHA-256.
    pub verify: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: 256 * 1024,
            overwrite: false,
            resume: false,
            verify: false,
        }
    }
}

enum Phase {
    Open,
    Copy,
    Verify,
    Done,
    Failed(CopyError),
}

/// Copies one local file to another, a bounded chunk per poll.
pub struct FileCopyEngine {
    src_path: PathBuf,
    dst_path: PathBuf,
    opts: CopyOptions,
    phase: Phase,
    src: Option<File>,
    dst: Option<File>,
    /// Source size, when the metadata call gave one.
    total: Option<u64>,
    /// Bytes consumed from the source, including any resumed prefix.
    consumed: u64,
    /// Destination offset; equals bytes written plus any resumed prefix.
    pos: u64,
    start_pos: u64,
    started: Instant,
    final_elapsed: Option<f64>,
    ascii: Option<AsciiFilter>,
    write_allowed: bool,
    write_pending: bool,
    hasher: Option<Sha256Stream>,
    written_digest: Option<String>,
    verify_reader: Option<File>,
    verify_hasher: Option<Sha256Stream>,
}

impl FileCopyEngine {
    pub fn new(src_path: PathBuf, dst_path: PathBuf, opts: CopyOptions) -> Self {
        Self {
            src_path,
            dst_path,
            opts,
            phase: Phase::Open,
            src: None,
            dst: None,
            total: None,
            consumed: 0,
            pos: 0,
            start_pos: 0,
            started: Instant::now(),
            final_elapsed: None,
            ascii: None,
            write_allowed: false,
            write_pending: false,
            hasher: None,
            written_digest: None,
            verify_reader: None,
            verify_hasher: None,
        }
    }

    fn fail(&mut self, err: CopyError) {
        tracing::debug!("copy {} failed: {}", self.src_path.display(), err);
        self.final_elapsed = Some(self.started.elapsed().as_secs_f64());
        self.src = None;
        self.dst = None;
        self.verify_reader = None;
        self.phase = Phase::Failed(err);
    }

    fn finish(&mut self) {
        tracing::debug!(
            "copy {} -> {} finished ({} bytes)",
            self.src_path.display(),
            self.dst_path.display(),
            self.bytes_transferred()
        );
        self.final_elapsed = Some(self.started.elapsed().as_secs_f64());
        self.src = None;
        self.dst = None;
        self.verify_reader = None;
        self.phase = Phase::Done;
    }

    fn poll_open(&mut self) {
        let mut src = match File::open(&self.src_path) {
            Ok(f) => f,
            Err(e) => {
                return self.fail(CopyError::Open {
                    path: self.src_path.clone(),
                    source: e,
                })
            }
        };
        let total = match src.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                return self.fail(CopyError::Open {
                    path: self.src_path.clone(),
                    source: e,
                })
            }
        };

        let dst_exists = self.dst_path.exists();
        let dst = if self.opts.resume && dst_exists {
            let open = OpenOptions::new().write(true).open(&self.dst_path);
            let f = match open {
                Ok(f) => f,
                Err(e) => {
                    return self.fail(CopyError::Open {
                        path: self.dst_path.clone(),
                        source: e,
                    })
                }
            };
            let existing = match f.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    return self.fail(CopyError::Open {
                        path: self.dst_path.clone(),
                        source: e,
                    })
                }
            };
            if existing > total {
                return self.fail(CopyError::ResumePastEnd {
                    path: self.dst_path.clone(),
                });
            }
            // Resume offsets are byte-based: an ascii resume trusts that the
            // existing prefix came from the same filter.
            if let Err(e) = src.seek(SeekFrom::Start(existing)) {
                return self.fail(CopyError::Read {
                    path: self.src_path.clone(),
                    source: e,
                });
            }
            let mut f = f;
            if let Err(e) = f.seek(SeekFrom::End(0)) {
                return self.fail(CopyError::Write {
                    path: self.dst_path.clone(),
                    source: e,
                });
            }
            self.start_pos = existing;
            self.pos = existing;
            self.consumed = existing;
            f
        } else if dst_exists && !self.opts.overwrite {
            return self.fail(CopyError::DestinationExists {
                path: self.dst_path.clone(),
            });
        } else {
            match File::create(&self.dst_path) {
                Ok(f) => f,
                Err(e) => {
                    return self.fail(CopyError::Open {
                        path: self.dst_path.clone(),
                        source: e,
                    })
                }
            }
        };

        self.total = Some(total);
        self.src = Some(src);
        self.dst = Some(dst);
        if self.opts.verify {
            self.hasher = Some(Sha256Stream::new());
        }
        // Gate the first destination write until permission is granted.
        self.write_pending = true;
        self.phase = Phase::Copy;
    }

    fn poll_copy(&mut self) {
        if self.write_pending && !self.write_allowed {
            return;
        }

        let mut buf = vec![0u8; self.opts.chunk_bytes.max(1)];
        let n = match self.src.as_mut() {
            Some(f) => match f.read(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    return self.fail(CopyError::Read {
                        path: self.src_path.clone(),
                        source: e,
                    })
                }
            },
            None => 0,
        };

        if n == 0 {
            let mut tail = Vec::new();
            if let Some(filter) = self.ascii.as_mut() {
                filter.finish(&mut tail);
            }
            if !tail.is_empty() && self.write_chunk(&tail).is_err() {
                return;
            }
            if let Some(f) = self.dst.as_mut() {
                if let Err(e) = f.sync_all() {
                    return self.fail(CopyError::Write {
                        path: self.dst_path.clone(),
                        source: e,
                    });
                }
            }
            self.written_digest = self.hasher.take().map(Sha256Stream::finalize_hex);
            if self.opts.verify {
                self.begin_verify();
            } else {
                self.finish();
            }
            return;
        }

        self.consumed += n as u64;
        if self.ascii.is_some() {
            let mut out = Vec::with_capacity(n);
            if let Some(filter) = self.ascii.as_mut() {
                filter.filter(&buf[..n], &mut out);
            }
            let _ = self.write_chunk(&out);
        } else {
            let _ = self.write_chunk(&buf[..n]);
        }
    }

    /// Write one filtered chunk; on failure the engine is already moved to
    /// `Failed` and `Err(())` is returned so the caller stops.
    fn write_chunk(&mut self, data: &[u8]) -> Result<(), ()> {
        if data.is_empty() {
            return Ok(());
        }
        let Some(f) = self.dst.as_mut() else {
            return Ok(());
        };
        if let Err(e) = f.write_all(data) {
            self.fail(CopyError::Write {
                path: self.dst_path.clone(),
                source: e,
            });
            return Err(());
        }
        self.pos += data.len() as u64;
        self.write_pending = false;
        if let Some(h) = self.hasher.as_mut() {
            h.update(data);
        }
        Ok(())
    }

    fn begin_verify(&mut self) {
        let mut f = match File::open(&self.dst_path) {
            Ok(f) => f,
            Err(e) => {
                return self.fail(CopyError::Open {
                    path: self.dst_path.clone(),
                    source: e,
                })
            }
        };
        if let Err(e) = f.seek(SeekFrom::Start(self.start_pos)) {
            return self.fail(CopyError::Read {
                path: self.dst_path.clone(),
                source: e,
            });
        }
        self.verify_reader = Some(f);
        self.verify_hasher = Some(Sha256Stream::new());
        self.phase = Phase::Verify;
    }

    fn poll_verify(&mut self) {
        let mut buf = vec![0u8; self.opts.chunk_bytes.max(1)];
        let n = match self.verify_reader.as_mut() {
            Some(f) => match f.read(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    return self.fail(CopyError::Read {
                        path: self.dst_path.clone(),
                        source: e,
                    })
                }
            },
            None => 0,
        };

        if n == 0 {
            let actual = self
                .verify_hasher
                .take()
                .map(Sha256Stream::finalize_hex)
                .unwrap_or_default();
            let expected = self.written_digest.take().unwrap_or_default();
            if actual == expected {
                self.finish();
            } else {
                self.fail(CopyError::ChecksumMismatch { expected, actual });
            }
            return;
        }
        if let Some(h) = self.verify_hasher.as_mut() {
            h.update(&buf[..n]);
        }
    }
}

impl TransferEngine for FileCopyEngine {
    fn poll(&mut self) {
        match self.phase {
            Phase::Open => self.poll_open(),
            Phase::Copy => self.poll_copy(),
            Phase::Verify => self.poll_verify(),
            Phase::Done | Phase::Failed(_) => {}
        }
    }

    fn is_errored(&self) -> bool {
        matches!(self.phase, Phase::Failed(_))
    }

    fn error_text(&self) -> String {
        match &self.phase {
            Phase::Failed(e) => e.to_string(),
            _ => String::new(),
        }
    }

    fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    fn write_allowed(&self) -> bool {
        self.write_allowed
    }

    fn write_pending(&self) -> bool {
        self.write_pending
    }

    fn allow_write(&mut self) {
        self.write_allowed = true;
    }

    fn position(&self) -> i64 {
        self.pos as i64
    }

    fn percent_done_text(&self) -> String {
        match self.total {
            Some(total) if total > 0 => {
                let pct = (self.consumed.min(total) * 100) / total;
                format!("({}%) ", pct)
            }
            _ => String::new(),
        }
    }

    fn rate_text(&self) -> String {
        let elapsed = self.elapsed_seconds();
        let bytes = self.bytes_transferred();
        if elapsed < 0.1 || bytes <= 0 {
            return String::new();
        }
        let rate = bytes as f64 / elapsed;
        if rate < 1.0 {
            return String::new();
        }
        format!("{} ", human::format_rate(rate))
    }

    fn eta_text(&self) -> String {
        let Some(total) = self.total else {
            return String::new();
        };
        let elapsed = self.elapsed_seconds();
        let read = self.consumed.saturating_sub(self.start_pos);
        if elapsed < 0.1 || read == 0 {
            return String::new();
        }
        let remaining = total.saturating_sub(self.consumed);
        if remaining == 0 {
            return String::new();
        }
        let rate = read as f64 / elapsed;
        if rate < 1.0 {
            return String::new();
        }
        format!("eta:{} ", human::format_eta(remaining as f64 / rate))
    }

    fn status_text(&self) -> String {
        match self.phase {
            Phase::Open => "opening".to_string(),
            Phase::Copy => "copying".to_string(),
            Phase::Verify => "verifying".to_string(),
            Phase::Done | Phase::Failed(_) => String::new(),
        }
    }

    fn process_group(&self) -> Option<i32> {
        None
    }

    fn send_signal(&mut self, sig: Signal) {
        tracing::debug!("file copy has no subprocess; {} ignored", sig);
    }

    fn bytes_transferred(&self) -> i64 {
        (self.pos - self.start_pos) as i64
    }

    fn elapsed_seconds(&self) -> f64 {
        self.final_elapsed
            .unwrap_or_else(|| self.started.elapsed().as_secs_f64())
    }

    fn set_ascii_mode(&mut self) {
        self.ascii = Some(AsciiFilter::new());
    }
}
