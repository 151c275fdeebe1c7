//! `cpq cp` – queue the requested copies and drive them to completion.

use anyhow::{bail, Result};
use std::io;
use std::path::{Path, PathBuf};

use cpq_core::config::CpqConfig;
use cpq_core::engine::CopyOptions;
use cpq_core::queue::{CopyRequest, QueuedSource, SequencerOptions, TransferSequencer};
use cpq_core::render::{NullStatusLine, StatusLine};
use cpq_core::scheduler::{drive, install_termination_flags, DriveOptions};
use cpq_core::transfer::naming;
use std::time::Duration;

use crate::cli::status_line::{stderr_is_tty, TerminalStatusLine};

/// Flag set for one `cp` invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpFlags {
    pub resume: bool,
    pub overwrite: bool,
    pub ascii: bool,
    pub verify: bool,
    pub continue_on_error: bool,
    pub no_status: bool,
    pub json: bool,
}

pub fn run_cp(sources: &[String], dest: &Path, flags: CpFlags, cfg: &CpqConfig) -> Result<i32> {
    let requests = resolve_requests(sources, dest)?;

    let copy_opts = CopyOptions {
        chunk_bytes: cfg.chunk_bytes,
        overwrite: flags.overwrite || cfg.overwrite,
        resume: flags.resume,
        verify: flags.verify || cfg.verify,
    };
    let seq_opts = SequencerOptions {
        ascii: flags.ascii,
        continue_on_error: flags.continue_on_error,
        no_status: flags.no_status,
    };
    let source = QueuedSource::new(requests, copy_opts);
    let mut seq = TransferSequencer::new("cp", Box::new(source), seq_opts);

    if let Err(e) = install_termination_flags() {
        tracing::warn!("could not install signal handlers: {}", e);
    }

    let interactive = cfg.status && !flags.no_status && stderr_is_tty();
    let mut status: Box<dyn StatusLine> = if interactive {
        Box::new(TerminalStatusLine::new())
    } else {
        Box::new(NullStatusLine)
    };

    let drive_opts = DriveOptions {
        idle_wait: Duration::from_millis(cfg.idle_wait_ms),
        status_interval: Duration::from_millis(cfg.status_interval_ms),
    };
    let mut err = io::stderr();
    let code = drive(&mut seq, &mut err, status.as_mut(), &drive_opts);

    if flags.json {
        println!("{}", serde_json::to_string_pretty(seq.stats())?);
    } else {
        let mut out = io::stdout();
        seq.final_summary("", &mut out)?;
    }
    Ok(code)
}

/// Expand CLI sources into copy requests. With multiple sources the
/// destination must be a directory; each file keeps its base name.
fn resolve_requests(sources: &[String], dest: &Path) -> Result<Vec<CopyRequest>> {
    let dest_is_dir = dest.is_dir();
    if sources.len() > 1 && !dest_is_dir {
        bail!("target '{}' is not a directory", dest.display());
    }

    sources
        .iter()
        .map(|raw| {
            let local = naming::display_path(raw);
            let to = if dest_is_dir {
                let base = naming::basename(&local).to_string();
                dest.join(base)
            } else {
                dest.to_path_buf()
            };
            Ok(CopyRequest {
                source: raw.clone(),
                from: PathBuf::from(local),
                to,
            })
        })
        .collect()
}
