//! Supply of pending transfers for a sequencer.
//!
//! The sequencer pulls its next transfer through the `TransferSource`
//! strategy; `QueuedSource` is the shipped implementation over a prepared
//! list of local copy requests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::engine::{CopyOptions, FileCopyEngine, TransferEngine};

/// A transfer ready to be wrapped in a job.
pub struct PendingTransfer {
    pub engine: Box<dyn TransferEngine>,
    pub name: String,
}

/// What a source gets to see when asked for more work.
pub struct NextTransferContext<'a> {
    /// Sequencer's working directory, snapshotted at creation.
    pub cwd: &'a Path,
    /// Whether the operation keeps going after a failed transfer.
    pub continue_on_error: bool,
    /// Failures recorded so far.
    pub errors_so_far: u64,
}

/// Supplies the next transfer, or an empty batch to signal exhaustion.
pub trait TransferSource {
    fn next_transfer(&mut self, cx: &NextTransferContext<'_>) -> Vec<PendingTransfer>;
}

/// One requested local copy.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Raw source identifier as given (path or URL-ish string).
    pub source: String,
    /// Local path to read from.
    pub from: PathBuf,
    /// Local path to write to.
    pub to: PathBuf,
}

/// FIFO source over prepared copy requests. When continue-on-error is off,
/// the first recorded failure exhausts the queue.
pub struct QueuedSource {
    requests: VecDeque<CopyRequest>,
    opts: CopyOptions,
}

impl QueuedSource {
    pub fn new(requests: Vec<CopyRequest>, opts: CopyOptions) -> Self {
        Self {
            requests: requests.into(),
            opts,
        }
    }

    pub fn remaining(&self) -> usize {
        self.requests.len()
    }
}

impl TransferSource for QueuedSource {
    fn next_transfer(&mut self, cx: &NextTransferContext<'_>) -> Vec<PendingTransfer> {
        if !cx.continue_on_error && cx.errors_so_far > 0 {
            tracing::debug!(
                "dropping {} queued transfer(s) after failure",
                self.requests.len()
            );
            self.requests.clear();
            return Vec::new();
        }
        let Some(req) = self.requests.pop_front() else {
            return Vec::new();
        };
        let from = absolutize(cx.cwd, &req.from);
        let to = absolutize(cx.cwd, &req.to);
        tracing::debug!("next transfer: {} -> {}", from.display(), to.display());
        let engine = FileCopyEngine::new(from, to, self.opts.clone());
        vec![PendingTransfer {
            engine: Box::new(engine),
            name: req.source,
        }]
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
