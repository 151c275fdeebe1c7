//! Shared helpers for integration tests.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use cpq_core::queue::{CopyRequest, TransferSequencer};
use cpq_core::render::NullStatusLine;
use cpq_core::scheduler::{Job, StepContext};

pub fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

pub fn request(from: &PathBuf, to: &PathBuf) -> CopyRequest {
    CopyRequest {
        source: from.display().to_string(),
        from: from.clone(),
        to: to.clone(),
    }
}

/// Step the sequencer to completion (bounded), returning the error stream.
pub fn run_to_completion(seq: &mut TransferSequencer) -> String {
    let mut err = Vec::new();
    let mut status = NullStatusLine;
    for _ in 0..100_000 {
        if seq.done() {
            break;
        }
        seq.step(&mut StepContext::new(&mut err, &mut status));
    }
    assert!(seq.done(), "sequencer did not finish");
    String::from_utf8(err).unwrap()
}
