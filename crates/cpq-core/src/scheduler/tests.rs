//! Tests for the drive loop and verdict plumbing.

use std::io;
use std::time::Duration;

use crate::engine::stub::StubEngine;
use crate::queue::{
    NextTransferContext, PendingTransfer, SequencerOptions, TransferSequencer, TransferSource,
};
use crate::render::NullStatusLine;
use crate::signal::Signal;

use super::{drive, DriveOptions, Job, StepContext, StepVerdict};

fn fast_opts() -> DriveOptions {
    DriveOptions {
        idle_wait: Duration::from_millis(1),
        status_interval: Duration::from_millis(1),
    }
}

/// Source holding a single prepared engine.
struct OneShotSource(Option<StubEngine>);

impl TransferSource for OneShotSource {
    fn next_transfer(&mut self, _cx: &NextTransferContext<'_>) -> Vec<PendingTransfer> {
        match self.0.take() {
            Some(engine) => vec![PendingTransfer {
                engine: Box::new(engine),
                name: "job.bin".to_string(),
            }],
            None => Vec::new(),
        }
    }
}

fn one_shot_source(engine: StubEngine) -> Box<dyn TransferSource> {
    Box::new(OneShotSource(Some(engine)))
}

#[test]
fn drives_a_sequencer_to_completion() {
    let mut seq = TransferSequencer::new(
        "cp",
        one_shot_source(StubEngine::completing_after(3, 64, 0.1)),
        SequencerOptions::default(),
    );
    let mut err = Vec::new();
    let mut status = NullStatusLine;
    let code = drive(&mut seq, &mut err, &mut status, &fast_opts());
    assert_eq!(code, 0);
    assert!(seq.done());
    assert_eq!(seq.stats().bytes, 64);
}

#[test]
fn failed_transfer_surfaces_in_exit_code() {
    let mut seq = TransferSequencer::new(
        "cp",
        one_shot_source(StubEngine::failing("denied")),
        SequencerOptions::default(),
    );
    let mut err = Vec::new();
    let mut status = NullStatusLine;
    let code = drive(&mut seq, &mut err, &mut status, &fast_opts());
    assert_eq!(code, 1);
    assert_eq!(String::from_utf8(err).unwrap(), "cp: denied\n");
}

/// Job that answers a scripted sequence of verdicts.
struct ScriptedJob {
    verdicts: Vec<StepVerdict>,
    at: usize,
    exit: i32,
}

impl Job for ScriptedJob {
    fn step(&mut self, _cx: &mut StepContext<'_>) -> StepVerdict {
        let v = self.verdicts.get(self.at).copied().unwrap_or(StepVerdict::Stall);
        self.at += 1;
        v
    }

    fn done(&self) -> bool {
        self.at >= self.verdicts.len()
    }

    fn accept_signal(&mut self, sig: Signal) -> StepVerdict {
        if sig.is_termination() {
            StepVerdict::WantDie
        } else {
            StepVerdict::Stall
        }
    }

    fn exit_code(&self) -> i32 {
        self.exit
    }
}

#[test]
fn want_die_stops_the_loop() {
    let mut job = ScriptedJob {
        verdicts: vec![StepVerdict::Moved, StepVerdict::WantDie],
        at: 0,
        exit: 3,
    };
    let mut err: Vec<u8> = Vec::new();
    let mut status = NullStatusLine;
    let code = drive(&mut job, &mut err, &mut status, &fast_opts());
    assert_eq!(code, 3);
}

#[test]
fn step_context_writes_reach_the_sink() {
    let mut err: Vec<u8> = Vec::new();
    let mut status = NullStatusLine;
    let mut cx = StepContext::new(&mut err, &mut status);
    io::Write::write_all(cx.err, b"line\n").unwrap();
    assert_eq!(err, b"line\n");
}
