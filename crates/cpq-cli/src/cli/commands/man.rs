//! Man command: render the roff man page.

use anyhow::Result;
use clap::CommandFactory;
use std::io::{self, Write};

use crate::cli::Cli;

/// Render the man page to stdout.
pub fn run_man() -> Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut buf: Vec<u8> = Vec::new();
    man.render(&mut buf)?;
    io::stdout().write_all(&buf)?;
    Ok(())
}
