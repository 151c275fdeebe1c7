//! CLI for the cpq transfer queue.

mod commands;
mod status_line;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cpq_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_cp, run_man};

/// Top-level CLI for the cpq transfer queue.
#[derive(Debug, Parser)]
#[command(name = "cpq")]
#[command(about = "cpq: cooperative sequential transfer queue", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Copy one or more sources to a destination, one transfer at a time.
    Cp {
        /// Source files (plain paths or file:// URLs) followed by the
        /// destination: a file, or a directory for multiple sources.
        #[arg(required = true, num_args = 2..)]
        paths: Vec<String>,

        /// Resume into an existing destination (append the missing tail).
        #[arg(long)]
        resume: bool,

        /// Replace an existing destination instead of failing.
        #[arg(long)]
        overwrite: bool,

        /// Ascii/text mode: normalize CRLF line endings to LF.
        #[arg(long)]
        ascii: bool,

        /// Verify each copy against a streaming SHA-256 after completion.
        #[arg(long)]
        verify: bool,

        /// Keep copying remaining sources after a failed transfer.
        #[arg(long)]
        continue_on_error: bool,

        /// Disable the status line and final summary.
        #[arg(long)]
        no_status: bool,

        /// Print the aggregate statistics as JSON when done.
        #[arg(long)]
        json: bool,
    },

    /// Compute SHA-256 of a file (e.g. after a transfer).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Render the man page on stdout.
    Man,
}

impl CliCommand {
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Cp {
                paths,
                resume,
                overwrite,
                ascii,
                verify,
                continue_on_error,
                no_status,
                json,
            } => {
                // clap enforces at least two entries; the last is the
                // destination.
                let Some((dest, sources)) = paths.split_last() else {
                    anyhow::bail!("cp needs at least one source and a destination");
                };
                run_cp(
                    sources,
                    &PathBuf::from(dest),
                    commands::CpFlags {
                        resume,
                        overwrite,
                        ascii,
                        verify,
                        continue_on_error,
                        no_status,
                        json,
                    },
                    &cfg,
                )
            }
            CliCommand::Checksum { path } => {
                run_checksum(&path)?;
                Ok(0)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(0)
            }
            CliCommand::Man => {
                run_man()?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
