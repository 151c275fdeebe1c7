//! Final summary wording for a finished sequencer.

use std::io::{self, Write};

use crate::human::{format_rate, plural};

use super::stats::QueueStats;

/// Writes the end-of-run summary. Nothing is printed when every attempted
/// transfer failed (the per-transfer error lines already cover it) or when
/// nothing was attempted at all.
pub(super) fn write_final_summary(
    stats: &QueueStats,
    prefix: &str,
    out: &mut dyn Write,
) -> io::Result<()> {
    if stats.attempted == stats.errors {
        return Ok(());
    }

    if stats.bytes > 0 {
        write!(out, "{}", prefix)?;
        if stats.elapsed_secs >= 1.0 {
            let secs = (stats.elapsed_secs + 0.5) as i64;
            write!(
                out,
                "{} {} transferred in {} {}",
                stats.bytes,
                plural(stats.bytes, "byte", "bytes"),
                secs,
                plural(secs, "second", "seconds")
            )?;
            let rate = stats.bytes as f64 / stats.elapsed_secs;
            if rate >= 1.0 {
                writeln!(out, " ({})", format_rate(rate))?;
            } else {
                writeln!(out)?;
            }
        } else {
            writeln!(
                out,
                "{} {} transferred",
                stats.bytes,
                plural(stats.bytes, "byte", "bytes")
            )?;
        }
    }

    if stats.errors > 0 {
        writeln!(
            out,
            "{}Transfer of {} of {} {} failed",
            prefix,
            stats.errors,
            stats.attempted,
            plural(stats.attempted as i64, "file", "files")
        )?;
    } else if stats.attempted > 1 {
        writeln!(
            out,
            "{}Total {} {} transferred",
            prefix,
            stats.attempted,
            plural(stats.attempted as i64, "file", "files")
        )?;
    }
    Ok(())
}
