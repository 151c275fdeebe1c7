//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod completions;
mod cp;
mod man;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use cp::{run_cp, CpFlags};
pub use man::run_man;
