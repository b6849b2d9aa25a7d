//! Structured logging and a panic hook that reports where in the scan a
//! crash happened.
//!
//! Logging always writes to stderr, never stdout: `--json` output is meant
//! to be piped into other tools, and a stray log line on stdout would
//! corrupt it. There is no TUI in this crate, so unlike a full-screen
//! analyzer there is nothing to suspend before printing a crash report.

mod panic_hook;
mod tracing_init;

pub use panic_hook::{install_panic_hook, last_panic_info, note_file_processed, set_phase, CapturedPanicInfo};
pub use tracing_init::init_tracing;
