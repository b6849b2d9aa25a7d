//! Custom panic hook for structured crash reports.
//!
//! A crash during a scan should say what phase it happened in, not just
//! print a bare Rust backtrace — the reference analyzers walk arbitrarily
//! deep ASTs and the agent subsystem shells out to another process, so a
//! panic's surrounding context is often more useful than its exact line.

use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

/// Global, coarse-grained record of which scan phase is currently running.
/// Set by the pipeline at each stage transition; read only by the panic
/// hook, so a relaxed load/store is enough.
static CURRENT_PHASE: OnceLock<Mutex<Option<&'static str>>> = OnceLock::new();
static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);

fn phase_storage() -> &'static Mutex<Option<&'static str>> {
    CURRENT_PHASE.get_or_init(|| Mutex::new(None))
}

/// Record the scan phase now running, for the panic hook to report if a
/// crash interrupts it. Call at the start of each pipeline stage.
pub fn set_phase(phase: &'static str) {
    if let Ok(mut guard) = phase_storage().lock() {
        *guard = Some(phase);
    }
}

/// Note one more file finished processing, for the crash report's rough
/// progress indicator.
pub fn note_file_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

/// Captured panic information, retrievable after a worker thread's `join()`
/// only reports a boxed `Any` with no useful `Display`.
#[derive(Clone, Debug)]
pub struct CapturedPanicInfo {
    pub message: String,
    pub location: Option<String>,
    pub phase: Option<&'static str>,
}

impl std::fmt::Display for CapturedPanicInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }
        if let Some(phase) = self.phase {
            write!(f, " [phase: {phase}]")?;
        }
        Ok(())
    }
}

static LAST_PANIC: OnceLock<Mutex<Option<CapturedPanicInfo>>> = OnceLock::new();

fn panic_storage() -> &'static Mutex<Option<CapturedPanicInfo>> {
    LAST_PANIC.get_or_init(|| Mutex::new(None))
}

/// Retrieve the last captured panic, if any — used by `main`'s worker
/// thread join path to produce a better error than the bare `Any` payload.
pub fn last_panic_info() -> Option<CapturedPanicInfo> {
    panic_storage().lock().ok().and_then(|g| g.clone())
}

fn extract_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let message = extract_message(info);
    let location = info.location().map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
    let phase = phase_storage().lock().ok().and_then(|g| *g);
    let processed = FILES_PROCESSED.load(Ordering::Relaxed);

    if let Ok(mut guard) = panic_storage().lock() {
        *guard = Some(CapturedPanicInfo {
            message: message.clone(),
            location: location.clone(),
            phase,
        });
    }

    eprintln!();
    eprintln!("=== ars crashed ===");
    eprintln!("message:  {message}");
    if let Some(location) = &location {
        eprintln!("location: {location}");
    }
    if let Some(phase) = phase {
        eprintln!("phase:    {phase}");
    }
    eprintln!("files processed before crash: {processed}");
    eprintln!();
}

/// Install the custom panic hook. Call once, early in `main`, before any
/// scan work begins.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_phase_is_observable_through_last_panic_path() {
        set_phase("testing-phase");
        assert_eq!(*phase_storage().lock().unwrap(), Some("testing-phase"));
    }
}
