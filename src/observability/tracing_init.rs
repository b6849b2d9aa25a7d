//! Tracing subscriber setup.
//!
//! Control verbosity with `RUST_LOG`:
//!
//! ```bash
//! ars scan .                  # default: warnings and errors only
//! RUST_LOG=info ars scan .    # phase-level progress
//! RUST_LOG=debug ars scan .   # per-file detail
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Always writes to stderr so `--json` on stdout stays machine-readable.
/// Default filter is `warn`; `RUST_LOG` overrides it entirely.
///
/// # Panics
///
/// Panics if a global subscriber is already installed (e.g. called twice,
/// or from within a test harness that installs its own).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
