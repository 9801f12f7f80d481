//! Log output for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the program embedding it. The `page-clip` binary calls [`init_logging`].

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn,page_clipper=info";

/// Filter used by `--verbose`.
pub const VERBOSE_FILTER: &str = "info,page_clipper=debug";

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Stdout stays free for `--print` and `--json` output.
pub fn init_logging(verbose: bool) -> Result<(), TryInitError> {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}
