use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is unset: warnings only.
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set. `--debug` raises every vbsync crate to `debug`
/// and adds targets and source locations.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new("warn,vbsync=debug,vbsync_cli=debug,vbsync_core=debug,vbsync_fs=debug,vbsync_content=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_file(debug)
        .with_line_number(debug)
        .compact();

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
    tracing::debug!("debug logging enabled");
}
