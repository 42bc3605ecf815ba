use tracing_subscriber::EnvFilter;

/// Initialise logging. Event traffic from the scaling engine is logged at
/// `debug` level, so the default is `info` unless debug logging is enabled
/// in the settings file. `RUST_LOG` can override the filter only when debug
/// logging is on; otherwise a stray environment variable would make the
/// watcher unexpectedly verbose.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
