//! Tracing subscriber setup for PrimMesh tools and services.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. `RUST_LOG` overrides the configured level.

use primmesh_config::MesherConfig;
use std::path::Path;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info";

/// File written inside `log_dir` in debug builds.
pub const LOG_FILE: &str = "primmesh.log";

/// Picks the filter string: the config's log level when set, else the default.
pub fn filter_directive(config: Option<&MesherConfig>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// Fails when a global subscriber is already installed, leaving it in place.
///
/// # Arguments
///
/// * `log_dir` - Directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether to also log to a file
/// * `config` - Configuration supplying the log level
///
/// # Examples
///
/// ```no_run
/// use primmesh_config::MesherConfig;
/// use primmesh_log::init_logging;
///
/// let config = MesherConfig::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config))
///     .expect("logging already initialized");
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&MesherConfig>,
) -> Result<(), TryInitError> {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber.with(file_layer).try_init();
    }

    subscriber.try_init()
}
