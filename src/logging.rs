use tracing_subscriber::EnvFilter;

/// Set `KIOSK_LOG_FORMAT=json` for machine-readable log lines.
pub const LOG_FORMAT_ENV: &str = "KIOSK_LOG_FORMAT";

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Logs go to stderr; stdout belongs to the programs we launch.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let is_json = matches!(
        std::env::var(LOG_FORMAT_ENV).ok().as_deref(),
        Some("json") | Some("JSON")
    );
    let result = if is_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}
