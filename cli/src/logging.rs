use docqa_core::DocQaConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` means debug, else the configured level.
/// Logs go to stderr so answers on stdout stay clean.
pub fn init(config: &DocQaConfig, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(&level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Our crates at `level`, everything else at warn
fn default_directives(level: &str) -> String {
    let level = match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    format!(
        "warn,docqa={level},docqa_core={level},docqa_index={level},docqa_pipeline={level}"
    )
}
