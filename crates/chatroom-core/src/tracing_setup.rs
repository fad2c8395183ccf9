use std::fs::OpenOptions;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable naming an optional debug log file.
pub const LOG_FILE_ENV: &str = "CHATROOM_LOG_FILE";

/// Install with only warnings and errors shown unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    init_tracing_with_default("warn");
}

/// Install the global subscriber. `RUST_LOG` overrides `default_directive`
/// for the stderr layer. Calling this twice is a no-op.
pub fn init_tracing_with_default(default_directive: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let file_layer = std::env::var(LOG_FILE_ENV).ok().and_then(|log_path| {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
            ),
            Err(e) => {
                eprintln!("Could not open log file {}: {}", log_path, e);
                None
            }
        }
    });

    if registry.with(file_layer).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
