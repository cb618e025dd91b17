// Logger initialization

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "doc_analyzer=debug,tower_http=debug,axum=debug"
    } else {
        "doc_analyzer=info,tower_http=info"
    }
}

/// Install the global subscriber: stdout always, plus a daily log file when `log_dir` is set.
///
/// The returned guard flushes the file writer and must live until shutdown.
pub fn init_logger(app: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(app.debug).into());

    let (file_layer, guard) = match &app.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "doc-analyzer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Minimal stdout logging for paths that run before configuration is loaded
pub fn init_fallback_logger() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(false).into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
