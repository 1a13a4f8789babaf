//! Tracing setup for the desktop process.
//!
//! Every record goes to stderr and to a daily rolling file under the logs
//! directory. `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "sekai-desktop.log";
const DEFAULT_FILTER: &str = "info,sekai_core=info,sekai_infrastructure=info,sekai_desktop_lib=info";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be
/// kept alive until the process exits.
pub fn init_logging(logs_dir: &Path) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let (file_layer, guard) = match std::fs::create_dir_all(logs_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Failed to create log directory {:?}: {}", logs_dir, e);
            (None, None)
        }
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if let Err(e) = installed {
        eprintln!("Tracing subscriber already installed: {}", e);
    }

    install_panic_hook();
    guard
}

/// Routes panics through tracing so they land in the log file too.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic>".to_string());
        tracing::error!(target: "panic", "[Panic] {} at {}", payload, location);
        default_hook(info);
    }));
}

/// Spawns `future` on the Tauri runtime, logging its error or its panic.
pub fn spawn_logged<F>(label: &'static str, future: F)
where
    F: std::future::Future<Output = sekai_core::Result<()>> + Send + 'static,
{
    let task = tauri::async_runtime::spawn(future);
    tauri::async_runtime::spawn(async move {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("[{}] {}", label, e),
            Err(e) => tracing::error!("[{}] Task aborted: {}", label, e),
        }
    });
}
