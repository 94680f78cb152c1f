//! Graceful shutdown signal handling.

use tokio::signal;

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
///
/// Used by `axum::serve(...).with_graceful_shutdown(...)` so that in-flight
/// connections are closed cleanly when the process is asked to stop.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
