// Shutdown signal handling
//
// SIGINT (Ctrl+C) and SIGTERM both stop the accept loop. In-flight
// connections finish in their own tasks.

/// Resolves when a shutdown signal arrives.
#[cfg(unix)]
pub async fn shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}

/// Windows fallback: only Ctrl+C is supported.
#[cfg(not(unix))]
pub async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        crate::logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
