// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown coordination between the signal task and the accept loop
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Arc<Notify>,
    /// Whether shutdown has been requested
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark shutdown and wake the accept loop
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        println!("[SIGNAL] Process ID: {}", std::process::id());

        tokio::select! {
            _ = sigterm.recv() => println!("\n[SIGNAL] SIGTERM received, shutting down"),
            _ = sigint.recv() => println!("\n[SIGNAL] SIGINT received (Ctrl+C), shutting down"),
        }
        handler.request_shutdown();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\n[SIGNAL] Ctrl+C received, shutting down");
            handler.request_shutdown();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_shutdown_wakes_waiter() {
        let handler = Arc::new(SignalHandler::new());
        let waiter = {
            let shutdown = Arc::clone(&handler.shutdown);
            tokio::spawn(async move { shutdown.notified().await })
        };
        // Let the waiter register before notifying
        tokio::task::yield_now().await;
        while !waiter.is_finished() {
            handler.request_shutdown();
            tokio::task::yield_now().await;
        }
        assert!(handler.is_shutdown_requested());
    }
}
