// Server loop module
// Accepts connections until a shutdown signal arrives, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::{accept_connection, connection_timeout};
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop for the router
///
/// Returns once shutdown is requested and in-flight connections have finished,
/// or the connection timeout has elapsed, whichever comes first. Must run
/// inside a `LocalSet`.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Register for the wakeup before checking the flag so a shutdown
        // requested in between is not missed
        let shutdown = signals.shutdown.notified();
        tokio::pin!(shutdown);
        shutdown.as_mut().enable();
        if signals.is_shutdown_requested() {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                break;
            }
        }
    }

    // Stop accepting before waiting on in-flight requests
    drop(listener);
    logger::log_server_stopped();

    let deadline = connection_timeout(&state.config.performance);
    if !drain_connections(&active_connections, deadline).await {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, closing",
            active_connections.load(Ordering::SeqCst),
            deadline.as_secs()
        ));
    }
    Ok(())
}

/// Wait for the active connection count to reach zero.
///
/// Returns false if `timeout` elapsed first.
pub async fn drain_connections(active_connections: &AtomicUsize, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    true
}
