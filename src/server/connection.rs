// Connection handling module
// Accepts and serves a single TCP connection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Whole-connection deadline: the longer of the read and write timeouts
pub fn connection_timeout(perf: &PerformanceConfig) -> Duration {
    Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout))
}

/// Handle a single connection in a spawned task.
///
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive
/// 3. Serves the connection with the request handler under a timeout
/// 4. Decrements connection counter when done
///
/// Dropping the connection on timeout also drops any in-flight upstream fetch.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = connection_timeout(&state.config.performance);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive_timeout > 0);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state, peer_addr).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
