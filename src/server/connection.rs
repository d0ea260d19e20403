// Connection handling module
// Admits a TCP connection against the limit and serves it over HTTP/1.1

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// One occupied slot in the active connection count, released on drop
struct ConnectionSlot(Arc<AtomicUsize>);

impl ConnectionSlot {
    /// Claim a slot, or `None` when `limit` slots are already taken
    fn acquire(counter: &Arc<AtomicUsize>, limit: Option<u64>) -> Option<Self> {
        // Increment first, then check, so two racing accepts cannot both slip in
        let prev = counter.fetch_add(1, Ordering::SeqCst);
        let slot = Self(Arc::clone(counter));
        match limit {
            Some(max) if prev >= usize::try_from(max).unwrap_or(usize::MAX) => {
                logger::log_warning(&format!(
                    "Max connections reached: {prev}/{max}. Connection rejected."
                ));
                None
            }
            _ => Some(slot),
        }
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, or drop it when the connection limit is reached
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    let Some(slot) = ConnectionSlot::acquire(conn_counter, state.config.performance.max_connections)
    else {
        return;
    };

    if state.access_log_enabled() {
        logger::log_connection_accepted(&peer_addr);
    }

    tokio::task::spawn_local(serve(stream, peer_addr, Arc::clone(state), slot));
}

/// Serve one connection, bounded by the larger of the read and write timeouts
async fn serve(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>, slot: ConnectionSlot) {
    let perf = &state.config.performance;
    let limit = Duration::from_secs(perf.read_timeout.max(perf.write_timeout));

    let mut builder = http1::Builder::new();
    builder.keep_alive(perf.keep_alive_timeout > 0);

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        TokioIo::new(stream),
        service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
    );

    match tokio::time::timeout(limit, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_debug(&format!(
            "Connection from {peer_addr} closed after {} seconds",
            limit.as_secs()
        )),
    }

    drop(slot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_respects_limit_and_releases() {
        let counter = Arc::new(AtomicUsize::new(0));

        let first = ConnectionSlot::acquire(&counter, Some(1));
        assert!(first.is_some());
        assert!(ConnectionSlot::acquire(&counter, Some(1)).is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        drop(first);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(ConnectionSlot::acquire(&counter, None).is_some());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
