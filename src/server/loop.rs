// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// How often the drain phase re-checks the connection count
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Configuration for server loop behavior
pub struct ServerLoopConfig {
    /// Notified once to stop accepting
    pub shutdown: Arc<Notify>,
    /// Longest time to wait for open connections after shutdown
    pub drain_timeout: Duration,
}

/// Accept loop of the demo server.
///
/// Returns once shutdown was requested and open connections finished, or the
/// drain deadline passed.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    config: ServerLoopConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
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

            () = config.shutdown.notified() => {
                logger::log_shutdown_requested("Shutdown signal received");
                break;
            }
        }
    }

    // Stop accepting before waiting on the stragglers
    drop(listener);

    let remaining = drain(&active_connections, config.drain_timeout).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Wait for the connection count to reach zero; returns what is left
async fn drain(active_connections: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let open = active_connections.load(Ordering::SeqCst);
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_state;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_serves_then_shuts_down() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener =
                    super::super::create_reusable_listener("127.0.0.1:0".parse().unwrap())
                        .unwrap();
                let addr = listener.local_addr().unwrap();
                let shutdown = Arc::new(Notify::new());
                let active = Arc::new(AtomicUsize::new(0));

                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::new(test_state()),
                    Arc::clone(&active),
                    ServerLoopConfig {
                        shutdown: Arc::clone(&shutdown),
                        drain_timeout: Duration::from_secs(2),
                    },
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"GET /demos/nested/books HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .await
                    .unwrap();
                let mut raw = String::new();
                stream.read_to_string(&mut raw).await.unwrap();
                assert!(raw.starts_with("HTTP/1.1 200"));
                assert!(raw.contains("\"Books\""));

                shutdown.notify_one();
                server.await.unwrap().unwrap();
                assert_eq!(active.load(Ordering::SeqCst), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_at_deadline() {
        let active = AtomicUsize::new(2);
        let remaining = drain(&active, Duration::from_millis(200)).await;
        assert_eq!(remaining, 2);

        active.store(0, Ordering::SeqCst);
        assert_eq!(drain(&active, Duration::from_millis(200)).await, 0);
    }
}
