// Server loop module
// Accept loop with cancellation checked at the accept boundary

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::handle_connection;
use crate::config::ServerConfig;
use crate::logger;

/// Run the accept loop until the shutdown token fires.
///
/// Each accepted connection is served in its own task; an accept error is
/// logged and the loop continues. When `shutdown` is notified the loop
/// stops accepting, prints the stop message, and returns Ok — in-flight
/// responses are abandoned with the process.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run(
    listener: TcpListener,
    config: Arc<ServerConfig>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        handle_connection(stream, Arc::clone(&config));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_server_stop();
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::listener::create_listener;
    use std::path::PathBuf;

    #[tokio::test]
    async fn shutdown_stops_the_loop() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let config = Arc::new(ServerConfig::new(0, PathBuf::from(".")));
        let shutdown = Arc::new(Notify::new());

        let loop_shutdown = Arc::clone(&shutdown);
        let handle = tokio::spawn(run(listener, config, loop_shutdown));

        // notify_one stores a permit, so this wakes the loop even if it
        // has not reached the select yet
        tokio::task::yield_now().await;
        shutdown.notify_one();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("loop did not stop on shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}
